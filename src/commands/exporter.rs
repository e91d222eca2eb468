// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use serde_json::json;

use super::arg;
use crate::models::ViewDefaults;
use crate::services::{boards, expenses};
use crate::session::Session;
use crate::store::Store;

pub fn handle(store: &Store, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("expenses", sub)) => export_expenses(store, session, sub),
        _ => Ok(()),
    }
}

/// Every expense on the boards the caller can see, oldest first.
fn export_expenses(store: &Store, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = arg(sub, "format")?.to_lowercase();
    let out = arg(sub, "out")?;
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let me = session.require()?;
    let ids = match sub.get_one::<i64>("board") {
        Some(&b) => vec![boards::visible(store.conn(), me, b)?.id],
        None => boards::accessible_board_ids(store.conn(), me)?,
    };
    let mut items = expenses::for_boards(store.conn(), &ids)?;
    items.reverse();
    let rows = expenses::views(store.conn(), items, ViewDefaults::LIST)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date", "board", "category", "description", "amount", "payment_method", "created_by",
            ])?;
            for r in &rows {
                wtr.write_record([
                    r.date.format("%Y-%m-%d").to_string(),
                    r.board.clone(),
                    r.category.clone(),
                    r.description.clone(),
                    r.amount.to_string(),
                    r.payment_method.clone(),
                    r.created_by_name.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            let items: Vec<serde_json::Value> = rows
                .iter()
                .map(|r| {
                    json!({
                        "date": r.date.format("%Y-%m-%d").to_string(),
                        "board": r.board,
                        "category": r.category,
                        "description": r.description,
                        "amount": r.amount.to_string(),
                        "payment_method": r.payment_method,
                        "created_by": r.created_by_name,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
    }
    tracing::info!(count = rows.len(), %out, "expenses exported");
    println!("Exported {} expenses to {}", rows.len(), out);
    Ok(())
}
