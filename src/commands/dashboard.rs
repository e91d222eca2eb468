// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;

use super::json_flags;
use crate::services::dashboard::{self, RECENT_LIMIT};
use crate::session::Session;
use crate::settings::get_currency;
use crate::store::Store;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

pub fn handle(store: &Store, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("recent", sub)) => {
            let limit = sub.get_one::<usize>("limit").copied().unwrap_or(RECENT_LIMIT);
            let data = dashboard::recent_transactions(store, session, limit)?;
            let (json, jsonl) = json_flags(sub);
            if !maybe_print_json(json, jsonl, &data)? {
                let ccy = get_currency(store.conn())?;
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|e| {
                        vec![
                            e.date.format("%Y-%m-%d").to_string(),
                            e.board.clone(),
                            e.category.clone(),
                            e.description.clone(),
                            fmt_money(&e.amount, &ccy),
                            e.created_by_name.clone().unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Date", "Board", "Category", "Description", "Amount", "By"], rows)
                );
            }
        }
        Some(("month", sub)) => {
            let s = dashboard::monthly_stats(store, session, Utc::now())?;
            let (json, jsonl) = json_flags(sub);
            if !maybe_print_json(json, jsonl, &s)? {
                let ccy = get_currency(store.conn())?;
                println!(
                    "{}",
                    pretty_table(
                        &["Since", "Spent", "Budget", "Remaining", "Status"],
                        vec![vec![
                            s.month_start.format("%Y-%m-%d").to_string(),
                            fmt_money(&s.total_expenses, &ccy),
                            fmt_money(&s.total_budget, &ccy),
                            fmt_money(&s.remaining_balance, &ccy),
                            s.status.to_string(),
                        ]],
                    )
                );
            }
        }
        _ => {}
    }
    Ok(())
}
