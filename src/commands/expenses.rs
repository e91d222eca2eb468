// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::Utc;

use super::{arg, id, json_flags, opt};
use crate::models::NewExpense;
use crate::services::{categories, expenses};
use crate::session::Session;
use crate::settings::get_currency;
use crate::store::Store;
use crate::utils::{fmt_money, maybe_print_json, parse_amount, parse_date, pretty_table};

pub fn handle(store: &Store, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let e = expenses::create(store, session, fields(store, session, sub)?)?;
            let ccy = get_currency(store.conn())?;
            println!(
                "Recorded {} '{}' on {} (id {})",
                fmt_money(&e.amount, &ccy),
                e.description,
                e.date.format("%Y-%m-%d"),
                e.id
            );
        }
        Some(("edit", sub)) => {
            let e = expenses::update(store, session, id(sub, "id")?, fields(store, session, sub)?)?;
            println!("Updated expense {}", e.id);
        }
        Some(("rm", sub)) => {
            let expense_id = id(sub, "id")?;
            if expenses::delete(store, session, expense_id)? {
                println!("Removed expense {}", expense_id);
            } else {
                println!("No expense {} of yours to remove", expense_id);
            }
        }
        Some(("list", sub)) => list(store, session, sub)?,
        _ => {}
    }
    Ok(())
}

/// Accepts a category id or one of the caller's category names.
fn category_id(store: &Store, session: &Session, raw: &str) -> Result<i64> {
    if let Ok(id) = raw.trim().parse::<i64>() {
        return Ok(id);
    }
    let me = session.require()?;
    let cat = categories::find_by_name(store.conn(), me, raw)?
        .with_context(|| format!("No category named '{}'", raw.trim()))?;
    Ok(cat.id)
}

fn fields(store: &Store, session: &Session, sub: &clap::ArgMatches) -> Result<NewExpense> {
    let category_id = match sub.get_one::<String>("category") {
        Some(c) => Some(category_id(store, session, c)?),
        None => None,
    };
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => Utc::now(),
    };
    Ok(NewExpense {
        board_id: id(sub, "board")?,
        category_id,
        amount: parse_amount(arg(sub, "amount")?)?,
        description: arg(sub, "description")?.to_string(),
        date,
        payment_method: opt(sub, "payment"),
    })
}

pub fn query(store: &Store, session: &Session, sub: &clap::ArgMatches) -> Result<expenses::ExpenseQuery> {
    let category_id = match sub.get_one::<String>("category") {
        Some(c) => Some(category_id(store, session, c)?),
        None => None,
    };
    Ok(expenses::ExpenseQuery {
        category_id,
        board_id: sub.get_one::<i64>("board").copied(),
        page: sub.get_one::<usize>("page").copied().unwrap_or(1),
        limit: sub.get_one::<usize>("limit").copied().unwrap_or(10),
    })
}

fn list(store: &Store, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let page = expenses::list(store, session, &query(store, session, sub)?)?;
    let (json, jsonl) = json_flags(sub);
    if jsonl {
        maybe_print_json(false, true, &page.data)?;
        return Ok(());
    }
    if maybe_print_json(json, false, &page)? {
        return Ok(());
    }
    let ccy = get_currency(store.conn())?;
    let rows: Vec<Vec<String>> = page
        .data
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.date.format("%Y-%m-%d").to_string(),
                e.board.clone(),
                e.category.clone(),
                e.description.clone(),
                fmt_money(&e.amount, &ccy),
                e.payment_method.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Board", "Category", "Description", "Amount", "Payment"],
            rows,
        )
    );
    println!(
        "Page {} of {} ({} expenses)",
        page.current_page,
        page.total_pages.max(1),
        page.total
    );
    Ok(())
}
