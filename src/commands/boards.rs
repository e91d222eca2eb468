// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::{arg, id, json_flags, opt};
use crate::aggregate::{self, BudgetStatus};
use crate::models::NewBoard;
use crate::services::boards::{self, BoardOverview};
use crate::session::Session;
use crate::settings::get_currency;
use crate::store::Store;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};

pub fn handle(store: &Store, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let b = boards::create(store, session, fields(sub)?)?;
            println!("Created board '{}' (id {}, share code {})", b.name, b.id, b.share_code);
        }
        Some(("edit", sub)) => {
            let b = boards::update(store, session, id(sub, "id")?, fields(sub)?)?;
            println!("Updated board '{}'", b.name);
        }
        Some(("rm", sub)) => {
            let board_id = id(sub, "id")?;
            boards::delete(store, session, board_id)?;
            println!("Removed board {}", board_id);
        }
        Some(("list", sub)) => list(store, session, sub)?,
        Some(("show", sub)) => show(store, session, sub)?,
        Some(("join", sub)) => {
            let b = boards::join_by_code(store, session, arg(sub, "code")?)?;
            println!("You now have access to '{}'", b.name);
        }
        _ => {}
    }
    Ok(())
}

fn fields(sub: &clap::ArgMatches) -> Result<NewBoard> {
    Ok(NewBoard {
        name: arg(sub, "name")?.to_string(),
        description: opt(sub, "description"),
        color: opt(sub, "color"),
        icon: opt(sub, "icon"),
        total_budget: parse_decimal(arg(sub, "budget")?)?,
        share_code: opt(sub, "code"),
    })
}

fn list(store: &Store, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let data = boards::list(store, session)?;
    let (json, jsonl) = json_flags(sub);
    if maybe_print_json(json, jsonl, &data)? {
        return Ok(());
    }
    let ccy = get_currency(store.conn())?;
    println!("{}", pretty_table(&LIST_HEADERS, list_rows(&data, &ccy)));
    Ok(())
}

pub const LIST_HEADERS: [&str; 9] = [
    "ID", "Board", "Owner", "Budget", "Spent", "Remaining", "Status", "Txns", "Code",
];

pub fn list_rows(data: &[BoardOverview], ccy: &str) -> Vec<Vec<String>> {
    data.iter()
        .map(|o| {
            vec![
                o.board.id.to_string(),
                o.board.name.clone(),
                o.created_by_name.clone(),
                fmt_money(&o.summary.total_budget, ccy),
                fmt_money(&o.summary.total_expenses, ccy),
                fmt_money(&o.summary.remaining_budget, ccy),
                o.summary.status.to_string(),
                o.summary.total_transactions.to_string(),
                o.board.share_code.clone(),
            ]
        })
        .collect()
}

fn show(store: &Store, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let board_id = id(sub, "id")?;
    let board = boards::get(store, session, board_id)?;
    let details = boards::details(store, session, board_id)?;
    let (json, jsonl) = json_flags(sub);
    if maybe_print_json(json, jsonl, &details)? {
        return Ok(());
    }
    let ccy = get_currency(store.conn())?;
    let status = BudgetStatus::from_remaining(aggregate::remaining_budget(
        details.total_budget,
        details.total_expenses,
    ));
    println!(
        "{} ({}): {} spent of {}, {}, {} per person",
        board.name,
        board.share_code,
        fmt_money(&details.total_expenses, &ccy),
        fmt_money(&details.total_budget, &ccy),
        status,
        fmt_money(&details.per_person, &ccy),
    );
    let rows: Vec<Vec<String>> = details
        .participants
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                fmt_money(&p.spent, &ccy),
                format!("{}%", p.percentage),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Member", "Spent", "Share"], rows));
    if !details.settlements.is_empty() {
        let rows: Vec<Vec<String>> = details
            .settlements
            .iter()
            .map(|s| vec![s.from.clone(), s.to.clone(), fmt_money(&s.amount, &ccy)])
            .collect();
        println!("{}", pretty_table(&["From", "To", "Amount"], rows));
    }
    Ok(())
}
