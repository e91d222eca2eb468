// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate;
use crate::models::{Board, Expense};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

/// Issues as `(kind, detail)` pairs.
pub fn check(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut rows = Vec::new();

    // 1) Expenses whose category was deleted
    let mut stmt = conn.prepare(
        "SELECT e.id, e.category_id FROM expenses e
         WHERE e.category_id IS NOT NULL
           AND NOT EXISTS (SELECT 1 FROM categories c WHERE c.id = e.category_id)
         ORDER BY e.id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let cat: i64 = r.get(1)?;
        rows.push((
            "dangling_category".to_string(),
            format!("expense {} -> category {}", id, cat),
        ));
    }

    // 2) Boards spent past their budget
    let mut stmt2 = conn.prepare("SELECT * FROM expense_boards ORDER BY id")?;
    let boards = stmt2.query_map([], Board::from_row)?;
    for b in boards {
        let b = b?;
        let mut st = conn.prepare("SELECT * FROM expenses WHERE board_id=?1")?;
        let items = st
            .query_map([b.id], Expense::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        let summary = aggregate::summarize_board(b.total_budget, &items)?;
        if summary.remaining_budget < rust_decimal::Decimal::ZERO {
            rows.push((
                "over_budget".to_string(),
                format!("board {} '{}' by {}", b.id, b.name, -summary.remaining_budget),
            ));
        }
    }

    // 3) Pending invitations nobody has registered for
    let mut stmt3 = conn.prepare(
        "SELECT id, shared_with FROM shared_users
         WHERE status='pending' AND user_id IS NULL ORDER BY id",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        let email: String = r.get(1)?;
        rows.push((
            "invite_without_profile".to_string(),
            format!("invitation {} to {}", id, email),
        ));
    }
    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let issues = check(conn)?;
    if issues.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = issues.into_iter().map(|(k, d)| vec![k, d]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
