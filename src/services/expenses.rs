// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use std::collections::HashMap;

use crate::error::{Result, TrackerError};
use crate::events::{ChangeKind, Table};
use crate::models::{Expense, ExpenseView, NewExpense, NewNotification, ViewDefaults};
use crate::session::Session;
use crate::settings::get_currency;
use crate::store::Store;
use crate::utils::{ensure_amount, fmt_money};

use super::{boards, categories, profiles, query_in};

#[derive(Debug, Clone)]
pub struct ExpenseQuery {
    pub category_id: Option<i64>,
    pub board_id: Option<i64>,
    /// 1-based.
    pub page: usize,
    pub limit: usize,
}

impl Default for ExpenseQuery {
    fn default() -> Self {
        ExpenseQuery {
            category_id: None,
            board_id: None,
            page: 1,
            limit: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpensePage {
    pub data: Vec<ExpenseView>,
    pub total: usize,
    pub has_more: bool,
    pub current_page: usize,
    pub total_pages: usize,
}

/// The board must be visible to the caller and the category, when given,
/// must be one of theirs.
fn check_refs(conn: &Connection, me: i64, new: &NewExpense) -> Result<()> {
    ensure_amount(new.amount)?;
    if !boards::can_access(conn, me, new.board_id)? {
        return Err(TrackerError::NotFound(format!("Board {}", new.board_id)));
    }
    if let Some(cid) = new.category_id {
        categories::owned(conn, me, cid)?;
    }
    Ok(())
}

pub fn create(store: &Store, session: &Session, new: NewExpense) -> Result<Expense> {
    store.atomically(|store| {
        let me = session.require()?;
        check_refs(store.conn(), me, &new)?;
        store.conn().execute(
            "INSERT INTO expenses(board_id, category_id, amount, description, date, payment_method, created_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                new.board_id,
                new.category_id,
                new.amount.to_string(),
                new.description.trim(),
                new.date,
                new.payment_method,
                me,
                Utc::now()
            ],
        )?;
        let id = store.conn().last_insert_rowid();
        tracing::info!(id, board = new.board_id, amount = %new.amount, "expense created");
        store.changed(Table::Expenses, ChangeKind::Insert, id);

        let board = boards::fetch(store.conn(), new.board_id)?;
        let ccy = get_currency(store.conn())?;
        super::notifications::raise(
            store,
            me,
            NewNotification {
                kind: "expense_added".into(),
                title: "Expense added".into(),
                message: format!(
                    "{} added to '{}'",
                    fmt_money(&new.amount, &ccy),
                    board.name
                ),
                board_name: Some(board.name),
                icon: Some("cash".into()),
                icon_color: Some("#FF6B6B".into()),
            },
        )?;
        fetch(store.conn(), id)
    })
}

/// Full-field edit, creator only.
pub fn update(store: &Store, session: &Session, id: i64, new: NewExpense) -> Result<Expense> {
    let me = session.require()?;
    check_refs(store.conn(), me, &new)?;
    let n = store.conn().execute(
        "UPDATE expenses SET board_id=?1, category_id=?2, amount=?3, description=?4, date=?5, payment_method=?6
         WHERE id=?7 AND created_by=?8",
        params![
            new.board_id,
            new.category_id,
            new.amount.to_string(),
            new.description.trim(),
            new.date,
            new.payment_method,
            id,
            me
        ],
    )?;
    if n == 0 {
        return Err(TrackerError::NotFound(format!("Expense {}", id)));
    }
    tracing::info!(id, "expense updated");
    store.changed(Table::Expenses, ChangeKind::Update, id);
    fetch(store.conn(), id)
}

/// Creator only. `false` when nothing was deleted, so repeating a delete
/// is harmless.
pub fn delete(store: &Store, session: &Session, id: i64) -> Result<bool> {
    let me = session.require()?;
    let n = store.conn().execute(
        "DELETE FROM expenses WHERE id=?1 AND created_by=?2",
        params![id, me],
    )?;
    if n > 0 {
        tracing::info!(id, "expense deleted");
        store.changed(Table::Expenses, ChangeKind::Delete, id);
    }
    Ok(n > 0)
}

pub fn get(store: &Store, session: &Session, id: i64) -> Result<ExpenseView> {
    let me = session.require()?;
    let e = fetch(store.conn(), id)?;
    if !boards::can_access(store.conn(), me, e.board_id)? {
        return Err(TrackerError::NotFound(format!("Expense {}", id)));
    }
    let mut v = views(store.conn(), vec![e], ViewDefaults::LIST)?;
    v.pop()
        .ok_or_else(|| TrackerError::NotFound(format!("Expense {}", id)))
}

/// The caller's own expenses, newest first, one page at a time.
pub fn list(store: &Store, session: &Session, q: &ExpenseQuery) -> Result<ExpensePage> {
    let me = session.require()?;
    if q.page == 0 || q.limit == 0 {
        return Err(TrackerError::Validation(
            "page and limit start at 1".into(),
        ));
    }
    let mut filter = String::from(" WHERE created_by=?1");
    let mut p: Vec<i64> = vec![me];
    if let Some(cid) = q.category_id {
        p.push(cid);
        filter.push_str(&format!(" AND category_id=?{}", p.len()));
    }
    if let Some(bid) = q.board_id {
        p.push(bid);
        filter.push_str(&format!(" AND board_id=?{}", p.len()));
    }

    let total: i64 = store.conn().query_row(
        &format!("SELECT COUNT(*) FROM expenses{}", filter),
        rusqlite::params_from_iter(p.iter()),
        |r| r.get(0),
    )?;
    let total = total as usize;

    let offset = (q.page - 1)
        .checked_mul(q.limit)
        .filter(|o| i64::try_from(*o).is_ok() && i64::try_from(q.limit).is_ok())
        .ok_or_else(|| TrackerError::Validation(format!("page {} is out of range", q.page)))?;
    let sql = format!(
        "SELECT * FROM expenses{} ORDER BY date DESC, id DESC LIMIT {} OFFSET {}",
        filter, q.limit, offset
    );
    let mut stmt = store.conn().prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(p.iter()), Expense::from_row)?;
    let mut items = Vec::new();
    for r in rows {
        items.push(r?);
    }
    Ok(ExpensePage {
        data: views(store.conn(), items, ViewDefaults::LIST)?,
        total,
        has_more: offset.saturating_add(q.limit) < total,
        current_page: q.page,
        total_pages: total.div_ceil(q.limit),
    })
}

pub fn for_boards(conn: &Connection, board_ids: &[i64]) -> Result<Vec<Expense>> {
    query_in(
        conn,
        "SELECT * FROM expenses WHERE board_id IN ({ids}) ORDER BY date DESC, id DESC",
        board_ids,
        Expense::from_row,
    )
}

pub(crate) fn fetch(conn: &Connection, id: i64) -> Result<Expense> {
    conn.query_row("SELECT * FROM expenses WHERE id=?1", params![id], Expense::from_row)
        .optional()?
        .ok_or_else(|| TrackerError::NotFound(format!("Expense {}", id)))
}

/// Attaches category look, board name and creator to each expense.
pub fn views(conn: &Connection, items: Vec<Expense>, defaults: ViewDefaults) -> Result<Vec<ExpenseView>> {
    let cat_ids: Vec<i64> = items.iter().filter_map(|e| e.category_id).collect();
    let cats = categories::lookup(conn, &cat_ids)?;
    let mut board_ids: Vec<i64> = items.iter().map(|e| e.board_id).collect();
    board_ids.sort_unstable();
    board_ids.dedup();
    let board_names: HashMap<i64, String> = query_in(
        conn,
        "SELECT id, name FROM expense_boards WHERE id IN ({ids})",
        &board_ids,
        |r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?)),
    )?
    .into_iter()
    .collect();
    let mut creators: Vec<i64> = items.iter().map(|e| e.created_by).collect();
    creators.sort_unstable();
    creators.dedup();
    let people = profiles::by_ids(conn, &creators)?;

    Ok(items
        .iter()
        .map(|e| {
            ExpenseView::build(
                e,
                e.category_id.and_then(|id| cats.get(&id)),
                board_names.get(&e.board_id).map(String::as_str),
                people.get(&e.created_by),
                defaults,
            )
        })
        .collect())
}
