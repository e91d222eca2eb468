// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use std::collections::HashMap;

use crate::aggregate::{self, BoardBreakdown, BoardSummary};
use crate::error::{Result, TrackerError};
use crate::events::{ChangeKind, Table};
use crate::models::{Board, DEFAULT_BOARD_COLOR, DEFAULT_BOARD_ICON, Expense, NewBoard, NewNotification};
use crate::session::Session;
use crate::sharing::{ShareAction, ShareStatus};
use crate::store::Store;
use crate::utils::{ensure_budget, ensure_name, generate_share_code, validate_color};

use super::{expenses, notifications, profiles, query_in, shares};

/// A board as the list screen shows it: who made it, whether it is someone
/// else's, its expenses and their totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardOverview {
    #[serde(flatten)]
    pub board: Board,
    pub created_by_name: String,
    pub is_shared: bool,
    pub summary: BoardSummary,
    pub expenses: Vec<Expense>,
}

fn normalised(new: NewBoard) -> Result<NewBoard> {
    ensure_budget(new.total_budget)?;
    Ok(NewBoard {
        name: ensure_name("Board name", &new.name)?,
        description: new.description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
        color: new.color.as_deref().map(validate_color).transpose()?,
        icon: new.icon.map(|i| i.trim().to_string()).filter(|i| !i.is_empty()),
        total_budget: new.total_budget,
        share_code: new
            .share_code
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty()),
    })
}

pub fn create(store: &Store, session: &Session, new: NewBoard) -> Result<Board> {
    store.atomically(|store| {
        let me = session.require()?;
        let new = normalised(new)?;
        let code = match new.share_code {
            Some(c) => {
                if find_by_code(store.conn(), &c)?.is_some() {
                    return Err(TrackerError::Validation(format!("Share code '{}' is taken", c)));
                }
                c
            }
            None => unused_code(store.conn())?,
        };
        store.conn().execute(
            "INSERT INTO expense_boards(name, description, color, icon, total_budget, share_code, created_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                new.name,
                new.description,
                new.color.as_deref().unwrap_or(DEFAULT_BOARD_COLOR),
                new.icon.as_deref().unwrap_or(DEFAULT_BOARD_ICON),
                new.total_budget.to_string(),
                code,
                me,
                Utc::now()
            ],
        )?;
        let id = store.conn().last_insert_rowid();
        tracing::info!(id, name = %new.name, "board created");
        store.changed(Table::ExpenseBoards, ChangeKind::Insert, id);
        let board = fetch(store.conn(), id)?;
        notifications::raise(
            store,
            me,
            NewNotification {
                kind: "board_created".into(),
                title: "Board created".into(),
                message: format!("Your expense board '{}' is ready", board.name),
                board_name: Some(board.name.clone()),
                icon: Some(board.icon.clone()),
                icon_color: Some(board.color.clone()),
            },
        )?;
        Ok(board)
    })
}

/// Owner only.
pub fn update(store: &Store, session: &Session, id: i64, new: NewBoard) -> Result<Board> {
    store.atomically(|store| {
        let me = session.require()?;
        let current = owned(store.conn(), me, id)?;
        let new = normalised(new)?;
        let code = new.share_code.unwrap_or(current.share_code);
        if let Some(other) = find_by_code(store.conn(), &code)? {
            if other.id != id {
                return Err(TrackerError::Validation(format!("Share code '{}' is taken", code)));
            }
        }
        store.conn().execute(
            "UPDATE expense_boards
             SET name=?1, description=?2, color=?3, icon=?4, total_budget=?5, share_code=?6, updated_at=?7
             WHERE id=?8 AND created_by=?9",
            params![
                new.name,
                new.description,
                new.color.unwrap_or(current.color),
                new.icon.unwrap_or(current.icon),
                new.total_budget.to_string(),
                code,
                Utc::now(),
                id,
                me
            ],
        )?;
        tracing::info!(id, "board updated");
        store.changed(Table::ExpenseBoards, ChangeKind::Update, id);
        fetch(store.conn(), id)
    })
}

/// Owner only. Expenses and share grants go with the board.
pub fn delete(store: &Store, session: &Session, id: i64) -> Result<()> {
    store.atomically(|store| {
        let me = session.require()?;
        let n = store.conn().execute(
            "DELETE FROM expense_boards WHERE id=?1 AND created_by=?2",
            params![id, me],
        )?;
        if n == 0 {
            return Err(TrackerError::NotFound(format!("Board {}", id)));
        }
        tracing::info!(id, "board deleted");
        store.changed(Table::ExpenseBoards, ChangeKind::Delete, id);
        // cascaded rows
        store.changed_many(Table::Expenses, ChangeKind::Delete);
        store.changed_many(Table::SharedUsers, ChangeKind::Delete);
        Ok(())
    })
}

/// A board the caller owns or has accepted an invitation to.
pub fn get(store: &Store, session: &Session, id: i64) -> Result<Board> {
    let me = session.require()?;
    visible(store.conn(), me, id)
}

/// Owned boards plus accepted shared boards, newest first.
pub fn list(store: &Store, session: &Session) -> Result<Vec<BoardOverview>> {
    let me = session.require()?;
    let ids = accessible_board_ids(store.conn(), me)?;
    let mut boards = query_in(
        store.conn(),
        "SELECT * FROM expense_boards WHERE id IN ({ids})",
        &ids,
        Board::from_row,
    )?;
    boards.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

    let mut by_board: HashMap<i64, Vec<Expense>> = HashMap::new();
    for e in expenses::for_boards(store.conn(), &ids)? {
        by_board.entry(e.board_id).or_default().push(e);
    }
    let owners: Vec<i64> = boards.iter().map(|b| b.created_by).collect();
    let people = profiles::by_ids(store.conn(), &owners)?;

    let mut out = Vec::with_capacity(boards.len());
    for board in boards {
        let items = by_board.remove(&board.id).unwrap_or_default();
        let summary = aggregate::summarize_board(board.total_budget, &items)?;
        let created_by_name = if board.created_by == me {
            "You".to_string()
        } else {
            people
                .get(&board.created_by)
                .map(|p| p.full_name.clone())
                .unwrap_or_else(|| "Unknown".to_string())
        };
        out.push(BoardOverview {
            is_shared: board.created_by != me,
            created_by_name,
            summary,
            expenses: items,
            board,
        });
    }
    Ok(out)
}

/// Who spent what on a board and who owes whom to even it out.
pub fn details(store: &Store, session: &Session, id: i64) -> Result<BoardBreakdown> {
    let me = session.require()?;
    let board = visible(store.conn(), me, id)?;
    let items = expenses::for_boards(store.conn(), &[id])?;

    let mut member_ids = vec![board.created_by];
    for g in shares::for_board(store.conn(), id)? {
        if let (ShareStatus::Accepted, Some(uid)) = (g.status, g.user_id) {
            if !member_ids.contains(&uid) {
                member_ids.push(uid);
            }
        }
    }
    let people = profiles::by_ids(store.conn(), &member_ids)?;
    let members: Vec<(i64, String)> = member_ids
        .into_iter()
        .map(|uid| {
            let name = people
                .get(&uid)
                .map(|p| p.full_name.clone())
                .unwrap_or_else(|| "Unknown".to_string());
            (uid, name)
        })
        .collect();
    aggregate::board_breakdown(board.total_budget, &items, &members)
}

/// Joins someone else's board by its share code. Joining grants access at
/// once; a pending invitation for the caller is accepted on the way.
pub fn join_by_code(store: &Store, session: &Session, code: &str) -> Result<Board> {
    store.atomically(|store| {
        let me = session.require()?;
        let board = find_by_code(store.conn(), code)?
            .ok_or_else(|| TrackerError::NotFound(format!("Board with code '{}'", code.trim())))?;
        if board.created_by == me {
            return Err(TrackerError::Validation(format!(
                "You already own '{}'",
                board.name
            )));
        }
        let profile = profiles::get(store.conn(), me)?;
        match shares::find_for_target(store.conn(), board.id, me, &profile.email)? {
            Some(g) if g.status == ShareStatus::Accepted => return Ok(board),
            Some(g) => {
                shares::accept(store, session, g.id)?;
            }
            None => {
                store.conn().execute(
                    "INSERT INTO shared_users(board_id, shared_by, shared_with, user_id, is_accepted, status, created_at)
                     VALUES (?1, ?2, ?3, ?4, 1, ?5, ?6)",
                    params![
                        board.id,
                        board.created_by,
                        profile.email,
                        me,
                        ShareStatus::Pending.apply(ShareAction::Accept)?.as_str(),
                        Utc::now()
                    ],
                )?;
                let gid = store.conn().last_insert_rowid();
                tracing::info!(board = board.id, grant = gid, "joined board by code");
                store.changed(Table::SharedUsers, ChangeKind::Insert, gid);
                notifications::raise(
                    store,
                    board.created_by,
                    NewNotification {
                        kind: "board_joined".into(),
                        title: "New board member".into(),
                        message: format!("{} joined '{}'", profile.full_name, board.name),
                        board_name: Some(board.name.clone()),
                        icon: Some("account-plus".into()),
                        icon_color: Some("#4ECDC4".into()),
                    },
                )?;
            }
        }
        Ok(board)
    })
}

pub fn accessible_board_ids(conn: &Connection, user_id: i64) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT id FROM expense_boards WHERE created_by=?1
         UNION
         SELECT board_id FROM shared_users WHERE user_id=?1 AND status='accepted'",
    )?;
    let rows = stmt.query_map(params![user_id], |r| r.get::<_, i64>(0))?;
    let mut ids = Vec::new();
    for r in rows {
        ids.push(r?);
    }
    Ok(ids)
}

pub fn can_access(conn: &Connection, user_id: i64, board_id: i64) -> Result<bool> {
    Ok(accessible_board_ids(conn, user_id)?.contains(&board_id))
}

pub(crate) fn fetch(conn: &Connection, id: i64) -> Result<Board> {
    conn.query_row(
        "SELECT * FROM expense_boards WHERE id=?1",
        params![id],
        Board::from_row,
    )
    .optional()?
    .ok_or_else(|| TrackerError::NotFound(format!("Board {}", id)))
}

pub fn owned(conn: &Connection, user_id: i64, id: i64) -> Result<Board> {
    let board = fetch(conn, id)?;
    if board.created_by != user_id {
        return Err(TrackerError::NotFound(format!("Board {}", id)));
    }
    Ok(board)
}

pub fn visible(conn: &Connection, user_id: i64, id: i64) -> Result<Board> {
    if !can_access(conn, user_id, id)? {
        return Err(TrackerError::NotFound(format!("Board {}", id)));
    }
    fetch(conn, id)
}

/// The caller's oldest own board, the one analytics fall back to.
pub fn first_owned(conn: &Connection, user_id: i64) -> Result<Option<Board>> {
    let b = conn
        .query_row(
            "SELECT * FROM expense_boards WHERE created_by=?1 ORDER BY created_at, id LIMIT 1",
            params![user_id],
            Board::from_row,
        )
        .optional()?;
    Ok(b)
}

pub fn find_by_code(conn: &Connection, code: &str) -> Result<Option<Board>> {
    let b = conn
        .query_row(
            "SELECT * FROM expense_boards WHERE share_code=?1",
            params![code.trim().to_uppercase()],
            Board::from_row,
        )
        .optional()?;
    Ok(b)
}

fn unused_code(conn: &Connection) -> Result<String> {
    loop {
        let code = generate_share_code();
        if find_by_code(conn, &code)?.is_none() {
            return Ok(code);
        }
    }
}
