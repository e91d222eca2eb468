// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::aggregate::{self, AnalyticsSummary, Period, TrendReport};
use crate::error::{Result, TrackerError};
use crate::models::{Board, Expense};
use crate::session::Session;
use crate::settings::get_currency;
use crate::store::Store;

use super::{boards, categories, expenses};

/// A report together with the board it was computed for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scoped<T> {
    pub board_id: i64,
    pub board_name: String,
    #[serde(flatten)]
    pub report: T,
}

/// The given board if the caller can see it, else their first own board.
pub fn resolve_board(conn: &Connection, me: i64, board_id: Option<i64>) -> Result<Board> {
    match board_id {
        Some(id) => boards::visible(conn, me, id),
        None => boards::first_owned(conn, me)?
            .ok_or_else(|| TrackerError::NotFound("Expense board".into())),
    }
}

fn load(conn: &Connection, me: i64, board_id: Option<i64>) -> Result<(Board, Vec<Expense>)> {
    let board = resolve_board(conn, me, board_id)?;
    let items = expenses::for_boards(conn, &[board.id])?;
    Ok((board, items))
}

pub fn summary(
    store: &Store,
    session: &Session,
    board_id: Option<i64>,
    period: Period,
    now: DateTime<Utc>,
) -> Result<Scoped<AnalyticsSummary>> {
    let me = session.require()?;
    let (board, items) = load(store.conn(), me, board_id)?;
    let ids: Vec<i64> = items.iter().filter_map(|e| e.category_id).collect();
    let cats = categories::lookup(store.conn(), &ids)?;
    let ccy = get_currency(store.conn())?;
    let report = aggregate::analytics_summary(&items, &cats, period, now, &ccy)?;
    tracing::debug!(board = board.id, %period, count = report.stats.total_count, "analytics computed");
    Ok(Scoped {
        board_id: board.id,
        board_name: board.name,
        report,
    })
}

pub fn trends(
    store: &Store,
    session: &Session,
    board_id: Option<i64>,
    period: Period,
    now: DateTime<Utc>,
) -> Result<Scoped<TrendReport>> {
    let me = session.require()?;
    let (board, items) = load(store.conn(), me, board_id)?;
    let ids: Vec<i64> = items.iter().filter_map(|e| e.category_id).collect();
    let cats = categories::lookup(store.conn(), &ids)?;
    let report = aggregate::trend_report(&items, &cats, period, now)?;
    Ok(Scoped {
        board_id: board.id,
        board_name: board.name,
        report,
    })
}
