// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use rusqlite::params;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::{self, BudgetStatus};
use crate::error::{Result, TrackerError};
use crate::models::{Expense, ExpenseView, ViewDefaults};
use crate::session::Session;
use crate::settings::AppSettings;
use crate::store::Store;

use super::{boards, expenses, query_in};

pub const RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyStats {
    pub month_start: DateTime<Utc>,
    pub total_expenses: Decimal,
    pub total_budget: Decimal,
    /// Negative once the month is over budget.
    pub remaining_balance: Decimal,
    pub status: BudgetStatus,
}

/// Newest expenses across every board the caller can see.
pub fn recent_transactions(store: &Store, session: &Session, limit: usize) -> Result<Vec<ExpenseView>> {
    let me = session.require()?;
    if limit == 0 {
        return Err(TrackerError::Validation("limit must be at least 1".into()));
    }
    let ids = boards::accessible_board_ids(store.conn(), me)?;
    let sql = format!(
        "SELECT * FROM expenses WHERE board_id IN ({{ids}}) ORDER BY created_at DESC, id DESC LIMIT {}",
        limit
    );
    let items = query_in(store.conn(), &sql, &ids, Expense::from_row)?;
    expenses::views(store.conn(), items, ViewDefaults::RECENT)
}

pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// The caller's spending since the first of the month against the monthly
/// budget from settings.
pub fn monthly_stats(store: &Store, session: &Session, now: DateTime<Utc>) -> Result<MonthlyStats> {
    let me = session.require()?;
    let start = month_start(now);
    let mut stmt = store
        .conn()
        .prepare("SELECT * FROM expenses WHERE created_by=?1")?;
    let rows = stmt.query_map(params![me], Expense::from_row)?;
    let mut items = Vec::new();
    for r in rows {
        let e = r?;
        if e.date >= start {
            items.push(e);
        }
    }
    let budget = AppSettings::load(store.conn())?.monthly_budget;
    let total = aggregate::total_expenses(&items)?;
    let remaining = aggregate::remaining_budget(budget, total);
    Ok(MonthlyStats {
        month_start: start,
        total_expenses: total,
        total_budget: budget,
        remaining_balance: remaining,
        status: BudgetStatus::from_remaining(remaining),
    })
}
