// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! One module per entity. Every call authenticates the caller, talks to the
//! store, and publishes a change event after each successful mutation.

pub mod analytics;
pub mod boards;
pub mod categories;
pub mod dashboard;
pub mod expenses;
pub mod notifications;
pub mod profiles;
pub mod shares;

use rusqlite::{Connection, Row};

use crate::error::Result;

/// Runs `sql` with one `?` placeholder list expanded to `ids`, i.e. the
/// `IN (...)` filter. `{ids}` in `sql` marks where the list goes.
pub(crate) fn query_in<T>(
    conn: &Connection,
    sql: &str,
    ids: &[i64],
    map: impl FnMut(&Row) -> rusqlite::Result<T>,
) -> Result<Vec<T>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; ids.len()].join(",");
    let sql = sql.replace("{ids}", &placeholders);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(ids.iter()), map)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
