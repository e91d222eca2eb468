// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-app notifications. Rows are only ever marked read, never deleted.

use chrono::Utc;
use rusqlite::{OptionalExtension, params};

use crate::error::{Result, TrackerError};
use crate::events::{ChangeKind, Table};
use crate::models::{NewNotification, Notification};
use crate::session::Session;
use crate::store::Store;

pub fn list(store: &Store, session: &Session) -> Result<Vec<Notification>> {
    let me = session.require()?;
    let mut stmt = store.conn().prepare(
        "SELECT * FROM notifications WHERE user_id=?1 ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![me], Notification::from_row)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn get(store: &Store, session: &Session, id: i64) -> Result<Notification> {
    let me = session.require()?;
    store
        .conn()
        .query_row(
            "SELECT * FROM notifications WHERE id=?1 AND user_id=?2",
            params![id, me],
            Notification::from_row,
        )
        .optional()?
        .ok_or_else(|| TrackerError::NotFound(format!("Notification {}", id)))
}

pub fn mark_read(store: &Store, session: &Session, id: i64) -> Result<()> {
    let me = session.require()?;
    let n = store.conn().execute(
        "UPDATE notifications SET read=1 WHERE id=?1 AND user_id=?2",
        params![id, me],
    )?;
    if n == 0 {
        return Err(TrackerError::NotFound(format!("Notification {}", id)));
    }
    store.changed(Table::Notifications, ChangeKind::Update, id);
    Ok(())
}

/// Returns how many notifications flipped to read.
pub fn mark_all_read(store: &Store, session: &Session) -> Result<usize> {
    let me = session.require()?;
    let n = store.conn().execute(
        "UPDATE notifications SET read=1 WHERE user_id=?1 AND read=0",
        params![me],
    )?;
    if n > 0 {
        store.changed_many(Table::Notifications, ChangeKind::Update);
    }
    Ok(n)
}

pub fn unread_count(store: &Store, session: &Session) -> Result<i64> {
    let me = session.require()?;
    let n: i64 = store.conn().query_row(
        "SELECT COUNT(*) FROM notifications WHERE user_id=?1 AND read=0",
        params![me],
        |r| r.get(0),
    )?;
    Ok(n)
}

/// A notification for the caller.
pub fn create(store: &Store, session: &Session, new: NewNotification) -> Result<Notification> {
    let me = session.require()?;
    raise(store, me, new)
}

/// Stores a notification for `user_id` and hands it to the push dispatcher.
pub(crate) fn raise(store: &Store, user_id: i64, new: NewNotification) -> Result<Notification> {
    store.conn().execute(
        "INSERT INTO notifications(user_id, type, title, message, board_name, icon, icon_color, read, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8)",
        params![
            user_id,
            new.kind,
            new.title,
            new.message,
            new.board_name,
            new.icon,
            new.icon_color,
            Utc::now()
        ],
    )?;
    let id = store.conn().last_insert_rowid();
    store.push(&new.title, &new.message);
    tracing::debug!(id, user_id, kind = %new.kind, "notification raised");
    store.changed(Table::Notifications, ChangeKind::Insert, id);
    let n = store.conn().query_row(
        "SELECT * FROM notifications WHERE id=?1",
        params![id],
        Notification::from_row,
    )?;
    Ok(n)
}
