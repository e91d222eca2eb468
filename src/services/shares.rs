// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Board invitations. The lifecycle rules live in [`crate::sharing`]; this
//! module decides who may act and keeps the store in step.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

use crate::error::{Result, TrackerError};
use crate::events::{ChangeKind, Table};
use crate::models::{NewNotification, ShareGrant};
use crate::session::Session;
use crate::sharing::{ShareAction, ShareStatus};
use crate::store::Store;
use crate::utils::validate_email;

use super::{boards, notifications, profiles};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrantView {
    #[serde(flatten)]
    pub grant: ShareGrant,
    pub board_name: String,
    /// Target's name, or the invited address when nobody registered it yet.
    pub target_name: String,
    pub shared_by_name: String,
}

/// Owner invites `email` to a board. The grant starts pending.
pub fn invite(store: &Store, session: &Session, board_id: i64, email: &str) -> Result<ShareGrant> {
    store.atomically(|store| {
        let me = session.require()?;
        let board = boards::owned(store.conn(), me, board_id)?;
        let email = validate_email(email)?;
        let owner = profiles::get(store.conn(), me)?;
        if owner.email == email {
            return Err(TrackerError::Validation("You cannot invite yourself".into()));
        }
        let exists: bool = store.conn().query_row(
            "SELECT EXISTS(SELECT 1 FROM shared_users WHERE board_id=?1 AND shared_with=?2)",
            params![board_id, email],
            |r| r.get(0),
        )?;
        if exists {
            return Err(TrackerError::Validation(format!(
                "'{}' is already invited to '{}'",
                email, board.name
            )));
        }
        let target = profiles::find_by_email(store.conn(), &email)?;
        store.conn().execute(
            "INSERT INTO shared_users(board_id, shared_by, shared_with, user_id, is_accepted, status, created_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6)",
            params![
                board_id,
                me,
                email,
                target.as_ref().map(|p| p.id),
                ShareStatus::Pending.as_str(),
                Utc::now()
            ],
        )?;
        let id = store.conn().last_insert_rowid();
        tracing::info!(grant = id, board = board_id, %email, "invitation sent");
        store.changed(Table::SharedUsers, ChangeKind::Insert, id);

        if let Some(t) = target {
            notifications::raise(
                store,
                t.id,
                NewNotification {
                    kind: "board_invite".into(),
                    title: "Board invitation".into(),
                    message: format!("{} invited you to '{}'", owner.full_name, board.name),
                    board_name: Some(board.name.clone()),
                    icon: Some("account-multiple-plus".into()),
                    icon_color: Some("#45B7D1".into()),
                },
            )?;
        }
        get(store.conn(), id)
    })
}

pub fn accept(store: &Store, session: &Session, grant_id: i64) -> Result<ShareGrant> {
    transition(store, session, grant_id, ShareAction::Accept)
}

pub fn reject(store: &Store, session: &Session, grant_id: i64) -> Result<ShareGrant> {
    transition(store, session, grant_id, ShareAction::Reject)
}

fn transition(
    store: &Store,
    session: &Session,
    grant_id: i64,
    action: ShareAction,
) -> Result<ShareGrant> {
    store.atomically(|store| {
        let me = session.require()?;
        let grant = get(store.conn(), grant_id)?;
        let profile = profiles::get(store.conn(), me)?;
        if !is_target(&grant, me, &profile.email) {
            return Err(TrackerError::Forbidden(
                "only the invited person can answer an invitation".into(),
            ));
        }
        let next = grant.status.apply(action)?;

        // The status guard in SQL catches a concurrent answer landing first.
        let n = store.conn().execute(
            "UPDATE shared_users SET status=?1, is_accepted=?2, user_id=?3
             WHERE id=?4 AND status='pending'",
            params![next.as_str(), next.is_accepted(), me, grant_id],
        )?;
        if n == 0 {
            let now = get(store.conn(), grant_id)?;
            return Err(TrackerError::InvalidTransition {
                from: now.status,
                action,
            });
        }
        tracing::info!(grant = grant_id, status = %next, "invitation answered");
        store.changed(Table::SharedUsers, ChangeKind::Update, grant_id);

        if next.is_accepted() {
            let board = boards::fetch(store.conn(), grant.board_id)?;
            notifications::raise(
                store,
                grant.shared_by,
                NewNotification {
                    kind: "invite_accepted".into(),
                    title: "Invitation accepted".into(),
                    message: format!("{} joined '{}'", profile.full_name, board.name),
                    board_name: Some(board.name),
                    icon: Some("check-circle".into()),
                    icon_color: Some("#4ECDC4".into()),
                },
            )?;
        }
        get(store.conn(), grant_id)
    })
}

/// Removes a grant in any state. The owner who shared the board and the
/// invited person may both do this; access ends immediately.
pub fn revoke(store: &Store, session: &Session, grant_id: i64) -> Result<()> {
    store.atomically(|store| {
        let me = session.require()?;
        let grant = get(store.conn(), grant_id)?;
        let profile = profiles::get(store.conn(), me)?;
        if grant.shared_by != me && !is_target(&grant, me, &profile.email) {
            return Err(TrackerError::Forbidden(
                "only the board owner or the invited person can remove an invitation".into(),
            ));
        }
        store
            .conn()
            .execute("DELETE FROM shared_users WHERE id=?1", params![grant_id])?;
        tracing::info!(grant = grant_id, "invitation revoked");
        store.changed(Table::SharedUsers, ChangeKind::Delete, grant_id);
        Ok(())
    })
}

/// Invitations the caller sent, newest first.
pub fn sent(store: &Store, session: &Session) -> Result<Vec<GrantView>> {
    let me = session.require()?;
    views(
        store.conn(),
        "SELECT * FROM shared_users WHERE shared_by=?1 ORDER BY created_at DESC, id DESC",
        params![me],
    )
}

/// Invitations addressed to the caller, newest first.
pub fn received(store: &Store, session: &Session) -> Result<Vec<GrantView>> {
    let me = session.require()?;
    let profile = profiles::get(store.conn(), me)?;
    views(
        store.conn(),
        "SELECT * FROM shared_users
         WHERE user_id=?1 OR (user_id IS NULL AND shared_with=?2)
         ORDER BY created_at DESC, id DESC",
        params![me, profile.email],
    )
}

pub fn get(conn: &Connection, id: i64) -> Result<ShareGrant> {
    conn.query_row(
        "SELECT * FROM shared_users WHERE id=?1",
        params![id],
        ShareGrant::from_row,
    )
    .optional()?
    .ok_or_else(|| TrackerError::NotFound(format!("Invitation {}", id)))
}

pub fn for_board(conn: &Connection, board_id: i64) -> Result<Vec<ShareGrant>> {
    let mut stmt = conn.prepare("SELECT * FROM shared_users WHERE board_id=?1 ORDER BY id")?;
    let rows = stmt.query_map(params![board_id], ShareGrant::from_row)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub(crate) fn find_for_target(
    conn: &Connection,
    board_id: i64,
    user_id: i64,
    email: &str,
) -> Result<Option<ShareGrant>> {
    let g = conn
        .query_row(
            "SELECT * FROM shared_users
             WHERE board_id=?1 AND (user_id=?2 OR (user_id IS NULL AND shared_with=?3))
             ORDER BY id LIMIT 1",
            params![board_id, user_id, email],
            ShareGrant::from_row,
        )
        .optional()?;
    Ok(g)
}

fn is_target(grant: &ShareGrant, user_id: i64, email: &str) -> bool {
    match grant.user_id {
        Some(uid) => uid == user_id,
        None => grant.shared_with == email,
    }
}

fn views(conn: &Connection, sql: &str, p: &[&dyn rusqlite::ToSql]) -> Result<Vec<GrantView>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(p, ShareGrant::from_row)?;
    let mut out = Vec::new();
    for r in rows {
        let grant = r?;
        let board_name = boards::fetch(conn, grant.board_id)
            .map(|b| b.name)
            .unwrap_or_else(|_| "Unknown board".to_string());
        let target_name = match grant.user_id {
            Some(uid) => profiles::get(conn, uid)
                .map(|p| p.full_name)
                .unwrap_or_else(|_| grant.shared_with.clone()),
            None => grant.shared_with.clone(),
        };
        let shared_by_name = profiles::get(conn, grant.shared_by)
            .map(|p| p.full_name)
            .unwrap_or_else(|_| "Unknown".to_string());
        out.push(GrantView {
            grant,
            board_name,
            target_name,
            shared_by_name,
        });
    }
    Ok(out)
}
