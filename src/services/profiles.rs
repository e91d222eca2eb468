// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;

use crate::error::{Result, TrackerError};
use crate::events::{ChangeKind, Table};
use crate::models::Profile;
use crate::session::Session;
use crate::settings::{KEY_CURRENT_USER, clear_setting, set_setting};
use crate::store::Store;
use crate::utils::{ensure_name, validate_email};

use super::query_in;

/// Creates a profile. Invitations already sent to this address are linked
/// to it so they show up as received.
pub fn register(store: &Store, full_name: &str, email: &str) -> Result<Profile> {
    store.atomically(|store| {
        let full_name = ensure_name("Full name", full_name)?;
        let email = validate_email(email)?;
        if find_by_email(store.conn(), &email)?.is_some() {
            return Err(TrackerError::Validation(format!(
                "'{}' is already registered",
                email
            )));
        }
        store.conn().execute(
            "INSERT INTO profiles(full_name, email, created_at) VALUES (?1, ?2, ?3)",
            params![full_name, email, Utc::now()],
        )?;
        let id = store.conn().last_insert_rowid();
        let linked = store.conn().execute(
            "UPDATE shared_users SET user_id=?1 WHERE shared_with=?2 AND user_id IS NULL",
            params![id, email],
        )?;
        tracing::info!(id, %email, linked, "profile registered");
        store.changed(Table::Profiles, ChangeKind::Insert, id);
        get(store.conn(), id)
    })
}

pub fn sign_in(store: &Store, email: &str) -> Result<(Session, Profile)> {
    let email = validate_email(email)?;
    let profile = find_by_email(store.conn(), &email)?
        .ok_or_else(|| TrackerError::NotFound(format!("Profile '{}'", email)))?;
    set_setting(store.conn(), KEY_CURRENT_USER, &profile.id.to_string())?;
    tracing::info!(id = profile.id, "signed in");
    Ok((Session::signed_in(profile.id), profile))
}

pub fn sign_out(store: &Store) -> Result<Session> {
    clear_setting(store.conn(), KEY_CURRENT_USER)?;
    Ok(Session::anonymous())
}

pub fn whoami(store: &Store, session: &Session) -> Result<Profile> {
    get(store.conn(), session.require()?)
}

/// Changes the caller's display name. The e-mail stays fixed since
/// invitations are addressed to it.
pub fn update(store: &Store, session: &Session, full_name: &str) -> Result<Profile> {
    let me = session.require()?;
    let full_name = ensure_name("Full name", full_name)?;
    let n = store.conn().execute(
        "UPDATE profiles SET full_name=?1 WHERE id=?2",
        params![full_name, me],
    )?;
    if n == 0 {
        return Err(TrackerError::NotFound(format!("Profile {}", me)));
    }
    tracing::info!(id = me, "profile updated");
    store.changed(Table::Profiles, ChangeKind::Update, me);
    get(store.conn(), me)
}

pub fn set_push_token(store: &Store, session: &Session, token: &str) -> Result<()> {
    let me = session.require()?;
    let token = ensure_name("Push token", token)?;
    store.conn().execute(
        "UPDATE profiles SET push_token=?1 WHERE id=?2",
        params![token, me],
    )?;
    store.changed(Table::Profiles, ChangeKind::Update, me);
    Ok(())
}

pub fn get(conn: &Connection, id: i64) -> Result<Profile> {
    conn.query_row("SELECT * FROM profiles WHERE id=?1", params![id], Profile::from_row)
        .optional()?
        .ok_or_else(|| TrackerError::NotFound(format!("Profile {}", id)))
}

pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<Profile>> {
    let p = conn
        .query_row(
            "SELECT * FROM profiles WHERE email=?1",
            params![email.trim().to_lowercase()],
            Profile::from_row,
        )
        .optional()?;
    Ok(p)
}

pub fn by_ids(conn: &Connection, ids: &[i64]) -> Result<HashMap<i64, Profile>> {
    let rows = query_in(conn, "SELECT * FROM profiles WHERE id IN ({ids})", ids, Profile::from_row)?;
    Ok(rows.into_iter().map(|p| (p.id, p)).collect())
}
