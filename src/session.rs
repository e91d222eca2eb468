// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;

use crate::error::{Result, TrackerError};
use crate::settings::{KEY_CURRENT_USER, get_setting};

/// Who is calling. Services that need an identity ask for it through
/// [`Session::require`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Session {
    user_id: Option<i64>,
}

impl Session {
    pub fn anonymous() -> Self {
        Session { user_id: None }
    }

    pub fn signed_in(user_id: i64) -> Self {
        Session {
            user_id: Some(user_id),
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub fn require(&self) -> Result<i64> {
        self.user_id.ok_or(TrackerError::AuthenticationRequired)
    }

    /// Session for the profile remembered by the last sign-in. A pointer to
    /// a profile that no longer exists counts as signed out.
    pub fn restore(conn: &Connection) -> Result<Self> {
        let Some(raw) = get_setting(conn, KEY_CURRENT_USER)? else {
            return Ok(Session::anonymous());
        };
        let Ok(id) = raw.trim().parse::<i64>() else {
            tracing::warn!("ignoring malformed current user '{raw}'");
            return Ok(Session::anonymous());
        };
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM profiles WHERE id=?1)",
            [id],
            |r| r.get(0),
        )?;
        Ok(if exists {
            Session::signed_in(id)
        } else {
            Session::anonymous()
        })
    }
}
