// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Errors surfaced by the tracker core.
//!
//! - [`AuthenticationRequired`] when no profile is signed in.
//! - [`Validation`] for malformed input, including stored amounts that do
//!   not parse.
//! - [`Remote`] when the data store rejects a query or mutation.
//! - [`NotFound`] when a referenced entity is missing or not visible.
//! - [`InvalidTransition`] when a share grant is asked to leave a terminal
//!   state.
//!
//!  [`AuthenticationRequired`]: TrackerError::AuthenticationRequired
//!  [`Validation`]: TrackerError::Validation
//!  [`Remote`]: TrackerError::Remote
//!  [`NotFound`]: TrackerError::NotFound
//!  [`InvalidTransition`]: TrackerError::InvalidTransition
use thiserror::Error;

use crate::sharing::{ShareAction, ShareStatus};

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Sign in required: no active profile")]
    AuthenticationRequired,
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Data store failure: {0}")]
    Remote(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Not allowed: {0}")]
    Forbidden(String),
    #[error("Cannot {action} an invitation that is already {from}")]
    InvalidTransition {
        from: ShareStatus,
        action: ShareAction,
    },
}

impl From<rusqlite::Error> for TrackerError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => TrackerError::NotFound("record".into()),
            // A stored value that does not decode is bad data, not a store outage.
            rusqlite::Error::FromSqlConversionFailure(_, _, inner) => {
                tracing::warn!("malformed stored value: {inner}");
                TrackerError::Validation(format!("malformed stored value: {}", inner))
            }
            other => {
                tracing::warn!("data store rejected request: {other}");
                TrackerError::Remote(other.to_string())
            }
        }
    }
}

impl PartialEq for TrackerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AuthenticationRequired, Self::AuthenticationRequired) => true,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::Remote(a), Self::Remote(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (
                Self::InvalidTransition { from: f1, action: a1 },
                Self::InvalidTransition { from: f2, action: a2 },
            ) => f1 == f2 && a1 == a2,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
