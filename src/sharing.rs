// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Invitation lifecycle for board share grants.
//!
//! A grant starts `pending` and moves once, to `accepted` or `rejected`.
//! Both are terminal. Revoking deletes the grant and is allowed in any
//! state, so it is not modelled as a transition here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TrackerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareAction {
    Accept,
    Reject,
}

impl ShareStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShareStatus::Pending => "pending",
            ShareStatus::Accepted => "accepted",
            ShareStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ShareStatus::Pending)
    }

    /// Grants board access only once accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, ShareStatus::Accepted)
    }

    pub fn apply(self, action: ShareAction) -> Result<ShareStatus> {
        match (self, action) {
            (ShareStatus::Pending, ShareAction::Accept) => Ok(ShareStatus::Accepted),
            (ShareStatus::Pending, ShareAction::Reject) => Ok(ShareStatus::Rejected),
            (from, action) => Err(TrackerError::InvalidTransition { from, action }),
        }
    }
}

impl fmt::Display for ShareStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShareStatus {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ShareStatus::Pending),
            "accepted" => Ok(ShareStatus::Accepted),
            "rejected" => Ok(ShareStatus::Rejected),
            other => Err(TrackerError::Validation(format!(
                "unknown share status '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ShareAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShareAction::Accept => f.write_str("accept"),
            ShareAction::Reject => f.write_str("reject"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_moves_to_either_terminal_state() {
        assert_eq!(
            ShareStatus::Pending.apply(ShareAction::Accept).unwrap(),
            ShareStatus::Accepted
        );
        assert_eq!(
            ShareStatus::Pending.apply(ShareAction::Reject).unwrap(),
            ShareStatus::Rejected
        );
    }

    #[test]
    fn terminal_states_refuse_every_action() {
        for from in [ShareStatus::Accepted, ShareStatus::Rejected] {
            for action in [ShareAction::Accept, ShareAction::Reject] {
                assert_eq!(
                    from.apply(action),
                    Err(TrackerError::InvalidTransition { from, action })
                );
            }
        }
    }

    #[test]
    fn reject_then_accept_is_refused() {
        let rejected = ShareStatus::Pending.apply(ShareAction::Reject).unwrap();
        let err = rejected.apply(ShareAction::Accept).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot accept an invitation that is already rejected"
        );
        assert!(!rejected.is_accepted());
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(" Accepted ".parse::<ShareStatus>().unwrap(), ShareStatus::Accepted);
        assert!("maybe".parse::<ShareStatus>().is_err());
    }
}
