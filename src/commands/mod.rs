// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod analytics;
pub mod boards;
pub mod categories;
pub mod dashboard;
pub mod doctor;
pub mod expenses;
pub mod exporter;
pub mod notifications;
pub mod profile;
pub mod settings;
pub mod shares;

use anyhow::{Context, Result};
use clap::ArgMatches;

/// A required argument; clap guarantees it, this just avoids `unwrap`.
pub(crate) fn arg<'a>(m: &'a ArgMatches, name: &str) -> Result<&'a str> {
    m.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing argument '{}'", name))
}

pub(crate) fn id(m: &ArgMatches, name: &str) -> Result<i64> {
    m.get_one::<i64>(name)
        .copied()
        .with_context(|| format!("missing argument '{}'", name))
}

pub(crate) fn opt(m: &ArgMatches, name: &str) -> Option<String> {
    m.get_one::<String>(name).map(|s| s.to_string())
}

pub(crate) fn json_flags(m: &ArgMatches) -> (bool, bool) {
    (m.get_flag("json"), m.get_flag("jsonl"))
}
