// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! User preferences kept in the `settings` key/value table.

use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TrackerError};
use crate::events::{ChangeKind, Table};
use crate::store::Store;
use crate::utils::{ensure_budget, parse_decimal};

pub const KEY_CURRENT_USER: &str = "current_user";
pub const KEY_THEME: &str = "theme";
pub const KEY_LANGUAGE: &str = "language";
pub const KEY_CURRENCY: &str = "currency";
pub const KEY_MONTHLY_BUDGET: &str = "monthly_budget";

const DEFAULT_LANGUAGE: &str = "en";
const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_MONTHLY_BUDGET: i64 = 2000;
const LANGUAGES: [&str; 4] = ["en", "es", "fr", "hi"];

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| r.get(0))
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn clear_setting(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key=?1", params![key])?;
    Ok(())
}

pub fn get_currency(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, KEY_CURRENCY)?.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        })
    }
}

impl FromStr for Theme {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(TrackerError::Validation(format!(
                "Unknown theme '{}', expected light|dark|system",
                other
            ))),
        }
    }
}

/// Preferences loaded once at startup. Every setter persists the value and
/// then announces it on the bus under [`Table::Settings`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppSettings {
    pub theme: Theme,
    pub language: String,
    pub currency: String,
    pub monthly_budget: Decimal,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            theme: Theme::System,
            language: DEFAULT_LANGUAGE.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            monthly_budget: Decimal::from(DEFAULT_MONTHLY_BUDGET),
        }
    }
}

impl AppSettings {
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut s = AppSettings::default();
        if let Some(v) = get_setting(conn, KEY_THEME)? {
            s.theme = v.parse()?;
        }
        if let Some(v) = get_setting(conn, KEY_LANGUAGE)? {
            s.language = v;
        }
        if let Some(v) = get_setting(conn, KEY_CURRENCY)? {
            s.currency = v;
        }
        if let Some(v) = get_setting(conn, KEY_MONTHLY_BUDGET)? {
            s.monthly_budget = parse_decimal(&v)?;
        }
        Ok(s)
    }

    pub fn set_theme(&mut self, store: &Store, theme: Theme) -> Result<()> {
        set_setting(store.conn(), KEY_THEME, &theme.to_string())?;
        self.theme = theme;
        self.announce(store);
        Ok(())
    }

    pub fn set_language(&mut self, store: &Store, language: &str) -> Result<()> {
        let language = language.trim().to_lowercase();
        if !LANGUAGES.contains(&language.as_str()) {
            return Err(TrackerError::Validation(format!(
                "Unsupported language '{}'",
                language
            )));
        }
        set_setting(store.conn(), KEY_LANGUAGE, &language)?;
        self.language = language;
        self.announce(store);
        Ok(())
    }

    pub fn set_currency(&mut self, store: &Store, currency: &str) -> Result<()> {
        let ccy = currency.trim().to_uppercase();
        if ccy.len() != 3 || !ccy.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(TrackerError::Validation(format!(
                "Invalid currency code '{}'",
                currency.trim()
            )));
        }
        set_setting(store.conn(), KEY_CURRENCY, &ccy)?;
        self.currency = ccy;
        self.announce(store);
        Ok(())
    }

    pub fn set_monthly_budget(&mut self, store: &Store, amount: Decimal) -> Result<()> {
        ensure_budget(amount)?;
        set_setting(store.conn(), KEY_MONTHLY_BUDGET, &amount.to_string())?;
        self.monthly_budget = amount;
        self.announce(store);
        Ok(())
    }

    /// Applies a `key=value` pair coming from the command line.
    pub fn set(&mut self, store: &Store, key: &str, value: &str) -> Result<()> {
        match key.trim() {
            KEY_THEME => self.set_theme(store, value.parse()?),
            KEY_LANGUAGE => self.set_language(store, value),
            KEY_CURRENCY => self.set_currency(store, value),
            KEY_MONTHLY_BUDGET => self.set_monthly_budget(store, parse_decimal(value)?),
            other => Err(TrackerError::Validation(format!("Unknown setting '{}'", other))),
        }
    }

    fn announce(&self, store: &Store) {
        tracing::info!(settings = ?self, "settings updated");
        store.changed_many(Table::Settings, ChangeKind::Update);
    }
}
