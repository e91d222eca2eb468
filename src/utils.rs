// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::error::{Result, TrackerError};

/// Largest single amount or budget accepted, one trillion.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

static COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap_or_else(|_| unreachable!("static pattern"))
});
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap_or_else(|_| unreachable!("static pattern"))
});

/// Accepts `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp.
pub fn parse_date(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = d.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            TrackerError::Validation(format!(
                "Invalid date '{}', expected YYYY-MM-DD or RFC 3339",
                s
            ))
        })
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .map_err(|_| TrackerError::Validation(format!("Invalid decimal '{}'", s.trim())))
}

/// Expense amounts are strictly positive.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    ensure_amount(d)?;
    Ok(d)
}

pub fn ensure_amount(d: Decimal) -> Result<()> {
    if d <= Decimal::ZERO {
        return Err(TrackerError::Validation(format!(
            "Amount must be greater than zero, got {}",
            d
        )));
    }
    if d > MAX_AMOUNT {
        return Err(TrackerError::Validation(format!(
            "Amount cannot exceed {}, got {}",
            MAX_AMOUNT, d
        )));
    }
    Ok(())
}

pub fn ensure_budget(d: Decimal) -> Result<()> {
    if d < Decimal::ZERO {
        return Err(TrackerError::Validation(format!(
            "Budget cannot be negative, got {}",
            d
        )));
    }
    if d > MAX_AMOUNT {
        return Err(TrackerError::Validation(format!(
            "Budget cannot exceed {}, got {}",
            MAX_AMOUNT, d
        )));
    }
    Ok(())
}

pub fn ensure_name(field: &str, s: &str) -> Result<String> {
    let s = s.trim();
    if s.is_empty() {
        return Err(TrackerError::Validation(format!("{} cannot be empty", field)));
    }
    Ok(s.to_string())
}

pub fn validate_color(s: &str) -> Result<String> {
    let s = s.trim();
    if !COLOR_RE.is_match(s) {
        return Err(TrackerError::Validation(format!(
            "Invalid colour '{}', expected #RRGGBB",
            s
        )));
    }
    Ok(s.to_uppercase())
}

pub fn validate_email(s: &str) -> Result<String> {
    let s = s.trim().to_lowercase();
    if !EMAIL_RE.is_match(&s) {
        return Err(TrackerError::Validation(format!("Invalid e-mail '{}'", s)));
    }
    Ok(s)
}

/// Decodes a TEXT money column; a malformed value fails the row instead of
/// reading as zero.
pub fn decimal_column(idx: usize, raw: &str) -> rusqlite::Result<Decimal> {
    raw.parse::<Decimal>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

pub fn generate_share_code() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..6].to_uppercase()
}

pub fn currency_symbol(ccy: &str) -> Option<&'static str> {
    match ccy {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "INR" => Some("₹"),
        _ => None,
    }
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    let v = d.round_dp(2);
    let sign = if v.is_sign_negative() && !v.is_zero() { "-" } else { "" };
    match currency_symbol(ccy) {
        Some(sym) => format!("{}{}{:.2}", sign, sym, v.abs()),
        None => format!("{}{} {:.2}", sign, ccy, v.abs()),
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> anyhow::Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn plain_dates_are_midnight_utc() {
        let d = parse_date("2025-03-09").unwrap();
        assert_eq!((d.year(), d.month(), d.day(), d.hour()), (2025, 3, 9, 0));
        let t = parse_date("2025-03-09T18:30:00+02:00").unwrap();
        assert_eq!(t.hour(), 16);
        assert!(parse_date("09/03/2025").is_err());
    }

    #[test]
    fn amounts_must_be_numeric_and_positive() {
        assert_eq!(parse_amount(" 12.50 ").unwrap(), Decimal::new(1250, 2));
        assert!(matches!(parse_amount("abc"), Err(TrackerError::Validation(_))));
        assert!(matches!(parse_amount("0"), Err(TrackerError::Validation(_))));
        assert!(matches!(parse_amount("-4"), Err(TrackerError::Validation(_))));
        assert!(matches!(
            parse_amount("50000000000000000000000000000"),
            Err(TrackerError::Validation(_))
        ));
        assert_eq!(parse_amount("1000000000000").unwrap(), MAX_AMOUNT);
        assert!(ensure_budget(MAX_AMOUNT + Decimal::ONE).is_err());
    }

    #[test]
    fn colours_and_emails_are_normalised() {
        assert_eq!(validate_color("#ff6b6b").unwrap(), "#FF6B6B");
        assert!(validate_color("red").is_err());
        assert_eq!(validate_email(" Ana@Example.com ").unwrap(), "ana@example.com");
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn share_codes_are_six_upper_alphanumerics() {
        let code = generate_share_code();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn money_uses_known_symbols() {
        assert_eq!(fmt_money(&Decimal::new(-5000, 2), "USD"), "-$50.00");
        assert_eq!(fmt_money(&Decimal::new(1234, 1), "CHF"), "CHF 123.40");
    }
}
