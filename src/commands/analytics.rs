// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;

use super::{arg, json_flags};
use crate::aggregate::{CategoryShare, Insight, Period};
use crate::services::analytics;
use crate::session::Session;
use crate::settings::get_currency;
use crate::store::Store;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

pub fn handle(store: &Store, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(store, session, sub),
        Some(("trends", sub)) => trends(store, session, sub),
        _ => Ok(()),
    }
}

fn scope(sub: &clap::ArgMatches) -> Result<(Option<i64>, Period)> {
    let period: Period = arg(sub, "period")?.parse()?;
    Ok((sub.get_one::<i64>("board").copied(), period))
}

fn summary(store: &Store, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let (board, period) = scope(sub)?;
    let r = analytics::summary(store, session, board, period, Utc::now())?;
    let (json, jsonl) = json_flags(sub);
    if maybe_print_json(json, jsonl, &r)? {
        return Ok(());
    }
    let ccy = get_currency(store.conn())?;
    let s = &r.report.stats;
    println!("{} over the last {}", r.board_name, period);
    println!(
        "{}",
        pretty_table(
            &["Total", "Count", "Average", "Highest", "Lowest", "Per day"],
            vec![vec![
                fmt_money(&s.total_amount, &ccy),
                s.total_count.to_string(),
                fmt_money(&s.average_amount, &ccy),
                fmt_money(&s.highest_amount, &ccy),
                fmt_money(&s.lowest_amount, &ccy),
                fmt_money(&s.average_per_day, &ccy),
            ]],
        )
    );
    print_categories(&r.report.top_categories, &ccy);
    print_insights(&r.report.insights);
    Ok(())
}

fn trends(store: &Store, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let (board, period) = scope(sub)?;
    let r = analytics::trends(store, session, board, period, Utc::now())?;
    let (json, jsonl) = json_flags(sub);
    if maybe_print_json(json, jsonl, &r)? {
        return Ok(());
    }
    let ccy = get_currency(store.conn())?;
    println!(
        "{}: {} this {}, {} the one before ({}%)",
        r.board_name,
        fmt_money(&r.report.statistics.total_amount, &ccy),
        period,
        fmt_money(&r.report.previous_period.total_amount, &ccy),
        r.report.previous_period.percentage_change
    );
    let rows: Vec<Vec<String>> = r
        .report
        .trend
        .iter()
        .map(|d| vec![d.day.to_string(), fmt_money(&d.amount, &ccy), d.count.to_string()])
        .collect();
    println!("{}", pretty_table(&["Day", "Spent", "Count"], rows));
    print_categories(&r.report.category_breakdown, &ccy);
    print_insights(&r.report.insights);
    Ok(())
}

fn print_categories(cats: &[CategoryShare], ccy: &str) {
    if cats.is_empty() {
        return;
    }
    let rows: Vec<Vec<String>> = cats
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                fmt_money(&c.amount, ccy),
                c.count.to_string(),
                format!("{}%", c.percentage),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Amount", "Count", "Share"], rows));
}

fn print_insights(insights: &[Insight]) {
    for i in insights {
        println!("- {}: {}", i.title, i.description);
    }
}
