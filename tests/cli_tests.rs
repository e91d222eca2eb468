// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use tempfile::tempdir;
use trivense::commands::{boards as board_cmd, doctor, expenses as expense_cmd, exporter};
use trivense::models::{NewBoard, NewCategory, NewExpense};
use trivense::services::{boards, categories, expenses, profiles, shares};
use trivense::{Session, Store, cli};

fn seeded() -> (Store, Session, i64) {
    let store = Store::in_memory().unwrap();
    let p = profiles::register(&store, "Ana", "ana@example.com").unwrap();
    let ana = Session::signed_in(p.id);
    let b = boards::create(
        &store,
        &ana,
        NewBoard {
            name: "Home".into(),
            total_budget: Decimal::from(20),
            ..Default::default()
        },
    )
    .unwrap()
    .id;
    let food = categories::create(
        &store,
        &ana,
        NewCategory {
            name: "Food".into(),
            ..Default::default()
        },
    )
    .unwrap();
    expenses::create(
        &store,
        &ana,
        NewExpense {
            board_id: b,
            category_id: Some(food.id),
            amount: "12.34".parse().unwrap(),
            description: "Corner shop".into(),
            date: Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap(),
            payment_method: Some("Cash".into()),
        },
    )
    .unwrap();
    (store, ana, b)
}

#[test]
fn export_expenses_writes_pretty_json() {
    let (store, ana, _) = seeded();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "trivense", "export", "expenses", "--format", "json", "--out", &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&store, &ana, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "date": "2025-01-02",
                "board": "Home",
                "category": "Food",
                "description": "Corner shop",
                "amount": "12.34",
                "payment_method": "Cash",
                "created_by": "Ana"
            }
        ])
    );
}

#[test]
fn export_expenses_writes_csv() {
    let (store, ana, _) = seeded();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "trivense", "export", "expenses", "--format", "CSV", "--out", &out_str,
    ]);
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    exporter::handle(&store, &ana, export_m).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines[0],
        "date,board,category,description,amount,payment_method,created_by"
    );
    assert_eq!(lines[1], "2025-01-02,Home,Food,Corner shop,12.34,Cash,Ana");
}

#[test]
fn export_rejects_unknown_format() {
    let (store, ana, _) = seeded();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.xml");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "trivense", "export", "expenses", "--format", "xml", "--out", &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        assert!(exporter::handle(&store, &ana, export_m).is_err());
    } else {
        panic!("no export subcommand");
    }
    assert!(!out_path.exists());
}

#[test]
fn expense_list_flags_become_a_query() {
    let (store, ana, b) = seeded();
    let matches = cli::build_cli().get_matches_from([
        "trivense", "expense", "list", "--board", &b.to_string(), "--category", "food",
        "--page", "2", "--limit", "3",
    ]);
    let Some(("expense", exp_m)) = matches.subcommand() else {
        panic!("no expense subcommand");
    };
    let Some(("list", list_m)) = exp_m.subcommand() else {
        panic!("no list subcommand");
    };
    let q = expense_cmd::query(&store, &ana, list_m).unwrap();
    assert_eq!(q.board_id, Some(b));
    assert!(q.category_id.is_some());
    assert_eq!(q.page, 2);
    assert_eq!(q.limit, 3);
}

#[test]
fn global_db_flag_and_defaults_parse() {
    let matches = cli::build_cli().get_matches_from([
        "trivense", "analytics", "summary", "--db", "/tmp/x.sqlite",
    ]);
    assert_eq!(
        matches.get_one::<String>("db").map(String::as_str),
        Some("/tmp/x.sqlite")
    );
    let Some(("analytics", a)) = matches.subcommand() else {
        panic!("no analytics subcommand");
    };
    let Some(("summary", s)) = a.subcommand() else {
        panic!("no summary subcommand");
    };
    assert_eq!(s.get_one::<String>("period").map(String::as_str), Some("month"));
    assert_eq!(s.get_one::<i64>("board"), None);

    assert!(
        cli::build_cli()
            .try_get_matches_from(["trivense", "board", "add", "--name", "x"])
            .is_err()
    );
}

#[test]
fn doctor_reports_known_problems() {
    let (store, ana, b) = seeded();
    assert!(doctor::check(store.conn()).unwrap().is_empty());

    // 12.34 on a budget of 20 is fine, push it over
    expenses::create(
        &store,
        &ana,
        NewExpense {
            board_id: b,
            category_id: None,
            amount: Decimal::from(10),
            description: "More".into(),
            date: Utc::now(),
            payment_method: None,
        },
    )
    .unwrap();
    let food = categories::find_by_name(store.conn(), ana.user_id().unwrap(), "food")
        .unwrap()
        .unwrap();
    categories::delete(&store, &ana, food.id).unwrap();
    shares::invite(&store, &ana, b, "ghost@example.com").unwrap();

    let kinds: Vec<String> = doctor::check(store.conn())
        .unwrap()
        .into_iter()
        .map(|(k, _)| k)
        .collect();
    assert_eq!(
        kinds,
        vec!["dangling_category", "over_budget", "invite_without_profile"]
    );
}

#[test]
fn board_list_rows_flag_overspending() {
    let (store, ana, b) = seeded();
    let rows = board_cmd::list_rows(&boards::list(&store, &ana).unwrap(), "USD");
    let status_col = board_cmd::LIST_HEADERS
        .iter()
        .position(|h| *h == "Status")
        .unwrap();
    assert_eq!(rows[0][status_col], "on track");

    expenses::create(
        &store,
        &ana,
        NewExpense {
            board_id: b,
            category_id: None,
            amount: Decimal::from(50),
            description: "Splurge".into(),
            date: Utc::now(),
            payment_method: None,
        },
    )
    .unwrap();
    let rows = board_cmd::list_rows(&boards::list(&store, &ana).unwrap(), "USD");
    assert_eq!(rows[0][status_col], "over budget");
    assert!(rows[0].iter().any(|c| c.starts_with('-')));
}

#[test]
fn profile_edit_parses() {
    let m = cli::build_cli().get_matches_from(["trivense", "profile", "edit", "--name", "Ana B"]);
    let Some(("profile", p)) = m.subcommand() else {
        panic!("no profile subcommand");
    };
    let Some(("edit", e)) = p.subcommand() else {
        panic!("no edit subcommand");
    };
    assert_eq!(e.get_one::<String>("name").map(String::as_str), Some("Ana B"));
}
