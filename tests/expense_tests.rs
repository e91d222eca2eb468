// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use trivense::aggregate::BudgetStatus;
use trivense::events::Table;
use trivense::models::{NewBoard, NewCategory, NewExpense};
use trivense::notify::RecordingDispatcher;
use trivense::services::expenses::ExpenseQuery;
use trivense::services::{boards, categories, dashboard, expenses, notifications, profiles};
use trivense::settings::AppSettings;
use trivense::{Session, Store, TrackerError};

fn user(store: &Store, name: &str, email: &str) -> Session {
    let p = profiles::register(store, name, email).unwrap();
    Session::signed_in(p.id)
}

fn board(store: &Store, s: &Session, name: &str) -> i64 {
    boards::create(
        store,
        s,
        NewBoard {
            name: name.into(),
            total_budget: Decimal::from(1000),
            ..Default::default()
        },
    )
    .unwrap()
    .id
}

fn new_expense(board_id: i64, amount: &str, days_ago: i64) -> NewExpense {
    NewExpense {
        board_id,
        category_id: None,
        amount: amount.parse().unwrap(),
        description: format!("{} spent", amount),
        date: Utc::now() - Duration::days(days_ago),
        payment_method: Some("Card".into()),
    }
}

#[test]
fn list_pages_newest_first() {
    let store = Store::in_memory().unwrap();
    let ana = user(&store, "Ana", "ana@example.com");
    let b = board(&store, &ana, "Home");
    for i in 0..12 {
        expenses::create(&store, &ana, new_expense(b, "5", i)).unwrap();
    }

    let q = ExpenseQuery {
        limit: 5,
        ..Default::default()
    };
    let p1 = expenses::list(&store, &ana, &q).unwrap();
    assert_eq!(p1.data.len(), 5);
    assert_eq!(p1.total, 12);
    assert_eq!(p1.total_pages, 3);
    assert!(p1.has_more);
    assert!(p1.data.windows(2).all(|w| w[0].date >= w[1].date));

    let p3 = expenses::list(&store, &ana, &ExpenseQuery { page: 3, ..q.clone() }).unwrap();
    assert_eq!(p3.data.len(), 2);
    assert!(!p3.has_more);
    assert_eq!(p3.current_page, 3);

    let zero = expenses::list(&store, &ana, &ExpenseQuery { page: 0, ..q.clone() });
    assert!(matches!(zero, Err(TrackerError::Validation(_))));

    let far = expenses::list(&store, &ana, &ExpenseQuery { page: usize::MAX, ..q.clone() });
    assert!(matches!(far, Err(TrackerError::Validation(_))));
    let wide = expenses::list(
        &store,
        &ana,
        &ExpenseQuery {
            page: 2,
            limit: usize::MAX,
            ..q
        },
    );
    assert!(matches!(wide, Err(TrackerError::Validation(_))));
}

#[test]
fn list_filters_by_board_and_category() {
    let store = Store::in_memory().unwrap();
    let ana = user(&store, "Ana", "ana@example.com");
    let home = board(&store, &ana, "Home");
    let work = board(&store, &ana, "Work");
    let food = categories::create(
        &store,
        &ana,
        NewCategory {
            name: "Food".into(),
            ..Default::default()
        },
    )
    .unwrap();
    expenses::create(&store, &ana, new_expense(home, "10", 1)).unwrap();
    expenses::create(
        &store,
        &ana,
        NewExpense {
            category_id: Some(food.id),
            ..new_expense(work, "20", 1)
        },
    )
    .unwrap();

    let by_board = expenses::list(
        &store,
        &ana,
        &ExpenseQuery {
            board_id: Some(home),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(by_board.total, 1);
    assert_eq!(by_board.data[0].board, "Home");

    let by_cat = expenses::list(
        &store,
        &ana,
        &ExpenseQuery {
            category_id: Some(food.id),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(by_cat.total, 1);
    assert_eq!(by_cat.data[0].category, "Food");
}

#[test]
fn bad_amounts_are_refused() {
    let store = Store::in_memory().unwrap();
    let ana = user(&store, "Ana", "ana@example.com");
    let b = board(&store, &ana, "Home");
    for amount in ["0", "-3"] {
        assert!(matches!(
            expenses::create(&store, &ana, new_expense(b, amount, 0)),
            Err(TrackerError::Validation(_))
        ));
    }
}

#[test]
fn expenses_need_a_visible_board_and_own_category() {
    let store = Store::in_memory().unwrap();
    let ana = user(&store, "Ana", "ana@example.com");
    let bob = user(&store, "Bob", "bob@example.com");
    let b = board(&store, &ana, "Home");
    assert!(matches!(
        expenses::create(&store, &bob, new_expense(b, "5", 0)),
        Err(TrackerError::NotFound(_))
    ));

    let bobs = categories::create(
        &store,
        &bob,
        NewCategory {
            name: "Bob stuff".into(),
            ..Default::default()
        },
    )
    .unwrap();
    let with_foreign_cat = NewExpense {
        category_id: Some(bobs.id),
        ..new_expense(b, "5", 0)
    };
    assert!(matches!(
        expenses::create(&store, &ana, with_foreign_cat),
        Err(TrackerError::NotFound(_))
    ));
}

#[test]
fn only_the_creator_edits_or_deletes() {
    let store = Store::in_memory().unwrap();
    let ana = user(&store, "Ana", "ana@example.com");
    let bob = user(&store, "Bob", "bob@example.com");
    let b = board(&store, &ana, "Shared");
    let code = boards::get(&store, &ana, b).unwrap().share_code;
    boards::join_by_code(&store, &bob, &code).unwrap();

    let e = expenses::create(&store, &ana, new_expense(b, "40", 0)).unwrap();
    // Bob can read it through the board
    assert_eq!(expenses::get(&store, &bob, e.id).unwrap().created_by_name.as_deref(), Some("Ana"));
    assert!(matches!(
        expenses::update(&store, &bob, e.id, new_expense(b, "1", 0)),
        Err(TrackerError::NotFound(_))
    ));
    assert!(!expenses::delete(&store, &bob, e.id).unwrap());

    let edited = expenses::update(&store, &ana, e.id, new_expense(b, "45.50", 2)).unwrap();
    assert_eq!(edited.amount, "45.50".parse::<Decimal>().unwrap());
    assert!(expenses::delete(&store, &ana, e.id).unwrap());
    assert!(!expenses::delete(&store, &ana, e.id).unwrap());
}

#[test]
fn deleted_category_reads_as_uncategorized() {
    let store = Store::in_memory().unwrap();
    let ana = user(&store, "Ana", "ana@example.com");
    let b = board(&store, &ana, "Home");
    let cat = categories::create(
        &store,
        &ana,
        NewCategory {
            name: "Gone soon".into(),
            color: Some("#aabbcc".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(cat.color, "#AABBCC");
    let e = expenses::create(
        &store,
        &ana,
        NewExpense {
            category_id: Some(cat.id),
            ..new_expense(b, "12", 0)
        },
    )
    .unwrap();
    categories::delete(&store, &ana, cat.id).unwrap();

    let listed = expenses::get(&store, &ana, e.id).unwrap();
    assert_eq!(listed.category, "Uncategorized");
    assert_eq!(listed.icon, "receipt");

    let recent = dashboard::recent_transactions(&store, &ana, 10).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].category, "Uncategorized");
    assert_eq!(recent[0].icon, "dots-horizontal");
    assert_eq!(recent[0].color, "#45B7D1");
    assert_eq!(recent[0].board, "Home");
}

#[test]
fn recent_covers_shared_boards() {
    let store = Store::in_memory().unwrap();
    let ana = user(&store, "Ana", "ana@example.com");
    let bob = user(&store, "Bob", "bob@example.com");
    let b = board(&store, &ana, "Shared");
    let code = boards::get(&store, &ana, b).unwrap().share_code;
    boards::join_by_code(&store, &bob, &code).unwrap();
    expenses::create(&store, &ana, new_expense(b, "9", 0)).unwrap();
    let own = board(&store, &bob, "Mine");
    expenses::create(&store, &bob, new_expense(own, "3", 0)).unwrap();

    let recent = dashboard::recent_transactions(&store, &bob, 10).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(dashboard::recent_transactions(&store, &bob, 1).unwrap().len(), 1);
    assert_eq!(dashboard::recent_transactions(&store, &ana, 10).unwrap().len(), 1);
}

#[test]
fn monthly_stats_use_the_configured_budget() {
    let store = Store::in_memory().unwrap();
    let ana = user(&store, "Ana", "ana@example.com");
    let b = board(&store, &ana, "Home");
    let now = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap();
    let at = |d: u32, amount: &str| NewExpense {
        date: Utc.with_ymd_and_hms(2024, 5, d, 9, 0, 0).unwrap(),
        ..new_expense(b, amount, 0)
    };
    expenses::create(&store, &ana, at(1, "100")).unwrap();
    expenses::create(&store, &ana, at(19, "50")).unwrap();
    expenses::create(
        &store,
        &ana,
        NewExpense {
            date: Utc.with_ymd_and_hms(2024, 4, 30, 23, 0, 0).unwrap(),
            ..new_expense(b, "999", 0)
        },
    )
    .unwrap();

    let s = dashboard::monthly_stats(&store, &ana, now).unwrap();
    assert_eq!(s.total_expenses, Decimal::from(150));
    assert_eq!(s.total_budget, Decimal::from(2000));
    assert_eq!(s.status, BudgetStatus::OnTrack);

    let mut settings = AppSettings::load(store.conn()).unwrap();
    settings.set_monthly_budget(&store, Decimal::from(100)).unwrap();
    let s = dashboard::monthly_stats(&store, &ana, now).unwrap();
    assert_eq!(s.remaining_balance, Decimal::from(-50));
    assert_eq!(s.status, BudgetStatus::OverBudget);
}

#[test]
fn mutations_notify_and_publish() {
    let rec = RecordingDispatcher::new();
    let store = Store::in_memory().unwrap().with_dispatcher(rec.clone());
    let hits = Arc::new(AtomicUsize::new(0));
    let h = hits.clone();
    let sub = store.bus().on_change(Table::Expenses, move |_| {
        h.fetch_add(1, Ordering::SeqCst);
    });

    let ana = user(&store, "Ana", "ana@example.com");
    let b = board(&store, &ana, "Home");
    let e = expenses::create(&store, &ana, new_expense(b, "7", 0)).unwrap();
    expenses::delete(&store, &ana, e.id).unwrap();
    assert!(hits.load(Ordering::SeqCst) >= 2);

    assert!(rec.sent().iter().any(|(title, body)| title == "Expense added" && body.contains("$7.00")));
    let unread = notifications::unread_count(&store, &ana).unwrap();
    assert_eq!(unread, 2);
    let first = notifications::list(&store, &ana).unwrap()[0].id;
    notifications::mark_read(&store, &ana, first).unwrap();
    assert_eq!(notifications::unread_count(&store, &ana).unwrap(), 1);
    assert_eq!(notifications::mark_all_read(&store, &ana).unwrap(), 1);
    assert_eq!(notifications::unread_count(&store, &ana).unwrap(), 0);

    sub.unsubscribe();
    let before = hits.load(Ordering::SeqCst);
    expenses::create(&store, &ana, new_expense(b, "1", 0)).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), before);
}
