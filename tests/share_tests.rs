// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use trivense::models::NewBoard;
use trivense::services::{boards, notifications, profiles, shares};
use trivense::sharing::{ShareAction, ShareStatus};
use trivense::{Session, Store, TrackerError};

fn user(store: &Store, name: &str, email: &str) -> Session {
    let p = profiles::register(store, name, email).unwrap();
    Session::signed_in(p.id)
}

fn setup() -> (Store, Session, i64) {
    let store = Store::in_memory().unwrap();
    let ana = user(&store, "Ana", "ana@example.com");
    let b = boards::create(
        &store,
        &ana,
        NewBoard {
            name: "Flat".into(),
            total_budget: Decimal::from(1200),
            ..Default::default()
        },
    )
    .unwrap()
    .id;
    (store, ana, b)
}

#[test]
fn invitation_starts_pending_and_reaches_the_target() {
    let (store, ana, b) = setup();
    let bob = user(&store, "Bob", "bob@example.com");
    let g = shares::invite(&store, &ana, b, "Bob@Example.com").unwrap();
    assert_eq!(g.status, ShareStatus::Pending);
    assert!(!g.is_accepted);
    assert_eq!(g.shared_with, "bob@example.com");

    let got = shares::received(&store, &bob).unwrap();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].board_name, "Flat");
    assert_eq!(got[0].shared_by_name, "Ana");
    assert_eq!(notifications::unread_count(&store, &bob).unwrap(), 1);

    let sent = shares::sent(&store, &ana).unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].target_name, "Bob");

    // pending grants give no access yet
    assert!(matches!(
        boards::get(&store, &bob, b),
        Err(TrackerError::NotFound(_))
    ));
}

#[test]
fn accept_grants_access() {
    let (store, ana, b) = setup();
    let bob = user(&store, "Bob", "bob@example.com");
    let g = shares::invite(&store, &ana, b, "bob@example.com").unwrap();
    let g = shares::accept(&store, &bob, g.id).unwrap();
    assert_eq!(g.status, ShareStatus::Accepted);
    assert!(g.is_accepted);
    assert_eq!(boards::get(&store, &bob, b).unwrap().name, "Flat");
}

#[test]
fn reject_then_accept_is_refused() {
    let (store, ana, b) = setup();
    let bob = user(&store, "Bob", "bob@example.com");
    let g = shares::invite(&store, &ana, b, "bob@example.com").unwrap();
    let g = shares::reject(&store, &bob, g.id).unwrap();
    assert_eq!(g.status, ShareStatus::Rejected);

    let err = shares::accept(&store, &bob, g.id).unwrap_err();
    assert_eq!(
        err,
        TrackerError::InvalidTransition {
            from: ShareStatus::Rejected,
            action: ShareAction::Accept,
        }
    );
    assert_eq!(shares::get(store.conn(), g.id).unwrap().status, ShareStatus::Rejected);
    assert!(boards::list(&store, &bob).unwrap().is_empty());
}

#[test]
fn accepting_twice_is_refused() {
    let (store, ana, b) = setup();
    let bob = user(&store, "Bob", "bob@example.com");
    let g = shares::invite(&store, &ana, b, "bob@example.com").unwrap();
    shares::accept(&store, &bob, g.id).unwrap();
    assert!(matches!(
        shares::accept(&store, &bob, g.id),
        Err(TrackerError::InvalidTransition { .. })
    ));
    assert!(matches!(
        shares::reject(&store, &bob, g.id),
        Err(TrackerError::InvalidTransition { .. })
    ));
}

#[test]
fn only_the_target_answers() {
    let (store, ana, b) = setup();
    let bob = user(&store, "Bob", "bob@example.com");
    let eve = user(&store, "Eve", "eve@example.com");
    let g = shares::invite(&store, &ana, b, "bob@example.com").unwrap();
    assert!(matches!(
        shares::accept(&store, &ana, g.id),
        Err(TrackerError::Forbidden(_))
    ));
    assert!(matches!(
        shares::accept(&store, &eve, g.id),
        Err(TrackerError::Forbidden(_))
    ));
    assert_eq!(shares::get(store.conn(), g.id).unwrap().status, ShareStatus::Pending);
    shares::accept(&store, &bob, g.id).unwrap();
}

#[test]
fn invitation_waits_for_registration() {
    let (store, ana, b) = setup();
    let g = shares::invite(&store, &ana, b, "carol@example.com").unwrap();
    assert_eq!(g.user_id, None);

    let carol = user(&store, "Carol", "carol@example.com");
    let got = shares::received(&store, &carol).unwrap();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].grant.user_id, carol.user_id());

    shares::accept(&store, &carol, g.id).unwrap();
    let list = boards::list(&store, &carol).unwrap();
    assert_eq!(list.len(), 1);
    assert!(list[0].is_shared);
}

#[test]
fn bad_invitations_are_refused() {
    let (store, ana, b) = setup();
    let bob = user(&store, "Bob", "bob@example.com");
    assert!(matches!(
        shares::invite(&store, &ana, b, "ana@example.com"),
        Err(TrackerError::Validation(_))
    ));
    assert!(matches!(
        shares::invite(&store, &ana, b, "not-an-email"),
        Err(TrackerError::Validation(_))
    ));
    shares::invite(&store, &ana, b, "bob@example.com").unwrap();
    assert!(matches!(
        shares::invite(&store, &ana, b, "bob@example.com"),
        Err(TrackerError::Validation(_))
    ));
    // only the owner invites
    assert!(matches!(
        shares::invite(&store, &bob, b, "eve@example.com"),
        Err(TrackerError::NotFound(_))
    ));
}

#[test]
fn revoke_ends_access() {
    let (store, ana, b) = setup();
    let bob = user(&store, "Bob", "bob@example.com");
    let eve = user(&store, "Eve", "eve@example.com");
    let g = shares::invite(&store, &ana, b, "bob@example.com").unwrap();
    shares::accept(&store, &bob, g.id).unwrap();

    assert!(matches!(
        shares::revoke(&store, &eve, g.id),
        Err(TrackerError::Forbidden(_))
    ));
    shares::revoke(&store, &ana, g.id).unwrap();
    assert!(matches!(
        boards::get(&store, &bob, b),
        Err(TrackerError::NotFound(_))
    ));
    assert!(matches!(
        shares::get(store.conn(), g.id),
        Err(TrackerError::NotFound(_))
    ));
}

#[test]
fn target_may_leave_a_board() {
    let (store, ana, b) = setup();
    let bob = user(&store, "Bob", "bob@example.com");
    let g = shares::invite(&store, &ana, b, "bob@example.com").unwrap();
    shares::accept(&store, &bob, g.id).unwrap();
    shares::revoke(&store, &bob, g.id).unwrap();
    assert!(boards::list(&store, &bob).unwrap().is_empty());
}

#[test]
fn pending_invitation_is_accepted_by_joining() {
    let (store, ana, b) = setup();
    let bob = user(&store, "Bob", "bob@example.com");
    let g = shares::invite(&store, &ana, b, "bob@example.com").unwrap();
    let code = boards::get(&store, &ana, b).unwrap().share_code;
    boards::join_by_code(&store, &bob, &code).unwrap();
    assert_eq!(shares::get(store.conn(), g.id).unwrap().status, ShareStatus::Accepted);
    assert_eq!(shares::sent(&store, &ana).unwrap().len(), 1);
}

#[test]
fn renamed_owner_shows_on_invitations() {
    let (store, ana, b) = setup();
    let bob = user(&store, "Bob", "bob@example.com");
    shares::invite(&store, &ana, b, "bob@example.com").unwrap();

    let p = profiles::update(&store, &ana, "  Ana Maria ").unwrap();
    assert_eq!(p.full_name, "Ana Maria");
    assert_eq!(p.email, "ana@example.com");
    assert_eq!(shares::received(&store, &bob).unwrap()[0].shared_by_name, "Ana Maria");

    assert!(matches!(
        profiles::update(&store, &ana, "   "),
        Err(TrackerError::Validation(_))
    ));
    assert_eq!(
        profiles::update(&store, &Session::anonymous(), "Ghost").unwrap_err(),
        TrackerError::AuthenticationRequired
    );
}
