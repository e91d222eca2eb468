// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::{arg, id, json_flags};
use crate::services::shares::{self, GrantView};
use crate::session::Session;
use crate::store::Store;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(store: &Store, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("invite", sub)) => {
            let g = shares::invite(store, session, id(sub, "board")?, arg(sub, "email")?)?;
            println!("Invited {} (invitation {})", g.shared_with, g.id);
        }
        Some(("accept", sub)) => {
            let g = shares::accept(store, session, id(sub, "id")?)?;
            println!("Invitation {} is now {}", g.id, g.status);
        }
        Some(("reject", sub)) => {
            let g = shares::reject(store, session, id(sub, "id")?)?;
            println!("Invitation {} is now {}", g.id, g.status);
        }
        Some(("revoke", sub)) => {
            let grant_id = id(sub, "id")?;
            shares::revoke(store, session, grant_id)?;
            println!("Removed invitation {}", grant_id);
        }
        Some(("sent", sub)) => {
            let data = shares::sent(store, session)?;
            print(sub, &data, "Invited")?;
        }
        Some(("received", sub)) => {
            let data = shares::received(store, session)?;
            print(sub, &data, "From")?;
        }
        _ => {}
    }
    Ok(())
}

fn print(sub: &clap::ArgMatches, data: &[GrantView], who: &str) -> Result<()> {
    let (json, jsonl) = json_flags(sub);
    if maybe_print_json(json, jsonl, &data)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|v| {
            let person = if who == "From" {
                v.shared_by_name.clone()
            } else {
                v.target_name.clone()
            };
            vec![
                v.grant.id.to_string(),
                v.board_name.clone(),
                person,
                v.grant.status.to_string(),
                v.grant.created_at.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Board", who, "Status", "Sent"], rows)
    );
    Ok(())
}
