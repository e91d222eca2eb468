// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::{id, json_flags};
use crate::services::notifications;
use crate::session::Session;
use crate::store::Store;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(store: &Store, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let data = notifications::list(store, session)?;
            let (json, jsonl) = json_flags(sub);
            if !maybe_print_json(json, jsonl, &data)? {
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|n| {
                        vec![
                            n.id.to_string(),
                            if n.read { "" } else { "*" }.to_string(),
                            n.title.clone(),
                            n.message.clone(),
                            n.created_at.format("%Y-%m-%d %H:%M").to_string(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["ID", "New", "Title", "Message", "When"], rows));
            }
        }
        Some(("read", sub)) => {
            let nid = id(sub, "id")?;
            notifications::mark_read(store, session, nid)?;
            println!("Marked notification {} as read", nid);
        }
        Some(("read-all", _)) => {
            let n = notifications::mark_all_read(store, session)?;
            println!("Marked {} notifications as read", n);
        }
        Some(("count", _)) => {
            println!("{}", notifications::unread_count(store, session)?);
        }
        _ => {}
    }
    Ok(())
}
