// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::{arg, json_flags};
use crate::services::profiles;
use crate::session::Session;
use crate::store::Store;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(store: &Store, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("register", sub)) => {
            let p = profiles::register(store, arg(sub, "name")?, arg(sub, "email")?)?;
            profiles::sign_in(store, &p.email)?;
            println!("Welcome, {}! You are signed in as {}", p.full_name, p.email);
        }
        Some(("edit", sub)) => {
            let p = profiles::update(store, session, arg(sub, "name")?)?;
            println!("Profile updated: {} <{}>", p.full_name, p.email);
        }
        Some(("login", sub)) => {
            let (_, p) = profiles::sign_in(store, arg(sub, "email")?)?;
            println!("Signed in as {} <{}>", p.full_name, p.email);
        }
        Some(("logout", _)) => {
            profiles::sign_out(store)?;
            println!("Signed out");
        }
        Some(("whoami", sub)) => {
            let p = profiles::whoami(store, session)?;
            let (json, jsonl) = json_flags(sub);
            if !maybe_print_json(json, jsonl, &p)? {
                let rows = vec![vec![
                    p.id.to_string(),
                    p.full_name,
                    p.email,
                    p.push_token.unwrap_or_else(|| "-".into()),
                ]];
                println!("{}", pretty_table(&["ID", "Name", "Email", "Push token"], rows));
            }
        }
        Some(("push-token", sub)) => {
            profiles::set_push_token(store, session, arg(sub, "token")?)?;
            println!("Push token saved");
        }
        _ => {}
    }
    Ok(())
}
