// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, NewCategory};
use crate::services::categories;
use crate::session::Session;
use crate::store::Store;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

use super::{arg, id, json_flags, opt};

pub fn handle(store: &Store, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let c = categories::create(store, session, fields(sub)?)?;
            println!("Added category '{}'", c.name);
        }
        Some(("edit", sub)) => {
            let c = categories::update(store, session, id(sub, "id")?, fields(sub)?)?;
            println!("Updated category '{}'", c.name);
        }
        Some(("rm", sub)) => {
            let cat_id = id(sub, "id")?;
            categories::delete(store, session, cat_id)?;
            println!("Removed category {}", cat_id);
        }
        Some(("list", sub)) => {
            let data = categories::list(store, session)?;
            let (json, jsonl) = json_flags(sub);
            if !maybe_print_json(json, jsonl, &data)? {
                print_table(&data);
            }
        }
        Some(("defaults", _)) => {
            let data = categories::import_defaults(store, session)?;
            print_table(&data);
        }
        _ => {}
    }
    Ok(())
}

fn fields(sub: &clap::ArgMatches) -> Result<NewCategory> {
    Ok(NewCategory {
        name: arg(sub, "name")?.to_string(),
        description: opt(sub, "description"),
        icon: opt(sub, "icon"),
        color: opt(sub, "color"),
    })
}

fn print_table(data: &[Category]) {
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.name.clone(),
                c.icon.clone(),
                c.color.clone(),
                c.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Category", "Icon", "Color", "Description"], rows)
    );
}
