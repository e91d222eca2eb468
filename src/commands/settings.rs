// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::{arg, json_flags};
use crate::settings::AppSettings;
use crate::store::Store;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    let mut settings = AppSettings::load(store.conn())?;
    match m.subcommand() {
        Some(("show", sub)) => {
            let (json, jsonl) = json_flags(sub);
            if !maybe_print_json(json, jsonl, &settings)? {
                let rows = vec![
                    vec!["theme".to_string(), settings.theme.to_string()],
                    vec!["language".to_string(), settings.language.clone()],
                    vec!["currency".to_string(), settings.currency.clone()],
                    vec![
                        "monthly_budget".to_string(),
                        fmt_money(&settings.monthly_budget, &settings.currency),
                    ],
                ];
                println!("{}", pretty_table(&["Setting", "Value"], rows));
            }
        }
        Some(("set", sub)) => {
            let key = arg(sub, "key")?;
            settings.set(store, key, arg(sub, "value")?)?;
            println!("Saved {}", key);
        }
        _ => {}
    }
    Ok(())
}
