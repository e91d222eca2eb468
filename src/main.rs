// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::Result;

use trivense::{Session, Store, cli, commands, db};

const LOG_ENV: &str = "TRIVENSE_LOG";

fn main() -> Result<()> {
    let level = std::env::var(LOG_ENV).unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(format!("trivense={level}"))
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let path = match matches.get_one::<String>("db") {
        Some(p) => PathBuf::from(p),
        None => db::db_path()?,
    };
    let store = Store::new(db::open(&path)?);
    let session = Session::restore(store.conn())?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", path.display());
        }
        Some(("profile", sub)) => commands::profile::handle(&store, &session, sub)?,
        Some(("board", sub)) => commands::boards::handle(&store, &session, sub)?,
        Some(("expense", sub)) => commands::expenses::handle(&store, &session, sub)?,
        Some(("category", sub)) => commands::categories::handle(&store, &session, sub)?,
        Some(("share", sub)) => commands::shares::handle(&store, &session, sub)?,
        Some(("notify", sub)) => commands::notifications::handle(&store, &session, sub)?,
        Some(("analytics", sub)) => commands::analytics::handle(&store, &session, sub)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&store, &session, sub)?,
        Some(("settings", sub)) => commands::settings::handle(&store, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, &session, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(store.conn())?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
