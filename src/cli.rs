// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(clap::value_parser!(i64))
}

fn board_fields(cmd: Command) -> Command {
    cmd.arg(Arg::new("name").long("name").required(true))
        .arg(Arg::new("budget").long("budget").required(true).help("Total budget, e.g. 1500.00"))
        .arg(Arg::new("description").long("description"))
        .arg(Arg::new("color").long("color").help("#RRGGBB"))
        .arg(Arg::new("icon").long("icon"))
        .arg(Arg::new("code").long("code").help("Share code; generated when omitted"))
}

fn expense_fields(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("board")
            .long("board")
            .required(true)
            .value_parser(clap::value_parser!(i64)),
    )
    .arg(Arg::new("amount").long("amount").required(true))
    .arg(Arg::new("description").long("description").required(true))
    .arg(Arg::new("date").long("date").help("YYYY-MM-DD or RFC 3339; defaults to now"))
    .arg(Arg::new("category").long("category").help("Category name or id"))
    .arg(Arg::new("payment").long("payment").help("Payment method"))
}

fn category_fields(cmd: Command) -> Command {
    cmd.arg(Arg::new("description").long("description"))
        .arg(Arg::new("icon").long("icon"))
        .arg(Arg::new("color").long("color").help("#RRGGBB"))
}

fn board_and_period(cmd: Command) -> Command {
    json_flags(
        cmd.arg(
            Arg::new("board")
                .long("board")
                .value_parser(clap::value_parser!(i64))
                .help("Defaults to your first board"),
        )
        .arg(
            Arg::new("period")
                .long("period")
                .default_value("month")
                .help("week|month|year|all"),
        ),
    )
}

pub fn build_cli() -> Command {
    command!()
        .name("trivense")
        .about("Shared expense boards: budgets, sharing and spending analytics")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("Database file (overrides TRIVENSE_DB)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("profile")
                .about("Sign up, sign in and out")
                .subcommand(
                    Command::new("register")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("email").long("email").required(true)),
                )
                .subcommand(
                    Command::new("edit").arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(Command::new("login").arg(Arg::new("email").required(true)))
                .subcommand(Command::new("logout"))
                .subcommand(json_flags(Command::new("whoami")))
                .subcommand(Command::new("push-token").arg(Arg::new("token").required(true))),
        )
        .subcommand(
            Command::new("board")
                .about("Expense boards")
                .subcommand(board_fields(Command::new("add")))
                .subcommand(board_fields(Command::new("edit").arg(id_arg())))
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(json_flags(Command::new("list")))
                .subcommand(json_flags(Command::new("show").arg(id_arg())))
                .subcommand(Command::new("join").arg(Arg::new("code").required(true))),
        )
        .subcommand(
            Command::new("expense")
                .about("Expenses on boards")
                .subcommand(expense_fields(Command::new("add")))
                .subcommand(expense_fields(Command::new("edit").arg(id_arg())))
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(
                            Arg::new("board")
                                .long("board")
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("page")
                                .long("page")
                                .default_value("1")
                                .value_parser(clap::value_parser!(usize)),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .default_value("10")
                                .value_parser(clap::value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("category")
                .about("Your spending categories")
                .subcommand(category_fields(
                    Command::new("add").arg(Arg::new("name").required(true)),
                ))
                .subcommand(category_fields(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("name").long("name").required(true)),
                ))
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("defaults").about("Add the stock categories")),
        )
        .subcommand(
            Command::new("share")
                .about("Board invitations")
                .subcommand(
                    Command::new("invite")
                        .arg(
                            Arg::new("board")
                                .long("board")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(Arg::new("email").long("email").required(true)),
                )
                .subcommand(Command::new("accept").arg(id_arg()))
                .subcommand(Command::new("reject").arg(id_arg()))
                .subcommand(Command::new("revoke").arg(id_arg()))
                .subcommand(json_flags(Command::new("sent")))
                .subcommand(json_flags(Command::new("received"))),
        )
        .subcommand(
            Command::new("notify")
                .about("In-app notifications")
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("read").arg(id_arg()))
                .subcommand(Command::new("read-all"))
                .subcommand(Command::new("count")),
        )
        .subcommand(
            Command::new("analytics")
                .about("Spending analytics for a board")
                .subcommand(board_and_period(Command::new("summary")))
                .subcommand(board_and_period(Command::new("trends"))),
        )
        .subcommand(
            Command::new("dashboard")
                .about("Home screen figures")
                .subcommand(json_flags(
                    Command::new("recent").arg(
                        Arg::new("limit")
                            .long("limit")
                            .default_value("10")
                            .value_parser(clap::value_parser!(usize)),
                    ),
                ))
                .subcommand(json_flags(Command::new("month"))),
        )
        .subcommand(
            Command::new("settings")
                .about("Theme, language, currency and monthly budget")
                .subcommand(json_flags(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(
                            Arg::new("key")
                                .required(true)
                                .help("theme|language|currency|monthly_budget"),
                        )
                        .arg(Arg::new("value").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("expenses")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .required(true)
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true))
                        .arg(
                            Arg::new("board")
                                .long("board")
                                .value_parser(clap::value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(Command::new("doctor").about("Check the data for problems"))
}
