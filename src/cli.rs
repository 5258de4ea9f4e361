// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command, value_parser};

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
            .help("Print as JSON lines"),
    )
}

/// Numeric option that may be negative, e.g. `--balance -5000`.
fn amount_arg(name: &'static str) -> Arg {
    Arg::new(name).long(name).allow_negative_numbers(true)
}

fn format_out(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("format")
            .long("format")
            .default_value("csv")
            .help("csv|json"),
    )
    .arg(Arg::new("out").long("out").required(true))
}

pub fn build_cli() -> Command {
    Command::new("apate")
        .about("Plan the cash flow of buying and selling an apartment")
        .version(clap::crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("price")
                .about("Buy/sell price configuration")
                .subcommand(
                    Command::new("set")
                        .arg(amount_arg("buy"))
                        .arg(amount_arg("sell"))
                        .group(
                            ArgGroup::new("price")
                                .args(["buy", "sell"])
                                .required(true)
                                .multiple(true),
                        ),
                )
                .subcommand(
                    Command::new("clear")
                        .arg(Arg::new("buy").long("buy").action(ArgAction::SetTrue))
                        .arg(Arg::new("sell").long("sell").action(ArgAction::SetTrue)),
                )
                .subcommand(json_flags(Command::new("show"))),
        )
        .subcommand(
            Command::new("fund")
                .about("Initial funds by category")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(amount_arg("amount").required(true)),
                )
                .subcommand(Command::new("rm").arg(Arg::new("name").long("name").required(true)))
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("tx")
                .about("Incomes and payments")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("payment")
                                .help("income|payment"),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .required(true)
                                .help("YYYY-MM-DD (start date for installments)"),
                        )
                        .arg(amount_arg("amount").required(true))
                        .arg(
                            Arg::new("percent-of")
                                .long("percent-of")
                                .help("buy|sell: treat amount as a percentage of that price"),
                        )
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("installment")
                                .long("installment")
                                .action(ArgAction::Append)
                                .help("YYYY-MM-DD:PERCENT, repeat for each installment"),
                        ),
                )
                .subcommand(
                    Command::new("update")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("date").long("date"))
                        .arg(amount_arg("amount"))
                        .arg(Arg::new("percent-of").long("percent-of"))
                        .arg(
                            Arg::new("fixed")
                                .long("fixed")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("percent-of"),
                        )
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("installment")
                                .long("installment")
                                .action(ArgAction::Append),
                        )
                        .arg(
                            Arg::new("no-installments")
                                .long("no-installments")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("installment"),
                        ),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").long("id").required(true)))
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("checkpoint")
                .about("Assert the real balance at a date")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(amount_arg("balance").required(true)),
                )
                .subcommand(Command::new("clear"))
                .subcommand(Command::new("show")),
        )
        .subcommand(
            json_flags(Command::new("timeline").about("Running-balance timeline"))
                .arg(
                    Arg::new("chart")
                        .long("chart")
                        .action(ArgAction::SetTrue)
                        .help("Draw the balance chart instead of the table"),
                )
                .arg(
                    Arg::new("by-date")
                        .long("by-date")
                        .action(ArgAction::SetTrue)
                        .requires("chart")
                        .help("One chart point per day"),
                )
                .arg(
                    Arg::new("width")
                        .long("width")
                        .value_parser(value_parser!(usize))
                        .default_value("40"),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Summary figures")
                .subcommand(json_flags(Command::new("summary"))),
        )
        .subcommand(
            Command::new("export")
                .about("Write the plan to files")
                .subcommand(format_out(Command::new("timeline")))
                .subcommand(format_out(Command::new("summary")))
                .subcommand(format_out(Command::new("transactions")))
                .subcommand(
                    Command::new("sheets")
                        .about("Summary, timeline and transactions CSVs into a directory")
                        .arg(Arg::new("dir").long("dir").required(true)),
                )
                .subcommand(
                    Command::new("state")
                        .about("Full plan as JSON")
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("import").about("Load a plan").subcommand(
                Command::new("state")
                    .about("Replace the plan with an exported JSON file")
                    .arg(Arg::new("path").long("path").required(true)),
            ),
        )
        .subcommand(
            Command::new("config")
                .about("Display preferences")
                .subcommand(Command::new("show"))
                .subcommand(Command::new("language").arg(Arg::new("code").required(true)))
                .subcommand(Command::new("currency").arg(Arg::new("code").required(true))),
        )
        .subcommand(Command::new("doctor").about("Check the plan for problems"))
        .subcommand(Command::new("reset").about("Discard the plan and start over"))
}
