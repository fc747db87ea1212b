// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_args(cmd: Command) -> Command {
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

fn market_arg() -> Arg {
    Arg::new("market")
        .long("market")
        .short('m')
        .help("Market name or part of it; 'all' for every market")
}

pub fn build_cli() -> Command {
    Command::new("pangan")
        .version(crate_version!())
        .about("Staple-food commodity prices for regional markets")
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .global(true)
                .help("Price API base URL"),
        )
        .arg(
            Arg::new("page-size")
                .long("page-size")
                .global(true)
                .value_parser(value_parser!(usize))
                .help("Cards per page"),
        )
        .arg(
            Arg::new("offline")
                .long("offline")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Skip the network and use the sample data"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("More log output (-v info, -vv debug)"),
        )
        .subcommand(json_args(
            Command::new("markets").about("List markets found in the price data"),
        ))
        .subcommand(json_args(
            Command::new("list")
                .about("Commodity cards with price trend and sparkline")
                .arg(
                    Arg::new("search")
                        .long("search")
                        .short('s')
                        .help("Case-insensitive part of the commodity name"),
                )
                .arg(market_arg())
                .arg(
                    Arg::new("trend")
                        .long("trend")
                        .short('t')
                        .default_value("all")
                        .help("all|up|down|flat"),
                )
                .arg(
                    Arg::new("page")
                        .long("page")
                        .short('p')
                        .value_parser(value_parser!(usize))
                        .default_value("1"),
                )
                .arg(
                    Arg::new("sparkline")
                        .long("sparkline")
                        .help("average|per-market"),
                ),
        ))
        .subcommand(json_args(
            Command::new("history")
                .about("Price history of a commodity, one column per market")
                .arg(Arg::new("commodity").required(true))
                .arg(market_arg()),
        ))
        .subcommand(
            Command::new("export")
                .about("Export a commodity's price history as CSV, SVG or PNG")
                .arg(Arg::new("commodity").required(true))
                .arg(market_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .default_value("csv")
                        .help("csv|svg|png"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .help("Output path; defaults to <commodity>-data.csv or <commodity>-chart.<ext>"),
                )
                .arg(
                    Arg::new("width")
                        .long("width")
                        .value_parser(value_parser!(u32))
                        .default_value("960"),
                )
                .arg(
                    Arg::new("height")
                        .long("height")
                        .value_parser(value_parser!(u32))
                        .default_value("480"),
                ),
        )
        .subcommand(
            Command::new("commodity")
                .about("Query the commodity listing and detail endpoints")
                .subcommand(json_args(
                    Command::new("list").about("Every commodity with its current detail"),
                ))
                .subcommand(json_args(
                    Command::new("show").about("One commodity by id").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )),
        )
        .subcommand(Command::new("browse").about("Interactive dashboard session"))
        .subcommand(Command::new("doctor").about("Check the loaded data for inconsistencies"))
}
