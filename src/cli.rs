// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, Command, value_parser};

fn output_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON instead of a table"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    ]
}

/// Sidebar filters of the annual report.
fn filter_args() -> [Arg; 5] {
    [
        Arg::new("include_cc")
            .long("include-cc")
            .action(ArgAction::Append)
            .help("Keep only this cost center (repeatable)"),
        Arg::new("exclude_cc")
            .long("exclude-cc")
            .action(ArgAction::Append)
            .help("Drop this cost center (repeatable)"),
        Arg::new("period")
            .long("period")
            .action(ArgAction::Append)
            .help("Keep only this reference period, M/YYYY (repeatable)"),
        Arg::new("min").long("min").help("Minimum amount, inclusive"),
        Arg::new("max").long("max").help("Maximum amount, inclusive"),
    ]
}

const ANNUAL_SORTS: [&str; 5] = [
    "period",
    "amount-desc",
    "amount-asc",
    "cost-center",
    "specification",
];
const MONTHLY_SORTS: [&str; 4] = ["date", "amount-desc", "amount-asc", "cost-center"];

/// Detail-table filters. The first sort name is the default.
fn table_args(sorts: &'static [&'static str]) -> [Arg; 5] {
    [
        Arg::new("spec").long("spec").help("Exact specification"),
        Arg::new("cc").long("cc").help("Exact cost center"),
        Arg::new("search")
            .long("search")
            .help("Case-insensitive text search over descriptive columns"),
        Arg::new("sort")
            .long("sort")
            .default_value(sorts[0])
            .value_parser(PossibleValuesParser::new(sorts.iter().copied()))
            .help("Row order"),
        Arg::new("limit")
            .long("limit")
            .default_value("all")
            .help("Rows to show: a number or 'all'"),
    ]
}

fn top_arg() -> Arg {
    Arg::new("top")
        .long("top")
        .value_parser(value_parser!(usize))
        .default_value("10")
        .help("Number of entries to rank")
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .required(true)
        .help("Month key: jan, fev, mar, ... dez")
}

fn direction_arg(required: bool) -> Arg {
    Arg::new("direction")
        .long("direction")
        .required(required)
        .value_parser(["in", "out"])
        .help("in = entradas, out = saidas")
}

fn out_dir_arg() -> Arg {
    Arg::new("out_dir")
        .long("out-dir")
        .help("Directory for the exported file (defaults to the configured export dir)")
}

fn annual_section(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .args(filter_args())
        .args(output_args())
}

pub fn build_cli() -> Command {
    Command::new("finboard")
        .about("Expense and income reports from spreadsheet exports")
        .version(clap::crate_version!())
        .arg(
            Arg::new("data_dir")
                .long("data-dir")
                .env("FINBOARD_DATA_DIR")
                .global(true)
                .help("Directory holding the source files"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to a finboard.json settings file"),
        )
        .subcommand(
            Command::new("annual")
                .about("Annual expense and income report")
                .subcommand(annual_section("kpis", "Expense indicators, income indicators and balance"))
                .subcommand(annual_section("months", "Income against expense per month"))
                .subcommand(annual_section("cost-centers", "Summary by cost center"))
                .subcommand(annual_section("top-specs", "Largest specifications by total").arg(top_arg()))
                .subcommand(annual_section("income", "Income by category").arg(top_arg()))
                .subcommand(annual_section("treemap", "Totals by cost center and specification"))
                .subcommand(annual_section("options", "Values available to the filters"))
                .subcommand(annual_section("table", "Detailed rows").args(table_args(&ANNUAL_SORTS))),
        )
        .subcommand(
            Command::new("monthly")
                .about("Single-month income and expense report")
                .subcommand(Command::new("list").about("Months with data").args(output_args()))
                .subcommand(
                    Command::new("report")
                        .about("Indicators, breakdowns and balance for one month")
                        .arg(month_arg())
                        .arg(direction_arg(false))
                        .arg(top_arg())
                        .args(output_args()),
                )
                .subcommand(
                    Command::new("table")
                        .about("Detailed rows of one side of a month")
                        .arg(month_arg())
                        .arg(direction_arg(true))
                        .args(table_args(&MONTHLY_SORTS))
                        .args(output_args()),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write rows to a timestamped CSV file")
                .subcommand(
                    Command::new("annual")
                        .about("Export annual expense rows")
                        .arg(
                            Arg::new("scope")
                                .long("scope")
                                .default_value("selection")
                                .value_parser(["selection", "filtered"])
                                .help("selection = table rows, filtered = every filtered row"),
                        )
                        .args(filter_args())
                        .args(table_args(&ANNUAL_SORTS))
                        .arg(out_dir_arg()),
                )
                .subcommand(
                    Command::new("monthly")
                        .about("Export one side of a month")
                        .arg(month_arg())
                        .arg(direction_arg(true))
                        .arg(
                            Arg::new("scope")
                                .long("scope")
                                .default_value("selection")
                                .value_parser(["selection", "all"])
                                .help("selection = table rows, all = the whole file"),
                        )
                        .args(table_args(&MONTHLY_SORTS))
                        .arg(out_dir_arg()),
                ),
        )
        .subcommand(Command::new("doctor").about("Check the sources for data problems"))
}
