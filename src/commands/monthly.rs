// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::annual::print_page;
use super::{output_flags, table_query};
use crate::aggregate::{Balance, BalanceStatus};
use crate::export::detail_columns;
use crate::filter::{TablePage, View};
use crate::models::{Dataset, Direction, Record, month_for_key, month_name};
use crate::present::{format_brl, format_count, format_date, format_ratio};
use crate::report::{self, MonthlySide};
use crate::sources::Sources;
use crate::utils::{maybe_print_json, parse_month_key, pretty_table};
use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::rc::Rc;

pub fn handle(sources: &mut Sources, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(sources, sub)?,
        Some(("report", sub)) => report_month(sources, sub)?,
        Some(("table", sub)) => table(sources, sub)?,
        _ => {}
    }
    Ok(())
}

/// Display label of a month key, e.g. "mar" -> "Março".
pub fn month_label(key: &str) -> String {
    month_for_key(key)
        .map(|n| month_name(n).to_string())
        .unwrap_or_else(|| key.to_uppercase())
}

pub(crate) fn direction(sub: &clap::ArgMatches) -> Result<Option<Direction>> {
    sub.get_one::<String>("direction")
        .map(|s| Direction::parse(s).ok_or_else(|| anyhow!("Invalid direction '{}'", s)))
        .transpose()
}

#[derive(Debug, Serialize)]
struct MonthEntry {
    key: String,
    label: String,
}

fn list(sources: &mut Sources, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let keys = sources
        .available_months()
        .context("listing monthly files")?;
    if keys.is_empty() {
        eprintln!(
            "⚠️  No monthly files found in {}",
            sources.settings.monthly_dir_path().display()
        );
        return Ok(());
    }
    let entries: Vec<MonthEntry> = keys
        .into_iter()
        .map(|k| MonthEntry {
            label: month_label(&k),
            key: k,
        })
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &entries)? {
        let data = entries
            .iter()
            .map(|e| vec![e.key.clone(), e.label.clone()])
            .collect();
        println!("{}", pretty_table(&["Key", "Mês"], data));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct MonthReport {
    pub month: String,
    pub label: String,
    pub income: Option<MonthlySide>,
    pub expense: Option<MonthlySide>,
    pub balance: Option<Balance>,
}

/// Both sides of one month; a missing or empty file leaves its side `None`.
pub fn build_report(
    sources: &mut Sources,
    key: &str,
    only: Option<Direction>,
    top_n: usize,
) -> Result<MonthReport> {
    let income_ds = sources.detail(key, Direction::Income)?;
    let expense_ds = sources.detail(key, Direction::Expense)?;
    let wants = |d: Direction| only.is_none_or(|o| o == d);
    Ok(MonthReport {
        month: key.to_string(),
        label: month_label(key),
        income: if wants(Direction::Income) {
            report::monthly_side(&income_ds, Direction::Income, top_n)
        } else {
            None
        },
        expense: if wants(Direction::Expense) {
            report::monthly_side(&expense_ds, Direction::Expense, top_n)
        } else {
            None
        },
        balance: if wants(Direction::Expense) {
            report::monthly_balance(&income_ds, &expense_ds)
        } else {
            None
        },
    })
}

fn print_side(label: &str, direction: Direction, side: Option<&MonthlySide>) {
    println!("== {} ==", direction.label().to_uppercase());
    let Some(side) = side else {
        println!("⚠️  No {} found for {}", direction.label().to_lowercase(), label);
        return;
    };
    let k = &side.kpis;
    println!(
        "{}",
        pretty_table(
            &["Total", "Lançamentos", "Média por Lançamento", "Maior Valor"],
            vec![vec![
                format_brl(k.sum),
                format_count(k.count),
                format_brl(k.mean),
                format_brl(k.max),
            ]],
        )
    );
    if let Some(rows) = &side.by_cost_center {
        let data = rows
            .iter()
            .map(|r| {
                vec![
                    r.label.clone(),
                    format_brl(r.total),
                    crate::present::format_percent(r.share),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Centro de Custo", "Valor", "% do Total"], data)
        );
    }
    if let Some(days) = &side.daily {
        let data = days
            .iter()
            .map(|d| vec![format_date(d.date), format_brl(d.total)])
            .collect();
        println!("{}", pretty_table(&["Data", "Valor"], data));
    }
    if let Some(top) = &side.top_records {
        let data = top
            .iter()
            .map(|t| {
                vec![
                    t.short_label.clone(),
                    format_brl(t.amount),
                    t.cost_center.clone().unwrap_or_default(),
                    t.date.map(format_date).unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Especificação", "Valor", "Centro de Custo", "Data"], data)
        );
    }
}

fn print_balance(b: &Balance) {
    let delta = b
        .balance_pct_of_income
        .map(|p| format!("{} das entradas", format_ratio(p)))
        .unwrap_or_else(|| "N/A".to_string());
    let status = match b.status {
        BalanceStatus::Surplus => "✅ Superávit",
        BalanceStatus::Deficit => "⚠️ Déficit",
    };
    println!(
        "{}",
        pretty_table(
            &["Entradas", "Saídas", "Saldo do Mês", "% Despesas/Receitas", "Status"],
            vec![vec![
                format_brl(b.income),
                format_brl(b.expense),
                format!("{} ({})", format_brl(b.balance), delta),
                format_ratio(b.expense_pct_of_income),
                status.to_string(),
            ]],
        )
    );
}

fn report_month(sources: &mut Sources, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let key = parse_month_key(sub.get_one::<String>("month").map(String::as_str).unwrap_or(""))?;
    let only = direction(sub)?;
    let n = *sub.get_one::<usize>("top").unwrap_or(&10);
    let rep = build_report(sources, &key, only, n)?;
    if maybe_print_json(json_flag, jsonl_flag, &rep)? {
        return Ok(());
    }
    let title = match sources.settings.report_year {
        Some(y) => format!("{}/{}", rep.label, y),
        None => rep.label.clone(),
    };
    println!("Relatório mensal: {}", title);
    if only.is_none_or(|d| d == Direction::Income) {
        print_side(&rep.label, Direction::Income, rep.income.as_ref());
    }
    if only.is_none_or(|d| d == Direction::Expense) {
        print_side(&rep.label, Direction::Expense, rep.expense.as_ref());
        if let Some(b) = &rep.balance {
            print_balance(b);
        }
    }
    Ok(())
}

/// Loads one side of a month and applies the detail-table query.
pub fn side_dataset(
    sources: &mut Sources,
    sub: &clap::ArgMatches,
) -> Result<(String, Direction, Rc<Dataset<Record>>)> {
    let key = parse_month_key(sub.get_one::<String>("month").map(String::as_str).unwrap_or(""))?;
    let dir = direction(sub)?.ok_or_else(|| anyhow!("--direction is required"))?;
    let ds = sources
        .detail(&key, dir)
        .with_context(|| format!("loading {} for {}", dir.label().to_lowercase(), key))?;
    Ok((key, dir, ds))
}

pub fn query_rows<'a>(ds: &'a Dataset<Record>, sub: &clap::ArgMatches) -> Result<TablePage<'a>> {
    Ok(table_query(sub)?.run(&View::all(ds)))
}

fn table(sources: &mut Sources, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let (key, dir, ds) = side_dataset(sources, sub)?;
    if ds.is_empty() {
        eprintln!(
            "⚠️  No {} found for {}",
            dir.label().to_lowercase(),
            month_label(&key)
        );
        return Ok(());
    }
    let page = query_rows(&ds, sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &page.rows)? {
        return Ok(());
    }
    print_page(&page, ds.len(), &detail_columns(&ds.capabilities, dir));
    Ok(())
}
