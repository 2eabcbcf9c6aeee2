// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{filter_spec, output_flags, section, table_query};
use crate::export::ANNUAL_COLUMNS;
use crate::filter::{self, FilterSpec, IncomeView, TablePage};
use crate::models::{Dataset, IncomeRecord, Record};
use crate::present::{format_brl, format_count, format_percent, format_ratio};
use crate::report::{self, GroupRow};
use crate::sources::Sources;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use std::rc::Rc;

const INCOME_HIDDEN: &str =
    "📌 Income hidden: a cost center filter is active and income has no cost center.";

pub fn handle(sources: &mut Sources, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("kpis", sub)) => kpis(sources, sub)?,
        Some(("months", sub)) => months(sources, sub)?,
        Some(("cost-centers", sub)) => cost_centers(sources, sub)?,
        Some(("top-specs", sub)) => top_specs(sources, sub)?,
        Some(("income", sub)) => income(sources, sub)?,
        Some(("treemap", sub)) => treemap(sources, sub)?,
        Some(("options", sub)) => options(sources, sub)?,
        Some(("table", sub)) => table(sources, sub)?,
        _ => {}
    }
    Ok(())
}

fn expenses(sources: &mut Sources) -> Result<Option<Rc<Dataset<Record>>>> {
    section(sources.expenses(), "Expense report")
}

fn income_source(sources: &mut Sources) -> Result<Option<Rc<Dataset<IncomeRecord>>>> {
    section(sources.income(), "Income report")
}

fn kpis(sources: &mut Sources, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let spec = filter_spec(sub)?;
    let Some(ds) = expenses(sources)? else {
        return Ok(());
    };
    let income_ds = income_source(sources)?;
    let view = filter::filter(&ds, &spec);
    let income_view = income_ds.as_deref().map(|i| filter::couple_income(i, &spec));
    let k = report::annual_kpis(&view, income_view.as_ref());

    if maybe_print_json(json_flag, jsonl_flag, &k)? {
        return Ok(());
    }
    let e = &k.expenses;
    println!(
        "{}",
        pretty_table(
            &["Total Despesas", "Lançamentos", "Média/Lançamento", "Maior Despesa"],
            vec![vec![
                format_brl(e.sum),
                format_count(e.count),
                format_brl(e.mean),
                format_brl(e.max),
            ]],
        )
    );
    match &k.income {
        Some(inc) => {
            let b = &inc.balance;
            let delta = b
                .balance_pct_of_income
                .map(|p| format!("{} das receitas", format_ratio(p)))
                .unwrap_or_else(|| "N/A".to_string());
            println!(
                "{}",
                pretty_table(
                    &["Total Receitas", "Saldo", "% Despesas/Receitas", "Categorias Receita"],
                    vec![vec![
                        format_brl(inc.total),
                        format!("{} ({})", format_brl(b.balance), delta),
                        format_ratio(b.expense_pct_of_income),
                        inc.categories.to_string(),
                    ]],
                )
            );
        }
        None if k.income_suppressed => println!("{}", INCOME_HIDDEN),
        None => {}
    }
    Ok(())
}

fn months(sources: &mut Sources, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let spec = filter_spec(sub)?;
    let Some(ds) = expenses(sources)? else {
        return Ok(());
    };
    let income_ds = income_source(sources)?;
    let view = filter::filter(&ds, &spec);
    let income_view = income_ds.as_deref().map(|i| filter::couple_income(i, &spec));
    let evolution = report::monthly_evolution(&view, income_view.as_ref());

    if maybe_print_json(json_flag, jsonl_flag, &evolution)? {
        return Ok(());
    }
    match &evolution.comparison {
        Some(rows) => {
            let data = rows
                .iter()
                .map(|m| {
                    vec![
                        m.month_name.clone(),
                        format_brl(m.income),
                        format_brl(m.expense),
                        format_brl(m.balance),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["Mês", "Receitas", "Despesas", "Saldo"], data)
            );
        }
        None => {
            if income_view.as_ref().is_some_and(|i| i.suppressed) {
                println!("{}", INCOME_HIDDEN);
            }
            let data = evolution
                .expenses
                .iter()
                .map(|m| vec![m.month_name.clone(), format_brl(m.total)])
                .collect();
            println!("{}", pretty_table(&["Mês", "Despesas"], data));
        }
    }
    Ok(())
}

fn group_table(first: &str, count_header: &str, rows: &[GroupRow], with_max: bool) -> String {
    let mut headers = vec![first, "Total", "Média", count_header];
    if with_max {
        headers.push("Maior Valor");
    }
    headers.push("% do Total");
    let data = rows
        .iter()
        .map(|r| {
            let mut row = vec![
                r.label.clone(),
                format_brl(r.total),
                format_brl(r.mean),
                r.count.to_string(),
            ];
            if with_max {
                row.push(format_brl(r.max));
            }
            row.push(format_percent(r.share));
            row
        })
        .collect();
    pretty_table(&headers, data).to_string()
}

fn cost_centers(sources: &mut Sources, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let spec = filter_spec(sub)?;
    let Some(ds) = expenses(sources)? else {
        return Ok(());
    };
    let view = filter::filter(&ds, &spec);
    let rows = report::cost_center_summary(view.iter());
    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        println!(
            "{}",
            group_table("Centro de Custo", "Qtd. Lançamentos", &rows, true)
        );
    }
    Ok(())
}

fn top_specs(sources: &mut Sources, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let spec = filter_spec(sub)?;
    let n = *sub.get_one::<usize>("top").unwrap_or(&10);
    let Some(ds) = expenses(sources)? else {
        return Ok(());
    };
    let view = filter::filter(&ds, &spec);
    let rows = report::top_specifications(&view, n);
    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        let data = rows
            .iter()
            .map(|r| vec![r.short_label.clone(), format_brl(r.total)])
            .collect();
        println!("{}", pretty_table(&["Especificação", "Valor"], data));
    }
    Ok(())
}

fn income(sources: &mut Sources, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let spec = filter_spec(sub)?;
    let n = *sub.get_one::<usize>("top").unwrap_or(&10);
    let Some(income_ds) = income_source(sources)? else {
        return Ok(());
    };
    let income_view: IncomeView<'_> = filter::couple_income(&income_ds, &spec);
    if income_view.suppressed {
        if json_flag || jsonl_flag {
            maybe_print_json(json_flag, jsonl_flag, &serde_json::json!({ "suppressed": true }))?;
        } else {
            println!("{}", INCOME_HIDDEN);
        }
        return Ok(());
    }
    let summary = report::income_summary(&income_view);
    let top = report::top_income_categories(&income_view, n);
    let shares = report::income_shares(&income_view);
    let by_month = crate::aggregate::monthly_totals(income_view.rows.iter().copied());
    let out = serde_json::json!({
        "summary": summary,
        "top": top,
        "shares": shares,
        "by_month": by_month,
    });
    if maybe_print_json(json_flag, jsonl_flag, &out)? {
        return Ok(());
    }
    let month_data = by_month
        .iter()
        .map(|m| vec![m.month_name.clone(), format_brl(m.total)])
        .collect();
    println!("{}", pretty_table(&["Mês", "Receitas"], month_data));
    let top_data = top
        .iter()
        .map(|r| vec![r.short_label.clone(), format_brl(r.total)])
        .collect();
    println!("{}", pretty_table(&["Categoria", "Valor"], top_data));
    println!(
        "{}",
        group_table("Categoria", "Meses com Registro", &summary, false)
    );
    Ok(())
}

fn treemap(sources: &mut Sources, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let spec = filter_spec(sub)?;
    let Some(ds) = expenses(sources)? else {
        return Ok(());
    };
    let view = filter::filter(&ds, &spec);
    let rows = report::treemap_rows(&view);
    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        let data = rows
            .iter()
            .map(|r| {
                vec![
                    r.cost_center.clone(),
                    r.specification.clone(),
                    format_brl(r.total),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Centro de Custo", "Especificação", "Valor"], data)
        );
    }
    Ok(())
}

fn options(sources: &mut Sources, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let Some(ds) = expenses(sources)? else {
        return Ok(());
    };
    let opts = report::filter_options(&ds);
    if !maybe_print_json(json_flag, jsonl_flag, &opts)? {
        let range = opts
            .amount_range
            .map(|(lo, hi)| format!("{} .. {}", format_brl(lo), format_brl(hi)))
            .unwrap_or_default();
        let data = vec![
            vec!["Centro de Custo".to_string(), opts.cost_centers.join(", ")],
            vec!["Mês/Ano".to_string(), opts.periods.join(", ")],
            vec![
                "Especificação".to_string(),
                opts.specifications.len().to_string(),
            ],
            vec!["Faixa de Valor".to_string(), range],
        ];
        println!("{}", pretty_table(&["Filtro", "Opções"], data));
    }
    Ok(())
}

/// Runs the sidebar filters then the table query; shared with the exporter.
pub fn query_rows<'a>(
    ds: &'a Dataset<Record>,
    spec: &FilterSpec,
    sub: &clap::ArgMatches,
) -> Result<(filter::View<'a>, TablePage<'a>)> {
    let view = filter::filter(ds, spec);
    let page = table_query(sub)?.run(&view);
    Ok((view, page))
}

fn table(sources: &mut Sources, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let spec = filter_spec(sub)?;
    let Some(ds) = expenses(sources)? else {
        return Ok(());
    };
    let (view, page) = query_rows(&ds, &spec, sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &page.rows)? {
        return Ok(());
    }
    print_page(&page, view.len(), &ANNUAL_COLUMNS);
    Ok(())
}

pub(crate) fn print_page(page: &TablePage<'_>, of: usize, columns: &[crate::export::Column]) {
    let headers: Vec<&str> = columns.iter().map(|c| c.header()).collect();
    let data = page
        .rows
        .iter()
        .map(|r| columns.iter().map(|c| c.display(r)).collect())
        .collect();
    println!("Exibindo {} de {} registros", page.rows.len(), of);
    println!("{}", pretty_table(&headers, data));
    if let Some(stats) = report::selection_stats(&page.rows) {
        println!(
            "{}",
            pretty_table(
                &["Total da Seleção", "Média da Seleção", "Maior Valor", "Menor Valor"],
                vec![vec![
                    format_brl(stats.sum),
                    format_brl(stats.mean),
                    format_brl(stats.max),
                    format_brl(stats.min),
                ]],
            )
        );
    }
}
