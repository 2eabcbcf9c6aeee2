// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Report sections as plain data, ready for a table, a chart or JSON.

use crate::aggregate::{
    self, Balance, DayTotal, GroupStats, LABEL_INCOME_SHARE, LABEL_INCOME_TOP, LABEL_RECORD_TOP,
    LABEL_SPEC_TOP, MonthComparison, MonthTotal, truncate_label,
};
use crate::filter::{self, IncomeView, View};
use crate::models::{Dataset, Direction, Record};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeKpis {
    pub total: Decimal,
    pub categories: usize,
    pub balance: Balance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualKpis {
    pub expenses: GroupStats,
    /// `None` when the income side is suppressed or unavailable.
    pub income: Option<IncomeKpis>,
    pub income_suppressed: bool,
}

pub fn annual_kpis(view: &View<'_>, income: Option<&IncomeView<'_>>) -> AnnualKpis {
    let expenses = aggregate::summarize(view.iter());
    let suppressed = income.is_some_and(|i| i.suppressed);
    let income = income.filter(|i| !i.suppressed).map(|i| {
        let total = i.total();
        IncomeKpis {
            total,
            categories: aggregate::distinct_categories(i.rows.iter().copied()),
            balance: aggregate::balance(total, expenses.sum),
        }
    });
    AnnualKpis {
        expenses,
        income,
        income_suppressed: suppressed,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyEvolution {
    pub expenses: Vec<MonthTotal>,
    pub income: Option<Vec<MonthTotal>>,
    pub comparison: Option<Vec<MonthComparison>>,
}

pub fn monthly_evolution(view: &View<'_>, income: Option<&IncomeView<'_>>) -> MonthlyEvolution {
    let expenses = aggregate::monthly_totals(view.iter());
    let income = income
        .filter(|i| !i.suppressed)
        .map(|i| aggregate::monthly_totals(i.rows.iter().copied()));
    let comparison = income
        .as_ref()
        .map(|inc| aggregate::compare_months(inc, &expenses));
    MonthlyEvolution {
        expenses,
        income,
        comparison,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub label: String,
    pub total: Decimal,
    pub mean: Decimal,
    pub count: usize,
    pub max: Decimal,
    /// Percent of the grand total, `None` when that total is zero.
    pub share: Option<Decimal>,
}

fn group_rows(result: aggregate::AggregateResult<String>) -> Vec<GroupRow> {
    let sorted = result.sorted_by_sum_desc();
    let shares = sorted.percent_of_total();
    sorted
        .groups
        .into_iter()
        .zip(shares)
        .map(|(g, share)| GroupRow {
            label: g.key,
            total: g.stats.sum,
            mean: g.stats.mean,
            count: g.stats.count,
            max: g.stats.max,
            share,
        })
        .collect()
}

/// Per cost center totals, largest first.
pub fn cost_center_summary<'a, I>(rows: I) -> Vec<GroupRow>
where
    I: IntoIterator<Item = &'a Record>,
{
    group_rows(aggregate::by_cost_center(rows))
}

/// Per income category totals, largest first; `count` is the number of months with income.
pub fn income_summary(income: &IncomeView<'_>) -> Vec<GroupRow> {
    group_rows(aggregate::by_category(income.rows.iter().copied()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedLabel {
    pub label: String,
    pub short_label: String,
    pub total: Decimal,
}

fn ranked(result: aggregate::AggregateResult<String>, n: usize, budget: usize) -> Vec<RankedLabel> {
    result
        .top(n)
        .groups
        .into_iter()
        .map(|g| RankedLabel {
            short_label: truncate_label(&g.key, budget),
            label: g.key,
            total: g.stats.sum,
        })
        .collect()
}

pub fn top_specifications(view: &View<'_>, n: usize) -> Vec<RankedLabel> {
    ranked(aggregate::by_specification(view.iter()), n, LABEL_SPEC_TOP)
}

pub fn top_income_categories(income: &IncomeView<'_>, n: usize) -> Vec<RankedLabel> {
    ranked(
        aggregate::by_category(income.rows.iter().copied()),
        n,
        LABEL_INCOME_TOP,
    )
}

/// Category shares with labels cut for a pie legend.
pub fn income_shares(income: &IncomeView<'_>) -> Vec<RankedLabel> {
    let all = aggregate::by_category(income.rows.iter().copied());
    let n = all.len();
    ranked(all, n, LABEL_INCOME_SHARE)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapRow {
    pub cost_center: String,
    pub specification: String,
    pub total: Decimal,
}

pub fn treemap_rows(view: &View<'_>) -> Vec<TreemapRow> {
    aggregate::treemap(view.iter())
        .groups
        .into_iter()
        .map(|g| TreemapRow {
            cost_center: g.key.0,
            specification: g.key.1,
            total: g.stats.sum,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub cost_centers: Vec<String>,
    pub periods: Vec<String>,
    pub specifications: Vec<String>,
    /// Default bounds of the amount filter.
    pub amount_range: Option<(Decimal, Decimal)>,
}

pub fn filter_options(ds: &Dataset<Record>) -> FilterOptions {
    FilterOptions {
        cost_centers: filter::cost_center_options(&ds.records),
        periods: filter::period_options(&ds.records)
            .into_iter()
            .map(|p| p.to_string())
            .collect(),
        specifications: filter::specification_options(&ds.records),
        amount_range: ds.amount_range(),
    }
}

/// Quick statistics under the detail table; only shown for a non-empty selection.
pub fn selection_stats(rows: &[&Record]) -> Option<GroupStats> {
    if rows.is_empty() {
        None
    } else {
        Some(aggregate::summarize(rows.iter().copied()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopRecord {
    pub specification: String,
    pub short_label: String,
    pub cost_center: Option<String>,
    pub date: Option<NaiveDate>,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySide {
    pub direction: Direction,
    pub source: String,
    pub kpis: GroupStats,
    /// Present only when the source has a cost center column.
    pub by_cost_center: Option<Vec<GroupRow>>,
    /// Present only when the source has a date column.
    pub daily: Option<Vec<DayTotal>>,
    /// Largest single expenses; present for the expense side with a specification column.
    pub top_records: Option<Vec<TopRecord>>,
}

/// `None` for a month side with no rows.
pub fn monthly_side(ds: &Dataset<Record>, direction: Direction, top_n: usize) -> Option<MonthlySide> {
    if ds.is_empty() {
        return None;
    }
    let caps = ds.capabilities;
    let top_records = (direction == Direction::Expense && caps.specification).then(|| {
        aggregate::top_records(&ds.records, top_n)
            .into_iter()
            .map(|r| {
                let spec = r.specification.clone().unwrap_or_default();
                TopRecord {
                    short_label: truncate_label(&spec, LABEL_RECORD_TOP),
                    specification: spec,
                    cost_center: r.cost_center.clone(),
                    date: r.date,
                    amount: r.amount,
                }
            })
            .collect()
    });
    Some(MonthlySide {
        direction,
        source: ds.source.clone(),
        kpis: aggregate::summarize(&ds.records),
        by_cost_center: caps.cost_center.then(|| cost_center_summary(&ds.records)),
        daily: caps.date.then(|| aggregate::daily_totals(&ds.records)),
        top_records,
    })
}

/// Month balance, shown only when both sides have rows.
pub fn monthly_balance(income: &Dataset<Record>, expense: &Dataset<Record>) -> Option<Balance> {
    if income.is_empty() || expense.is_empty() {
        return None;
    }
    let inc = aggregate::saturating_sum(income.records.iter().map(|r| r.amount));
    let exp = aggregate::saturating_sum(expense.records.iter().map(|r| r.amount));
    Some(aggregate::balance(inc, exp))
}
