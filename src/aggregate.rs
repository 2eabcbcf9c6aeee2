// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Grouped statistics over a selection: breakdowns, rankings, monthly and daily series.

use crate::models::{IncomeRecord, Record, month_name};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub const LABEL_INCOME_SHARE: usize = 30;
pub const LABEL_INCOME_TOP: usize = 35;
pub const LABEL_SPEC_TOP: usize = 40;
pub const LABEL_RECORD_TOP: usize = 50;

pub trait Amount {
    fn amount(&self) -> Decimal;
}

impl Amount for Record {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Amount for IncomeRecord {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

/// Calendar month a row belongs to, 0 when unknown.
pub trait CalendarMonth {
    fn month(&self) -> u32;
}

impl CalendarMonth for Record {
    fn month(&self) -> u32 {
        self.period.month
    }
}

impl CalendarMonth for IncomeRecord {
    fn month(&self) -> u32 {
        self.month
    }
}

/// Sum, mean, count and extrema of amounts. All zero over an empty set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GroupStats {
    pub count: usize,
    pub sum: Decimal,
    pub mean: Decimal,
    pub max: Decimal,
    pub min: Decimal,
}

impl GroupStats {
    fn push(&mut self, v: Decimal) {
        if self.count == 0 {
            self.max = v;
            self.min = v;
        } else {
            self.max = self.max.max(v);
            self.min = self.min.min(v);
        }
        self.count += 1;
        self.sum = self.sum.saturating_add(v);
    }

    fn finish(mut self) -> Self {
        if self.count > 0 {
            self.mean = self.sum / Decimal::from(self.count);
        }
        self
    }
}

pub fn summarize<'a, T, I>(rows: I) -> GroupStats
where
    T: Amount + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut stats = GroupStats::default();
    for r in rows {
        stats.push(r.amount());
    }
    stats.finish()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group<K> {
    pub key: K,
    pub stats: GroupStats,
}

/// Groups in caller-chosen order; `group_by` yields ascending key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateResult<K> {
    pub groups: Vec<Group<K>>,
}

/// Rows whose key is `None` are left out, as blank spreadsheet cells are.
pub fn group_by<'a, T, K, I, F>(rows: I, key: F) -> AggregateResult<K>
where
    T: Amount + 'a,
    K: Ord,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> Option<K>,
{
    let mut acc: BTreeMap<K, GroupStats> = BTreeMap::new();
    for r in rows {
        if let Some(k) = key(r) {
            acc.entry(k).or_default().push(r.amount());
        }
    }
    AggregateResult {
        groups: acc
            .into_iter()
            .map(|(key, stats)| Group {
                key,
                stats: stats.finish(),
            })
            .collect(),
    }
}

impl<K> AggregateResult<K> {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group<K>> {
        self.groups.iter()
    }

    pub fn total(&self) -> Decimal {
        saturating_sum(self.groups.iter().map(|g| g.stats.sum))
    }

    /// Stable: equal sums keep their current relative order.
    pub fn sorted_by_sum_desc(mut self) -> Self {
        self.groups.sort_by(|a, b| b.stats.sum.cmp(&a.stats.sum));
        self
    }

    pub fn top(self, n: usize) -> Self {
        let mut sorted = self.sorted_by_sum_desc();
        sorted.groups.truncate(n);
        sorted
    }

    pub fn retain_positive(mut self) -> Self {
        self.groups.retain(|g| g.stats.sum > Decimal::ZERO);
        self
    }

    /// Each group's share of the grand total, aligned with `groups`.
    pub fn percent_of_total(&self) -> Vec<Option<Decimal>> {
        let total = self.total();
        self.groups
            .iter()
            .map(|g| percent(g.stats.sum, total))
            .collect()
    }
}

/// Sum that clamps at the `Decimal` bounds instead of panicking.
pub fn saturating_sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

/// part / whole * 100 rounded half-even to 2 places; `None` when whole is zero
/// or the result is out of range.
pub fn percent(part: Decimal, whole: Decimal) -> Option<Decimal> {
    if whole.is_zero() {
        return None;
    }
    let share = part.checked_mul(Decimal::ONE_HUNDRED)?.checked_div(whole)?;
    Some(share.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
}

/// Shortens a display label to `budget` characters plus "...".
pub fn truncate_label(label: &str, budget: usize) -> String {
    if label.chars().count() > budget {
        let mut s: String = label.chars().take(budget).collect();
        s.push_str("...");
        s
    } else {
        label.to_string()
    }
}

pub fn by_cost_center<'a, I>(rows: I) -> AggregateResult<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    group_by(rows, |r: &Record| r.cost_center.clone())
}

pub fn by_specification<'a, I>(rows: I) -> AggregateResult<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    group_by(rows, |r: &Record| r.specification.clone())
}

pub fn by_category<'a, I>(rows: I) -> AggregateResult<String>
where
    I: IntoIterator<Item = &'a IncomeRecord>,
{
    group_by(rows, |r: &IncomeRecord| Some(r.category.clone()))
}

/// Positive sums per (cost center, specification) pair.
pub fn treemap<'a, I>(rows: I) -> AggregateResult<(String, String)>
where
    I: IntoIterator<Item = &'a Record>,
{
    group_by(rows, |r: &Record| {
        Some((r.cost_center.clone()?, r.specification.clone()?))
    })
    .retain_positive()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotal {
    pub month: u32,
    pub month_name: String,
    pub total: Decimal,
}

/// Sums per calendar month, ordered by month number. Unknown months are left out.
pub fn monthly_totals<'a, T, I>(rows: I) -> Vec<MonthTotal>
where
    T: Amount + CalendarMonth + 'a,
    I: IntoIterator<Item = &'a T>,
{
    group_by(rows, |r: &T| Some(r.month()).filter(|m| (1..=12).contains(m)))
        .groups
        .into_iter()
        .map(|g| MonthTotal {
            month: g.key,
            month_name: month_name(g.key).to_string(),
            total: g.stats.sum,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthComparison {
    pub month: u32,
    pub month_name: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

/// Income against expense per month; a month seen on one side only gets zero on the other.
pub fn compare_months(income: &[MonthTotal], expense: &[MonthTotal]) -> Vec<MonthComparison> {
    let mut merged: BTreeMap<u32, (Decimal, Decimal)> = BTreeMap::new();
    for m in income {
        let e = merged.entry(m.month).or_default();
        e.0 = e.0.saturating_add(m.total);
    }
    for m in expense {
        let e = merged.entry(m.month).or_default();
        e.1 = e.1.saturating_add(m.total);
    }
    merged
        .into_iter()
        .map(|(month, (inc, exp))| MonthComparison {
            month,
            month_name: month_name(month).to_string(),
            income: inc,
            expense: exp,
            balance: inc.saturating_sub(exp),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayTotal {
    pub date: NaiveDate,
    pub total: Decimal,
}

pub fn daily_totals<'a, I>(rows: I) -> Vec<DayTotal>
where
    I: IntoIterator<Item = &'a Record>,
{
    group_by(rows, |r: &Record| r.date)
        .groups
        .into_iter()
        .map(|g| DayTotal {
            date: g.key,
            total: g.stats.sum,
        })
        .collect()
}

/// The `n` largest single records; ties keep source order.
pub fn top_records<'a, I>(rows: I, n: usize) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut v: Vec<&Record> = rows.into_iter().collect();
    v.sort_by(|a, b| b.amount.cmp(&a.amount));
    v.truncate(n);
    v
}

pub fn distinct_categories<'a, I>(rows: I) -> usize
where
    I: IntoIterator<Item = &'a IncomeRecord>,
{
    rows.into_iter()
        .map(|r| r.category.as_str())
        .collect::<BTreeSet<_>>()
        .len()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BalanceStatus {
    Surplus,
    Deficit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
    /// `None` when there is no positive income to compare against.
    pub balance_pct_of_income: Option<Decimal>,
    pub expense_pct_of_income: Decimal,
    pub status: BalanceStatus,
}

pub fn balance(income: Decimal, expense: Decimal) -> Balance {
    let bal = income.saturating_sub(expense);
    let positive = income > Decimal::ZERO;
    Balance {
        income,
        expense,
        balance: bal,
        balance_pct_of_income: if positive { percent(bal, income) } else { None },
        expense_pct_of_income: if positive {
            percent(expense, income).unwrap_or_default()
        } else {
            Decimal::ZERO
        },
        status: if bal >= Decimal::ZERO {
            BalanceStatus::Surplus
        } else {
            BalanceStatus::Deficit
        },
    }
}
