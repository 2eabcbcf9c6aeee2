// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Row selection: the sidebar predicates, the income coupling rule and the detail-table query.

use crate::models::{Dataset, IncomeRecord, Period, Record};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::debug;

/// Inclusive amount bounds; a missing bound is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountRange {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl AmountRange {
    pub fn contains(&self, v: Decimal) -> bool {
        self.min.is_none_or(|lo| v >= lo) && self.max.is_none_or(|hi| v <= hi)
    }
}

/// Conjunction of predicates. Every field left unset means "no restriction";
/// the builders turn an empty selection into an unset field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    include_cost_centers: Option<BTreeSet<String>>,
    exclude_cost_centers: Option<BTreeSet<String>>,
    include_periods: Option<BTreeSet<Period>>,
    amount_range: Option<AmountRange>,
    search: Option<String>,
}

fn non_empty<T: Ord>(set: BTreeSet<T>) -> Option<BTreeSet<T>> {
    if set.is_empty() { None } else { Some(set) }
}

fn non_blank(text: &str) -> Option<String> {
    let t = text.trim();
    if t.is_empty() { None } else { Some(t.to_lowercase()) }
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_cost_centers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_cost_centers = non_empty(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn exclude_cost_centers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_cost_centers = non_empty(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn include_periods<I>(mut self, periods: I) -> Self
    where
        I: IntoIterator<Item = Period>,
    {
        self.include_periods = non_empty(periods.into_iter().collect());
        self
    }

    pub fn amount_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.amount_range = if min.is_none() && max.is_none() {
            None
        } else {
            Some(AmountRange { min, max })
        };
        self
    }

    pub fn search(mut self, text: &str) -> Self {
        self.search = non_blank(text);
        self
    }

    /// Income carries no cost center, so any cost-center predicate empties the income side.
    pub fn has_cost_center_predicate(&self) -> bool {
        self.include_cost_centers.is_some() || self.exclude_cost_centers.is_some()
    }

    pub fn selected_months(&self) -> Option<BTreeSet<u32>> {
        self.include_periods
            .as_ref()
            .map(|ps| ps.iter().map(|p| p.month).collect())
    }

    pub fn is_pass_all(&self) -> bool {
        *self == FilterSpec::default()
    }

    pub fn matches(&self, r: &Record) -> bool {
        if let Some(inc) = &self.include_cost_centers {
            match &r.cost_center {
                Some(cc) if inc.contains(cc) => {}
                _ => return false,
            }
        }
        if let (Some(exc), Some(cc)) = (&self.exclude_cost_centers, &r.cost_center) {
            if exc.contains(cc) {
                return false;
            }
        }
        if let Some(periods) = &self.include_periods {
            if !periods.contains(&r.period) {
                return false;
            }
        }
        if let Some(range) = &self.amount_range {
            if !range.contains(r.amount) {
                return false;
            }
        }
        if let Some(needle) = &self.search {
            if !matches_search(r, needle) {
                return false;
            }
        }
        true
    }

    pub fn apply<'a, I>(&self, rows: I) -> View<'a>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        View {
            rows: rows.into_iter().filter(|r| self.matches(r)).collect(),
        }
    }
}

fn matches_search(r: &Record, needle_lower: &str) -> bool {
    r.search_fields()
        .any(|f| f.to_lowercase().contains(needle_lower))
}

/// Filtered subset of a dataset, in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct View<'a> {
    rows: Vec<&'a Record>,
}

impl<'a> View<'a> {
    pub fn all(ds: &'a Dataset<Record>) -> Self {
        View {
            rows: ds.records.iter().collect(),
        }
    }

    pub fn rows(&self) -> &[&'a Record] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn refine(&self, spec: &FilterSpec) -> View<'a> {
        spec.apply(self.iter())
    }
}

pub fn filter<'a>(ds: &'a Dataset<Record>, spec: &FilterSpec) -> View<'a> {
    let view = spec.apply(&ds.records);
    debug!(source = %ds.source, kept = view.len(), total = ds.len(), "applied filters");
    view
}

/// Income rows visible next to an expense selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IncomeView<'a> {
    pub rows: Vec<&'a IncomeRecord>,
    /// Set when a cost-center predicate hid the income side entirely.
    pub suppressed: bool,
}

impl IncomeView<'_> {
    pub fn total(&self) -> Decimal {
        crate::aggregate::saturating_sum(self.rows.iter().map(|r| r.amount))
    }
}

pub fn couple_income<'a>(income: &'a Dataset<IncomeRecord>, spec: &FilterSpec) -> IncomeView<'a> {
    if spec.has_cost_center_predicate() {
        return IncomeView {
            rows: Vec::new(),
            suppressed: true,
        };
    }
    let months = spec.selected_months();
    let rows = income
        .records
        .iter()
        .filter(|r| months.as_ref().is_none_or(|ms| ms.contains(&r.month)))
        .collect();
    IncomeView {
        rows,
        suppressed: false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Year, month, then cost center.
    #[default]
    Period,
    /// Transaction date; rows without one go last.
    Date,
    AmountDesc,
    AmountAsc,
    /// Cost center, then period.
    CostCenter,
    /// Specification, then period.
    Specification,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "period" => Ok(SortOrder::Period),
            "date" => Ok(SortOrder::Date),
            "amount-desc" => Ok(SortOrder::AmountDesc),
            "amount-asc" => Ok(SortOrder::AmountAsc),
            "cost-center" => Ok(SortOrder::CostCenter),
            "specification" => Ok(SortOrder::Specification),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

fn cmp_missing_last(a: Option<&String>, b: Option<&String>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl SortOrder {
    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match self {
            SortOrder::Period => a
                .period
                .cmp(&b.period)
                .then_with(|| cmp_missing_last(a.cost_center.as_ref(), b.cost_center.as_ref())),
            SortOrder::Date => match (a.date, b.date) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortOrder::AmountDesc => b.amount.cmp(&a.amount),
            SortOrder::AmountAsc => a.amount.cmp(&b.amount),
            SortOrder::CostCenter => cmp_missing_last(a.cost_center.as_ref(), b.cost_center.as_ref())
                .then_with(|| a.period.cmp(&b.period)),
            SortOrder::Specification => {
                cmp_missing_last(a.specification.as_ref(), b.specification.as_ref())
                    .then_with(|| a.period.cmp(&b.period))
            }
        }
    }
}

/// Filters of the detail table, applied on top of a view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableQuery {
    pub specification: Option<String>,
    pub cost_center: Option<String>,
    pub search: Option<String>,
    pub sort: SortOrder,
    /// `None` shows every row.
    pub limit: Option<usize>,
}

/// Rows shown by the detail table plus the size of the selection they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage<'a> {
    pub rows: Vec<&'a Record>,
    pub matched: usize,
    pub available: usize,
}

impl TableQuery {
    pub fn run<'a>(&self, view: &View<'a>) -> TablePage<'a> {
        let needle = self.search.as_deref().and_then(non_blank);
        let mut rows: Vec<&'a Record> = view
            .iter()
            .filter(|r| {
                self.specification
                    .as_ref()
                    .is_none_or(|s| r.specification.as_ref() == Some(s))
            })
            .filter(|r| {
                self.cost_center
                    .as_ref()
                    .is_none_or(|c| r.cost_center.as_ref() == Some(c))
            })
            .filter(|r| needle.as_deref().is_none_or(|n| matches_search(r, n)))
            .collect();
        rows.sort_by(|a, b| self.sort.compare(a, b));
        let matched = rows.len();
        if let Some(n) = self.limit {
            rows.truncate(n);
        }
        TablePage {
            rows,
            matched,
            available: view.len(),
        }
    }
}

/// Parses a row limit: "all" (or "todos") means unlimited.
pub fn parse_limit(s: &str) -> Result<Option<usize>, String> {
    let t = s.trim().to_lowercase();
    if t == "all" || t == "todos" {
        return Ok(None);
    }
    match t.parse::<usize>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(format!("invalid limit '{}', expected a positive number or 'all'", s)),
    }
}

pub fn cost_center_options<'a, I>(rows: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    rows.into_iter()
        .filter_map(|r| r.cost_center.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn specification_options<'a, I>(rows: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    rows.into_iter()
        .filter_map(|r| r.specification.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Known periods, ordered by year then month.
pub fn period_options<'a, I>(rows: I) -> Vec<Period>
where
    I: IntoIterator<Item = &'a Record>,
{
    rows.into_iter()
        .map(|r| r.period)
        .filter(Period::is_known)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
