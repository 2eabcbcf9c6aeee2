// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// File-name keys of the per-month detail sources, in calendar order.
pub const MONTH_KEYS: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Localized month name for 1..=12, empty for anything else.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1..=12 => MONTH_NAMES[(month - 1) as usize],
        _ => "",
    }
}

pub fn month_for_key(key: &str) -> Option<u32> {
    let key = key.trim().to_lowercase();
    MONTH_KEYS
        .iter()
        .position(|k| *k == key)
        .map(|i| i as u32 + 1)
}

/// Reference period a record is attributed to. (0, 0) means unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub const UNKNOWN: Period = Period { year: 0, month: 0 };

    pub fn new(month: u32, year: i32) -> Self {
        Period { year, month }
    }

    pub fn is_known(&self) -> bool {
        *self != Period::UNKNOWN
    }

    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.year)
    }
}

/// One expense (or monthly-detail) line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub period: Period,
    pub period_label: String,
    pub cost_center: Option<String>,
    pub specification: Option<String>,
    pub amount: Decimal,
    pub note: Option<String>,
    pub date: Option<NaiveDate>,
    pub person: Option<String>,
    pub vendor: Option<String>,
    pub history: Option<String>,
    pub account: Option<String>,
    pub payment_method: Option<String>,
}

impl Record {
    pub fn new(period: Period, amount: Decimal) -> Self {
        Record {
            period,
            period_label: if period.is_known() {
                period.to_string()
            } else {
                String::new()
            },
            cost_center: None,
            specification: None,
            amount,
            note: None,
            date: None,
            person: None,
            vendor: None,
            history: None,
            account: None,
            payment_method: None,
        }
    }

    /// Free-text fields searched by the substring predicate, absent ones skipped.
    pub fn search_fields(&self) -> impl Iterator<Item = &str> {
        [
            &self.specification,
            &self.note,
            &self.cost_center,
            &self.person,
            &self.vendor,
            &self.history,
        ]
        .into_iter()
        .filter_map(|f| f.as_deref())
    }
}

/// Long-form income line: one category in one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub category: String,
    pub month: u32,
    pub month_name: String,
    pub amount: Decimal,
}

/// Which optional columns a source carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub period: bool,
    pub cost_center: bool,
    pub specification: bool,
    pub note: bool,
    pub date: bool,
    pub person: bool,
    pub vendor: bool,
    pub history: bool,
    pub account: bool,
    pub payment_method: bool,
}

/// Values the loader had to default while reading a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    pub unknown_periods: usize,
    pub coerced_amounts: usize,
    pub unparsed_dates: usize,
    pub dropped_rows: usize,
}

impl Diagnostics {
    pub fn is_clean(&self) -> bool {
        *self == Diagnostics::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<R> {
    pub source: String,
    pub capabilities: Capabilities,
    pub diagnostics: Diagnostics,
    pub records: Vec<R>,
}

impl<R> Dataset<R> {
    pub fn new(source: impl Into<String>, capabilities: Capabilities, records: Vec<R>) -> Self {
        Dataset {
            source: source.into(),
            capabilities,
            diagnostics: Diagnostics::default(),
            records,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn empty(source: impl Into<String>) -> Self {
        Dataset::new(source, Capabilities::default(), Vec::new())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Dataset<Record> {
    /// Observed (min, max) amount, the default bounds of the range filter.
    pub fn amount_range(&self) -> Option<(Decimal, Decimal)> {
        let mut it = self.records.iter().map(|r| r.amount);
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), a| (lo.min(a), hi.max(a))))
    }
}

impl Dataset<IncomeRecord> {
    pub fn total(&self) -> Decimal {
        crate::aggregate::saturating_sum(self.records.iter().map(|r| r.amount))
    }
}

/// Which side of a monthly report a detail file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Income,
    Expense,
}

impl Direction {
    /// File-name suffix of the monthly source.
    pub fn suffix(&self) -> &'static str {
        match self {
            Direction::Income => "entradas",
            Direction::Expense => "saidas",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Income => "Entradas",
            Direction::Expense => "Saídas",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "in" | "income" | "entradas" => Some(Direction::Income),
            "out" | "expense" | "saidas" | "saídas" => Some(Direction::Expense),
            _ => None,
        }
    }
}
