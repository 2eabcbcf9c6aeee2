// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Record columns as shown in tables and written to CSV exports.

use crate::error::DashboardResult;
use crate::loader;
use crate::models::{Capabilities, Direction, Record};
use crate::present::{format_brl, format_date, opt_text};
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Period,
    Date,
    Specification,
    CostCenter,
    Amount,
    Note,
    Person,
    History,
    Vendor,
    Account,
    PaymentMethod,
    MonthNumber,
    Year,
    MonthName,
}

impl Column {
    pub fn header(&self) -> &'static str {
        match self {
            Column::Period => loader::COL_PERIOD,
            Column::Date => loader::COL_DATE,
            Column::Specification => loader::COL_SPECIFICATION,
            Column::CostCenter => loader::COL_COST_CENTER,
            Column::Amount => loader::COL_AMOUNT,
            Column::Note => loader::COL_NOTE,
            Column::Person => loader::COL_PERSON,
            Column::History => loader::COL_HISTORY,
            Column::Vendor => loader::COL_VENDOR,
            Column::Account => loader::COL_ACCOUNT,
            Column::PaymentMethod => loader::COL_PAYMENT_METHOD,
            Column::MonthNumber => "Mes_Num",
            Column::Year => "Ano",
            Column::MonthName => "Nome_Mes",
        }
    }

    /// Raw value, as written to CSV.
    pub fn value(&self, r: &Record) -> String {
        match self {
            Column::Period => r.period_label.clone(),
            Column::Date => r.date.map(|d| d.to_string()).unwrap_or_default(),
            Column::Specification => opt_text(&r.specification),
            Column::CostCenter => opt_text(&r.cost_center),
            Column::Amount => r.amount.to_string(),
            Column::Note => opt_text(&r.note),
            Column::Person => opt_text(&r.person),
            Column::History => opt_text(&r.history),
            Column::Vendor => opt_text(&r.vendor),
            Column::Account => opt_text(&r.account),
            Column::PaymentMethod => opt_text(&r.payment_method),
            Column::MonthNumber => r.period.month.to_string(),
            Column::Year => r.period.year.to_string(),
            Column::MonthName => r.period.month_name().to_string(),
        }
    }

    /// Formatted value, as shown in terminal tables.
    pub fn display(&self, r: &Record) -> String {
        match self {
            Column::Amount => format_brl(r.amount),
            Column::Date => r.date.map(format_date).unwrap_or_default(),
            other => other.value(r),
        }
    }
}

pub const ANNUAL_COLUMNS: [Column; 5] = [
    Column::Period,
    Column::Specification,
    Column::CostCenter,
    Column::Amount,
    Column::Note,
];

/// Displayed columns plus the derived calendar fields.
pub const ANNUAL_FULL_COLUMNS: [Column; 8] = [
    Column::Period,
    Column::Specification,
    Column::CostCenter,
    Column::Amount,
    Column::Note,
    Column::MonthNumber,
    Column::Year,
    Column::MonthName,
];

fn present(caps: &Capabilities, c: Column) -> bool {
    match c {
        Column::Date => caps.date,
        Column::Specification => caps.specification,
        Column::CostCenter => caps.cost_center,
        Column::Note => caps.note,
        Column::Person => caps.person,
        Column::History => caps.history,
        Column::Vendor => caps.vendor,
        Column::Account => caps.account,
        Column::PaymentMethod => caps.payment_method,
        Column::Amount => true,
        Column::Period | Column::MonthNumber | Column::Year | Column::MonthName => caps.period,
    }
}

/// Detail-table columns for one side of the monthly report, restricted to what the source has.
pub fn detail_columns(caps: &Capabilities, direction: Direction) -> Vec<Column> {
    let wanted: &[Column] = match direction {
        Direction::Income => &[
            Column::Date,
            Column::Specification,
            Column::CostCenter,
            Column::Amount,
            Column::Note,
            Column::Person,
            Column::Account,
            Column::PaymentMethod,
        ],
        Direction::Expense => &[
            Column::Date,
            Column::Specification,
            Column::CostCenter,
            Column::Amount,
            Column::Note,
            Column::History,
            Column::Vendor,
            Column::Account,
            Column::PaymentMethod,
        ],
    };
    wanted
        .iter()
        .copied()
        .filter(|c| present(caps, *c))
        .collect()
}

/// Every column the source carried.
pub fn detail_full_columns(caps: &Capabilities) -> Vec<Column> {
    [
        Column::Date,
        Column::Specification,
        Column::CostCenter,
        Column::Amount,
        Column::Note,
        Column::Person,
        Column::History,
        Column::Vendor,
        Column::Account,
        Column::PaymentMethod,
    ]
    .into_iter()
    .filter(|c| present(caps, *c))
    .collect()
}

pub fn write_csv<'a, W, I>(writer: W, columns: &[Column], rows: I) -> DashboardResult<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Record>,
{
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(columns.iter().map(|c| c.header()))?;
    for r in rows {
        wtr.write_record(columns.iter().map(|c| c.value(r)))?;
    }
    wtr.flush()?;
    Ok(())
}

/// `<prefix>_<YYYYmmdd_HHMMSS>.csv`
pub fn timestamped_name(prefix: &str) -> String {
    format!("{}_{}.csv", prefix, Local::now().format("%Y%m%d_%H%M%S"))
}

/// Creates a fresh file for `name` in `dir`, adding `_1`, `_2`, ... before the
/// extension when the name is already taken. Existing files are never truncated.
fn create_unique(dir: &Path, name: &str) -> DashboardResult<(PathBuf, File)> {
    let stem = name.strip_suffix(".csv").unwrap_or(name);
    let mut attempt = 0u32;
    loop {
        let candidate = if attempt == 0 {
            dir.join(name)
        } else {
            dir.join(format!("{}_{}.csv", stem, attempt))
        };
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(path = %candidate.display(), "export name taken");
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

pub fn export_file<'a, I>(
    dir: &Path,
    prefix: &str,
    columns: &[Column],
    rows: I,
) -> DashboardResult<PathBuf>
where
    I: IntoIterator<Item = &'a Record>,
{
    std::fs::create_dir_all(dir)?;
    let (path, file) = create_unique(dir, &timestamped_name(prefix))?;
    write_csv(file, columns, rows)?;
    info!(path = %path.display(), "exported rows");
    Ok(path)
}
