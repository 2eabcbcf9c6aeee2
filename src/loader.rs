// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Reads CSV exports of the expense, income and monthly-detail spreadsheets.

use crate::error::{DashboardError, DashboardResult};
use crate::models::{Capabilities, Dataset, Diagnostics, Period, Record};
use crate::utils::{parse_amount, parse_date, parse_period};
use csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

pub const COL_PERIOD: &str = "Mês Ano Ref.";
pub const COL_COST_CENTER: &str = "Centro de Custo";
pub const COL_SPECIFICATION: &str = "Especificação";
pub const COL_AMOUNT: &str = "Valor";
pub const COL_NOTE: &str = "Observação";
pub const COL_DATE: &str = "Data Lançamento";
pub const COL_PERSON: &str = "Pessoa";
pub const COL_VENDOR: &str = "Fornecedor";
pub const COL_HISTORY: &str = "Histórico";
pub const COL_ACCOUNT: &str = "Conta";
pub const COL_PAYMENT_METHOD: &str = "Forma de Pagamento";

/// Raw rows of a wide spreadsheet export, headers included.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WideTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl WideTable {
    pub fn column(&self, name: &str) -> Option<usize> {
        let want = normalize_header(name);
        self.headers.iter().position(|h| normalize_header(h) == want)
    }
}

fn normalize_header(h: &str) -> String {
    h.trim_start_matches('\u{feff}').trim().to_lowercase()
}

struct Columns {
    headers: Vec<String>,
}

impl Columns {
    fn new(headers: &StringRecord) -> Self {
        Columns {
            headers: headers.iter().map(normalize_header).collect(),
        }
    }

    fn find(&self, name: &str) -> Option<usize> {
        let want = normalize_header(name);
        self.headers.iter().position(|h| *h == want)
    }

    fn require(&self, source: &str, name: &str) -> DashboardResult<usize> {
        self.find(name).ok_or_else(|| DashboardError::MissingColumn {
            source_name: source.to_string(),
            column: name.to_string(),
        })
    }
}

fn cell(rec: &StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| rec.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn open(path: &Path) -> DashboardResult<File> {
    if !path.exists() {
        return Err(DashboardError::MissingSource {
            path: path.to_path_buf(),
        });
    }
    Ok(File::open(path)?)
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Blank cells are zero; unparseable text is zero and counted.
fn amount_cell(rec: &StringRecord, idx: usize, diag: &mut Diagnostics, source: &str) -> Decimal {
    match rec.get(idx).map(str::trim).filter(|s| !s.is_empty()) {
        None => Decimal::ZERO,
        Some(raw) => parse_amount(raw).unwrap_or_else(|| {
            warn!(source, value = raw, "unparseable amount coerced to zero");
            diag.coerced_amounts += 1;
            Decimal::ZERO
        }),
    }
}

pub fn load_expenses(path: &Path) -> DashboardResult<Dataset<Record>> {
    let file = open(path)?;
    load_expenses_from_reader(&source_name(path), file)
}

/// Annual expense export: period, cost center, specification, amount, note.
pub fn load_expenses_from_reader<R: Read>(
    source: &str,
    reader: R,
) -> DashboardResult<Dataset<Record>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let cols = Columns::new(rdr.headers()?);

    let amount_idx = cols.require(source, COL_AMOUNT)?;
    let period_idx = cols.require(source, COL_PERIOD)?;
    let cc_idx = cols.find(COL_COST_CENTER);
    let spec_idx = cols.find(COL_SPECIFICATION);
    let note_idx = cols.find(COL_NOTE);

    let capabilities = Capabilities {
        period: true,
        cost_center: cc_idx.is_some(),
        specification: spec_idx.is_some(),
        note: note_idx.is_some(),
        ..Capabilities::default()
    };

    let mut diag = Diagnostics::default();
    let mut records = Vec::new();
    for result in rdr.records() {
        let rec = result?;
        let label = cell(&rec, Some(period_idx)).unwrap_or_default();
        let period = parse_period(&label);
        if !period.is_known() {
            diag.unknown_periods += 1;
        }
        let amount = amount_cell(&rec, amount_idx, &mut diag, source);

        let mut r = Record::new(period, amount);
        r.period_label = label;
        r.cost_center = cell(&rec, cc_idx);
        r.specification = cell(&rec, spec_idx);
        r.note = cell(&rec, note_idx);
        records.push(r);
    }

    debug!(source, rows = records.len(), "loaded expense source");
    Ok(Dataset::new(source, capabilities, records).with_diagnostics(diag))
}

/// Per-month detail file. A missing file is an empty dataset, not an error.
pub fn load_detail(path: &Path) -> DashboardResult<Dataset<Record>> {
    match open(path) {
        Ok(file) => load_detail_from_reader(&source_name(path), file),
        Err(DashboardError::MissingSource { path }) => {
            warn!(path = %path.display(), "monthly source not found");
            Ok(Dataset::empty(source_name(&path)))
        }
        Err(e) => Err(e),
    }
}

pub fn load_detail_from_reader<R: Read>(
    source: &str,
    reader: R,
) -> DashboardResult<Dataset<Record>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let cols = Columns::new(rdr.headers()?);

    let amount_idx = cols.require(source, COL_AMOUNT)?;
    let date_idx = cols.find(COL_DATE);
    let cc_idx = cols.find(COL_COST_CENTER);
    let spec_idx = cols.find(COL_SPECIFICATION);
    let note_idx = cols.find(COL_NOTE);
    let person_idx = cols.find(COL_PERSON);
    let vendor_idx = cols.find(COL_VENDOR);
    let history_idx = cols.find(COL_HISTORY);
    let account_idx = cols.find(COL_ACCOUNT);
    let payment_idx = cols.find(COL_PAYMENT_METHOD);

    let capabilities = Capabilities {
        period: date_idx.is_some(),
        cost_center: cc_idx.is_some(),
        specification: spec_idx.is_some(),
        note: note_idx.is_some(),
        date: date_idx.is_some(),
        person: person_idx.is_some(),
        vendor: vendor_idx.is_some(),
        history: history_idx.is_some(),
        account: account_idx.is_some(),
        payment_method: payment_idx.is_some(),
    };

    let mut diag = Diagnostics::default();
    let mut records = Vec::new();
    for result in rdr.records() {
        let rec = result?;
        let amount = amount_cell(&rec, amount_idx, &mut diag, source);

        let date = match cell(&rec, date_idx) {
            Some(raw) => {
                let parsed = parse_date(&raw);
                if parsed.is_none() {
                    warn!(source, value = %raw, "unparseable date ignored");
                    diag.unparsed_dates += 1;
                }
                parsed
            }
            None => None,
        };
        let period = date
            .map(|d| {
                use chrono::Datelike;
                Period::new(d.month(), d.year())
            })
            .unwrap_or(Period::UNKNOWN);
        if date_idx.is_some() && !period.is_known() {
            diag.unknown_periods += 1;
        }

        let mut r = Record::new(period, amount);
        r.date = date;
        r.cost_center = cell(&rec, cc_idx);
        r.specification = cell(&rec, spec_idx);
        r.note = cell(&rec, note_idx);
        r.person = cell(&rec, person_idx);
        r.vendor = cell(&rec, vendor_idx);
        r.history = cell(&rec, history_idx);
        r.account = cell(&rec, account_idx);
        r.payment_method = cell(&rec, payment_idx);
        records.push(r);
    }

    debug!(source, rows = records.len(), "loaded monthly source");
    Ok(Dataset::new(source, capabilities, records).with_diagnostics(diag))
}

pub fn read_wide(path: &Path) -> DashboardResult<WideTable> {
    let file = open(path)?;
    read_wide_from_reader(file)
}

pub fn read_wide_from_reader<R: Read>(reader: R) -> DashboardResult<WideTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    let mut rows = Vec::new();
    for result in rdr.records() {
        let rec = result?;
        rows.push(rec.iter().map(|c| c.trim().to_string()).collect());
    }
    Ok(WideTable { headers, rows })
}
