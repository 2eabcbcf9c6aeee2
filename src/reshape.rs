// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Wide income sheet (one column per month) to one record per category and month.

use crate::error::{DashboardError, DashboardResult};
use crate::loader::WideTable;
use crate::models::{Capabilities, Dataset, Diagnostics, IncomeRecord, MONTH_NAMES};
use crate::utils::parse_amount;
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Spreadsheet subtotal rows carry this token in their label.
const SUBTOTAL_TOKEN: &str = "total";

fn is_data_row(label: &str) -> bool {
    !label.is_empty() && !label.to_lowercase().contains(SUBTOTAL_TOKEN)
}

/// Header of each month column, as the spreadsheet spells it.
pub fn month_column(month: u32) -> String {
    MONTH_NAMES[(month - 1) as usize].to_uppercase()
}

pub fn to_long(
    source: &str,
    table: &WideTable,
    category_column: Option<&str>,
) -> DashboardResult<Dataset<IncomeRecord>> {
    let cat_idx = match category_column {
        Some(name) => table
            .column(name)
            .ok_or_else(|| DashboardError::MissingColumn {
                source_name: source.to_string(),
                column: name.to_string(),
            })?,
        None if table.headers.is_empty() => {
            return Err(DashboardError::MissingColumn {
                source_name: source.to_string(),
                column: "category".to_string(),
            });
        }
        None => 0,
    };

    let month_cols: Vec<(u32, usize)> = (1..=12)
        .filter_map(|m| table.column(&month_column(m)).map(|idx| (m, idx)))
        .collect();
    if month_cols.len() < 12 {
        debug!(source, present = month_cols.len(), "income sheet lacks some month columns");
    }

    let mut diag = Diagnostics::default();
    let mut records = Vec::new();
    for row in &table.rows {
        let label = row.get(cat_idx).map(|s| s.trim()).unwrap_or("");
        if !is_data_row(label) {
            diag.dropped_rows += 1;
            continue;
        }
        for &(month, idx) in &month_cols {
            let raw = match row.get(idx).map(|s| s.trim()).filter(|s| !s.is_empty()) {
                Some(raw) => raw,
                None => continue,
            };
            let amount = match parse_amount(raw) {
                Some(v) if v.is_zero() => continue,
                Some(v) => v,
                None => {
                    warn!(source, category = label, month, value = raw, "non-numeric income cell coerced to zero");
                    diag.coerced_amounts += 1;
                    Decimal::ZERO
                }
            };
            records.push(IncomeRecord {
                category: label.to_string(),
                month,
                month_name: MONTH_NAMES[(month - 1) as usize].to_string(),
                amount,
            });
        }
    }

    debug!(source, rows = records.len(), dropped = diag.dropped_rows, "reshaped income sheet");
    let capabilities = Capabilities {
        period: true,
        specification: true,
        ..Capabilities::default()
    };
    Ok(Dataset::new(source, capabilities, records).with_diagnostics(diag))
}

pub fn load_income(
    path: &std::path::Path,
    category_column: Option<&str>,
) -> DashboardResult<Dataset<IncomeRecord>> {
    let table = crate::loader::read_wide(path)?;
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    to_long(&source, &table, category_column)
}
