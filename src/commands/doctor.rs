// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{DashboardError, DashboardResult};
use crate::models::{Diagnostics, Direction};
use crate::sources::Sources;
use crate::utils::pretty_table;
use anyhow::Result;
use std::rc::Rc;

pub fn handle(sources: &mut Sources) -> Result<()> {
    let rows = issues(sources)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let data = rows.into_iter().map(|(i, d)| vec![i, d]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], data));
    }
    Ok(())
}

pub type Issue = (String, String);

fn load_issue<T>(loaded: DashboardResult<Rc<T>>, rows: &mut Vec<Issue>) -> Result<Option<Rc<T>>> {
    match loaded {
        Ok(v) => Ok(Some(v)),
        Err(e @ DashboardError::MissingSource { .. }) => {
            rows.push(("missing_source".into(), e.to_string()));
            Ok(None)
        }
        Err(e @ DashboardError::MissingColumn { .. }) => {
            rows.push(("missing_column".into(), e.to_string()));
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn diagnostic_issues(source: &str, d: &Diagnostics, rows: &mut Vec<Issue>) {
    let counts = [
        ("malformed_period", d.unknown_periods),
        ("coerced_amount", d.coerced_amounts),
        ("unparsed_date", d.unparsed_dates),
        ("dropped_row", d.dropped_rows),
    ];
    for (issue, n) in counts {
        if n > 0 {
            rows.push((issue.into(), format!("{}: {} row(s)", source, n)));
        }
    }
}

fn optional_columns(source: &str, wanted: &[(&str, bool)], rows: &mut Vec<Issue>) {
    for (name, present) in wanted {
        if !present {
            rows.push(("missing_optional_column".into(), format!("{}: {}", source, name)));
        }
    }
}

/// Every data problem found across the configured sources, as (issue, detail) pairs.
pub fn issues(sources: &mut Sources) -> Result<Vec<Issue>> {
    let mut rows = Vec::new();

    // 1) Annual expenses
    if let Some(ds) = load_issue(sources.expenses(), &mut rows)? {
        diagnostic_issues(&ds.source, &ds.diagnostics, &mut rows);
        let c = &ds.capabilities;
        optional_columns(
            &ds.source,
            &[
                (crate::loader::COL_COST_CENTER, c.cost_center),
                (crate::loader::COL_SPECIFICATION, c.specification),
                (crate::loader::COL_NOTE, c.note),
            ],
            &mut rows,
        );
    }

    // 2) Annual income
    if let Some(ds) = load_issue(sources.income(), &mut rows)? {
        diagnostic_issues(&ds.source, &ds.diagnostics, &mut rows);
        if ds.is_empty() {
            rows.push(("empty_source".into(), ds.source.clone()));
        }
    }

    // 3) Monthly pairs: every income file should have its expense counterpart
    let months = sources.available_months()?;
    if months.is_empty() {
        rows.push((
            "no_monthly_files".into(),
            sources.settings.monthly_dir_path().display().to_string(),
        ));
    }
    for key in months {
        for direction in [Direction::Income, Direction::Expense] {
            let path = sources.settings.monthly_path(&key, direction);
            if !path.exists() {
                rows.push(("missing_monthly_file".into(), path.display().to_string()));
                continue;
            }
            let Some(ds) = load_issue(sources.detail(&key, direction), &mut rows)? else {
                continue;
            };
            diagnostic_issues(&ds.source, &ds.diagnostics, &mut rows);
            if !ds.capabilities.date {
                rows.push((
                    "missing_optional_column".into(),
                    format!("{}: {}", ds.source, crate::loader::COL_DATE),
                ));
            }
        }
    }
    Ok(rows)
}
