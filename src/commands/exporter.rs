// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{filter_spec, section};
use crate::export::{self, ANNUAL_COLUMNS, ANNUAL_FULL_COLUMNS};
use crate::models::Direction;
use crate::sources::Sources;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn handle(sources: &mut Sources, m: &clap::ArgMatches) -> Result<()> {
    let written = match m.subcommand() {
        Some(("annual", sub)) => export_annual(sources, sub)?,
        Some(("monthly", sub)) => export_monthly(sources, sub)?,
        _ => None,
    };
    if let Some(path) = written {
        println!("Exported to {}", path.display());
    }
    Ok(())
}

fn out_dir(sources: &Sources, sub: &clap::ArgMatches) -> PathBuf {
    sub.get_one::<String>("out_dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| sources.settings.export_dir.clone())
}

fn scope(sub: &clap::ArgMatches) -> &str {
    sub.get_one::<String>("scope")
        .map(String::as_str)
        .unwrap_or("selection")
}

/// `selection` writes the rows the table would show; `filtered` writes every
/// row that passes the sidebar filters, with the derived month columns.
pub fn export_annual(sources: &mut Sources, sub: &clap::ArgMatches) -> Result<Option<PathBuf>> {
    let spec = filter_spec(sub)?;
    let dir = out_dir(sources, sub);
    let Some(ds) = section(sources.expenses(), "Expense report")? else {
        return Ok(None);
    };
    let (view, page) = super::annual::query_rows(&ds, &spec, sub)?;
    let path = match scope(sub) {
        "filtered" => export::export_file(
            &dir,
            "despesas_filtradas",
            &ANNUAL_FULL_COLUMNS,
            view.iter(),
        ),
        _ => export::export_file(
            &dir,
            "despesas_selecao",
            &ANNUAL_COLUMNS,
            page.rows.iter().copied(),
        ),
    }
    .with_context(|| format!("exporting to {}", dir.display()))?;
    Ok(Some(path))
}

/// `selection` writes the table rows; `all` writes the whole month file.
pub fn export_monthly(sources: &mut Sources, sub: &clap::ArgMatches) -> Result<Option<PathBuf>> {
    let dir = out_dir(sources, sub);
    let (key, direction, ds) = super::monthly::side_dataset(sources, sub)?;
    if ds.is_empty() {
        eprintln!(
            "⚠️  Nothing to export: no {} for {}",
            direction.label().to_lowercase(),
            super::monthly::month_label(&key)
        );
        return Ok(None);
    }
    let stem = match direction {
        Direction::Income => format!("entradas_{}", key),
        Direction::Expense => format!("saidas_{}", key),
    };
    let path = match scope(sub) {
        "all" => export::export_file(
            &dir,
            &format!("{}_completo", stem),
            &export::detail_full_columns(&ds.capabilities),
            &ds.records,
        ),
        _ => {
            let page = super::monthly::query_rows(&ds, sub)?;
            export::export_file(
                &dir,
                &stem,
                &export::detail_columns(&ds.capabilities, direction),
                page.rows.iter().copied(),
            )
        }
    }
    .with_context(|| format!("exporting to {}", dir.display()))?;
    Ok(Some(path))
}
