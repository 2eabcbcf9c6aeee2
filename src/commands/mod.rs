// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod annual;
pub mod doctor;
pub mod exporter;
pub mod monthly;

use crate::error::DashboardResult;
use crate::filter::{FilterSpec, SortOrder, TableQuery, parse_limit};
use crate::utils::{parse_decimal, parse_period_arg};
use anyhow::{Result, anyhow};
use std::rc::Rc;
use tracing::warn;

/// Section-level failures (missing file, missing mandatory column) become a
/// warning and `None`; anything else propagates.
pub(crate) fn section<T>(loaded: DashboardResult<Rc<T>>, what: &str) -> Result<Option<Rc<T>>> {
    match loaded {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_section_fatal() => {
            warn!(section = what, error = %e, "section skipped");
            eprintln!("⚠️  {} unavailable: {}", what, e);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn many(sub: &clap::ArgMatches, id: &str) -> Vec<String> {
    sub.get_many::<String>(id)
        .map(|vs| {
            vs.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn filter_spec(sub: &clap::ArgMatches) -> Result<FilterSpec> {
    let periods = many(sub, "period")
        .iter()
        .map(|p| parse_period_arg(p))
        .collect::<Result<Vec<_>>>()?;
    let min = sub
        .get_one::<String>("min")
        .map(|s| parse_decimal(s))
        .transpose()?;
    let max = sub
        .get_one::<String>("max")
        .map(|s| parse_decimal(s))
        .transpose()?;
    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            return Err(anyhow!("--min {} is greater than --max {}", lo, hi));
        }
    }
    Ok(FilterSpec::new()
        .include_cost_centers(many(sub, "include_cc"))
        .exclude_cost_centers(many(sub, "exclude_cc"))
        .include_periods(periods)
        .amount_range(min, max))
}

pub(crate) fn table_query(sub: &clap::ArgMatches) -> Result<TableQuery> {
    let text = |id: &str| {
        sub.get_one::<String>(id)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    let sort = sub
        .get_one::<String>("sort")
        .map(|s| s.parse::<SortOrder>())
        .transpose()
        .map_err(|e| anyhow!(e))?
        .unwrap_or_default();
    let limit = match sub.get_one::<String>("limit") {
        Some(raw) => parse_limit(raw).map_err(|e| anyhow!(e))?,
        None => None,
    };
    Ok(TableQuery {
        specification: text("spec"),
        cost_center: text("cc"),
        search: text("search"),
        sort,
        limit,
    })
}

pub(crate) fn output_flags(sub: &clap::ArgMatches) -> (bool, bool) {
    let flag = |id: &str| {
        sub.try_get_one::<bool>(id)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
    };
    (flag("json"), flag("jsonl"))
}
