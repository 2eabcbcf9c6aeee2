// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cache::DatasetCache;
use crate::config::Settings;
use crate::error::DashboardResult;
use crate::models::{Dataset, Direction, IncomeRecord, Record, month_for_key};
use crate::{loader, reshape};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::rc::Rc;
use tracing::debug;

static MONTH_FILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([a-z]+)-entradas\.csv$").expect("month file pattern"));

/// Settings plus the per-run dataset caches every report reads through.
#[derive(Debug)]
pub struct Sources {
    pub settings: Settings,
    expenses: DatasetCache<Dataset<Record>>,
    income: DatasetCache<Dataset<IncomeRecord>>,
    details: DatasetCache<Dataset<Record>>,
}

impl Sources {
    pub fn new(settings: Settings) -> Self {
        Sources {
            settings,
            expenses: DatasetCache::new(),
            income: DatasetCache::new(),
            details: DatasetCache::new(),
        }
    }

    pub fn expenses(&mut self) -> DashboardResult<Rc<Dataset<Record>>> {
        let path = self.settings.expense_path();
        self.expenses.get_or_try_load(&path, loader::load_expenses)
    }

    pub fn income(&mut self) -> DashboardResult<Rc<Dataset<IncomeRecord>>> {
        let path = self.settings.income_path();
        let column = self.settings.income_category_column.clone();
        self.income
            .get_or_try_load(&path, |p| reshape::load_income(p, column.as_deref()))
    }

    /// A missing monthly file comes back as an empty dataset.
    pub fn detail(&mut self, key: &str, direction: Direction) -> DashboardResult<Rc<Dataset<Record>>> {
        let path = self.settings.monthly_path(key, direction);
        self.details.get_or_try_load(&path, loader::load_detail)
    }

    pub fn loads(&self) -> usize {
        self.expenses.loads() + self.income.loads() + self.details.loads()
    }

    /// Month keys that have an income file, in calendar order.
    pub fn available_months(&self) -> DashboardResult<Vec<String>> {
        let dir = self.settings.monthly_dir_path();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut keys: Vec<(u32, String)> = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let name = entry?.file_name().to_string_lossy().into_owned();
            let Some(caps) = MONTH_FILE_RE.captures(&name) else {
                continue;
            };
            let key = caps[1].to_lowercase();
            match month_for_key(&key) {
                Some(n) => keys.push((n, key)),
                None => debug!(file = %name, "ignoring monthly file with unknown month key"),
            }
        }
        keys.sort();
        keys.dedup();
        Ok(keys.into_iter().map(|(_, k)| k).collect())
    }
}
