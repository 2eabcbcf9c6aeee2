// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{DashboardError, DashboardResult};
use crate::models::Direction;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Finboard", "finboard"));

const CONFIG_FILE: &str = "finboard.json";

/// Where the sources live and where exports go. Every field has a default,
/// so a partial config file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub expense_file: String,
    pub income_file: String,
    pub monthly_dir: String,
    /// Header of the income category column; the first column when unset.
    pub income_category_column: Option<String>,
    pub export_dir: PathBuf,
    /// Year shown in monthly report titles.
    pub report_year: Option<i32>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_dir: PathBuf::from("."),
            expense_file: "despesas-anual.csv".to_string(),
            income_file: "receitas-anual.csv".to_string(),
            monthly_dir: "mensal".to_string(),
            income_category_column: None,
            export_dir: PathBuf::from("."),
            report_year: None,
        }
    }
}

impl Settings {
    pub fn expense_path(&self) -> PathBuf {
        self.data_dir.join(&self.expense_file)
    }

    pub fn income_path(&self) -> PathBuf {
        self.data_dir.join(&self.income_file)
    }

    pub fn monthly_dir_path(&self) -> PathBuf {
        self.data_dir.join(&self.monthly_dir)
    }

    /// `<monthly dir>/<key>-entradas.csv` or `<key>-saidas.csv`.
    pub fn monthly_path(&self, key: &str, direction: Direction) -> PathBuf {
        self.monthly_dir_path()
            .join(format!("{}-{}.csv", key, direction.suffix()))
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from(APP.0, APP.1, APP.2).map(|p| p.config_dir().join(CONFIG_FILE))
}

/// Reads an explicit config file (which must exist), else the platform default if present,
/// else built-in defaults.
pub fn load(explicit: Option<&Path>) -> DashboardResult<Settings> {
    let path = match explicit {
        Some(p) if !p.exists() => {
            return Err(DashboardError::Config(format!(
                "config file {} does not exist",
                p.display()
            )));
        }
        Some(p) => p.to_path_buf(),
        None => match default_config_path().filter(|p| p.exists()) {
            Some(p) => p,
            None => return Ok(Settings::default()),
        },
    };
    let raw = fs::read_to_string(&path)?;
    let settings: Settings = serde_json::from_str(&raw)
        .map_err(|e| DashboardError::Config(format!("{}: {}", path.display(), e)))?;
    debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}
