// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;
use thiserror::Error;

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Source file not found: {}", path.display())]
    MissingSource { path: PathBuf },

    #[error("Required column '{column}' missing in {source_name}")]
    MissingColumn { source_name: String, column: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    /// Errors that blank out one report section but leave the others usable.
    pub fn is_section_fatal(&self) -> bool {
        matches!(
            self,
            DashboardError::MissingSource { .. } | DashboardError::MissingColumn { .. }
        )
    }
}
