// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::DashboardResult;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

/// Identity of a source file: its canonical path when it resolves, else the path as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceId(PathBuf);

impl SourceId {
    pub fn of(path: &Path) -> Self {
        SourceId(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()))
    }
}

/// Loaded datasets keyed by source identity. Entries are written once and never invalidated.
/// Failed loads are not cached.
#[derive(Debug)]
pub struct DatasetCache<T> {
    entries: HashMap<SourceId, Rc<T>>,
    loads: usize,
}

impl<T> Default for DatasetCache<T> {
    fn default() -> Self {
        DatasetCache {
            entries: HashMap::new(),
            loads: 0,
        }
    }
}

impl<T> DatasetCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_try_load<F>(&mut self, path: &Path, load: F) -> DashboardResult<Rc<T>>
    where
        F: FnOnce(&Path) -> DashboardResult<T>,
    {
        match self.entries.entry(SourceId::of(path)) {
            Entry::Occupied(entry) => {
                debug!(path = %path.display(), "dataset cache hit");
                Ok(Rc::clone(entry.get()))
            }
            Entry::Vacant(entry) => {
                let loaded = Rc::new(load(path)?);
                self.loads += 1;
                debug!(path = %path.display(), "dataset cache populated");
                Ok(Rc::clone(entry.insert(loaded)))
            }
        }
    }

    /// Number of times a loader actually ran.
    pub fn loads(&self) -> usize {
        self.loads
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
