// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finboard::cache::DatasetCache;
use finboard::config::{self, Settings};
use finboard::error::DashboardError;
use finboard::models::Direction;
use finboard::sources::Sources;
use std::fs;
use std::rc::Rc;
use tempfile::tempdir;

#[test]
fn a_source_is_loaded_once_per_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.csv");
    fs::write(&path, "x").unwrap();

    let mut cache: DatasetCache<String> = DatasetCache::new();
    let first = cache
        .get_or_try_load(&path, |p| Ok(p.display().to_string()))
        .unwrap();
    let second = cache
        .get_or_try_load(&path, |_| panic!("loader must not run twice"))
        .unwrap();
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(cache.loads(), 1);

    // Same file through a different spelling of the path
    let dotted = dir.path().join(".").join("a.csv");
    cache
        .get_or_try_load(&dotted, |_| panic!("canonical path should hit"))
        .unwrap();
    assert_eq!(cache.len(), 1);
}

#[test]
fn failed_loads_are_not_cached() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("late.csv");
    let mut cache: DatasetCache<u32> = DatasetCache::new();

    let err = cache
        .get_or_try_load(&path, |p| {
            Err(DashboardError::MissingSource {
                path: p.to_path_buf(),
            })
        })
        .unwrap_err();
    assert!(err.is_section_fatal());
    assert!(cache.is_empty());

    let v = cache.get_or_try_load(&path, |_| Ok(7)).unwrap();
    assert_eq!(*v, 7);
    assert_eq!(cache.loads(), 1);
}

#[test]
fn sources_share_loaded_datasets_across_sections() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("despesas-anual.csv"),
        "Mês Ano Ref.,Valor\n1/2024,10\n",
    )
    .unwrap();
    let mut sources = Sources::new(Settings::default().with_data_dir(dir.path()));
    let a = sources.expenses().unwrap();
    let b = sources.expenses().unwrap();
    assert!(Rc::ptr_eq(&a, &b));
    assert_eq!(sources.loads(), 1);

    // A missing monthly file is an empty dataset, and that result is cached too
    let jan = sources.detail("jan", Direction::Income).unwrap();
    assert!(jan.is_empty());
    sources.detail("jan", Direction::Income).unwrap();
    assert_eq!(sources.loads(), 2);
}

#[test]
fn available_months_come_in_calendar_order() {
    let dir = tempdir().unwrap();
    let monthly = dir.path().join("mensal");
    fs::create_dir_all(&monthly).unwrap();
    for name in [
        "mar-entradas.csv",
        "jan-entradas.csv",
        "jan-saidas.csv",
        "xyz-entradas.csv",
        "dez-entradas.csv",
        "notas.txt",
    ] {
        fs::write(monthly.join(name), "Valor\n1\n").unwrap();
    }
    let sources = Sources::new(Settings::default().with_data_dir(dir.path()));
    assert_eq!(sources.available_months().unwrap(), vec!["jan", "mar", "dez"]);

    let empty = Sources::new(Settings::default().with_data_dir(dir.path().join("none")));
    assert!(empty.available_months().unwrap().is_empty());
}

#[test]
fn config_files_override_defaults_field_by_field() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("finboard.json");
    fs::write(
        &path,
        r#"{ "expense_file": "gastos.csv", "report_year": 2025 }"#,
    )
    .unwrap();
    let s = config::load(Some(&path)).unwrap();
    assert_eq!(s.expense_file, "gastos.csv");
    assert_eq!(s.report_year, Some(2025));
    assert_eq!(s.income_file, Settings::default().income_file);
    assert_eq!(
        s.monthly_path("fev", Direction::Expense),
        std::path::Path::new(".").join("mensal").join("fev-saidas.csv")
    );

    let missing = config::load(Some(&dir.path().join("nope.json"))).unwrap_err();
    assert!(matches!(missing, DashboardError::Config(_)));

    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        config::load(Some(&path)).unwrap_err(),
        DashboardError::Config(_)
    ));
}
