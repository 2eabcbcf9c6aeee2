// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finboard::error::DashboardError;
use finboard::loader::{load_detail, load_detail_from_reader, load_expenses, load_expenses_from_reader};
use finboard::models::Period;
use rust_decimal::Decimal;
use std::str::FromStr;
use tempfile::tempdir;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

const EXPENSES: &str = "\
Mês Ano Ref.,Centro de Custo,Especificação,Valor,Observação
1/2024,Obras,Cimento,\"1.234,50\",compra à vista
2/2024,Pessoal,Salário,900,
13-2024,Obras,Areia,abc,
,,Sem período,10,
";

#[test]
fn expenses_parse_brazilian_amounts_and_periods() {
    let ds = load_expenses_from_reader("despesas.csv", EXPENSES.as_bytes()).unwrap();
    assert_eq!(ds.len(), 4);
    assert!(ds.capabilities.cost_center);
    assert!(ds.capabilities.note);
    assert!(!ds.capabilities.date);

    let first = &ds.records[0];
    assert_eq!(first.period, Period::new(1, 2024));
    assert_eq!(first.amount, dec("1234.50"));
    assert_eq!(first.cost_center.as_deref(), Some("Obras"));
    assert_eq!(first.note.as_deref(), Some("compra à vista"));

    // Blank note is absent, not an empty string
    assert_eq!(ds.records[1].note, None);
}

#[test]
fn malformed_periods_and_amounts_are_absorbed_and_counted() {
    let ds = load_expenses_from_reader("despesas.csv", EXPENSES.as_bytes()).unwrap();
    assert_eq!(ds.records[2].period, Period::UNKNOWN);
    assert_eq!(ds.records[2].amount, Decimal::ZERO);
    assert_eq!(ds.records[3].period, Period::UNKNOWN);
    assert_eq!(ds.records[3].cost_center, None);
    assert_eq!(ds.diagnostics.unknown_periods, 2);
    assert_eq!(ds.diagnostics.coerced_amounts, 1);
}

#[test]
fn dot_decimal_amounts_with_comma_grouping_keep_their_value() {
    let csv = "Mês Ano Ref.,Valor\n1/2024,\"1,234.50\"\n2/2024,\"1,2.5\"\n";
    let ds = load_expenses_from_reader("despesas.csv", csv.as_bytes()).unwrap();
    assert_eq!(ds.records[0].amount, dec("1234.50"));
    assert_eq!(ds.records[1].amount, Decimal::ZERO);
    assert_eq!(ds.diagnostics.coerced_amounts, 1);
}

#[test]
fn headers_match_despite_bom_and_case() {
    let csv = "\u{feff}mês ano ref., VALOR \n3/2025,42\n";
    let ds = load_expenses_from_reader("x.csv", csv.as_bytes()).unwrap();
    assert_eq!(ds.records[0].period, Period::new(3, 2025));
    assert_eq!(ds.records[0].amount, dec("42"));
    assert!(!ds.capabilities.cost_center);
}

#[test]
fn missing_amount_column_is_a_missing_column_error() {
    let csv = "Mês Ano Ref.,Centro de Custo\n1/2024,Obras\n";
    let err = load_expenses_from_reader("x.csv", csv.as_bytes()).unwrap_err();
    match err {
        DashboardError::MissingColumn { column, .. } => assert_eq!(column, "Valor"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_expense_file_is_a_missing_source_error() {
    let dir = tempdir().unwrap();
    let err = load_expenses(&dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, DashboardError::MissingSource { .. }));
    assert!(err.is_section_fatal());
}

#[test]
fn missing_monthly_file_is_an_empty_dataset() {
    let dir = tempdir().unwrap();
    let ds = load_detail(&dir.path().join("jan-entradas.csv")).unwrap();
    assert!(ds.is_empty());
    assert_eq!(ds.source, "jan-entradas.csv");
}

#[test]
fn detail_rows_take_their_period_from_the_date() {
    let csv = "\
Data Lançamento,Especificação,Centro de Custo,Valor,Fornecedor,Forma de Pagamento
2024-03-05 10:30:00,Cimento,Obras,\"R$ 150,00\",Loja A,PIX
05/03/2024,Areia,Obras,50,,Boleto
ontem,Tijolo,Obras,20,,
";
    let ds = load_detail_from_reader("mar-saidas.csv", csv.as_bytes()).unwrap();
    assert_eq!(ds.len(), 3);
    assert!(ds.capabilities.date);
    assert!(ds.capabilities.vendor);
    assert!(!ds.capabilities.person);

    let d = chrono::NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    assert_eq!(ds.records[0].date, Some(d));
    assert_eq!(ds.records[1].date, Some(d));
    assert_eq!(ds.records[0].period, Period::new(3, 2024));
    assert_eq!(ds.records[0].amount, dec("150.00"));
    assert_eq!(ds.records[0].vendor.as_deref(), Some("Loja A"));
    assert_eq!(ds.records[1].vendor, None);

    assert_eq!(ds.records[2].date, None);
    assert_eq!(ds.diagnostics.unparsed_dates, 1);
    assert_eq!(ds.diagnostics.unknown_periods, 1);
}

#[test]
fn detail_without_date_column_does_not_count_unknown_periods() {
    let csv = "Especificação,Valor\nAluguel,1000\n";
    let ds = load_detail_from_reader("abr-entradas.csv", csv.as_bytes()).unwrap();
    assert!(!ds.capabilities.date);
    assert!(ds.diagnostics.is_clean());
}
