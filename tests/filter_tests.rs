// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finboard::filter::{
    FilterSpec, SortOrder, TableQuery, View, cost_center_options, couple_income, filter,
    parse_limit, period_options,
};
use finboard::models::{Capabilities, Dataset, IncomeRecord, Period, Record};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

fn rec(month: u32, cc: Option<&str>, spec: &str, amount: i64) -> Record {
    let mut r = Record::new(Period::new(month, 2024), Decimal::from(amount));
    r.cost_center = cc.map(str::to_string);
    r.specification = Some(spec.to_string());
    r
}

fn expenses() -> Dataset<Record> {
    let mut noted = rec(2, Some("Pessoal"), "Salário", 900);
    noted.note = Some("Pagamento MENSAL".to_string());
    Dataset::new(
        "despesas.csv",
        Capabilities {
            period: true,
            cost_center: true,
            specification: true,
            note: true,
            ..Capabilities::default()
        },
        vec![
            rec(1, Some("Obras"), "Cimento", 100),
            noted,
            rec(1, None, "Avulso", 40),
            rec(3, Some("Obras"), "Areia", 250),
            Record::new(Period::UNKNOWN, Decimal::from(5)),
        ],
    )
}

fn income() -> Dataset<IncomeRecord> {
    let row = |category: &str, month: u32, amount: i64| IncomeRecord {
        category: category.to_string(),
        month,
        month_name: finboard::models::month_name(month).to_string(),
        amount: Decimal::from(amount),
    };
    Dataset::new(
        "receitas.csv",
        Capabilities::default(),
        vec![row("Aluguel", 1, 1000), row("Aluguel", 2, 1000), row("Vendas", 3, 300)],
    )
}

fn amounts(view: &View<'_>) -> Vec<i64> {
    view.iter().map(|r| r.amount.to_i64().unwrap()).collect()
}

#[test]
fn pass_all_spec_keeps_every_row() {
    let ds = expenses();
    let spec = FilterSpec::new();
    assert!(spec.is_pass_all());
    assert_eq!(filter(&ds, &spec).len(), ds.len());
}

#[test]
fn empty_include_set_means_no_restriction() {
    let ds = expenses();
    let spec = FilterSpec::new()
        .include_cost_centers(Vec::<String>::new())
        .include_periods(Vec::new())
        .search("   ");
    assert!(spec.is_pass_all());
    assert_eq!(filter(&ds, &spec).len(), ds.len());
}

#[test]
fn filtered_view_is_an_ordered_subset_and_filtering_is_idempotent() {
    let ds = expenses();
    let spec = FilterSpec::new()
        .include_cost_centers(["Obras", "Pessoal"])
        .amount_range(Some(Decimal::from(100)), None);
    let once = filter(&ds, &spec);
    assert_eq!(amounts(&once), vec![100, 900, 250]);
    assert!(once.iter().all(|r| ds.records.iter().any(|s| std::ptr::eq(r, s))));

    let twice = once.refine(&spec);
    assert_eq!(once, twice);
}

#[test]
fn include_rejects_rows_without_cost_center_and_exclude_keeps_them() {
    let ds = expenses();
    let inc = filter(&ds, &FilterSpec::new().include_cost_centers(["Obras"]));
    assert_eq!(amounts(&inc), vec![100, 250]);

    let exc = filter(&ds, &FilterSpec::new().exclude_cost_centers(["Obras"]));
    assert_eq!(amounts(&exc), vec![900, 40, 5]);
}

#[test]
fn period_and_amount_predicates_combine() {
    let ds = expenses();
    let spec = FilterSpec::new()
        .include_periods([Period::new(1, 2024)])
        .amount_range(Some(Decimal::from(40)), Some(Decimal::from(100)));
    assert_eq!(amounts(&filter(&ds, &spec)), vec![100, 40]);
}

#[test]
fn search_is_case_insensitive_over_text_fields() {
    let ds = expenses();
    let view = filter(&ds, &FilterSpec::new().search("mensal"));
    assert_eq!(amounts(&view), vec![900]);
    let view = filter(&ds, &FilterSpec::new().search("OBRAS"));
    assert_eq!(amounts(&view), vec![100, 250]);
}

#[test]
fn cost_center_filter_suppresses_income() {
    let inc = income();
    let spec = FilterSpec::new().exclude_cost_centers(["Obras"]);
    let view = couple_income(&inc, &spec);
    assert!(view.suppressed);
    assert!(view.rows.is_empty());
    assert_eq!(view.total(), Decimal::ZERO);
}

#[test]
fn period_filter_restricts_income_by_month() {
    let inc = income();
    let spec = FilterSpec::new().include_periods([Period::new(1, 2024), Period::new(3, 2024)]);
    let view = couple_income(&inc, &spec);
    assert!(!view.suppressed);
    assert_eq!(view.total(), Decimal::from(1300));

    let all = couple_income(&inc, &FilterSpec::new());
    assert_eq!(all.rows.len(), 3);
}

#[test]
fn table_query_filters_sorts_and_limits() {
    let ds = expenses();
    let view = View::all(&ds);
    let q = TableQuery {
        cost_center: Some("Obras".to_string()),
        sort: SortOrder::AmountDesc,
        ..TableQuery::default()
    };
    let page = q.run(&view);
    assert_eq!(page.rows.len(), 2);
    assert_eq!(page.rows[0].amount, Decimal::from(250));
    assert_eq!(page.available, 5);

    let q = TableQuery {
        sort: SortOrder::AmountAsc,
        limit: Some(2),
        ..TableQuery::default()
    };
    let page = q.run(&view);
    assert_eq!(page.matched, 5);
    let got: Vec<Decimal> = page.rows.iter().map(|r| r.amount).collect();
    assert_eq!(got, vec![Decimal::from(5), Decimal::from(40)]);
}

#[test]
fn period_sort_is_chronological() {
    let mut ds = expenses();
    ds.records.push(rec(11, Some("Obras"), "Brita", 1));
    ds.records.push(Record::new(Period::new(2, 2023), Decimal::from(2)));
    let page = TableQuery::default().run(&View::all(&ds));
    let periods: Vec<String> = page
        .rows
        .iter()
        .filter(|r| r.period.is_known())
        .map(|r| r.period.to_string())
        .collect();
    assert_eq!(
        periods,
        vec!["2/2023", "1/2024", "1/2024", "2/2024", "3/2024", "11/2024"]
    );
}

#[test]
fn sort_orders_parse_from_cli_names() {
    assert_eq!("amount-desc".parse::<SortOrder>(), Ok(SortOrder::AmountDesc));
    assert_eq!("Cost-Center".parse::<SortOrder>(), Ok(SortOrder::CostCenter));
    assert!("sideways".parse::<SortOrder>().is_err());
}

#[test]
fn limits_accept_numbers_and_all() {
    assert_eq!(parse_limit("all"), Ok(None));
    assert_eq!(parse_limit("Todos"), Ok(None));
    assert_eq!(parse_limit("25"), Ok(Some(25)));
    assert!(parse_limit("0").is_err());
    assert!(parse_limit("many").is_err());
}

#[test]
fn options_are_distinct_and_ordered() {
    let ds = expenses();
    assert_eq!(cost_center_options(&ds.records), vec!["Obras", "Pessoal"]);
    let periods: Vec<String> = period_options(&ds.records)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(periods, vec!["1/2024", "2/2024", "3/2024"]);
}
