// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finboard::aggregate::{
    BalanceStatus, LABEL_SPEC_TOP, MonthTotal, balance, by_cost_center, by_specification,
    compare_months, daily_totals, monthly_totals, percent, summarize, top_records, treemap,
    truncate_label,
};
use finboard::models::{Period, Record, month_name};
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn rec(month: u32, cc: Option<&str>, spec: Option<&str>, amount: &str) -> Record {
    let mut r = Record::new(Period::new(month, 2024), dec(amount));
    r.cost_center = cc.map(str::to_string);
    r.specification = spec.map(str::to_string);
    r
}

fn sample() -> Vec<Record> {
    vec![
        rec(1, Some("Obras"), Some("Cimento"), "100"),
        rec(1, Some("Pessoal"), Some("Salário"), "300"),
        rec(2, Some("Obras"), Some("Areia"), "50"),
        rec(2, None, Some("Avulso"), "25"),
        rec(3, Some("Obras"), Some("Cimento"), "25"),
    ]
}

#[test]
fn stats_of_an_empty_selection_are_zero() {
    let none: Vec<Record> = Vec::new();
    let s = summarize(&none);
    assert_eq!(s.count, 0);
    assert_eq!(s.sum, Decimal::ZERO);
    assert_eq!(s.mean, Decimal::ZERO);
    assert_eq!(s.max, Decimal::ZERO);
}

#[test]
fn summarize_reports_count_sum_mean_and_extrema() {
    let rows = sample();
    let s = summarize(&rows);
    assert_eq!(s.count, 5);
    assert_eq!(s.sum, dec("500"));
    assert_eq!(s.mean, dec("100"));
    assert_eq!(s.max, dec("300"));
    assert_eq!(s.min, dec("25"));
}

#[test]
fn group_sums_add_up_to_the_keyed_total() {
    let rows = sample();
    let groups = by_cost_center(&rows);
    let keyed: Decimal = rows
        .iter()
        .filter(|r| r.cost_center.is_some())
        .map(|r| r.amount)
        .sum();
    assert_eq!(groups.total(), keyed);
    assert_eq!(groups.len(), 2);
    let obras = groups.iter().find(|g| g.key == "Obras").unwrap();
    assert_eq!(obras.stats.count, 3);
    assert_eq!(obras.stats.sum, dec("175"));
}

#[test]
fn shares_sum_to_one_hundred() {
    let rows = vec![
        rec(1, Some("A"), None, "25"),
        rec(1, Some("B"), None, "25"),
        rec(1, Some("C"), None, "50"),
    ];
    let shares = by_cost_center(&rows).percent_of_total();
    let total: Decimal = shares.iter().map(|p| p.unwrap()).sum();
    assert_eq!(total, dec("100"));
}

#[test]
fn percent_rounds_half_even_and_guards_zero() {
    assert_eq!(percent(dec("1"), dec("3")), Some(dec("33.33")));
    assert_eq!(percent(dec("1"), dec("8")), Some(dec("12.50")));
    assert_eq!(percent(dec("0.00125"), dec("1")), Some(dec("0.12")));
    assert_eq!(percent(dec("5"), Decimal::ZERO), None);
}

#[test]
fn top_n_takes_the_largest_sums() {
    let rows = vec![
        rec(1, None, Some("A"), "30"),
        rec(1, None, Some("B"), "10"),
        rec(1, None, Some("C"), "50"),
    ];
    let top = by_specification(&rows).top(2);
    let keys: Vec<&str> = top.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["C", "A"]);
}

#[test]
fn equal_sums_rank_in_key_order() {
    let rows = vec![
        rec(1, None, Some("b"), "10"),
        rec(1, None, Some("c"), "5"),
        rec(1, None, Some("a"), "10"),
    ];
    let top = by_specification(&rows).top(3);
    let keys: Vec<&str> = top.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
}

#[test]
fn truncated_labels_do_not_merge_groups() {
    let prefix = "x".repeat(LABEL_SPEC_TOP);
    let first = format!("{}A", prefix);
    let second = format!("{}B", prefix);
    let rows = vec![
        rec(1, None, Some(&first), "20"),
        rec(1, None, Some(&second), "10"),
        rec(1, None, Some(&first), "5"),
    ];
    let groups = by_specification(&rows).top(10);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups.groups[0].key, first);
    assert_eq!(groups.groups[0].stats.sum, dec("25"));
    assert_eq!(groups.groups[1].key, second);
    assert_eq!(
        truncate_label(&groups.groups[0].key, LABEL_SPEC_TOP),
        truncate_label(&groups.groups[1].key, LABEL_SPEC_TOP)
    );
}

#[test]
fn month_names_outside_the_calendar_are_empty() {
    assert_eq!(month_name(1), "Janeiro");
    assert_eq!(month_name(0), "");
    assert_eq!(month_name(13), "");
}

#[test]
fn treemap_keeps_positive_pairs_only() {
    let mut rows = sample();
    rows.push(rec(4, Some("Obras"), Some("Estorno"), "-10"));
    let t = treemap(&rows);
    assert!(t.iter().all(|g| g.stats.sum > Decimal::ZERO));
    let cimento = t
        .iter()
        .find(|g| g.key == ("Obras".to_string(), "Cimento".to_string()))
        .unwrap();
    assert_eq!(cimento.stats.sum, dec("125"));
    // the row without a cost center has no cell
    assert!(t.iter().all(|g| g.key.1 != "Avulso"));
}

#[test]
fn monthly_totals_are_in_calendar_order_and_skip_unknown() {
    let mut rows = sample();
    rows.push(Record::new(Period::UNKNOWN, dec("999")));
    let months = monthly_totals(&rows);
    let got: Vec<(u32, &str, Decimal)> = months
        .iter()
        .map(|m| (m.month, m.month_name.as_str(), m.total))
        .collect();
    assert_eq!(
        got,
        vec![
            (1, "Janeiro", dec("400")),
            (2, "Fevereiro", dec("75")),
            (3, "Março", dec("25")),
        ]
    );
}

#[test]
fn month_comparison_fills_missing_sides_with_zero() {
    let mt = |month: u32, total: &str| MonthTotal {
        month,
        month_name: finboard::models::month_name(month).to_string(),
        total: dec(total),
    };
    let income = vec![mt(1, "1000"), mt(4, "200")];
    let expense = vec![mt(1, "400"), mt(2, "50")];
    let cmp = compare_months(&income, &expense);
    let got: Vec<(u32, Decimal, Decimal, Decimal)> = cmp
        .iter()
        .map(|m| (m.month, m.income, m.expense, m.balance))
        .collect();
    assert_eq!(
        got,
        vec![
            (1, dec("1000"), dec("400"), dec("600")),
            (2, Decimal::ZERO, dec("50"), dec("-50")),
            (4, dec("200"), Decimal::ZERO, dec("200")),
        ]
    );
}

#[test]
fn daily_totals_group_by_date() {
    let day = |d: u32| chrono::NaiveDate::from_ymd_opt(2024, 3, d);
    let mut a = rec(3, None, None, "10");
    a.date = day(2);
    let mut b = rec(3, None, None, "15");
    b.date = day(1);
    let mut c = rec(3, None, None, "5");
    c.date = day(2);
    let undated = rec(3, None, None, "99");
    let rows = vec![a, b, c, undated];
    let days = daily_totals(&rows);
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].date, day(1).unwrap());
    assert_eq!(days[0].total, dec("15"));
    assert_eq!(days[1].total, dec("15"));
}

#[test]
fn top_records_are_stable_on_ties() {
    let rows = vec![
        rec(1, None, Some("first"), "20"),
        rec(1, None, Some("big"), "90"),
        rec(1, None, Some("second"), "20"),
    ];
    let top: Vec<&str> = top_records(&rows, 3)
        .iter()
        .map(|r| r.specification.as_deref().unwrap())
        .collect();
    assert_eq!(top, vec!["big", "first", "second"]);
}

#[test]
fn labels_are_truncated_by_characters() {
    assert_eq!(truncate_label("Curto", 10), "Curto");
    assert_eq!(truncate_label("Manutenção predial", 10), "Manutenção...");
}

#[test]
fn balance_reports_surplus_and_deficit() {
    let b = balance(dec("1000"), dec("400"));
    assert_eq!(b.balance, dec("600"));
    assert_eq!(b.balance_pct_of_income, Some(dec("60.00")));
    assert_eq!(b.expense_pct_of_income, dec("40.00"));
    assert_eq!(b.status, BalanceStatus::Surplus);

    let d = balance(Decimal::ZERO, dec("50"));
    assert_eq!(d.status, BalanceStatus::Deficit);
    assert_eq!(d.balance_pct_of_income, None);
    assert_eq!(d.expense_pct_of_income, Decimal::ZERO);
}

#[test]
fn sums_saturate_instead_of_overflowing() {
    let mut huge = rec(1, Some("Obras"), Some("A"), "0");
    huge.amount = Decimal::MAX;
    let rows = vec![huge.clone(), huge];

    let stats = summarize(&rows);
    assert_eq!(stats.count, 2);
    assert_eq!(stats.sum, Decimal::MAX);
    assert_eq!(stats.max, Decimal::MAX);

    let groups = by_cost_center(&rows);
    assert_eq!(groups.total(), Decimal::MAX);
    assert_eq!(groups.percent_of_total(), vec![None]);
}

#[test]
fn out_of_range_shares_are_none() {
    assert_eq!(percent(Decimal::MAX, Decimal::ONE), None);

    let b = balance(Decimal::MAX, Decimal::MIN);
    assert_eq!(b.balance, Decimal::MAX);
    assert_eq!(b.balance_pct_of_income, None);
    assert_eq!(b.expense_pct_of_income, Decimal::ZERO);
    assert_eq!(b.status, BalanceStatus::Surplus);
}
