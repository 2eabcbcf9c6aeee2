// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Period, month_for_key};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Once;

static PERIOD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{1,2})\s*/\s*(\d{4})\s*$").expect("period pattern"));

static TRACING_INIT: Once = Once::new();

/// Installs the global tracing subscriber once. `RUST_LOG` overrides the default level.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("finboard=warn"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

/// Parses "M/YYYY". Blank or malformed text is the unknown period, never an error.
pub fn parse_period(s: &str) -> Period {
    PERIOD_RE
        .captures(s)
        .and_then(|c| {
            let month = c[1].parse::<u32>().ok()?;
            let year = c[2].parse::<i32>().ok()?;
            Some(Period::new(month, year))
        })
        .unwrap_or(Period::UNKNOWN)
}

/// Strict variant for command-line input.
pub fn parse_period_arg(s: &str) -> Result<Period> {
    let p = parse_period(s);
    if !p.is_known() || !(1..=12).contains(&p.month) {
        anyhow::bail!("Invalid period '{}', expected M/YYYY", s);
    }
    Ok(p)
}

/// Accepts YYYY-MM-DD or DD/MM/YYYY, optionally followed by a time.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let day_part = s.split([' ', 'T']).next().unwrap_or("");
    if day_part.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(day_part, "%d/%m/%Y"))
        .ok()
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    parse_amount(s).with_context(|| format!("Invalid decimal '{}'", s))
}

/// Drops a thousands separator, requiring groups of exactly three digits after the first.
fn strip_grouping(int_part: &str, sep: char) -> Option<String> {
    let mut groups = int_part.split(sep);
    let head = groups.next()?;
    let head_digits = head.trim_start_matches(['-', '+']);
    if head_digits.is_empty() || head_digits.len() > 3 {
        return None;
    }
    let mut out = head.to_string();
    for g in groups {
        if g.len() != 3 || !g.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        out.push_str(g);
    }
    Some(out)
}

/// Lenient amount parser for spreadsheet cells: "1234.5", "1.234,50", "1,234.50", "R$ 10,00".
/// The last of `.` and `,` is the decimal separator when both appear; a lone
/// separator repeated is thousands grouping. Anything else is rejected.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) => {
            let (decimal, thousands) = if comma > dot { (comma, '.') } else { (dot, ',') };
            let int_part = strip_grouping(&cleaned[..decimal], thousands)?;
            format!("{}.{}", int_part, &cleaned[decimal + 1..])
        }
        (None, Some(_)) if cleaned.matches(',').count() > 1 => strip_grouping(&cleaned, ',')?,
        (None, Some(_)) => cleaned.replace(',', "."),
        (Some(_), None) if cleaned.matches('.').count() > 1 => strip_grouping(&cleaned, '.')?,
        _ => cleaned,
    };
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

pub fn parse_month_key(s: &str) -> Result<String> {
    let key = s.trim().to_lowercase();
    month_for_key(&key).with_context(|| format!("Invalid month '{}', expected jan..dez", s))?;
    Ok(key)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
