// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Brazilian-locale text for amounts, counts and shares.

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Groups an unsigned digit string in threes with `sep`.
fn group_thousands(digits: &str, sep: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

/// 1234.5 -> "R$ 1.234,50", -5.5 -> "R$ -5,50".
pub fn format_brl(v: Decimal) -> String {
    let rounded = v.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!(
        "R$ {}{},{}",
        if negative { "-" } else { "" },
        group_thousands(int_part, '.'),
        frac_part
    )
}

/// Floating input; NaN and infinities render as "R$ -" instead of panicking.
pub fn format_brl_f64(v: f64) -> String {
    match Decimal::from_f64(v) {
        Some(d) if v.is_finite() => format_brl(d),
        _ => "R$ -".to_string(),
    }
}

pub fn format_count(n: usize) -> String {
    group_thousands(&n.to_string(), '.')
}

/// Two decimals, e.g. "12.34%"; "N/A" when not applicable.
pub fn format_percent(p: Option<Decimal>) -> String {
    match p {
        Some(v) => format!("{:.2}%", v.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)),
        None => "N/A".to_string(),
    }
}

/// One decimal, e.g. "42.5%".
pub fn format_ratio(p: Decimal) -> String {
    format!("{:.1}%", p.round_dp_with_strategy(1, RoundingStrategy::MidpointNearestEven))
}

pub fn format_date(d: NaiveDate) -> String {
    d.format("%d/%m/%Y").to_string()
}

pub fn opt_text(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}
