//! Amount formatting for ledgers and statements

use rust_decimal::{Decimal, RoundingStrategy};

/// Insert `separator` between every group of three digits
fn group_digits(digits: &str, separator: &str) -> String {
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push_str(&separator.chars().rev().collect::<String>());
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    result.chars().rev().collect()
}

/// Format a decimal amount with a fixed number of places and custom separators.
///
/// Rounds half away from zero, so `1.0005` at three places prints `1.001`.
pub fn format_amount(value: Decimal, places: u32, thousands_sep: &str, decimal_sep: &str) -> String {
    let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.*}", places as usize, rounded.abs());

    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_digits(int_part, thousands_sep));
    if let Some(frac) = frac_part {
        out.push_str(decimal_sep);
        out.push_str(frac);
    }
    out
}

/// Format a balance that may be blank when zero (statement debit/credit cells)
pub fn format_cell(value: Decimal, places: u32, thousands_sep: &str, decimal_sep: &str) -> String {
    if value.is_zero() {
        String::new()
    } else {
        format_amount(value, places, thousands_sep, decimal_sep)
    }
}
