//! Pricing engine: unit prices, product financials and money formatting.
//!
//! Everything here is pure. Malformed input never panics; it degrades to zero
//! the same way an empty form field does.

use serde::Serialize;

/// Number of flowers in the bulk unit the user buys.
pub const DOZEN: f64 = 12.0;

/// Parse a user-entered amount the way a numeric form field is read.
///
/// Leading whitespace is skipped and the longest numeric prefix is used, so
/// `"12.50 MXN"` reads as `12.5`. Returns `None` when no number starts the
/// input.
pub fn parse_amount(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Cost of a single flower given the price of a dozen.
///
/// Returns `0.0` for anything that is not a finite number greater than zero.
pub fn compute_unit_price(price_per_dozen: f64) -> f64 {
    if price_per_dozen.is_finite() && price_per_dozen > 0.0 {
        price_per_dozen / DOZEN
    } else {
        0.0
    }
}

/// [`compute_unit_price`] applied to raw form input.
pub fn unit_price_from_input(price_per_dozen: &str) -> f64 {
    parse_amount(price_per_dozen).map_or(0.0, compute_unit_price)
}

/// Derived cost figures for one product. Never stored, always recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Financials {
    pub total_flower_cost: f64,
    pub profit: f64,
    /// Profit as a percentage of the sale price
    pub profit_margin: f64,
}

impl Financials {
    /// Selling below flower cost. Still a valid result that must be shown.
    pub fn is_loss(&self) -> bool {
        self.profit < 0.0
    }
}

pub fn compute_financials(flower_quantity: f64, unit_price: f64, sale_price: f64) -> Financials {
    let total_flower_cost = flower_quantity * unit_price;
    let profit = sale_price - total_flower_cost;
    let profit_margin = if sale_price > 0.0 {
        profit / sale_price * 100.0
    } else {
        0.0
    };
    Financials {
        total_flower_cost,
        profit,
        profit_margin,
    }
}

/// Fixed two-decimal rendering with `,` thousands grouping: `1234.5` becomes
/// `"1,234.50"`. Independent of any locale database.
pub fn format_money(value: f64) -> String {
    if !value.is_finite() {
        return "0.00".to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    // -0.001 rounds to 0.00 and must not keep its sign
    let negative = value < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9'));
    format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        group_thousands(int_part),
        frac_part
    )
}

/// Money with a leading currency symbol, e.g. `"$1,200.00"`.
pub fn format_currency(symbol: &str, value: f64) -> String {
    format!("{}{}", symbol, format_money(value))
}

/// Margin with one decimal and a percent sign, e.g. `"76.0%"`.
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return "0.0%".to_string();
    }
    let s = format!("{:.1}", value);
    if s == "-0.0" {
        "0.0%".to_string()
    } else {
        format!("{}%", s)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
