/* snaptr - translates Rudderstack/Segment events into Snap Pixel commands
 * Copyright (C) 2023 Withings
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published
 * by the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>. */

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::prelude::*;
use serde_json::Value;

lazy_static! {
    /// Longest decimal number at the start of a string, exponent included
    static ref LEADING_NUMBER: Regex = Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").unwrap();
}

/// Reads a monetary value strictly: numbers as they are, strings only if they are a number as a whole
///
/// Surrounding whitespace is ignored, so `" 12.5 "` reads as 12.5 but
/// `"12.5 EUR"` and `"1,000"` read as None.
pub fn parse_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    amount.filter(|a| a.is_finite())
}

/// Reads an order total leniently, the way the analytics facades read revenue
///
/// Dollar signs are dropped and the number the string starts with is
/// used, so `"$12.5"` and `"12.5 EUR"` both read as 12.5.
pub fn parse_order_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned = s.replace('$', "");
            LEADING_NUMBER.find(cleaned.trim_start())
                .and_then(|m| m.as_str().parse::<f64>().ok())
        },
        _ => None,
    };
    amount.filter(|a| a.is_finite())
}

/// Renders an amount with two decimals, ties rounded away from zero
///
/// The rounding works on the exact binary value: 0.125 is a tie and
/// gives "0.13", 1.005 is slightly below the tie and gives "1.00".
pub fn format_amount(amount: f64) -> String {
    /* no "-0.00" */
    let amount = if amount == 0.0 { 0.0 } else { amount };
    match Decimal::from_f64_retain(amount) {
        Some(exact) => {
            let rounded = exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            match rounded.is_zero() {
                true => String::from("0.00"),
                false => format!("{:.2}", rounded),
            }
        },
        /* too large for a Decimal */
        None => format!("{:.2}", amount),
    }
}

/// Formats a monetary property for the pixel: always two decimals, "0.00" if unreadable
pub fn format_revenue(value: Option<&Value>) -> String {
    format_amount(value.and_then(parse_amount).unwrap_or(0.0))
}

/// Formats the revenue of a completed order, read leniently
pub fn format_order_revenue(value: Option<&Value>) -> String {
    format_amount(value.and_then(parse_order_amount).unwrap_or(0.0))
}
