//! Rounding of prices, amounts and costs to a market's precision increment.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{Error, Result};

/// How a value is brought onto a step grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Nearest step, ties away from zero.
    Round,
    /// Toward zero.
    Truncate,
}

/// Snap `value` onto the grid of multiples of `step`.
///
/// The result is normalized (no trailing zeros) so that re-rounding an
/// already rounded value is an identity.
pub fn round_to_step(value: Decimal, step: Decimal, mode: Rounding) -> Result<Decimal> {
    if step <= Decimal::ZERO {
        return Err(Error::BadRequest(format!(
            "precision step must be positive, got {step}"
        )));
    }
    let ticks = value
        .checked_div(step)
        .ok_or_else(|| Error::BadRequest(format!("{value} cannot be divided by step {step}")))?;
    let ticks = match mode {
        Rounding::Round => ticks.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        Rounding::Truncate => ticks.trunc(),
    };
    ticks
        .checked_mul(step)
        .map(|v| v.normalize())
        .ok_or_else(|| Error::BadRequest(format!("{value} overflows at step {step}")))
}

pub fn price_to_precision(price: Decimal, step: Decimal) -> Result<Decimal> {
    round_to_step(price, step, Rounding::Round)
}

/// Amounts are never rounded up: an order must not exceed what was asked for.
pub fn amount_to_precision(amount: Decimal, step: Decimal) -> Result<Decimal> {
    round_to_step(amount, step, Rounding::Truncate)
}

/// Costs truncate like amounts, so a notional never grows past what was asked.
pub fn cost_to_precision(cost: Decimal, step: Decimal) -> Result<Decimal> {
    round_to_step(cost, step, Rounding::Truncate)
}

/// Turn a digit count (`"4"`) into the increment it denotes (`0.0001`).
///
/// Negative counts give powers of ten above one. Returns `None` for
/// anything that is not an integer within the decimal range.
pub fn parse_precision(digits: &str) -> Option<Decimal> {
    let digits = digits.trim();
    let parsed = match i64::from_str(digits) {
        Ok(d) => d,
        Err(_) => {
            let d = Decimal::from_str(digits).ok()?;
            if !d.fract().is_zero() {
                return None;
            }
            d.to_i64()?
        }
    };
    digits_to_step(parsed)
}

pub fn digits_to_step(digits: i64) -> Option<Decimal> {
    match digits {
        0..=28 => Some(Decimal::new(1, digits as u32)),
        -28..=-1 => Some(Decimal::from_i128_with_scale(10i128.pow(digits.unsigned_abs() as u32), 0)),
        _ => None,
    }
}
