//! Scaled-integer encoding: `raw = round(value × 10^scale)`.
//!
//! The scale is always taken from the market or currency that owns the
//! field. Nothing here assumes a default.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Power-of-ten exponent of a fixed-point field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Scale(u32);

impl Scale {
    pub const MAX: u32 = 28;

    pub fn new(exponent: u32) -> Result<Self> {
        if exponent > Self::MAX {
            return Err(Error::BadRequest(format!(
                "fixed-point scale {exponent} exceeds {}",
                Self::MAX
            )));
        }
        Ok(Scale(exponent))
    }

    pub fn exponent(self) -> u32 {
        self.0
    }

    fn factor(self) -> Decimal {
        Decimal::from_i128_with_scale(10i128.pow(self.0), 0)
    }
}

impl TryFrom<u32> for Scale {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        Scale::new(value)
    }
}

impl From<Scale> for u32 {
    fn from(scale: Scale) -> u32 {
        scale.0
    }
}

pub fn encode(value: Decimal, scale: Scale) -> Result<i64> {
    value
        .checked_mul(scale.factor())
        .map(|v| v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|v| v.to_i64())
        .ok_or_else(|| {
            Error::BadRequest(format!(
                "{value} does not fit a fixed-point integer at scale {}",
                scale.0
            ))
        })
}

pub fn decode(raw: i64, scale: Scale) -> Decimal {
    Decimal::from_i128_with_scale(raw as i128, scale.0).normalize()
}

/// Decode a raw field transmitted as a string or integer literal.
///
/// Returns `None` when the text is not numeric or the shifted value no
/// longer fits the decimal range.
pub fn decode_str(raw: &str, scale: Scale) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let mut value = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()?;
    let shifted = value.scale().checked_add(scale.0)?;
    value.set_scale(shifted).ok()?;
    Some(value.normalize())
}
