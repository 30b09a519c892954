//! Ordered field resolution over raw exchange payloads.
//!
//! Exchanges report the same quantity under different keys depending on
//! the API generation or market kind that produced the payload. A
//! [`FieldChain`] lists those keys in priority order and resolves to the
//! first one that carries a value.
//!
//! An accessor is either a plain object key or, when it starts with `/`,
//! a JSON pointer (`/ticker/high`, `/3` for positional arrays).
//!
//! `null` and `""` count as absent. `0` and `"0"` are values.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldChain(&'static [&'static str]);

impl FieldChain {
    pub const fn new(keys: &'static [&'static str]) -> Self {
        FieldChain(keys)
    }

    pub fn keys(&self) -> &'static [&'static str] {
        self.0
    }

    /// First accessor that resolves to a present value, with that value.
    pub fn lookup<'a>(&self, obj: &'a Value) -> Option<(&'static str, &'a Value)> {
        self.0
            .iter()
            .find_map(|key| field(obj, key).map(|v| (*key, v)))
    }

    pub fn value<'a>(&self, obj: &'a Value) -> Option<&'a Value> {
        self.lookup(obj).map(|(_, v)| v)
    }

    pub fn string(&self, obj: &Value) -> Option<String> {
        self.value(obj).and_then(as_string)
    }

    pub fn decimal(&self, obj: &Value) -> Option<Decimal> {
        self.value(obj).and_then(as_decimal)
    }

    pub fn integer(&self, obj: &Value) -> Option<i64> {
        self.value(obj).and_then(as_integer)
    }
}

/// Resolve a single accessor, treating `null` and `""` as absent.
pub fn field<'a>(obj: &'a Value, key: &str) -> Option<&'a Value> {
    let found = if key.starts_with('/') {
        obj.pointer(key)
    } else {
        obj.get(key)
    };
    found.filter(|v| is_present(v))
}

pub fn string(obj: &Value, key: &str) -> Option<String> {
    field(obj, key).and_then(as_string)
}

pub fn decimal(obj: &Value, key: &str) -> Option<Decimal> {
    field(obj, key).and_then(as_decimal)
}

pub fn integer(obj: &Value, key: &str) -> Option<i64> {
    field(obj, key).and_then(as_integer)
}

pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

pub fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => parse_decimal(s),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                parse_decimal(&n.to_string())
            }
        }
        _ => None,
    }
}

pub fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            i64::from_str(s)
                .ok()
                .or_else(|| parse_decimal(s).and_then(|d| d.trunc().to_i64()))
        }
        _ => None,
    }
}

/// Parse plain (`"0.001"`) or scientific (`"1e-8"`) notation.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
        .map(|d| d.normalize())
}
