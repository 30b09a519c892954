//! Exchange status strings classified into unified lifecycle states.

use serde::{Deserialize, Serialize};

/// Order lifecycle. `Open` covers partially filled orders; every other
/// state is terminal.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OrderState {
    Open,
    Closed,
    Canceled,
    Rejected,
    Expired,
}

impl OrderState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, OrderState::Open)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionState {
    Pending,
    Ok,
    Failed,
    Canceled,
}

/// A classified status, or the raw exchange value when no table entry
/// matched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Status<T> {
    Known(T),
    Unrecognized(String),
}

impl<T: Copy> Status<T> {
    pub fn known(&self) -> Option<T> {
        match self {
            Status::Known(state) => Some(*state),
            Status::Unrecognized(_) => None,
        }
    }
}

pub type OrderStatus = Status<OrderState>;
pub type TransactionStatus = Status<TransactionState>;

/// Static per-exchange status table.
#[derive(Debug, Clone, Copy)]
pub struct StatusMap<T: 'static>(&'static [(&'static str, T)]);

impl<T: Copy + 'static> StatusMap<T> {
    pub const fn new(entries: &'static [(&'static str, T)]) -> Self {
        StatusMap(entries)
    }

    pub fn entries(&self) -> &'static [(&'static str, T)] {
        self.0
    }

    pub fn get(&self, raw: &str) -> Option<T> {
        self.0
            .iter()
            .find(|(key, _)| *key == raw)
            .map(|(_, state)| *state)
    }

    /// Total classification: unknown values pass through unchanged.
    pub fn classify(&self, raw: &str) -> Status<T> {
        match self.get(raw) {
            Some(state) => Status::Known(state),
            None => {
                tracing::debug!(status = raw, "unrecognized status passed through");
                Status::Unrecognized(raw.to_string())
            }
        }
    }
}
