use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One currency's holdings. Once built through [`BalanceEntry::new`],
/// any two present figures determine the third: `total = free + used`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct BalanceEntry {
    pub free: Option<Decimal>,
    pub used: Option<Decimal>,
    pub total: Option<Decimal>,
}

impl BalanceEntry {
    pub fn new(free: Option<Decimal>, used: Option<Decimal>, total: Option<Decimal>) -> Self {
        let mut entry = BalanceEntry { free, used, total };
        match (entry.free, entry.used, entry.total) {
            (Some(free), Some(used), None) => entry.total = free.checked_add(used),
            (None, Some(used), Some(total)) => entry.free = total.checked_sub(used),
            (Some(free), None, Some(total)) => entry.used = total.checked_sub(free),
            _ => {}
        }
        entry
    }
}

/// Sum whichever parts are present; `None` only when none are.
///
/// Folds frozen, locked and margin-held sub-balances into `used`.
pub fn sum_present(parts: &[Option<Decimal>]) -> Option<Decimal> {
    parts
        .iter()
        .flatten()
        .try_fold(None::<Decimal>, |acc, v| match acc {
            None => Some(Some(*v)),
            Some(a) => a.checked_add(*v).map(Some),
        })
        .flatten()
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Balances {
    pub timestamp: Option<i64>,
    pub entries: BTreeMap<String, BalanceEntry>,
}

impl Balances {
    /// Add an entry. A repeated currency accumulates into the existing one.
    pub fn insert(&mut self, code: impl Into<String>, entry: BalanceEntry) {
        let code = code.into();
        match self.entries.get_mut(&code) {
            Some(existing) => {
                *existing = BalanceEntry::new(
                    sum_present(&[existing.free, entry.free]),
                    sum_present(&[existing.used, entry.used]),
                    sum_present(&[existing.total, entry.total]),
                );
            }
            None => {
                self.entries.insert(code, entry);
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<&BalanceEntry> {
        self.entries.get(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BalanceEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
