//! Memoized key material derived from configured secrets.
//!
//! Entries are keyed by the SHA-256 digest of the input so that raw
//! secrets never sit in the map as keys. Values are computed once per
//! distinct input and shared afterwards.

use std::sync::Arc;

use dashmap::DashMap;
use sha2::{Digest, Sha256};

#[derive(Debug, Default)]
pub struct DerivedKeyCache {
    entries: DashMap<String, Arc<str>>,
}

impl DerivedKeyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_derive<F>(&self, input: &str, derive: F) -> Arc<str>
    where
        F: FnOnce(&str) -> String,
    {
        let key = fingerprint(input);
        self.entries
            .entry(key)
            .or_insert_with(|| Arc::from(derive(input)))
            .value()
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn fingerprint(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}
