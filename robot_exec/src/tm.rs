//! Telemetry snapshot

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::BTreeMap;

use serde::Serialize;

use eqpt_if::{TelemetrySink, TmValue};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A telemetry sink which keeps the latest value of every key.
///
/// Serialisable so that snapshots can be archived in the session directory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TmRecord {
    /// Elapsed session time at which the record was last written.
    ///
    /// Units: seconds
    pub time_s: f64,

    values: BTreeMap<String, TmValue>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TmRecord {
    pub fn get(&self, key: &str) -> Option<&TmValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl TelemetrySink for TmRecord {
    fn put(&mut self, key: &str, value: TmValue) {
        self.values.insert(key.to_string(), value);
    }
}
