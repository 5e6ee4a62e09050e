//! # Telemetry sink
//!
//! Telemetry is write-only from the point of view of the control core, nothing
//! read back from the sink feeds into control.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A single telemetry value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TmValue {
    Number(f64),
    Bool(bool),
    String(String),
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A destination for named telemetry values, such as a dashboard.
pub trait TelemetrySink {
    /// Publish a value under the given key, replacing any previous value.
    fn put(&mut self, key: &str, value: TmValue);

    fn put_number(&mut self, key: &str, value: f64) {
        self.put(key, TmValue::Number(value))
    }

    fn put_bool(&mut self, key: &str, value: bool) {
        self.put(key, TmValue::Bool(value))
    }

    fn put_string(&mut self, key: &str, value: &str) {
        self.put(key, TmValue::String(value.to_string()))
    }
}
