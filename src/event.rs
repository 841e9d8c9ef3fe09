//! Profiler trace events
//!
//! An instrumented solver emits one document per experiment instance. Each
//! document lists timestamped `enter`/`exit` events, one pair per method
//! invocation:
//!
//! ```json
//! {
//!   "instanceId": "inst-10",
//!   "timeData": [
//!     {"when": 1000, "enter": true,  "clazz": "X", "method": "solve"},
//!     {"when": 6000, "enter": false, "clazz": "X", "method": "solve"}
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Separator between class and method in a qualified name
pub const QUALIFIER: &str = "::";

/// A single enter/exit event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Timestamp in nanoseconds
    #[serde(rename = "when")]
    pub timestamp: i64,
    /// `true` on method entry, `false` on method exit
    #[serde(rename = "enter")]
    pub is_enter: bool,
    #[serde(rename = "clazz")]
    pub class_name: String,
    #[serde(rename = "method")]
    pub method_name: String,
}

impl Event {
    pub fn enter(timestamp: i64, class_name: &str, method_name: &str) -> Self {
        Self {
            timestamp,
            is_enter: true,
            class_name: class_name.to_string(),
            method_name: method_name.to_string(),
        }
    }

    pub fn exit(timestamp: i64, class_name: &str, method_name: &str) -> Self {
        Self {
            timestamp,
            is_enter: false,
            class_name: class_name.to_string(),
            method_name: method_name.to_string(),
        }
    }

    /// `Class::method`
    pub fn qualified_name(&self) -> String {
        format!("{}{}{}", self.class_name, QUALIFIER, self.method_name)
    }
}

/// All events recorded for one experiment instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceDocument {
    #[serde(rename = "instanceId")]
    pub instance_id: String,
    #[serde(rename = "timeData", default)]
    pub time_data: Vec<Event>,
}

impl TraceDocument {
    pub fn new(instance_id: impl Into<String>, time_data: Vec<Event>) -> Self {
        Self {
            instance_id: instance_id.into(),
            time_data,
        }
    }

    /// Parse a profiler document from JSON text
    pub fn from_json_str(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }
}
