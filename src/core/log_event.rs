//! Log event structure and its JSON line encoding

use super::log_level::LogLevel;
use super::timestamp;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use serde_json::{Map, Value};

/// Extra key/value pairs merged at the top level of an event record
pub type Fields = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub timestamp: DateTime<FixedOffset>,
    pub level: LogLevel,
    pub message: String,
    pub fields: Fields,
}

impl LogEvent {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp::now(),
            level,
            message: message.into(),
            fields: Fields::new(),
        }
    }

    /// Attach caller data. Only data that serializes to a JSON object is kept;
    /// any other shape (strings, arrays, `()`, failed serialization) is ignored.
    pub fn with_data<D: Serialize>(mut self, data: D) -> Self {
        if let Ok(Value::Object(fields)) = serde_json::to_value(data) {
            self.fields = fields;
        }
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<FixedOffset>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Build the record in canonical order: timestamp, level, message, then
    /// caller fields. Caller keys that collide with the reserved ones replace
    /// their values in place.
    pub fn to_record(&self) -> Fields {
        let mut record = Fields::new();
        record.insert(
            "timestamp".to_string(),
            Value::String(timestamp::format_timestamp(&self.timestamp)),
        );
        record.insert(
            "level".to_string(),
            Value::String(self.level.as_str().to_string()),
        );
        record.insert("message".to_string(), Value::String(self.message.clone()));
        for (key, value) in &self.fields {
            record.insert(key.clone(), value.clone());
        }
        record
    }

    /// Encode as a single JSON line (without the trailing newline)
    pub fn to_json_line(&self) -> String {
        serde_json::to_string(&Value::Object(self.to_record())).unwrap_or_default()
    }
}
