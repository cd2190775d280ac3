//! Log record structure

use super::error::Result;
use super::field_value::FieldValue;
use super::log_level::LogLevel;
use super::options::LogOption;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::panic::Location;

/// One structured logging event.
///
/// The message is fixed at creation. Timestamp, level and data are only
/// written by [`LogOption`]s, either at [`LogRecord::new`] or by the base
/// options of the [`Logger`](super::Logger) the record is handed to.
///
/// Field order matches the canonical JSON layout:
/// `created_at`, `level`, `message`, `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    level: Option<LogLevel>,
    message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    data: BTreeMap<String, FieldValue>,
    #[serde(skip)]
    call_site: Option<&'static Location<'static>>,
}

impl LogRecord {
    /// Create a record and apply `options` in order.
    ///
    /// The caller of this function is the frame that source-location options
    /// count their offset from.
    #[track_caller]
    pub fn new<I>(message: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = LogOption>,
    {
        let mut record = Self {
            created_at: None,
            level: None,
            message: message.into(),
            data: BTreeMap::new(),
            call_site: None,
        };
        let call_site = Location::caller();
        for option in options {
            record.apply(call_site, &option);
        }
        record
    }

    /// Apply one option on behalf of the code at `call_site`.
    pub(crate) fn apply(&mut self, call_site: &'static Location<'static>, option: &LogOption) {
        self.call_site = Some(call_site);
        option(self);
    }

    /// Parse a record from its canonical JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn level(&self) -> Option<LogLevel> {
        self.level
    }

    pub fn data(&self) -> &BTreeMap<String, FieldValue> {
        &self.data
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.data.get(key)
    }

    /// Location of the code currently applying options to this record
    pub fn call_site(&self) -> Option<&'static Location<'static>> {
        self.call_site
    }

    /// Set a data field; a later write to the same key wins.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn set_created_at(&mut self, created_at: DateTime<Utc>) {
        self.created_at = Some(created_at);
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.level = Some(level);
    }
}

// The call site is construction bookkeeping, not part of the event.
impl PartialEq for LogRecord {
    fn eq(&self, other: &Self) -> bool {
        self.created_at == other.created_at
            && self.level == other.level
            && self.message == other.message
            && self.data == other.data
    }
}
