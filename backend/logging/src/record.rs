//! One log line in the making.

use crate::error::Result;
use crate::level::{self, Severity};
use crate::reader::{CONTINUATION_PREFIX, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub severity: Severity,
    pub method: Option<String>,
    pub message: String,
}

impl LogRecord {
    /// An empty method label counts as no label.
    pub fn new(severity: Severity, message: impl Into<String>, method: Option<&str>) -> Self {
        Self {
            severity,
            method: method.filter(|m| !m.is_empty()).map(str::to_string),
            message: message.into(),
        }
    }

    /// `SEVERITY - YYYY-MM-DD HH:MM:SS --> [METHOD - ]MESSAGE`, no trailing
    /// newline. Embedded newlines are kept, each followed by
    /// [`CONTINUATION_PREFIX`] so the extra lines never parse as records.
    pub fn format(&self, at: &NaiveDateTime) -> Result<String> {
        let name = level::name_of(self.severity.value())?;
        let method = self
            .method
            .as_deref()
            .map(|m| format!("{m} - "))
            .unwrap_or_default();
        let body = format!("{method}{}", self.message)
            .replace('\n', &format!("\n{CONTINUATION_PREFIX}"));
        Ok(format!("{name} - {} --> {body}", at.format(TIMESTAMP_FORMAT)))
    }
}
