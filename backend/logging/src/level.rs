//! Level registry
//!
//! The canonical severity table and the translation of legacy codes and
//! free-form names into it.

use crate::error::{LogError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical severity. Discriminants are the on-disk numeric values and
/// increase with severity, so the derived ordering is the severity ordering.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Debug = 100,
    Info = 200,
    Notice = 250,
    Warning = 300,
    Error = 400,
    Critical = 500,
    Alert = 550,
    Emergency = 600,
}

/// Every severity, least severe first.
pub const SEVERITIES: [Severity; 8] = [
    Severity::Debug,
    Severity::Info,
    Severity::Notice,
    Severity::Warning,
    Severity::Error,
    Severity::Critical,
    Severity::Alert,
    Severity::Emergency,
];

impl Severity {
    #[inline]
    pub const fn value(self) -> u16 {
        self as u16
    }

    pub const fn name(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Notice => "NOTICE",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
            Severity::Alert => "ALERT",
            Severity::Emergency => "EMERGENCY",
        }
    }

    /// Exact lookup by numeric value.
    pub fn from_value(value: u16) -> Option<Self> {
        SEVERITIES.into_iter().find(|s| s.value() == value)
    }

    /// Case-insensitive lookup by canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        SEVERITIES
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name of a raw severity value.
///
/// This is the check made at the formatting boundary; a value outside the
/// table yields `UnknownSeverity`.
pub fn name_of(value: u16) -> Result<&'static str> {
    Severity::from_value(value)
        .map(Severity::name)
        .ok_or(LogError::UnknownSeverity(value))
}

/// Level codes used by older call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyLevel {
    Error = 1,
    Warning = 2,
    Debug = 3,
    Info = 4,
}

impl LegacyLevel {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(LegacyLevel::Error),
            2 => Some(LegacyLevel::Warning),
            3 => Some(LegacyLevel::Debug),
            4 => Some(LegacyLevel::Info),
            _ => None,
        }
    }

    pub const fn severity(self) -> Severity {
        match self {
            LegacyLevel::Error => Severity::Error,
            LegacyLevel::Warning => Severity::Warning,
            LegacyLevel::Debug => Severity::Debug,
            LegacyLevel::Info => Severity::Info,
        }
    }
}

/// A level as handed in by a call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelSpec {
    Canonical(Severity),
    Legacy(LegacyLevel),
    /// A raw number: a legacy code or an exact severity value.
    Numeric(i64),
    /// A severity name, matched case-insensitively.
    Name(String),
}

impl From<Severity> for LevelSpec {
    fn from(s: Severity) -> Self {
        LevelSpec::Canonical(s)
    }
}

impl From<LegacyLevel> for LevelSpec {
    fn from(l: LegacyLevel) -> Self {
        LevelSpec::Legacy(l)
    }
}

impl From<i64> for LevelSpec {
    fn from(n: i64) -> Self {
        LevelSpec::Numeric(n)
    }
}

impl From<i32> for LevelSpec {
    fn from(n: i32) -> Self {
        LevelSpec::Numeric(n.into())
    }
}

impl From<u16> for LevelSpec {
    fn from(n: u16) -> Self {
        LevelSpec::Numeric(n.into())
    }
}

impl From<&str> for LevelSpec {
    fn from(s: &str) -> Self {
        LevelSpec::Name(s.to_string())
    }
}

impl From<String> for LevelSpec {
    fn from(s: String) -> Self {
        LevelSpec::Name(s)
    }
}

/// Resolve a call-site level to its canonical severity.
///
/// Unknown names become `NOTICE`. Unknown numbers are an `InvalidLevel`
/// error. Both paths go through the same final table check.
pub fn resolve(level: impl Into<LevelSpec>) -> Result<Severity> {
    let (candidate, shown) = match level.into() {
        LevelSpec::Canonical(s) => (i64::from(s.value()), s.name().to_string()),
        LevelSpec::Legacy(l) => (i64::from(l.severity().value()), format!("{l:?}")),
        LevelSpec::Numeric(n) => match LegacyLevel::from_code(n) {
            Some(l) => (i64::from(l.severity().value()), n.to_string()),
            None => (n, n.to_string()),
        },
        LevelSpec::Name(name) => {
            let s = Severity::from_name(&name).unwrap_or(Severity::Notice);
            (i64::from(s.value()), name)
        }
    };

    u16::try_from(candidate)
        .ok()
        .and_then(Severity::from_value)
        .ok_or(LogError::InvalidLevel(shown))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_increase_with_severity() {
        for pair in SEVERITIES.windows(2) {
            assert!(pair[0].value() < pair[1].value());
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn name_of_rejects_values_outside_table() {
        assert_eq!(name_of(550).unwrap(), "ALERT");
        assert!(matches!(name_of(150), Err(LogError::UnknownSeverity(150))));
    }

    #[test]
    fn legacy_code_name_and_value_agree() {
        let by_code = resolve(1).unwrap();
        assert_eq!(by_code, resolve("Error").unwrap());
        assert_eq!(by_code, resolve(400).unwrap());
        assert_eq!(by_code, resolve(LegacyLevel::Error).unwrap());
        assert_eq!(by_code, Severity::Error);
    }

    #[test]
    fn legacy_table() {
        assert_eq!(resolve(2).unwrap(), Severity::Warning);
        assert_eq!(resolve(3).unwrap(), Severity::Debug);
        assert_eq!(resolve(4).unwrap(), Severity::Info);
    }

    #[test]
    fn names_match_case_insensitively() {
        assert_eq!(resolve("critical").unwrap(), Severity::Critical);
        assert_eq!(resolve("Emergency").unwrap(), Severity::Emergency);
    }

    #[test]
    fn unknown_name_falls_back_to_notice() {
        assert_eq!(resolve("BANANA").unwrap(), Severity::Notice);
        assert_eq!(resolve("400").unwrap(), Severity::Notice);
    }

    #[test]
    fn unknown_number_is_invalid() {
        assert!(matches!(resolve(999), Err(LogError::InvalidLevel(s)) if s == "999"));
        assert!(matches!(resolve(-1), Err(LogError::InvalidLevel(_))));
        assert!(matches!(resolve(0), Err(LogError::InvalidLevel(_))));
    }

    #[test]
    fn serializes_as_name() {
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"WARNING\"");
    }
}
