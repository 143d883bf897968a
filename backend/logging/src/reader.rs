//! Record reader
//!
//! Parses written lines back into records, for tooling that tails or
//! inspects the daily files. Header, blank and foreign lines yield `None`.
//! A record spanning several lines writes each extra line behind
//! [`CONTINUATION_PREFIX`], which no record line can start with.

use crate::level::Severity;
use chrono::NaiveDateTime;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const CONTINUATION_PREFIX: char = '\t';

static RECORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z]+) - (\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}) --> (.*)$").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedRecord {
    pub severity: Severity,
    pub timestamp: NaiveDateTime,
    /// `[METHOD - ]MESSAGE` as written.
    pub body: String,
}

pub fn parse_line(line: &str) -> Option<ParsedRecord> {
    let caps = RECORD_RE.captures(line.trim_end_matches(['\r', '\n']))?;
    let severity = Severity::from_name(&caps[1])?;
    let timestamp = NaiveDateTime::parse_from_str(&caps[2], TIMESTAMP_FORMAT).ok()?;
    Some(ParsedRecord {
        severity,
        timestamp,
        body: caps[3].to_string(),
    })
}

/// Parse a whole day file, folding continuation lines back into the body
/// of the record they belong to.
pub fn parse_records(contents: &str) -> Vec<ParsedRecord> {
    let mut records: Vec<ParsedRecord> = Vec::new();
    let mut open = false;
    for line in contents.lines() {
        if let Some(rest) = line.strip_prefix(CONTINUATION_PREFIX) {
            if let (true, Some(last)) = (open, records.last_mut()) {
                last.body.push('\n');
                last.body.push_str(rest);
            }
            continue;
        }
        match parse_line(line) {
            Some(record) => {
                records.push(record);
                open = true;
            }
            None => open = false,
        }
    }
    records
}
