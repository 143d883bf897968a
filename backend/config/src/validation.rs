//! Config validation: structural checks with user-friendly error messages.
//!
//! Threshold values are interpreted (and rejected) by the facade when it
//! binds, since only it knows the severity table.

use crate::schema::{LogConfig, ModeSetting};
use thiserror::Error;

/// Highest permission value accepted for `file.chmod.*`.
const MAX_MODE: u32 = 0o7777;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &LogConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_log_path(config, &mut report);
    validate_extension(config, &mut report);
    validate_chmod(config, &mut report);
    report
}

fn validate_log_path(config: &LogConfig, report: &mut ValidationReport) {
    match config.log_path.as_deref().map(str::trim) {
        None | Some("") => report.error("log_path", "log_path is required"),
        Some(path) if !std::path::Path::new(path).is_absolute() => report.warn(
            "log_path",
            format!("'{path}' is relative; it resolves against the working directory"),
        ),
        Some(_) => {}
    }
}

fn validate_extension(config: &LogConfig, report: &mut ValidationReport) {
    let Some(ext) = &config.log_extension else { return };
    if ext.trim().is_empty() {
        report.error("log_extension", "log_extension cannot be empty");
    } else if ext.contains(['/', '\\']) {
        report.error("log_extension", format!("'{ext}' must not contain path separators"));
    } else if ext.starts_with('.') {
        report.warn("log_extension", "leading '.' is added automatically");
    }
}

fn validate_chmod(config: &LogConfig, report: &mut ValidationReport) {
    let Some(chmod) = config.file.as_ref().and_then(|f| f.chmod.as_ref()) else { return };
    check_mode("file.chmod.folders", chmod.folders.as_ref(), report);
    check_mode("file.chmod.files", chmod.files.as_ref(), report);
}

fn check_mode(path: &str, mode: Option<&ModeSetting>, report: &mut ValidationReport) {
    let Some(mode) = mode else { return };
    match mode.bits() {
        None => report.error(path, format!("{mode:?} is not an octal permission value")),
        Some(bits) if bits > MAX_MODE => {
            report.error(path, format!("{bits:#o} exceeds {MAX_MODE:#o}"))
        }
        Some(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ChmodConfig, FileConfig};

    fn with_path(path: &str) -> LogConfig {
        LogConfig {
            log_path: Some(path.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn minimal_config_is_valid() {
        let report = validate(&with_path("/var/log/app"));
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn missing_log_path_is_error() {
        let report = validate(&LogConfig::default());
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "log_path");
    }

    #[test]
    fn relative_log_path_warns() {
        let report = validate(&with_path("logs"));
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn extension_with_separator_is_error() {
        let mut cfg = with_path("/var/log/app");
        cfg.log_extension = Some("x/log".into());
        assert!(!validate(&cfg).is_valid());
    }

    #[test]
    fn oversized_mode_is_error() {
        let mut cfg = with_path("/var/log/app");
        cfg.file = Some(FileConfig {
            chmod: Some(ChmodConfig {
                folders: Some(ModeSetting::Bits(0o17777)),
                files: Some(ModeSetting::Octal("9".into())),
            }),
        });
        let report = validate(&cfg);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors.iter().any(|e| e.path == "file.chmod.files"));
    }
}
