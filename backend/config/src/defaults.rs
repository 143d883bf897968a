//! Config defaults: fills unset keys with the values the facade assumes.

use crate::schema::{ChmodConfig, FileConfig, LogConfig, ModeSetting, ThresholdSetting};

/// Default permission bits for created log directories.
pub const DEFAULT_FOLDER_MODE: u32 = 0o777;

/// Default permission bits for created log files.
pub const DEFAULT_FILE_MODE: u32 = 0o666;

/// Default extension of the daily files.
pub const DEFAULT_LOG_EXTENSION: &str = "log";

/// Default threshold: warnings and everything more severe.
pub const DEFAULT_THRESHOLD: &str = "warning";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: LogConfig) -> LogConfig {
    let config = apply_threshold_defaults(config);
    let config = apply_file_defaults(config);
    apply_misc_defaults(config)
}

fn apply_threshold_defaults(mut config: LogConfig) -> LogConfig {
    if config.log_threshold.is_none() {
        config.log_threshold = Some(ThresholdSetting::Name(DEFAULT_THRESHOLD.to_string()));
    }
    config
}

/// Ensure both chmod values are set.
fn apply_file_defaults(mut config: LogConfig) -> LogConfig {
    let file = config.file.get_or_insert_with(FileConfig::default);
    let chmod = file.chmod.get_or_insert_with(ChmodConfig::default);
    if chmod.folders.is_none() {
        chmod.folders = Some(ModeSetting::Bits(DEFAULT_FOLDER_MODE));
    }
    if chmod.files.is_none() {
        chmod.files = Some(ModeSetting::Bits(DEFAULT_FILE_MODE));
    }
    config
}

fn apply_misc_defaults(mut config: LogConfig) -> LogConfig {
    if config.log_extension.is_none() {
        config.log_extension = Some(DEFAULT_LOG_EXTENSION.to_string());
    }
    if config.profiling.is_none() {
        config.profiling = Some(false);
    }
    config
}
