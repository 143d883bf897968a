//! `daylog-config` — configuration source for the daylog logging facade.
//!
//! Provides:
//! - Typed config schema (`log_path`, `log_threshold`, `file.chmod.*`, `profiling`)
//! - YAML loading
//! - `${ENV_VAR}` substitution
//! - Default value application
//! - Structural validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use schema::{ChmodConfig, FileConfig, LevelSetting, LogConfig, ModeSetting, ThresholdSetting};
pub use io::{config_dir, config_file_path, load_config};
pub use env::{contains_env_var_reference, resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use defaults::apply_all_defaults;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::Path;

/// Load, apply env substitution, apply defaults to and validate a config file.
///
/// This is the main entry point for loading a config at runtime. Validation
/// warnings are logged; validation errors abort the load.
pub async fn load_and_prepare(path: &Path) -> Result<LogConfig> {
    let raw_config = load_config(path).await?;
    prepare(raw_config)
}

/// The synchronous half of [`load_and_prepare`], for configs built in memory.
pub fn prepare(raw_config: LogConfig) -> Result<LogConfig> {
    // Serialize to Value for env substitution.
    let value: Value =
        serde_json::to_value(&raw_config).context("Failed to serialize config for processing")?;

    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;

    let config: LogConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.into_iter().next() {
        bail!(first);
    }

    Ok(config)
}
