//! Logger
//!
//! The orchestrator: holds the binding (sink + threshold), resolves levels,
//! filters, formats and hands lines to the sink. A `Logger` starts
//! uninitialized; [`Logger::init`] binds it and may be called again to
//! rebind, [`Logger::teardown`] unbinds it.

use crate::caller::{self, CallStack};
use crate::error::{LogError, Result};
use crate::level::{LevelSpec, Severity, resolve};
use crate::message::{self, LogArg};
use crate::record::LogRecord;
use crate::sink::{self, RotatingFileSink};
use crate::tap::{ProfilingTap, TracingTap};
use crate::threshold::Threshold;
use chrono::Local;
use daylog_config::{LogConfig, ModeSetting};
use once_cell::sync::Lazy;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

static GLOBAL: Lazy<Logger> = Lazy::new(Logger::new);

/// The process-wide logger. Uninitialized until someone binds it.
pub fn global() -> &'static Logger {
    &GLOBAL
}

/// Load the config file at `config_path` and bind the global logger to it.
pub async fn bootstrap(config_path: &Path) -> anyhow::Result<&'static Logger> {
    let config = daylog_config::load_and_prepare(config_path).await?;
    let logger = global();
    logger.init_from_config(&config)?;
    Ok(logger)
}

#[derive(Debug, Clone)]
struct Binding {
    sink: Arc<RotatingFileSink>,
    threshold: Threshold,
    profiling: bool,
}

#[derive(Default)]
pub struct Logger {
    binding: RwLock<Option<Arc<Binding>>>,
    tap: RwLock<Option<Arc<dyn ProfilingTap>>>,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a sink and threshold, replacing any previous binding.
    ///
    /// The profiling flag of a previous binding is carried over.
    pub fn init(&self, sink: RotatingFileSink, threshold: Threshold) {
        let profiling = self.current().map(|b| b.profiling).unwrap_or(false);
        self.bind(Binding {
            sink: Arc::new(sink),
            threshold,
            profiling,
        });
    }

    /// Bind from a prepared config.
    ///
    /// Turning profiling on without a tap installs a [`TracingTap`].
    pub fn init_from_config(&self, config: &LogConfig) -> Result<()> {
        let root = config
            .log_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| LogError::Config("log_path is required".to_string()))?;

        let threshold = match &config.log_threshold {
            Some(setting) => Threshold::from_setting(setting)?,
            None => Threshold::Cutoff(Severity::Warning),
        };

        let chmod = config.file.as_ref().and_then(|f| f.chmod.as_ref());
        let folder_mode = mode_or(
            chmod.and_then(|c| c.folders.as_ref()),
            sink::DEFAULT_FOLDER_MODE,
            "file.chmod.folders",
        )?;
        let file_mode = mode_or(
            chmod.and_then(|c| c.files.as_ref()),
            sink::DEFAULT_FILE_MODE,
            "file.chmod.files",
        )?;

        let sink = RotatingFileSink::new(root)
            .with_extension(config.log_extension.as_deref().unwrap_or(sink::DEFAULT_EXTENSION))
            .with_folder_mode(folder_mode)
            .with_file_mode(file_mode);

        let profiling = config.profiling.unwrap_or(false);
        if profiling && self.profiling_tap().is_none() {
            self.set_profiling_tap(Some(Arc::new(TracingTap)));
        }

        self.bind(Binding {
            sink: Arc::new(sink),
            threshold,
            profiling,
        });
        Ok(())
    }

    /// Drop the binding; later calls fail with `NotInitialized`.
    pub fn teardown(&self) {
        let previous = self
            .binding
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            info!("Logger unbound");
        }
    }

    pub fn is_ready(&self) -> bool {
        self.current().is_ok()
    }

    /// The bound sink.
    pub fn sink(&self) -> Result<Arc<RotatingFileSink>> {
        Ok(self.current()?.sink.clone())
    }

    pub fn threshold(&self) -> Result<Threshold> {
        Ok(self.current()?.threshold.clone())
    }

    /// Swap the threshold without touching the sink.
    pub fn set_threshold(&self, threshold: Threshold) -> Result<()> {
        self.update(|b| b.threshold = threshold)
    }

    pub fn set_profiling(&self, enabled: bool) -> Result<()> {
        self.update(|b| b.profiling = enabled)
    }

    pub fn set_profiling_tap(&self, tap: Option<Arc<dyn ProfilingTap>>) {
        *self.tap.write().unwrap_or_else(PoisonError::into_inner) = tap;
    }

    fn profiling_tap(&self) -> Option<Arc<dyn ProfilingTap>> {
        self.tap.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Log `message` at `level`.
    ///
    /// `Ok(false)` means the record was filtered out (or logging is
    /// disabled), `Ok(true)` that it was written.
    pub fn log(&self, level: impl Into<LevelSpec>, message: &str, method: Option<&str>) -> Result<bool> {
        let binding = self.current()?;

        if binding.threshold.is_disabled() {
            return Ok(false);
        }

        let severity = resolve(level)?;

        if binding.profiling {
            if let Some(tap) = self.profiling_tap() {
                tap.capture(&format!("{} - {message}", method.unwrap_or_default()));
            }
        }

        if !binding.threshold.allows(severity) {
            return Ok(false);
        }

        let now = Local::now();
        let line = LogRecord::new(severity, message, method).format(&now.naive_local())?;
        binding.sink.append(now.date_naive(), &line)?;
        Ok(true)
    }

    pub fn info(&self, message: &str, method: Option<&str>) -> Result<bool> {
        self.log(Severity::Info, message, method)
    }

    pub fn debug(&self, message: &str, method: Option<&str>) -> Result<bool> {
        self.log(Severity::Debug, message, method)
    }

    pub fn warning(&self, message: &str, method: Option<&str>) -> Result<bool> {
        self.log(Severity::Warning, message, method)
    }

    pub fn error(&self, message: &str, method: Option<&str>) -> Result<bool> {
        self.log(Severity::Error, message, method)
    }

    // Shorthand entry points; the `i!`/`d!`/`w!`/`e!` macros build the
    // call stack and arguments.

    pub fn i(&self, stack: &CallStack, args: &[LogArg]) -> Result<bool> {
        self.log_args(Severity::Info, stack, args)
    }

    pub fn d(&self, stack: &CallStack, args: &[LogArg]) -> Result<bool> {
        self.log_args(Severity::Debug, stack, args)
    }

    pub fn w(&self, stack: &CallStack, args: &[LogArg]) -> Result<bool> {
        self.log_args(Severity::Warning, stack, args)
    }

    pub fn e(&self, stack: &CallStack, args: &[LogArg]) -> Result<bool> {
        self.log_args(Severity::Error, stack, args)
    }

    fn log_args(&self, severity: Severity, stack: &CallStack, args: &[LogArg]) -> Result<bool> {
        let method = caller::label_for(stack);
        self.log(severity, &message::flatten(args), Some(&method))
    }

    fn current(&self) -> Result<Arc<Binding>> {
        self.binding
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(LogError::NotInitialized)
    }

    fn bind(&self, binding: Binding) {
        debug!(
            root = %binding.sink.root().display(),
            threshold = ?binding.threshold,
            profiling = binding.profiling,
            "Logger bound"
        );
        *self.binding.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(binding));
    }

    fn update(&self, f: impl FnOnce(&mut Binding)) -> Result<()> {
        let mut guard = self.binding.write().unwrap_or_else(PoisonError::into_inner);
        let current = guard.as_ref().ok_or(LogError::NotInitialized)?;
        let mut next = Binding::clone(current);
        f(&mut next);
        *guard = Some(Arc::new(next));
        Ok(())
    }
}

fn mode_or(setting: Option<&ModeSetting>, default: u32, key: &str) -> Result<u32> {
    match setting {
        None => Ok(default),
        Some(mode) => mode
            .bits()
            .ok_or_else(|| LogError::Config(format!("{key} is not an octal permission value"))),
    }
}
