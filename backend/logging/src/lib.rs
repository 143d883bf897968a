//! Leveled logging facade with date-partitioned log files.
//!
//! Records are filtered against a configured threshold, formatted as
//! `SEVERITY - YYYY-MM-DD HH:MM:SS --> [METHOD - ]MESSAGE` and appended to
//! `<log_path>/<YYYY>/<MM>/<DD>.<ext>`.

mod macros;

pub mod caller;
pub mod diagnostics;
pub mod error;
pub mod level;
pub mod logger;
pub mod message;
pub mod reader;
pub mod record;
pub mod sink;
pub mod tap;
pub mod threshold;

pub use caller::{CallStack, Frame};
pub use diagnostics::init_diagnostics;
pub use error::{LogError, Result};
pub use level::{LegacyLevel, LevelSpec, Severity, resolve};
pub use logger::{Logger, bootstrap, global};
pub use message::{Debugged, LogArg, Loggable, flatten};
pub use reader::{ParsedRecord, parse_line, parse_records};
pub use record::LogRecord;
pub use sink::RotatingFileSink;
pub use tap::{MemoryTap, ProfilingTap, TracingTap};
pub use threshold::Threshold;
