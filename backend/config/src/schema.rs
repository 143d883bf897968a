//! daylog configuration schema.
//!
//! Keys follow the flat layout the logging facade reads at bootstrap:
//! `log_path`, `log_threshold`, `log_extension`, `profiling` and the nested
//! `file.chmod.{folders,files}` permission bits.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for the logging facade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Root directory of the dated log tree
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<String>,

    /// Which severities get written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_threshold: Option<ThresholdSetting>,

    /// File extension of the daily log files (without the dot)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_extension: Option<String>,

    /// Mirror every call into the profiling tap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiling: Option<bool>,

    /// Filesystem settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileConfig>,
}

// ---------------------------------------------------------------------------
// Threshold
// ---------------------------------------------------------------------------

/// Raw `log_threshold` value as written in the config file.
///
/// A scalar is a cutoff ("this severity and everything above"), a list is an
/// explicit set. `0`/`"none"` disables logging, `99`/`"all"` enables every
/// severity. Interpretation of the scalars happens in the facade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThresholdSetting {
    Number(i64),
    Name(String),
    List(Vec<LevelSetting>),
}

/// One entry of an explicit threshold list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelSetting {
    Number(i64),
    Name(String),
}

// ---------------------------------------------------------------------------
// Filesystem
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chmod: Option<ChmodConfig>,
}

/// Permission bits applied to directories and files the sink creates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChmodConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folders: Option<ModeSetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<ModeSetting>,
}

/// Permission bits, either as an integer (`511`, YAML `0o777`) or as an
/// octal string (`"0777"`, `"755"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModeSetting {
    Bits(u32),
    Octal(String),
}

impl ModeSetting {
    /// Numeric mode, or `None` when the octal string does not parse.
    pub fn bits(&self) -> Option<u32> {
        match self {
            ModeSetting::Bits(bits) => Some(*bits),
            ModeSetting::Octal(s) => {
                let digits = s.trim().trim_start_matches("0o");
                u32::from_str_radix(digits, 8).ok()
            }
        }
    }
}

impl LogConfig {
    /// Folder permission bits, if configured and parseable.
    pub fn folder_mode(&self) -> Option<u32> {
        self.chmod().and_then(|c| c.folders.as_ref()).and_then(ModeSetting::bits)
    }

    /// File permission bits, if configured and parseable.
    pub fn file_mode(&self) -> Option<u32> {
        self.chmod().and_then(|c| c.files.as_ref()).and_then(ModeSetting::bits)
    }

    fn chmod(&self) -> Option<&ChmodConfig> {
        self.file.as_ref().and_then(|f| f.chmod.as_ref())
    }
}
