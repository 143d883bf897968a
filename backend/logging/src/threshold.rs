//! Threshold: which severities reach the sink.

use crate::error::{LogError, Result};
use crate::level::{self, SEVERITIES, Severity};
use daylog_config::{LevelSetting, ThresholdSetting};
use std::collections::BTreeSet;

/// Config number meaning "log nothing".
const NONE_CODE: i64 = 0;
/// Config number meaning "log everything".
const ALL_CODE: i64 = 99;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Threshold {
    /// Logging disabled.
    None,
    /// This severity and everything more severe.
    Cutoff(Severity),
    /// Exactly these severities.
    Only(BTreeSet<Severity>),
}

impl Threshold {
    pub fn all() -> Self {
        Threshold::Cutoff(Severity::Debug)
    }

    pub fn only(severities: impl IntoIterator<Item = Severity>) -> Self {
        Threshold::Only(severities.into_iter().collect())
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, Threshold::None)
    }

    /// The set of severities this threshold lets through.
    pub fn expand(&self) -> BTreeSet<Severity> {
        match self {
            Threshold::None => BTreeSet::new(),
            Threshold::Cutoff(cutoff) => SEVERITIES.into_iter().filter(|s| s >= cutoff).collect(),
            Threshold::Only(set) => set.clone(),
        }
    }

    pub fn allows(&self, severity: Severity) -> bool {
        match self {
            Threshold::None => false,
            Threshold::Cutoff(cutoff) => severity >= *cutoff,
            Threshold::Only(set) => set.contains(&severity),
        }
    }

    /// Interpret a `log_threshold` config value.
    ///
    /// Names are matched strictly here; a typo in config is an error rather
    /// than a silent NOTICE cutoff.
    pub fn from_setting(setting: &ThresholdSetting) -> Result<Self> {
        match setting {
            ThresholdSetting::Number(NONE_CODE) => Ok(Threshold::None),
            ThresholdSetting::Number(ALL_CODE) => Ok(Threshold::all()),
            ThresholdSetting::Number(n) => level::resolve(*n).map(Threshold::Cutoff),
            ThresholdSetting::Name(name) => match name.trim().to_ascii_lowercase().as_str() {
                "none" => Ok(Threshold::None),
                "all" => Ok(Threshold::all()),
                _ => strict_name(name).map(Threshold::Cutoff),
            },
            ThresholdSetting::List(items) => items
                .iter()
                .map(|item| match item {
                    LevelSetting::Number(n) => level::resolve(*n),
                    LevelSetting::Name(name) => strict_name(name),
                })
                .collect::<Result<BTreeSet<_>>>()
                .map(Threshold::Only),
        }
    }
}

fn strict_name(name: &str) -> Result<Severity> {
    Severity::from_name(name).ok_or_else(|| LogError::InvalidLevel(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_passes_equal_and_above() {
        for (i, low) in SEVERITIES.iter().enumerate() {
            for high in &SEVERITIES[i..] {
                let at_low = Threshold::Cutoff(*low);
                assert!(at_low.allows(*low));
                assert!(at_low.allows(*high));
                if high > low {
                    assert!(!Threshold::Cutoff(*high).allows(*low));
                }
            }
        }
    }

    #[test]
    fn explicit_set_is_returned_unchanged() {
        let t = Threshold::only([Severity::Debug, Severity::Error]);
        assert_eq!(
            t.expand().into_iter().collect::<Vec<_>>(),
            vec![Severity::Debug, Severity::Error]
        );
        assert!(!t.allows(Severity::Warning));
    }

    #[test]
    fn allows_agrees_with_expand() {
        let thresholds = [
            Threshold::None,
            Threshold::all(),
            Threshold::Cutoff(Severity::Critical),
            Threshold::only([Severity::Info, Severity::Emergency]),
            Threshold::only([]),
        ];
        for t in &thresholds {
            let expanded = t.expand();
            for s in SEVERITIES {
                assert_eq!(t.allows(s), expanded.contains(&s), "{t:?} {s}");
            }
        }
    }

    #[test]
    fn none_expands_to_empty() {
        assert!(Threshold::None.expand().is_empty());
        assert!(Threshold::None.is_disabled());
        assert!(!Threshold::only([]).is_disabled());
    }

    #[test]
    fn settings_sentinels() {
        assert_eq!(Threshold::from_setting(&ThresholdSetting::Number(0)).unwrap(), Threshold::None);
        assert_eq!(
            Threshold::from_setting(&ThresholdSetting::Name("NONE".into())).unwrap(),
            Threshold::None
        );
        assert_eq!(Threshold::from_setting(&ThresholdSetting::Number(99)).unwrap(), Threshold::all());
        assert_eq!(Threshold::all().expand().len(), SEVERITIES.len());
    }

    #[test]
    fn settings_cutoff_and_list() {
        assert_eq!(
            Threshold::from_setting(&ThresholdSetting::Name("warning".into())).unwrap(),
            Threshold::Cutoff(Severity::Warning)
        );
        assert_eq!(
            Threshold::from_setting(&ThresholdSetting::Number(1)).unwrap(),
            Threshold::Cutoff(Severity::Error)
        );
        let list = ThresholdSetting::List(vec![
            LevelSetting::Name("info".into()),
            LevelSetting::Number(550),
        ]);
        assert_eq!(
            Threshold::from_setting(&list).unwrap(),
            Threshold::only([Severity::Info, Severity::Alert])
        );
    }

    #[test]
    fn settings_reject_unknown_values() {
        assert!(matches!(
            Threshold::from_setting(&ThresholdSetting::Name("verbose".into())),
            Err(LogError::InvalidLevel(_))
        ));
        assert!(Threshold::from_setting(&ThresholdSetting::Number(150)).is_err());
        let list = ThresholdSetting::List(vec![LevelSetting::Name("loud".into())]);
        assert!(Threshold::from_setting(&list).is_err());
    }
}
