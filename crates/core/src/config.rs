//! Process-level class-loading settings.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that turns on verbose class-loading diagnostics.
pub const VERBOSE_CLASSLOADING_ENV: &str = "ARTISCOPE_LOG_VERBOSE_CLASSLOADING";

/// Per-user state directory (`~/.artiscope`).
pub fn artiscope_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".artiscope")
}

static GLOBAL: Lazy<ClassLoadingConfig> = Lazy::new(ClassLoadingConfig::from_env);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassLoadingConfig {
    /// Log every filter decision at `info` instead of `trace`.
    #[serde(default)]
    pub verbose_classloading: bool,
}

impl ClassLoadingConfig {
    pub fn verbose() -> Self {
        Self {
            verbose_classloading: true,
        }
    }

    pub fn from_env() -> Self {
        let verbose_classloading = std::env::var(VERBOSE_CLASSLOADING_ENV)
            .map(|value| parse_flag(&value))
            .unwrap_or(false);
        Self {
            verbose_classloading,
        }
    }

    /// Settings read once from the environment on first use.
    pub fn global() -> Self {
        *GLOBAL
    }
}

/// Truthy values: `true`, `1`, `yes`, `on` (case-insensitive, surrounding
/// whitespace ignored). Anything else is false.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" 1 "));
        assert!(parse_flag("yes"));
        assert!(parse_flag("On"));

        assert!(!parse_flag(""));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("verbose"));
    }

    #[test]
    fn test_default_is_quiet() {
        assert!(!ClassLoadingConfig::default().verbose_classloading);
        assert!(ClassLoadingConfig::verbose().verbose_classloading);
    }
}
