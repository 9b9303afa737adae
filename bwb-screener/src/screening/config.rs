//! Screener configuration.
//!
//! Loaded from TOML. Every key is optional; a missing bound means no
//! constraint, so an empty file screens nothing out.
//!
//! ```toml
//! top_n = 20
//! filter_stage = "before_scoring"
//!
//! [filter]
//! min_credit = 0.05
//! max_dte = 45
//! max_short_delta = 0.35
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::filter::FilterConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Where the range filter runs relative to payoff scoring.
///
/// The predicates never read payoff fields, so both stages produce the
/// same result; filtering first skips scoring discarded structures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterStage {
    #[default]
    BeforeScoring,
    AfterScoring,
}

/// Configuration for a screening run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerConfig {
    /// Range bounds applied to every candidate.
    pub filter: FilterConfig,
    /// Keep only the best N after ranking.
    pub top_n: Option<usize>,
    /// Filter before or after scoring.
    pub filter_stage: FilterStage,
}

impl ScreenerConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_bounds() {
        let config = ScreenerConfig::default();
        assert!(config.filter.is_unbounded());
        assert_eq!(config.top_n, None);
        assert_eq!(config.filter_stage, FilterStage::BeforeScoring);
    }

    #[test]
    fn test_empty_toml() {
        assert_eq!(
            ScreenerConfig::from_toml_str("").unwrap(),
            ScreenerConfig::default()
        );
    }

    #[test]
    fn test_parse_toml() {
        let config = ScreenerConfig::from_toml_str(
            r#"
            top_n = 20
            filter_stage = "after_scoring"

            [filter]
            min_credit = 0.05
            max_dte = 45
            max_short_delta = 0.35
            "#,
        )
        .unwrap();

        assert_eq!(config.top_n, Some(20));
        assert_eq!(config.filter_stage, FilterStage::AfterScoring);
        assert_eq!(config.filter.min_credit, Some(0.05));
        assert_eq!(config.filter.max_dte, Some(45));
        assert_eq!(config.filter.max_short_delta, Some(0.35));
        assert_eq!(config.filter.min_dte, None);
    }

    #[test]
    fn test_unknown_stage_rejected() {
        assert!(ScreenerConfig::from_toml_str(r#"filter_stage = "sometimes""#).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            ScreenerConfig::load("no/such/config.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
