use std::path::Path;
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::eval::HeuristicConfig;
use crate::search::SearchMethod;

/// How an agent searches, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub method: SearchMethod,
    /// Iterative deepening when set, otherwise one search at `search_depth`.
    pub iterative: bool,
    pub search_depth: u32,
    /// Remaining time (ms) below which a running search is abandoned.
    pub timer_threshold_ms: u64,
    /// Deepest iteration to attempt; defaults to the number of board cells.
    pub max_depth: Option<u32>,
    pub heuristic: HeuristicConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            method: SearchMethod::Minimax,
            iterative: true,
            search_depth: 3,
            timer_threshold_ms: 10,
            max_depth: None,
            heuristic: HeuristicConfig::default(),
        }
    }
}

impl AgentConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AgentConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`AgentConfig::load`], but falls back to defaults when the file is missing.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn timer_threshold(&self) -> Duration {
        Duration::from_millis(self.timer_threshold_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_depth == 0 {
            return Err(ConfigError::Validation("search_depth must be > 0".into()));
        }
        if self.max_depth == Some(0) {
            return Err(ConfigError::Validation("max_depth must be > 0".into()));
        }
        // remaining time never drops below zero, so a zero threshold would never fire
        if self.timer_threshold_ms == 0 {
            return Err(ConfigError::Validation("timer_threshold_ms must be > 0".into()));
        }
        if let HeuristicConfig::Mobility(score) = &self.heuristic {
            if !score.early_weight.is_finite() || !score.late_weight.is_finite() {
                return Err(ConfigError::Validation(
                    "heuristic weights must be finite".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::MobilityScore;

    #[test]
    fn default_config_is_valid() {
        let config = AgentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timer_threshold(), Duration::from_millis(10));
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: AgentConfig = serde_json::from_str(
            r#"{ "method": "alphabeta", "iterative": false, "search_depth": 5 }"#,
        )
        .unwrap();
        assert_eq!(config.method, SearchMethod::AlphaBeta);
        assert!(!config.iterative);
        assert_eq!(config.search_depth, 5);
        assert_eq!(config.timer_threshold_ms, 10);
        assert_eq!(config.heuristic, HeuristicConfig::Mobility(MobilityScore::default()));
    }

    #[test]
    fn zero_depths_are_rejected() {
        let config = AgentConfig { search_depth: 0, ..AgentConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let config = AgentConfig { max_depth: Some(0), ..AgentConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let config = AgentConfig { timer_threshold_ms: 0, ..AgentConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn non_finite_weights_are_rejected() {
        let config = AgentConfig {
            heuristic: HeuristicConfig::Mobility(MobilityScore {
                early_weight: f64::NAN,
                ..MobilityScore::default()
            }),
            ..AgentConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AgentConfig::load_or_default(Path::new("does/not/exist.json")).unwrap();
        assert_eq!(config, AgentConfig::default());
    }

    #[test]
    fn unreadable_file_reports_path() {
        let err = AgentConfig::load(Path::new("does/not/exist.json")).unwrap_err();
        assert!(err.to_string().starts_with("failed to read config file does/not/exist.json"));
    }
}
