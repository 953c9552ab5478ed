//! Engine configuration.
//!
//! Search depths, density and branching limits, and the evaluation
//! strategy. Loaded from JSON, with every field optional, or updated one
//! field at a time through `setoption`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::eval::Strategy;
use crate::resolve::DEFAULT_MAX_WAVES;

/// Errors from loading or updating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidValue { name: String, value: String },

    #[error("{0}")]
    OutOfRange(&'static str),
}

/// Tunables for move selection and search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Plies searched by the hard tier, counting the root placement.
    pub hard_depth: u32,
    /// Plies searched for hints; never below `hard_depth`.
    pub hint_depth: u32,
    /// Occupancy above which the search depth drops by one.
    pub dense_occupancy: f64,
    /// Candidate count above which deep search falls back to one ply.
    pub max_search_moves: usize,
    /// Cascade wave cap per placement.
    pub max_waves: usize,
    /// Evaluation strategy for the medium, hard and hint tiers.
    pub strategy: Strategy,
    /// How many top-scored cells the casual tier picks among.
    pub casual_pool: usize,
    /// Shuffle move lists before searching.
    pub shuffle_moves: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            hard_depth: 3,
            hint_depth: 4,
            dense_occupancy: 0.55,
            max_search_moves: 40,
            max_waves: DEFAULT_MAX_WAVES,
            strategy: Strategy::Baseline,
            casual_pool: 5,
            shuffle_moves: true,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON config. Missing fields take defaults.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hard_depth == 0 {
            return Err(ConfigError::OutOfRange("hard_depth must be at least 1"));
        }
        if self.hint_depth < self.hard_depth {
            return Err(ConfigError::OutOfRange("hint_depth must be at least hard_depth"));
        }
        if !(self.dense_occupancy > 0.0 && self.dense_occupancy <= 1.0) {
            return Err(ConfigError::OutOfRange("dense_occupancy must be in (0, 1]"));
        }
        if self.max_waves == 0 {
            return Err(ConfigError::OutOfRange("max_waves must be at least 1"));
        }
        if self.casual_pool == 0 {
            return Err(ConfigError::OutOfRange("casual_pool must be at least 1"));
        }
        Ok(())
    }

    /// Sets one field by its protocol name. The config is left unchanged
    /// if the new value fails validation.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        };
        let mut next = self.clone();
        match name {
            "HardDepth" => next.hard_depth = value.parse().map_err(|_| invalid())?,
            "HintDepth" => next.hint_depth = value.parse().map_err(|_| invalid())?,
            "DenseOccupancy" => next.dense_occupancy = value.parse().map_err(|_| invalid())?,
            "MaxSearchMoves" => next.max_search_moves = value.parse().map_err(|_| invalid())?,
            "MaxWaves" => next.max_waves = value.parse().map_err(|_| invalid())?,
            "Strategy" => next.strategy = Strategy::from_name(value).ok_or_else(invalid)?,
            "CasualPool" => next.casual_pool = value.parse().map_err(|_| invalid())?,
            "ShuffleMoves" => next.shuffle_moves = value.parse().map_err(|_| invalid())?,
            other => return Err(ConfigError::UnknownOption(other.to_string())),
        }
        next.validate()?;
        *self = next;
        Ok(())
    }
}
