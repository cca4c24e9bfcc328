//! System parameters for mining and scoring.
//!
//! All knobs consumed by the core live here: the weighting coefficients,
//! the adaptive path-search bounds, and the mining thread count. Defaults
//! match the values the system was tuned with; a TOML file can override
//! any subset of them.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunable parameters for rule mining and weighting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Weighting coefficient for the covered-example ratio.
    pub alpha: f64,
    /// Weighting coefficient for the counter-example ratio.
    pub beta: f64,
    /// Dampening factor applied to counter-examples in the final weight.
    pub gamma: f64,
    /// Path length the local-graph search starts out allowing.
    pub initial_max_path_length: usize,
    /// Path length the search may grow to while no path has been found.
    pub absolute_max_path_length: usize,
    /// Hard ceiling on the adaptive growth of `absolute_max_path_length`.
    pub path_length_ceiling: usize,
    /// If probing a length finishes faster than this, the search is allowed
    /// to grow `absolute_max_path_length` by one.
    pub probe_timeout_ms: u64,
    /// Worker threads for parallel mining. `0` selects the rayon default.
    pub mining_threads: usize,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            beta: 0.9,
            gamma: 0.25,
            initial_max_path_length: 3,
            absolute_max_path_length: 8,
            path_length_ceiling: 100,
            probe_timeout_ms: 1_000,
            mining_threads: 0,
        }
    }
}

impl Parameters {
    /// Load parameters from a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// The probe timeout as a `Duration`.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}
