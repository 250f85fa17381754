//! Engine configuration.
//!
//! Every knob has a default matching the deck builder's tuned values, and
//! a JSON file only needs to name the fields it overrides:
//!
//! ```json
//! { "matcher": { "maxSuggestions": 15 }, "cacheCapacity": 64 }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{DeckforgeError, DeckforgeResult};

/// Candidates scoring above this are not suggested.
pub const DEFAULT_MAX_SCORE: f64 = 0.6;
/// Length cap on merged suggestion lists.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 10;
/// Entries kept by the server's suggestion cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

pub const DEFAULT_FOUR_OF_WEIGHT: f64 = 0.4;
pub const DEFAULT_SIZE_BONUS: f64 = 0.3;
pub const DEFAULT_SIZE_RANGE: (u64, u64) = (60, 75);
pub const DEFAULT_CURVE_WEIGHT: f64 = 0.3;
pub const DEFAULT_CURVE_VARIANCE_DIVISOR: f64 = 100.0;

/// Fuzzy matcher tuning.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatcherConfig {
    /// Worst score still reported (inclusive).
    pub max_score: f64,
    /// Final cap applied after merging local and remote results.
    pub max_suggestions: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            max_score: DEFAULT_MAX_SCORE,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }
}

/// Consistency score weights.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatsConfig {
    pub four_of_weight: f64,
    pub size_bonus: f64,
    /// Inclusive deck-size window that earns `size_bonus`.
    pub size_range: (u64, u64),
    pub curve_weight: f64,
    pub curve_variance_divisor: f64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            four_of_weight: DEFAULT_FOUR_OF_WEIGHT,
            size_bonus: DEFAULT_SIZE_BONUS,
            size_range: DEFAULT_SIZE_RANGE,
            curve_weight: DEFAULT_CURVE_WEIGHT,
            curve_variance_divisor: DEFAULT_CURVE_VARIANCE_DIVISOR,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub matcher: MatcherConfig,
    pub stats: StatsConfig,
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            matcher: MatcherConfig::default(),
            stats: StatsConfig::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Parses a JSON config document.
    ///
    /// # Errors
    ///
    /// Returns [`DeckforgeError::Json`] if the document is malformed.
    pub fn from_json(text: &str) -> DeckforgeResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns [`DeckforgeError::Config`] if the file can't be read and
    /// [`DeckforgeError::Json`] if it can't be parsed.
    pub fn load(path: &Path) -> DeckforgeResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| DeckforgeError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}
