//! Multiverse configuration.

use rhizome_verse_automata::RuleSet;
use rhizome_verse_dna::AnalyzerConfig;
use rhizome_verse_history::DEFAULT_CAPACITY;
use rhizome_verse_serde::MAX_CELLS;
use tracing::warn;

use crate::error::MultiverseError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Settings applied to every universe a [`Multiverse`](crate::Multiverse)
/// creates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MultiverseConfig {
    /// Grid width of fresh universes.
    pub width: usize,
    /// Grid height of fresh universes.
    pub height: usize,
    /// Snapshots kept per universe.
    pub history_capacity: usize,
    /// Rule given to fresh universes.
    pub rules: RuleSet,
    /// Pattern analyzer tuning.
    pub analyzer: AnalyzerConfig,
}

impl Default for MultiverseConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            history_capacity: DEFAULT_CAPACITY,
            rules: RuleSet::life(),
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl MultiverseConfig {
    /// Creates config for a specific grid size.
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Sets the per-universe history capacity.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Sets the rule for fresh universes.
    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Build config from environment variables, falling back to defaults.
    ///
    /// Reads `VERSE_WIDTH`, `VERSE_HEIGHT`, `VERSE_HISTORY_CAPACITY`,
    /// `VERSE_RULE`, `VERSE_STABILITY_WINDOW` and `VERSE_VARIANCE_DIVISOR`.
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        override_from(&lookup, "VERSE_WIDTH", &mut cfg.width);
        override_from(&lookup, "VERSE_HEIGHT", &mut cfg.height);
        override_from(&lookup, "VERSE_HISTORY_CAPACITY", &mut cfg.history_capacity);
        override_from(&lookup, "VERSE_RULE", &mut cfg.rules);
        override_from(
            &lookup,
            "VERSE_STABILITY_WINDOW",
            &mut cfg.analyzer.stability_window,
        );
        override_from(
            &lookup,
            "VERSE_VARIANCE_DIVISOR",
            &mut cfg.analyzer.variance_divisor,
        );
        cfg
    }

    /// Checks that the config can describe a universe.
    ///
    /// Grids share the codec's [`MAX_CELLS`] limit, so every universe a
    /// multiverse creates can also be exported and imported again.
    pub fn validate(&self) -> Result<(), MultiverseError> {
        if self.width == 0 || self.height == 0 {
            return Err(MultiverseError::InvalidConfig(format!(
                "grid must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        match self.width.checked_mul(self.height) {
            Some(area) if area <= MAX_CELLS => {}
            _ => {
                return Err(MultiverseError::InvalidConfig(format!(
                    "grid {}x{} exceeds {} cells",
                    self.width, self.height, MAX_CELLS
                )));
            }
        }
        if self.history_capacity == 0 {
            return Err(MultiverseError::InvalidConfig(
                "history capacity must be at least 1".to_string(),
            ));
        }
        let divisor = self.analyzer.variance_divisor;
        if divisor.is_nan() || divisor <= 0.0 {
            return Err(MultiverseError::InvalidConfig(format!(
                "variance divisor must be positive, got {}",
                self.analyzer.variance_divisor
            )));
        }
        Ok(())
    }
}

fn override_from<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    slot: &mut T,
) {
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(value) => *slot = value,
            Err(_) => warn!(key, value = %raw, "ignoring unparseable config value"),
        }
    }
}
