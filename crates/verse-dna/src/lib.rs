//! Pattern DNA: derived behaviour metrics for cellular universes.
//!
//! Three percentages describe a pattern's recent behaviour:
//!
//! - **symmetry**: how closely the top half mirrors the bottom half
//! - **stability**: how little the population has varied lately
//! - **entropy**: how many horizontal/vertical state boundaries exist
//!
//! [`classify`] turns them into a coarse [`Classification`].
//!
//! # Example
//!
//! ```
//! use rhizome_verse_automata::{Grid, patterns};
//! use rhizome_verse_dna::{AnalyzerConfig, Classification, PatternDna};
//!
//! let mut grid = Grid::new(12, 12);
//! grid.stamp(&patterns::BLOCK, 5, 5);
//!
//! let window = vec![&grid; 5];
//! let dna = PatternDna::analyze(&window, &AnalyzerConfig::default());
//! assert_eq!(dna.stability, 100.0);
//! assert_eq!(dna.classification, Classification::StillLife);
//! ```

use std::fmt;

use rhizome_verse_automata::Grid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tuning constants for the analyzer.
///
/// Both values are empirical; the defaults reproduce the reference
/// classification behaviour.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnalyzerConfig {
    /// Number of most recent generations whose populations feed stability.
    /// Fewer samples than this yield 100% stability.
    pub stability_window: usize,
    /// Population variance is divided by this before being subtracted from 100.
    pub variance_divisor: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            stability_window: 5,
            variance_divisor: 10.0,
        }
    }
}

/// Coarse behavioural class of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Classification {
    /// Population is essentially constant.
    StillLife,
    /// Fairly stable and mirror-symmetric.
    Oscillator,
    /// Unstable with many state boundaries.
    Chaotic,
    /// Moderately stable with few state boundaries.
    Spaceship,
    /// Nothing above matched.
    Unknown,
}

impl Classification {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Classification::StillLife => "Still Life",
            Classification::Oscillator => "Oscillator",
            Classification::Chaotic => "Chaotic",
            Classification::Spaceship => "Spaceship",
            Classification::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derived behaviour metrics, recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PatternDna {
    /// Percentage of mirrored cell pairs that agree.
    pub symmetry: f64,
    /// Percentage derived from recent population variance.
    pub stability: f64,
    /// Percentage of cells sitting on a state boundary.
    pub entropy: f64,
    /// Class derived from the three metrics.
    pub classification: Classification,
}

impl PatternDna {
    /// Builds DNA from the three metrics, classifying them.
    pub fn new(symmetry: f64, stability: f64, entropy: f64) -> Self {
        Self {
            symmetry,
            stability,
            entropy,
            classification: classify(symmetry, stability, entropy),
        }
    }

    /// Analyzes a window of generations, oldest first.
    ///
    /// The last grid is the current state; symmetry and entropy are taken
    /// from it, stability from the populations of the whole window. An empty
    /// window yields [`PatternDna::default`].
    pub fn analyze(window: &[&Grid], config: &AnalyzerConfig) -> Self {
        let Some(current) = window.last() else {
            return Self::default();
        };
        let populations: Vec<usize> = window.iter().map(|g| g.population()).collect();
        Self::new(
            symmetry(current),
            stability(&populations, config),
            entropy(current),
        )
    }
}

impl Default for PatternDna {
    fn default() -> Self {
        Self::new(100.0, 100.0, 0.0)
    }
}

/// Percentage of top-half cells equal to their vertical mirror.
///
/// Row `y` is compared with row `H - 1 - y` for every `y < H / 2`. A grid
/// with a single row has nothing to compare and is fully symmetric.
pub fn symmetry(grid: &Grid) -> f64 {
    let height = grid.height();
    let half = height / 2;
    if half == 0 {
        return 100.0;
    }

    let mut matching = 0usize;
    for y in 0..half {
        let top = grid.row(y);
        let bottom = grid.row(height - 1 - y);
        matching += top.iter().zip(bottom).filter(|(a, b)| a == b).count();
    }

    let compared = half * grid.width();
    matching as f64 / compared as f64 * 100.0
}

/// Stability from recent populations, newest last.
///
/// With fewer than `config.stability_window` samples the result is 100.
/// Otherwise it is `max(0, 100 - variance / config.variance_divisor)` over
/// the last `stability_window` populations.
pub fn stability(populations: &[usize], config: &AnalyzerConfig) -> f64 {
    let n = config.stability_window;
    if n == 0 || populations.len() < n {
        return 100.0;
    }

    let recent = &populations[populations.len() - n..];
    let mean = recent.iter().sum::<usize>() as f64 / n as f64;
    let variance = recent
        .iter()
        .map(|&p| {
            let d = p as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n as f64;

    (100.0 - variance / config.variance_divisor).clamp(0.0, 100.0)
}

/// Percentage of cells that differ from their right or bottom neighbour.
///
/// The last row and column are not sampled, so a grid one cell wide or tall
/// has zero entropy.
pub fn entropy(grid: &Grid) -> f64 {
    let (width, height) = grid.dimensions();
    if width < 2 || height < 2 {
        return 0.0;
    }

    let mut edges = 0usize;
    for y in 0..height - 1 {
        let row = grid.row(y);
        let below = grid.row(y + 1);
        for x in 0..width - 1 {
            if row[x] != row[x + 1] || row[x] != below[x] {
                edges += 1;
            }
        }
    }

    let compared = (width - 1) * (height - 1);
    edges as f64 / compared as f64 * 100.0
}

/// Classifies metrics; the first matching rule wins.
///
/// 1. stability > 80 → still life
/// 2. stability > 60 and symmetry > 60 → oscillator
/// 3. stability < 40 and entropy > 60 → chaotic
/// 4. stability > 50 and entropy < 40 → spaceship
/// 5. otherwise → unknown
pub fn classify(symmetry: f64, stability: f64, entropy: f64) -> Classification {
    if stability > 80.0 {
        Classification::StillLife
    } else if stability > 60.0 && symmetry > 60.0 {
        Classification::Oscillator
    } else if stability < 40.0 && entropy > 60.0 {
        Classification::Chaotic
    } else if stability > 50.0 && entropy < 40.0 {
        Classification::Spaceship
    } else {
        Classification::Unknown
    }
}
