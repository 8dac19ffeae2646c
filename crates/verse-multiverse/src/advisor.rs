//! Rule suggestion boundary.
//!
//! A [`RuleAdvisor`] turns a free-text intent into a [`RuleProposal`]. The
//! proposal is untrusted: its counts are plain integers and must pass
//! [`RuleProposal::validate`] before they can become a [`RuleSet`].
//! [`PresetAdvisor`] is an offline advisor that picks a known preset by
//! keyword.

use std::convert::Infallible;

use rhizome_verse_automata::{RuleError, RuleSet, rules};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A suggested rule, as returned by an advisor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuleProposal {
    /// Neighbor counts that give birth.
    pub birth: Vec<i64>,
    /// Neighbor counts under which a live cell survives.
    pub survival: Vec<i64>,
    /// Human-readable reasoning.
    pub explanation: String,
}

impl RuleProposal {
    /// Creates a proposal from a known-good rule.
    pub fn from_rules(rules: &RuleSet, explanation: impl Into<String>) -> Self {
        Self {
            birth: rules.birth.iter().map(i64::from).collect(),
            survival: rules.survival.iter().map(i64::from).collect(),
            explanation: explanation.into(),
        }
    }

    /// Checks every count is in `0..=8` and builds the rule.
    pub fn validate(&self) -> Result<RuleSet, RuleError> {
        RuleSet::from_untrusted(&self.birth, &self.survival)
    }
}

/// Proposes rules from a description of the desired behavior.
pub trait RuleAdvisor {
    /// Error produced when no proposal could be obtained.
    type Error;

    /// Suggests a rule for `intent`.
    fn propose_rule(&self, intent: &str) -> Result<RuleProposal, Self::Error>;
}

struct Hint {
    keywords: &'static [&'static str],
    rules: RuleSet,
    explanation: &'static str,
}

const HINTS: &[Hint] = &[
    Hint {
        keywords: &["maze", "labyrinth", "corridor"],
        rules: rules::MAZE,
        explanation: "B3/S12345 grows into maze-like corridors",
    },
    Hint {
        keywords: &["replicat", "copy", "copies"],
        rules: rules::REPLICATOR,
        explanation: "B1357/S1357 copies every pattern many times over",
    },
    Hint {
        keywords: &["highlife", "high life"],
        rules: rules::HIGH_LIFE,
        explanation: "B36/S23 is Life with a small self-replicator",
    },
    Hint {
        keywords: &["explo", "firework", "burst", "seed"],
        rules: rules::SEEDS,
        explanation: "B2/S has no survival, so every cell flashes once and patterns explode",
    },
    Hint {
        keywords: &["amoeba", "blob", "organic"],
        rules: rules::DIAMOEBA,
        explanation: "B35678/S5678 forms large amoeba-like blobs",
    },
    Hint {
        keywords: &["symmetr", "invert", "day", "night"],
        rules: rules::DAY_NIGHT,
        explanation: "B3678/S34678 behaves the same when live and dead cells are swapped",
    },
    Hint {
        keywords: &["immortal", "never die", "forever", "grow"],
        rules: rules::LIFE_WITHOUT_DEATH,
        explanation: "B3/S012345678 never kills a cell, so patterns only grow",
    },
    Hint {
        keywords: &["spaceship", "ship", "travel", "move"],
        rules: rules::MORLEY,
        explanation: "B368/S245 is rich in spaceships",
    },
    Hint {
        keywords: &["block", "split", "2x2"],
        rules: rules::TWO_BY_TWO,
        explanation: "B36/S125 builds everything from 2x2 blocks",
    },
    Hint {
        keywords: &["stable", "calm", "classic", "conway"],
        rules: rules::LIFE,
        explanation: "B3/S23 is Conway's Life, which settles into still lifes and oscillators",
    },
];

/// Offline advisor that maps keywords in the intent to preset rules.
///
/// Falls back to Conway's Life when nothing matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresetAdvisor;

impl PresetAdvisor {
    /// Creates the advisor.
    pub fn new() -> Self {
        Self
    }
}

impl RuleAdvisor for PresetAdvisor {
    type Error = Infallible;

    fn propose_rule(&self, intent: &str) -> Result<RuleProposal, Infallible> {
        let intent = intent.to_lowercase();
        let proposal = HINTS
            .iter()
            .find(|hint| hint.keywords.iter().any(|k| intent.contains(k)))
            .map(|hint| RuleProposal::from_rules(&hint.rules, hint.explanation))
            .unwrap_or_else(|| {
                RuleProposal::from_rules(
                    &rules::LIFE,
                    "B3/S23 is Conway's Life, balanced and well studied",
                )
            });
        Ok(proposal)
    }
}
