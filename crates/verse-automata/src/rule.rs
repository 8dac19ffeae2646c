use std::fmt;
use std::str::FromStr;

use crate::error::RuleError;
use crate::rng::SimpleRng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest Moore-neighbourhood count.
pub const MAX_NEIGHBORS: u8 = 8;

/// A set of neighbour counts in `0..=8`, stored as a 9-bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "Vec<u8>", try_from = "Vec<u8>"))]
pub struct NeighborSet(u16);

impl NeighborSet {
    const MASK: u16 = (1 << (MAX_NEIGHBORS + 1)) - 1;

    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Builds a set from a raw bit mask. Bits above 8 are dropped.
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits & Self::MASK)
    }

    /// Builds a set from counts, rejecting anything above 8.
    pub fn from_counts(counts: &[u8]) -> Result<Self, RuleError> {
        let mut set = Self::EMPTY;
        for &n in counts {
            if n > MAX_NEIGHBORS {
                return Err(RuleError::CountOutOfRange(n as i64));
            }
            set.insert(n);
        }
        Ok(set)
    }

    /// Builds a set from untrusted integers.
    pub fn from_untrusted(counts: &[i64]) -> Result<Self, RuleError> {
        let mut set = Self::EMPTY;
        for &n in counts {
            let n = u8::try_from(n)
                .ok()
                .filter(|&n| n <= MAX_NEIGHBORS)
                .ok_or(RuleError::CountOutOfRange(n))?;
            set.insert(n);
        }
        Ok(set)
    }

    /// Returns the raw bit mask.
    pub fn bits(self) -> u16 {
        self.0
    }

    /// Returns true if `n` is in the set.
    #[inline]
    pub fn contains(self, n: u8) -> bool {
        n <= MAX_NEIGHBORS && self.0 & (1 << n) != 0
    }

    /// Adds a count. Counts above 8 are ignored.
    pub fn insert(&mut self, n: u8) {
        if n <= MAX_NEIGHBORS {
            self.0 |= 1 << n;
        }
    }

    /// Removes a count.
    pub fn remove(&mut self, n: u8) {
        if n <= MAX_NEIGHBORS {
            self.0 &= !(1 << n);
        }
    }

    /// Flips membership of a count.
    pub fn flip(&mut self, n: u8) {
        if n <= MAX_NEIGHBORS {
            self.0 ^= 1 << n;
        }
    }

    /// Returns true if the set is empty.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the number of counts in the set.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates over members in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..=MAX_NEIGHBORS).filter(move |&n| self.contains(n))
    }
}

impl From<NeighborSet> for Vec<u8> {
    fn from(set: NeighborSet) -> Self {
        set.iter().collect()
    }
}

impl TryFrom<Vec<u8>> for NeighborSet {
    type Error = RuleError;

    fn try_from(counts: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_counts(&counts)
    }
}

impl fmt::Display for NeighborSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for n in self.iter() {
            write!(f, "{}", n)?;
        }
        Ok(())
    }
}

/// Birth/survival rule for a Life-like automaton.
///
/// A dead cell becomes alive when its live-neighbour count is in `birth`;
/// a live cell stays alive when its count is in `survival`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuleSet {
    /// Counts at which a dead cell is born.
    pub birth: NeighborSet,
    /// Counts at which a live cell survives.
    pub survival: NeighborSet,
}

impl RuleSet {
    /// Creates a rule from birth and survival counts.
    ///
    /// Counts above 8 are rejected with [`RuleError::CountOutOfRange`].
    pub fn new(birth: &[u8], survival: &[u8]) -> Result<Self, RuleError> {
        Ok(Self {
            birth: NeighborSet::from_counts(birth)?,
            survival: NeighborSet::from_counts(survival)?,
        })
    }

    /// Creates a rule from raw bit masks.
    pub const fn from_bits(birth: u16, survival: u16) -> Self {
        Self {
            birth: NeighborSet::from_bits(birth),
            survival: NeighborSet::from_bits(survival),
        }
    }

    /// Creates a rule from integers of unknown provenance.
    pub fn from_untrusted(birth: &[i64], survival: &[i64]) -> Result<Self, RuleError> {
        Ok(Self {
            birth: NeighborSet::from_untrusted(birth)?,
            survival: NeighborSet::from_untrusted(survival)?,
        })
    }

    /// Conway's Game of Life (B3/S23).
    pub const fn life() -> Self {
        rules::LIFE
    }

    /// Returns the next state of a cell.
    #[inline]
    pub fn next_state(&self, alive: bool, neighbors: u8) -> bool {
        if alive {
            self.survival.contains(neighbors)
        } else {
            self.birth.contains(neighbors)
        }
    }

    /// Returns a copy with one randomly chosen count flipped in either the
    /// birth or the survival set.
    ///
    /// Birth on zero neighbours is never introduced, since it floods an empty
    /// grid in a single step.
    pub fn mutate(&self, seed: u64) -> Self {
        let mut rng = SimpleRng::new(seed);
        let mut next = *self;
        if rng.next_bool() {
            let n = 1 + rng.next_below(MAX_NEIGHBORS as u64) as u8;
            next.birth.flip(n);
        } else {
            let n = rng.next_below(MAX_NEIGHBORS as u64 + 1) as u8;
            next.survival.flip(n);
        }
        next
    }

    /// Returns the preset name, if this rule is a known preset.
    pub fn preset_name(&self) -> Option<&'static str> {
        rules::ALL
            .iter()
            .find(|(_, rule)| rule == self)
            .map(|(name, _)| *name)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::life()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}/S{}", self.birth, self.survival)
    }
}

impl FromStr for RuleSet {
    type Err = RuleError;

    /// Parses `B3/S23` (any case, either order) or classic `23/3` (S/B).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (left, right) = s
            .split_once('/')
            .ok_or_else(|| RuleError::Malformed(format!("expected '/' in '{}'", s)))?;

        let (birth, survival) = match (tagged(left), tagged(right)) {
            (Some(('B', b)), Some(('S', s))) | (Some(('S', s)), Some(('B', b))) => (b, s),
            (None, None) => (right, left),
            _ => return Err(RuleError::Malformed(format!("unrecognized rule '{}'", s))),
        };

        Ok(Self {
            birth: parse_digits(birth)?,
            survival: parse_digits(survival)?,
        })
    }
}

/// Splits a leading `B`/`S` tag off a rule half.
fn tagged(part: &str) -> Option<(char, &str)> {
    let mut chars = part.chars();
    let tag = chars.next()?.to_ascii_uppercase();
    matches!(tag, 'B' | 'S').then(|| (tag, chars.as_str()))
}

fn parse_digits(digits: &str) -> Result<NeighborSet, RuleError> {
    let mut set = NeighborSet::EMPTY;
    for c in digits.chars() {
        let n = c
            .to_digit(10)
            .ok_or_else(|| RuleError::Malformed(format!("unexpected '{}' in rule", c)))?;
        if n > MAX_NEIGHBORS as u32 {
            return Err(RuleError::CountOutOfRange(n as i64));
        }
        set.insert(n as u8);
    }
    Ok(set)
}

/// Common Life-like rule presets.
pub mod rules {
    use super::RuleSet;

    const fn mask(counts: &[u8]) -> u16 {
        let mut bits = 0u16;
        let mut i = 0;
        while i < counts.len() {
            bits |= 1 << counts[i];
            i += 1;
        }
        bits
    }

    const fn rule(birth: &[u8], survival: &[u8]) -> RuleSet {
        RuleSet::from_bits(mask(birth), mask(survival))
    }

    /// Game of Life (B3/S23) - classic rules.
    pub const LIFE: RuleSet = rule(&[3], &[2, 3]);

    /// HighLife (B36/S23) - similar to Life but with a replicator.
    pub const HIGH_LIFE: RuleSet = rule(&[3, 6], &[2, 3]);

    /// Seeds (B2/S) - explosive growth, nothing survives.
    pub const SEEDS: RuleSet = rule(&[2], &[]);

    /// Day & Night (B3678/S34678) - symmetric under inversion.
    pub const DAY_NIGHT: RuleSet = rule(&[3, 6, 7, 8], &[3, 4, 6, 7, 8]);

    /// Maze (B3/S12345) - creates maze-like patterns.
    pub const MAZE: RuleSet = rule(&[3], &[1, 2, 3, 4, 5]);

    /// Diamoeba (B35678/S5678) - amoeba-like growth.
    pub const DIAMOEBA: RuleSet = rule(&[3, 5, 6, 7, 8], &[5, 6, 7, 8]);

    /// Replicator (B1357/S1357) - patterns replicate.
    pub const REPLICATOR: RuleSet = rule(&[1, 3, 5, 7], &[1, 3, 5, 7]);

    /// Life without Death (B3/S012345678) - nothing ever dies.
    pub const LIFE_WITHOUT_DEATH: RuleSet = rule(&[3], &[0, 1, 2, 3, 4, 5, 6, 7, 8]);

    /// 2x2 (B36/S125) - blocks that split and merge.
    pub const TWO_BY_TWO: RuleSet = rule(&[3, 6], &[1, 2, 5]);

    /// Morley (B368/S245) - rich in spaceships.
    pub const MORLEY: RuleSet = rule(&[3, 6, 8], &[2, 4, 5]);

    /// Every preset with its display name.
    pub const ALL: &[(&str, RuleSet)] = &[
        ("Life", LIFE),
        ("HighLife", HIGH_LIFE),
        ("Seeds", SEEDS),
        ("Day & Night", DAY_NIGHT),
        ("Maze", MAZE),
        ("Diamoeba", DIAMOEBA),
        ("Replicator", REPLICATOR),
        ("Life without Death", LIFE_WITHOUT_DEATH),
        ("2x2", TWO_BY_TWO),
        ("Morley", MORLEY),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_out_of_range() {
        assert_eq!(
            RuleSet::new(&[3, 9], &[2, 3]),
            Err(RuleError::CountOutOfRange(9))
        );
        assert!(RuleSet::new(&[0, 8], &[]).is_ok());
    }

    #[test]
    fn test_from_untrusted() {
        assert_eq!(
            RuleSet::from_untrusted(&[3], &[-1]),
            Err(RuleError::CountOutOfRange(-1))
        );
        assert_eq!(
            RuleSet::from_untrusted(&[300], &[]),
            Err(RuleError::CountOutOfRange(300))
        );
        assert_eq!(RuleSet::from_untrusted(&[3], &[2, 3]), Ok(rules::LIFE));
    }

    #[test]
    fn test_display() {
        assert_eq!(rules::LIFE.to_string(), "B3/S23");
        assert_eq!(rules::SEEDS.to_string(), "B2/S");
        assert_eq!(rules::DAY_NIGHT.to_string(), "B3678/S34678");
    }

    #[test]
    fn test_parse() {
        assert_eq!("B3/S23".parse::<RuleSet>(), Ok(rules::LIFE));
        assert_eq!("b36/s23".parse::<RuleSet>(), Ok(rules::HIGH_LIFE));
        assert_eq!("S23/B3".parse::<RuleSet>(), Ok(rules::LIFE));
        assert_eq!("23/3".parse::<RuleSet>(), Ok(rules::LIFE));
        assert_eq!("B2/S".parse::<RuleSet>(), Ok(rules::SEEDS));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "B3S23".parse::<RuleSet>(),
            Err(RuleError::Malformed(_))
        ));
        assert!(matches!(
            "B3/X23".parse::<RuleSet>(),
            Err(RuleError::Malformed(_))
        ));
        assert_eq!(
            "B39/S23".parse::<RuleSet>(),
            Err(RuleError::CountOutOfRange(9))
        );
    }

    #[test]
    fn test_display_parse_agree_on_presets() {
        for (name, rule) in rules::ALL {
            let parsed: RuleSet = rule.to_string().parse().unwrap();
            assert_eq!(&parsed, rule, "{}", name);
        }
    }

    #[test]
    fn test_next_state() {
        let life = RuleSet::life();
        assert!(life.next_state(false, 3));
        assert!(!life.next_state(false, 2));
        assert!(life.next_state(true, 2));
        assert!(!life.next_state(true, 4));
    }

    #[test]
    fn test_mutate_flips_one_count() {
        for seed in 0..64 {
            let mutated = rules::LIFE.mutate(seed);
            let diff = (mutated.birth.bits() ^ rules::LIFE.birth.bits()).count_ones()
                + (mutated.survival.bits() ^ rules::LIFE.survival.bits()).count_ones();
            assert_eq!(diff, 1, "seed {}", seed);
            assert!(!mutated.birth.contains(0));
        }
    }

    #[test]
    fn test_mutate_deterministic() {
        assert_eq!(rules::MAZE.mutate(42), rules::MAZE.mutate(42));
    }

    #[test]
    fn test_preset_name() {
        assert_eq!(rules::LIFE.preset_name(), Some("Life"));
        assert_eq!(RuleSet::from_bits(0b10, 0).preset_name(), None);
    }

    #[test]
    fn test_neighbor_set_iter() {
        let set = NeighborSet::from_counts(&[5, 1, 8]).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 5, 8]);
        assert_eq!(set.len(), 3);
        assert!(!set.contains(9));
    }
}
