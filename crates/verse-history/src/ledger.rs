//! Bounded FIFO of generation snapshots.

use std::collections::VecDeque;

use rhizome_verse_automata::Grid;
use tracing::trace;

use crate::error::HistoryError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default number of snapshots a ledger keeps.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Configuration for a history ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LedgerConfig {
    /// Maximum number of snapshots to keep. Values below 1 are treated as 1.
    pub capacity: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl LedgerConfig {
    /// Creates config with a specific limit.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }
}

/// Append-only, capacity-bounded sequence of grid snapshots.
///
/// Entry `i` of the ring holds generation `base + i`. Once `capacity`
/// snapshots are stored, each push evicts the oldest one in O(1) and moves
/// `base` forward, so generation numbers stay stable while the retained
/// window slides.
///
/// # Example
///
/// ```
/// use rhizome_verse_automata::Grid;
/// use rhizome_verse_history::HistoryLedger;
///
/// let mut ledger = HistoryLedger::new(2);
/// for _ in 0..3 {
///     ledger.push(Grid::new(4, 4));
/// }
///
/// assert_eq!(ledger.len(), 2);
/// assert_eq!(ledger.oldest_generation(), Some(1));
/// assert!(ledger.get(0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct HistoryLedger {
    /// Snapshots, oldest first.
    snapshots: VecDeque<Grid>,
    /// Generation of `snapshots[0]`.
    base: u64,
    /// Maximum number of snapshots.
    capacity: usize,
}

impl HistoryLedger {
    /// Creates an empty ledger whose first push is generation 0.
    pub fn new(capacity: usize) -> Self {
        Self::starting_at(0, capacity)
    }

    /// Creates an empty ledger from a config.
    pub fn with_config(config: LedgerConfig) -> Self {
        Self::new(config.capacity)
    }

    /// Creates an empty ledger whose first push is `generation`.
    pub fn starting_at(generation: u64, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            snapshots: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            base: generation,
            capacity,
        }
    }

    /// Appends a snapshot at [`next_generation`](Self::next_generation).
    ///
    /// If the ledger is full the oldest snapshot is evicted first and
    /// returned, so callers can reuse its buffer.
    pub fn push(&mut self, grid: Grid) -> Option<Grid> {
        let evicted = if self.snapshots.len() >= self.capacity {
            trace!(generation = self.base, "evicted oldest snapshot");
            self.base = self.base.saturating_add(1);
            let evicted = self.snapshots.pop_front();
            evicted
        } else {
            None
        };
        self.snapshots.push_back(grid);
        evicted
    }

    /// Returns the snapshot recorded for `generation`.
    pub fn get(&self, generation: u64) -> Result<&Grid, HistoryError> {
        generation
            .checked_sub(self.base)
            .and_then(|offset| usize::try_from(offset).ok())
            .and_then(|offset| self.snapshots.get(offset))
            .ok_or_else(|| self.out_of_range(generation))
    }

    /// Returns true if `generation` is retained.
    pub fn contains(&self, generation: u64) -> bool {
        self.get(generation).is_ok()
    }

    /// Builds the error for a generation outside the retained window.
    pub fn out_of_range(&self, generation: u64) -> HistoryError {
        HistoryError::OutOfRange {
            requested: generation,
            retained: self.oldest_generation().zip(self.newest_generation()),
        }
    }

    /// Returns the number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Returns the maximum number of snapshots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest retained generation.
    pub fn oldest_generation(&self) -> Option<u64> {
        (!self.is_empty()).then_some(self.base)
    }

    /// Newest retained generation.
    pub fn newest_generation(&self) -> Option<u64> {
        (!self.is_empty()).then(|| self.base.saturating_add(self.snapshots.len() as u64 - 1))
    }

    /// Generation the next [`push`](Self::push) will be recorded as.
    ///
    /// Saturates at `u64::MAX`.
    pub fn next_generation(&self) -> u64 {
        self.base.saturating_add(self.snapshots.len() as u64)
    }

    /// Iterates over `(generation, snapshot)` pairs, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (u64, &Grid)> + ExactSizeIterator {
        let base = self.base;
        self.snapshots
            .iter()
            .enumerate()
            .map(move |(i, grid)| (base.saturating_add(i as u64), grid))
    }

    /// Returns up to `n` snapshots recorded strictly before `generation`,
    /// oldest first.
    pub fn window_before(&self, generation: u64, n: usize) -> Vec<&Grid> {
        let end = generation
            .saturating_sub(self.base)
            .min(self.snapshots.len() as u64) as usize;
        let start = end.saturating_sub(n);
        self.snapshots.range(start..end).collect()
    }

    /// Discards every snapshot at or after `generation`.
    ///
    /// Afterwards [`next_generation`](Self::next_generation) equals
    /// `generation`. If `generation` is older than the retained window the
    /// ledger is emptied and rebased so the next push lands on `generation`.
    pub fn truncate_from(&mut self, generation: u64) {
        if generation <= self.base {
            if !self.snapshots.is_empty() {
                trace!(
                    from = generation,
                    dropped = self.snapshots.len(),
                    "cleared history tail"
                );
            }
            self.snapshots.clear();
            self.base = generation;
        } else {
            let keep = (generation - self.base).min(self.snapshots.len() as u64) as usize;
            if keep < self.snapshots.len() {
                trace!(
                    from = generation,
                    dropped = self.snapshots.len() - keep,
                    "truncated history tail"
                );
                self.snapshots.truncate(keep);
            }
        }
    }

    /// Clears all history, restarting at `generation`.
    pub fn reset(&mut self, generation: u64) {
        self.snapshots.clear();
        self.base = generation;
    }
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::with_config(LedgerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A grid whose population encodes `tag`, to tell snapshots apart.
    fn tagged(tag: usize) -> Grid {
        let mut grid = Grid::new(8, 8);
        for i in 0..tag.min(64) {
            grid.set(i % 8, i / 8, true);
        }
        grid
    }

    #[test]
    fn test_empty_ledger() {
        let ledger = HistoryLedger::default();
        assert!(ledger.is_empty());
        assert_eq!(ledger.capacity(), DEFAULT_CAPACITY);
        assert_eq!(ledger.oldest_generation(), None);
        assert_eq!(ledger.newest_generation(), None);
        assert_eq!(ledger.next_generation(), 0);
        assert!(matches!(
            ledger.get(0),
            Err(HistoryError::OutOfRange {
                requested: 0,
                retained: None
            })
        ));
    }

    #[test]
    fn test_push_and_get() {
        let mut ledger = HistoryLedger::new(10);
        for i in 0..5 {
            assert!(ledger.push(tagged(i)).is_none());
        }
        assert_eq!(ledger.len(), 5);
        assert_eq!(ledger.oldest_generation(), Some(0));
        assert_eq!(ledger.newest_generation(), Some(4));
        for i in 0..5 {
            assert_eq!(ledger.get(i as u64).unwrap().population(), i);
        }
        assert!(ledger.get(5).is_err());
    }

    #[test]
    fn test_capacity_evicts_fifo() {
        let capacity = 4;
        let k = 3;
        let mut ledger = HistoryLedger::new(capacity);
        let mut evicted = Vec::new();
        for i in 0..capacity + k {
            if let Some(old) = ledger.push(tagged(i)) {
                evicted.push(old.population());
            }
        }

        assert_eq!(ledger.len(), capacity);
        assert_eq!(evicted, vec![0, 1, 2]);
        assert_eq!(ledger.oldest_generation(), Some(k as u64));
        assert_eq!(ledger.newest_generation(), Some((capacity + k - 1) as u64));

        for generation in 0..k as u64 {
            assert_eq!(
                ledger.get(generation),
                Err(HistoryError::OutOfRange {
                    requested: generation,
                    retained: Some((3, 6)),
                })
            );
        }
        for generation in k..capacity + k {
            assert_eq!(ledger.get(generation as u64).unwrap().population(), generation);
        }
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut ledger = HistoryLedger::new(0);
        assert_eq!(ledger.capacity(), 1);
        ledger.push(tagged(1));
        ledger.push(tagged(2));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get(1).unwrap().population(), 2);
    }

    #[test]
    fn test_snapshots_are_independent_values() {
        let mut ledger = HistoryLedger::new(4);
        let mut live = tagged(3);
        ledger.push(live.clone());
        live.fill(true);
        assert_eq!(ledger.get(0).unwrap().population(), 3);
    }

    #[test]
    fn test_starting_at() {
        let mut ledger = HistoryLedger::starting_at(40, 8);
        assert_eq!(ledger.next_generation(), 40);
        ledger.push(tagged(1));
        assert_eq!(ledger.oldest_generation(), Some(40));
        assert!(ledger.get(0).is_err());
        assert!(ledger.get(40).is_ok());
    }

    #[test]
    fn test_truncate_from_middle() {
        let mut ledger = HistoryLedger::new(10);
        for i in 0..6 {
            ledger.push(tagged(i));
        }
        ledger.truncate_from(3);
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.next_generation(), 3);
        assert!(ledger.get(3).is_err());

        ledger.push(tagged(9));
        assert_eq!(ledger.get(3).unwrap().population(), 9);
    }

    #[test]
    fn test_truncate_past_end_is_noop() {
        let mut ledger = HistoryLedger::new(10);
        for i in 0..3 {
            ledger.push(tagged(i));
        }
        ledger.truncate_from(7);
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.next_generation(), 3);
    }

    #[test]
    fn test_truncate_before_window_rebases() {
        let mut ledger = HistoryLedger::new(3);
        for i in 0..6 {
            ledger.push(tagged(i));
        }
        assert_eq!(ledger.oldest_generation(), Some(3));

        ledger.truncate_from(2);
        assert!(ledger.is_empty());
        assert_eq!(ledger.next_generation(), 2);
    }

    #[test]
    fn test_generation_arithmetic_saturates() {
        let mut ledger = HistoryLedger::starting_at(u64::MAX - 1, 4);
        ledger.push(tagged(1));
        ledger.push(tagged(2));
        ledger.push(tagged(3));
        assert_eq!(ledger.newest_generation(), Some(u64::MAX));
        assert_eq!(ledger.next_generation(), u64::MAX);
        assert_eq!(ledger.get(u64::MAX - 1).unwrap().population(), 1);
        assert!(ledger.iter().all(|(generation, _)| generation >= u64::MAX - 1));
    }

    #[test]
    fn test_iter_reports_generations() {
        let mut ledger = HistoryLedger::new(2);
        for i in 0..4 {
            ledger.push(tagged(i));
        }
        let generations: Vec<u64> = ledger.iter().map(|(generation, _)| generation).collect();
        assert_eq!(generations, vec![2, 3]);
    }

    #[test]
    fn test_window_before() {
        let mut ledger = HistoryLedger::new(10);
        for i in 0..8 {
            ledger.push(tagged(i));
        }
        let window: Vec<usize> = ledger
            .window_before(6, 3)
            .iter()
            .map(|g| g.population())
            .collect();
        assert_eq!(window, vec![3, 4, 5]);

        // Asking past the end is clamped to what exists.
        assert_eq!(ledger.window_before(100, 2).len(), 2);
        // Nothing precedes the oldest entry.
        assert!(ledger.window_before(0, 5).is_empty());
    }
}
