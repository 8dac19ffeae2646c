//! A single universe: live grid, rule, generation counter and history.

use std::fmt;
use std::time::SystemTime;

use rhizome_verse_automata::{Grid, Pattern, RuleSet, Stepper, step_into};
use rhizome_verse_dna::{AnalyzerConfig, PatternDna};
use rhizome_verse_history::{HistoryError, HistoryLedger};
use rhizome_verse_serde::{DecodedUniverse, SerialUniverse};
use tracing::{debug, trace, warn};

use crate::sonify::SoundMetrics;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a universe within a [`Multiverse`](crate::Multiverse).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UniverseId(u32);

impl UniverseId {
    /// Wraps a raw id.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for UniverseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U{}", self.0)
    }
}

/// Descriptive data that does not affect evolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniverseMeta {
    /// Display name.
    pub name: String,
    /// When the universe was created.
    pub created_at: SystemTime,
    /// The universe this one was forked from.
    pub parent: Option<UniverseId>,
    /// Generation of the parent the fork was taken at.
    pub forked_at: Option<u64>,
}

impl UniverseMeta {
    fn new(name: String) -> Self {
        Self {
            name,
            created_at: SystemTime::now(),
            parent: None,
            forked_at: None,
        }
    }
}

/// Lifecycle state of a universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniverseState {
    /// Nothing recorded yet.
    Seeded,
    /// At least one generation has been recorded.
    Running,
}

/// A cellular universe with linear, scrubbable history.
///
/// The live grid is the authoritative state at [`generation`](Self::generation).
/// Each [`advance`](Self::advance) moves the live grid into the history
/// ledger and replaces it with the next generation.
///
/// Time travel via [`jump_to`](Self::jump_to) only reads the ledger, so the
/// timeline can be scrubbed back and forth freely. The first write after a
/// jump (an advance or any cell edit) discards every snapshot from the
/// current generation on, so history never branches inside one universe.
/// Divergent exploration goes through [`Multiverse::fork`](crate::Multiverse::fork).
///
/// # Example
///
/// ```
/// use rhizome_verse_automata::{Grid, RuleSet, patterns};
/// use rhizome_verse_multiverse::{Universe, UniverseId};
///
/// let mut grid = Grid::new(8, 8);
/// grid.stamp(&patterns::BLINKER, 2, 3);
/// let mut universe =
///     Universe::from_grid(UniverseId::new(1), "blinker", grid, RuleSet::life(), 100);
///
/// universe.advance_by(3);
/// universe.jump_to(1).unwrap();
/// assert_eq!(universe.generation(), 1);
/// assert!(universe.grid().get(3, 2));
/// ```
#[derive(Debug, Clone)]
pub struct Universe {
    id: UniverseId,
    meta: UniverseMeta,
    grid: Grid,
    rules: RuleSet,
    generation: u64,
    history: HistoryLedger,
    stepper: Stepper,
}

impl Universe {
    /// Creates an empty universe.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero.
    pub fn new(
        id: UniverseId,
        name: impl Into<String>,
        width: usize,
        height: usize,
        rules: RuleSet,
        history_capacity: usize,
    ) -> Self {
        Self::from_grid(id, name, Grid::new(width, height), rules, history_capacity)
    }

    /// Creates a universe seeded with `grid` at generation 0.
    pub fn from_grid(
        id: UniverseId,
        name: impl Into<String>,
        grid: Grid,
        rules: RuleSet,
        history_capacity: usize,
    ) -> Self {
        Self {
            id,
            meta: UniverseMeta::new(name.into()),
            grid,
            rules,
            generation: 0,
            history: HistoryLedger::new(history_capacity),
            stepper: Stepper::new(),
        }
    }

    /// Creates a universe from decoded data, resuming at its generation.
    pub fn from_decoded(id: UniverseId, decoded: DecodedUniverse, history_capacity: usize) -> Self {
        Self {
            id,
            meta: UniverseMeta::new(decoded.name),
            grid: decoded.grid,
            rules: decoded.rules,
            generation: decoded.generation,
            history: HistoryLedger::starting_at(decoded.generation, history_capacity),
            stepper: Stepper::new(),
        }
    }

    pub(crate) fn set_lineage(&mut self, parent: UniverseId, generation: u64) {
        self.meta.parent = Some(parent);
        self.meta.forked_at = Some(generation);
    }

    /// Returns the id.
    pub fn id(&self) -> UniverseId {
        self.id
    }

    /// Returns the metadata.
    pub fn meta(&self) -> &UniverseMeta {
        &self.meta
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// Renames the universe.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.meta.name = name.into();
    }

    /// Returns the live grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the rule used by the next advance.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Returns the generation of the live grid.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the history ledger.
    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    /// Returns the number of live cells.
    pub fn population(&self) -> usize {
        self.grid.population()
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> UniverseState {
        if self.history.is_empty() {
            UniverseState::Seeded
        } else {
            UniverseState::Running
        }
    }

    /// Advances by one generation and returns the new generation number.
    ///
    /// The current live grid is recorded at the current generation, any
    /// snapshots after it are discarded, and the next generation becomes
    /// live. Evicted snapshots are reused as step buffers.
    ///
    /// A universe whose counter is at `u64::MAX` no longer advances.
    pub fn advance(&mut self) -> u64 {
        let Some(next_generation) = self.generation.checked_add(1) else {
            warn!(universe = %self.id, "generation counter exhausted, not advancing");
            return self.generation;
        };
        self.discard_future();

        let (width, height) = self.grid.dimensions();
        let mut next = self.stepper.take_buffer(width, height);
        step_into(&self.grid, &self.rules, &mut next);

        let previous = std::mem::replace(&mut self.grid, next);
        if let Some(evicted) = self.history.push(previous) {
            self.stepper.recycle(evicted);
        }
        self.generation = next_generation;

        trace!(universe = %self.id, generation = self.generation, "advanced");
        self.generation
    }

    /// Advances by `n` generations.
    pub fn advance_by(&mut self, n: usize) -> u64 {
        for _ in 0..n {
            self.advance();
        }
        self.generation
    }

    /// Returns the grid at `generation`: the live grid for the current
    /// generation, otherwise the recorded snapshot.
    pub fn grid_at(&self, generation: u64) -> Result<&Grid, HistoryError> {
        if generation == self.generation {
            Ok(&self.grid)
        } else {
            self.history.get(generation)
        }
    }

    /// Makes a recorded generation live.
    ///
    /// Fails with [`HistoryError::OutOfRange`] if it is not retained, in
    /// which case nothing changes. Leaving the newest generation records it
    /// first, so it can be jumped back to.
    pub fn jump_to(&mut self, generation: u64) -> Result<(), HistoryError> {
        if generation == self.generation {
            return Ok(());
        }
        let target = self.history.get(generation)?.clone();

        let head_unrecorded = self.generation == self.history.next_generation();
        let previous = std::mem::replace(&mut self.grid, target);
        if head_unrecorded {
            if let Some(evicted) = self.history.push(previous) {
                self.stepper.recycle(evicted);
            }
        } else {
            self.stepper.recycle(previous);
        }

        debug!(universe = %self.id, from = self.generation, to = generation, "time travel");
        self.generation = generation;
        Ok(())
    }

    /// Replaces the rule. Takes effect on the next advance; recorded
    /// history is unaffected.
    pub fn set_rules(&mut self, rules: RuleSet) {
        if rules != self.rules {
            debug!(universe = %self.id, from = %self.rules, to = %rules, "rule changed");
            self.rules = rules;
        }
    }

    /// Randomly perturbs one birth or survival count and returns the new rule.
    pub fn evolve_rules(&mut self, seed: u64) -> RuleSet {
        let evolved = self.rules.mutate(seed);
        self.set_rules(evolved);
        evolved
    }

    /// Sets a cell of the live grid.
    pub fn set_cell(&mut self, x: usize, y: usize, alive: bool) {
        self.discard_future();
        self.grid.set(x, y, alive);
    }

    /// Flips a cell of the live grid and returns its new state.
    pub fn toggle_cell(&mut self, x: usize, y: usize) -> bool {
        self.discard_future();
        self.grid.toggle(x, y)
    }

    /// Kills every live cell.
    pub fn clear(&mut self) {
        self.discard_future();
        self.grid.clear();
    }

    /// Refills the live grid randomly.
    pub fn randomize(&mut self, seed: u64, density: f32) {
        self.discard_future();
        self.grid.randomize(seed, density);
    }

    /// Stamps a pattern onto the live grid.
    pub fn stamp(&mut self, pattern: &Pattern, x: usize, y: usize) {
        self.discard_future();
        self.grid.stamp(pattern, x, y);
    }

    /// Stamps a pattern centred on the live grid.
    pub fn stamp_centered(&mut self, pattern: &Pattern) {
        self.discard_future();
        self.grid.stamp_centered(pattern);
    }

    /// Drops snapshots at and after the current generation. They describe
    /// a future the live grid is about to stop leading to.
    fn discard_future(&mut self) {
        if self.history.next_generation() > self.generation {
            debug!(
                universe = %self.id,
                generation = self.generation,
                "discarding forward history"
            );
        }
        self.history.truncate_from(self.generation);
    }

    /// Returns up to `n` grids ending with the live grid, oldest first.
    pub fn recent_window(&self, n: usize) -> Vec<&Grid> {
        if n == 0 {
            return Vec::new();
        }
        let mut window = self.history.window_before(self.generation, n - 1);
        window.push(&self.grid);
        window
    }

    /// Computes pattern DNA over the most recent generations.
    pub fn dna(&self, config: &AnalyzerConfig) -> PatternDna {
        let window = self.recent_window(config.stability_window.max(1));
        PatternDna::analyze(&window, config)
    }

    /// Density and population change, for sonification.
    pub fn sound_metrics(&self) -> SoundMetrics {
        let population = self.grid.population();
        let previous = self
            .generation
            .checked_sub(1)
            .and_then(|g| self.history.get(g).ok())
            .map(Grid::population);
        SoundMetrics {
            density: population as f64 / self.grid.area() as f64,
            population_delta: previous.map_or(0, |p| population.abs_diff(p)),
        }
    }

    /// Captures the live state for serialization.
    pub fn to_serial(&self) -> SerialUniverse {
        SerialUniverse::from_parts(self.meta.name.clone(), &self.grid, &self.rules, self.generation)
    }

    /// Encodes the live state as RLE text.
    pub fn encode(&self) -> String {
        rhizome_verse_serde::encode(&self.to_serial())
    }
}
