//! The multiverse registry: a set of universes with one active.

use rhizome_verse_automata::{Grid, RuleSet};
use rhizome_verse_dna::PatternDna;
use rhizome_verse_serde::{DecodedUniverse, UniverseFormat};
use tracing::{debug, info, warn};

use crate::advisor::RuleProposal;
use crate::config::MultiverseConfig;
use crate::error::MultiverseError;
use crate::universe::{Universe, UniverseId};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A collection of independent universes, at most one of them active.
///
/// Universes are kept in creation order. Ids are never reused, so an id
/// held across a removal cannot silently refer to a different universe.
///
/// # Example
///
/// ```
/// use rhizome_verse_automata::patterns;
/// use rhizome_verse_multiverse::{Multiverse, MultiverseConfig};
///
/// let mut multiverse = Multiverse::new(MultiverseConfig::with_size(16, 16)).unwrap();
/// let prime = multiverse.create("Prime");
/// multiverse.get_mut(prime).unwrap().stamp(&patterns::GLIDER, 1, 1);
/// multiverse.get_mut(prime).unwrap().advance_by(4);
///
/// let branch = multiverse.fork(prime, 2).unwrap();
/// assert_eq!(multiverse.get(branch).unwrap().generation(), 0);
/// assert_eq!(multiverse.active_id(), Some(prime));
/// ```
#[derive(Debug, Clone)]
pub struct Multiverse {
    config: MultiverseConfig,
    universes: Vec<Universe>,
    active: Option<UniverseId>,
    next_id: u32,
}

impl Multiverse {
    /// Creates an empty multiverse after validating `config`.
    pub fn new(config: MultiverseConfig) -> Result<Self, MultiverseError> {
        config.validate()?;
        Ok(Self {
            config,
            universes: Vec::new(),
            active: None,
            next_id: 1,
        })
    }

    /// Returns the config.
    pub fn config(&self) -> &MultiverseConfig {
        &self.config
    }

    /// Creates an empty universe with the configured size and rule.
    ///
    /// The first universe created becomes active.
    pub fn create(&mut self, name: impl Into<String>) -> UniverseId {
        let grid = Grid::new(self.config.width, self.config.height);
        let rules = self.config.rules;
        self.create_with(name, grid, rules)
    }

    /// Creates a universe from an existing grid and rule.
    pub fn create_with(
        &mut self,
        name: impl Into<String>,
        grid: Grid,
        rules: RuleSet,
    ) -> UniverseId {
        let id = self.allocate_id();
        let universe = Universe::from_grid(id, name, grid, rules, self.config.history_capacity);
        self.insert(universe)
    }

    /// Adds a decoded universe, resuming at its generation.
    pub fn import(&mut self, mut decoded: DecodedUniverse) -> UniverseId {
        if decoded.name.is_empty() {
            decoded.name = "Imported".to_string();
        }
        let id = self.allocate_id();
        let universe = Universe::from_decoded(id, decoded, self.config.history_capacity);
        self.insert(universe)
    }

    /// Decodes RLE text and adds the result.
    pub fn import_text(&mut self, text: &str) -> Result<UniverseId, MultiverseError> {
        let decoded = rhizome_verse_serde::decode(text)?;
        Ok(self.import(decoded))
    }

    /// Decodes bytes in `format` and adds the result.
    pub fn import_with(
        &mut self,
        bytes: &[u8],
        format: &dyn UniverseFormat,
    ) -> Result<UniverseId, MultiverseError> {
        let decoded = format.deserialize(bytes)?.into_decoded()?;
        Ok(self.import(decoded))
    }

    /// Serializes a universe's live state in `format`.
    pub fn export(
        &self,
        id: UniverseId,
        format: &dyn UniverseFormat,
    ) -> Result<Vec<u8>, MultiverseError> {
        let universe = self.get(id)?;
        Ok(format.serialize(&universe.to_serial())?)
    }

    fn allocate_id(&mut self) -> UniverseId {
        let id = UniverseId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(&mut self, universe: Universe) -> UniverseId {
        let id = universe.id();
        debug!(universe = %id, name = universe.name(), "created universe");
        self.universes.push(universe);
        if self.active.is_none() {
            self.active = Some(id);
        }
        id
    }

    fn index_of(&self, id: UniverseId) -> Result<usize, MultiverseError> {
        self.universes
            .iter()
            .position(|u| u.id() == id)
            .ok_or(MultiverseError::NotFound(id))
    }

    /// Returns true if `id` names a universe.
    pub fn contains(&self, id: UniverseId) -> bool {
        self.index_of(id).is_ok()
    }

    /// Looks up a universe.
    pub fn get(&self, id: UniverseId) -> Result<&Universe, MultiverseError> {
        let index = self.index_of(id)?;
        Ok(&self.universes[index])
    }

    /// Looks up a universe mutably.
    pub fn get_mut(&mut self, id: UniverseId) -> Result<&mut Universe, MultiverseError> {
        let index = self.index_of(id)?;
        Ok(&mut self.universes[index])
    }

    /// Returns the active universe id.
    pub fn active_id(&self) -> Option<UniverseId> {
        self.active
    }

    /// Returns the active universe.
    pub fn active(&self) -> Option<&Universe> {
        self.active.and_then(|id| self.get(id).ok())
    }

    /// Returns the active universe mutably.
    pub fn active_mut(&mut self) -> Option<&mut Universe> {
        let id = self.active?;
        self.get_mut(id).ok()
    }

    /// Makes `id` the active universe.
    pub fn switch_active(&mut self, id: UniverseId) -> Result<(), MultiverseError> {
        self.index_of(id)?;
        if self.active != Some(id) {
            debug!(from = ?self.active, to = %id, "switched active universe");
            self.active = Some(id);
        }
        Ok(())
    }

    /// Creates a new universe seeded from `source` at `at_generation`.
    ///
    /// The fork starts at generation 0 with a fresh ledger and the source's
    /// current rule. The source is untouched and the active universe does
    /// not change.
    pub fn fork(
        &mut self,
        source: UniverseId,
        at_generation: u64,
    ) -> Result<UniverseId, MultiverseError> {
        let parent = self.get(source)?;
        let grid = parent.grid_at(at_generation)?.clone();
        let rules = *parent.rules();
        let name = format!("{} @ {}", parent.name(), at_generation);

        let id = self.allocate_id();
        let mut universe = Universe::from_grid(id, name, grid, rules, self.config.history_capacity);
        universe.set_lineage(source, at_generation);
        info!(parent = %source, generation = at_generation, fork = %id, "forked universe");
        Ok(self.insert(universe))
    }

    /// Removes a universe and returns it.
    ///
    /// Removing the active universe needs a `fallback` to activate instead,
    /// unless it is the last universe left, in which case nothing is active
    /// afterwards. `fallback` is ignored when `id` is not active.
    pub fn remove(
        &mut self,
        id: UniverseId,
        fallback: Option<UniverseId>,
    ) -> Result<Universe, MultiverseError> {
        let index = self.index_of(id)?;
        let next_active = if self.active == Some(id) {
            match fallback {
                Some(fallback) if fallback == id => return Err(MultiverseError::ActiveUniverse(id)),
                Some(fallback) => {
                    self.index_of(fallback)?;
                    Some(fallback)
                }
                None if self.universes.len() == 1 => None,
                None => return Err(MultiverseError::ActiveUniverse(id)),
            }
        } else {
            self.active
        };

        let removed = self.universes.remove(index);
        self.active = next_active;
        debug!(universe = %id, active = ?self.active, "removed universe");
        Ok(removed)
    }

    /// Iterates over universes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Universe> {
        self.universes.iter()
    }

    /// Iterates mutably over universes in creation order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Universe> {
        self.universes.iter_mut()
    }

    /// Returns all ids in creation order.
    pub fn ids(&self) -> Vec<UniverseId> {
        self.universes.iter().map(Universe::id).collect()
    }

    /// Number of universes.
    pub fn len(&self) -> usize {
        self.universes.len()
    }

    /// Returns true if there are no universes.
    pub fn is_empty(&self) -> bool {
        self.universes.is_empty()
    }

    /// Advances the active universe, returning its new generation.
    pub fn advance_active(&mut self) -> Option<u64> {
        self.active_mut().map(Universe::advance)
    }

    /// Advances every universe by one generation.
    #[cfg(not(feature = "parallel"))]
    pub fn advance_all(&mut self) {
        for universe in &mut self.universes {
            universe.advance();
        }
    }

    /// Advances every universe by one generation, in parallel.
    #[cfg(feature = "parallel")]
    pub fn advance_all(&mut self) {
        self.universes.par_iter_mut().for_each(|universe| {
            universe.advance();
        });
    }

    /// Computes pattern DNA for a universe with the configured analyzer.
    pub fn dna(&self, id: UniverseId) -> Result<PatternDna, MultiverseError> {
        Ok(self.get(id)?.dna(&self.config.analyzer))
    }

    /// Validates an advisor's proposal and installs it as `id`'s rule.
    ///
    /// On failure the universe keeps its current rule.
    pub fn apply_proposal(
        &mut self,
        id: UniverseId,
        proposal: &RuleProposal,
    ) -> Result<RuleSet, MultiverseError> {
        let universe = self.get_mut(id)?;
        let rules = match proposal.validate() {
            Ok(rules) => rules,
            Err(err) => {
                warn!(universe = %id, error = %err, "rejected rule proposal");
                return Err(MultiverseError::MalformedRuleProposal(err));
            }
        };
        universe.set_rules(rules);
        Ok(rules)
    }
}

impl Default for Multiverse {
    fn default() -> Self {
        Self {
            config: MultiverseConfig::default(),
            universes: Vec::new(),
            active: None,
            next_id: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhizome_verse_automata::{patterns, rules};
    use rhizome_verse_serde::{BincodeFormat, CodecError, JsonFormat, MAX_GENERATION, RleFormat};

    use crate::advisor::{PresetAdvisor, RuleAdvisor};

    fn small() -> Multiverse {
        Multiverse::new(MultiverseConfig::with_size(16, 16).history_capacity(50)).unwrap()
    }

    fn with_glider(multiverse: &mut Multiverse, name: &str) -> UniverseId {
        let id = multiverse.create(name);
        multiverse.get_mut(id).unwrap().stamp(&patterns::GLIDER, 1, 1);
        id
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = Multiverse::new(MultiverseConfig::with_size(0, 4));
        assert!(matches!(result, Err(MultiverseError::InvalidConfig(_))));
    }

    #[test]
    fn test_new_rejects_oversized_grid() {
        let result = Multiverse::new(MultiverseConfig::with_size(usize::MAX, 2));
        assert!(matches!(result, Err(MultiverseError::InvalidConfig(_))));
    }

    #[test]
    fn test_first_universe_becomes_active() {
        let mut multiverse = small();
        assert!(multiverse.active().is_none());

        let a = multiverse.create("A");
        let b = multiverse.create("B");
        assert_ne!(a, b);
        assert_eq!(multiverse.active_id(), Some(a));
        assert_eq!(multiverse.ids(), vec![a, b]);
        assert_eq!(multiverse.get(b).unwrap().grid().dimensions(), (16, 16));
    }

    #[test]
    fn test_switch_active() {
        let mut multiverse = small();
        let a = multiverse.create("A");
        let b = multiverse.create("B");

        multiverse.switch_active(b).unwrap();
        assert_eq!(multiverse.active().unwrap().id(), b);

        let missing = UniverseId::new(99);
        assert!(matches!(
            multiverse.switch_active(missing),
            Err(MultiverseError::NotFound(id)) if id == missing
        ));
        assert_eq!(multiverse.active_id(), Some(b));
        assert_ne!(multiverse.active_id(), Some(a));
    }

    #[test]
    fn test_fork_copies_snapshot_and_rules() {
        let mut multiverse = small();
        let prime = with_glider(&mut multiverse, "Prime");
        multiverse.get_mut(prime).unwrap().set_rules(rules::HIGH_LIFE);
        multiverse.get_mut(prime).unwrap().advance_by(6);
        let at_three = multiverse.get(prime).unwrap().grid_at(3).unwrap().clone();

        let fork = multiverse.fork(prime, 3).unwrap();
        let forked = multiverse.get(fork).unwrap();
        assert_eq!(forked.grid(), &at_three);
        assert_eq!(forked.rules(), &rules::HIGH_LIFE);
        assert_eq!(forked.generation(), 0);
        assert!(forked.history().is_empty());
        assert_eq!(forked.meta().parent, Some(prime));
        assert_eq!(forked.meta().forked_at, Some(3));
        assert_eq!(forked.name(), "Prime @ 3");
        assert_eq!(multiverse.active_id(), Some(prime));
    }

    #[test]
    fn test_fork_of_live_generation() {
        let mut multiverse = small();
        let prime = with_glider(&mut multiverse, "Prime");
        multiverse.get_mut(prime).unwrap().advance_by(2);

        let fork = multiverse.fork(prime, 2).unwrap();
        assert_eq!(
            multiverse.get(fork).unwrap().grid(),
            multiverse.get(prime).unwrap().grid()
        );
    }

    #[test]
    fn test_fork_is_independent() {
        let mut multiverse = small();
        let prime = with_glider(&mut multiverse, "Prime");
        multiverse.get_mut(prime).unwrap().advance_by(4);
        let prime_before = multiverse.get(prime).unwrap().grid().clone();

        let fork = multiverse.fork(prime, 1).unwrap();
        let fork_seed = multiverse.get(fork).unwrap().grid().clone();

        let prime_at_one = multiverse.get(prime).unwrap().grid_at(1).unwrap().clone();
        {
            let forked = multiverse.get_mut(fork).unwrap();
            forked.set_cell(0, 0, true);
            forked.toggle_cell(5, 5);
            forked.clear();
            forked.advance_by(3);
        }
        assert_eq!(multiverse.get(prime).unwrap().grid_at(1).unwrap(), &prime_at_one);
        assert_eq!(multiverse.get(prime).unwrap().grid(), &prime_before);
        assert_eq!(multiverse.get(prime).unwrap().generation(), 4);

        assert_eq!(fork_seed, prime_at_one);

        let fork_recorded = multiverse.get(fork).unwrap().history().get(0).unwrap().clone();
        multiverse.get_mut(prime).unwrap().randomize(1, 0.5);
        assert_eq!(multiverse.get(fork).unwrap().history().get(0).unwrap(), &fork_recorded);
    }

    #[test]
    fn test_forks_are_idempotent() {
        let mut multiverse = small();
        let prime = with_glider(&mut multiverse, "Prime");
        multiverse.get_mut(prime).unwrap().advance_by(5);

        let first = multiverse.fork(prime, 2).unwrap();
        let second = multiverse.fork(prime, 2).unwrap();
        assert_ne!(first, second);
        assert_eq!(
            multiverse.get(first).unwrap().grid(),
            multiverse.get(second).unwrap().grid()
        );
    }

    #[test]
    fn test_fork_failures_change_nothing() {
        let mut multiverse = small();
        let prime = with_glider(&mut multiverse, "Prime");
        multiverse.get_mut(prime).unwrap().advance_by(3);

        assert!(matches!(
            multiverse.fork(prime, 10),
            Err(MultiverseError::OutOfRange(_))
        ));
        assert!(matches!(
            multiverse.fork(UniverseId::new(42), 0),
            Err(MultiverseError::NotFound(_))
        ));
        assert_eq!(multiverse.len(), 1);

        // A failed fork does not consume an id.
        let next = multiverse.create("Next");
        assert_eq!(next, UniverseId::new(2));
    }

    #[test]
    fn test_remove_inactive() {
        let mut multiverse = small();
        let a = multiverse.create("A");
        let b = multiverse.create("B");

        let removed = multiverse.remove(b, None).unwrap();
        assert_eq!(removed.id(), b);
        assert_eq!(multiverse.active_id(), Some(a));
        assert!(multiverse.get(b).is_err());
    }

    #[test]
    fn test_remove_active_requires_fallback() {
        let mut multiverse = small();
        let a = multiverse.create("A");
        let b = multiverse.create("B");

        assert!(matches!(
            multiverse.remove(a, None),
            Err(MultiverseError::ActiveUniverse(id)) if id == a
        ));
        assert!(matches!(
            multiverse.remove(a, Some(a)),
            Err(MultiverseError::ActiveUniverse(_))
        ));
        assert!(matches!(
            multiverse.remove(a, Some(UniverseId::new(77))),
            Err(MultiverseError::NotFound(_))
        ));
        assert_eq!(multiverse.len(), 2);

        multiverse.remove(a, Some(b)).unwrap();
        assert_eq!(multiverse.active_id(), Some(b));
        assert_eq!(multiverse.len(), 1);
    }

    #[test]
    fn test_remove_last_universe() {
        let mut multiverse = small();
        let a = multiverse.create("A");
        multiverse.remove(a, None).unwrap();
        assert!(multiverse.is_empty());
        assert_eq!(multiverse.active_id(), None);
        assert_eq!(multiverse.advance_active(), None);

        // Ids are not reused.
        assert_eq!(multiverse.create("B"), UniverseId::new(2));
    }

    #[test]
    fn test_advance_active_and_all() {
        let mut multiverse = small();
        let a = with_glider(&mut multiverse, "A");
        let b = with_glider(&mut multiverse, "B");

        assert_eq!(multiverse.advance_active(), Some(1));
        multiverse.advance_all();
        assert_eq!(multiverse.get(a).unwrap().generation(), 2);
        assert_eq!(multiverse.get(b).unwrap().generation(), 1);
    }

    #[test]
    fn test_apply_proposal() {
        let mut multiverse = small();
        let a = multiverse.create("A");

        let proposal = PresetAdvisor::new().propose_rule("a maze").unwrap();
        assert_eq!(multiverse.apply_proposal(a, &proposal).unwrap(), rules::MAZE);
        assert_eq!(multiverse.get(a).unwrap().rules(), &rules::MAZE);

        let bad = RuleProposal {
            birth: vec![3],
            survival: vec![9],
            explanation: "nine neighbors".to_string(),
        };
        assert!(matches!(
            multiverse.apply_proposal(a, &bad),
            Err(MultiverseError::MalformedRuleProposal(_))
        ));
        assert_eq!(multiverse.get(a).unwrap().rules(), &rules::MAZE);

        assert!(matches!(
            multiverse.apply_proposal(UniverseId::new(5), &proposal),
            Err(MultiverseError::NotFound(_))
        ));
    }

    #[test]
    fn test_export_import_each_format() {
        let mut multiverse = small();
        let a = with_glider(&mut multiverse, "Glider");
        multiverse.get_mut(a).unwrap().advance_by(3);
        let original = multiverse.get(a).unwrap().grid().clone();

        let formats: [&dyn UniverseFormat; 3] =
            [&RleFormat::new(), &JsonFormat::new(), &BincodeFormat::new()];
        for format in formats {
            let bytes = multiverse.export(a, format).unwrap();
            let id = multiverse.import_with(&bytes, format).unwrap();
            let imported = multiverse.get(id).unwrap();
            assert_eq!(imported.grid(), &original, "{}", format.name());
            assert_eq!(imported.generation(), 3);
            assert_eq!(imported.name(), "Glider");
        }
        assert_eq!(multiverse.len(), 4);
    }

    #[test]
    fn test_import_text_rejects_garbage() {
        let mut multiverse = small();
        assert!(matches!(
            multiverse.import_text("x = 3, y = 3, rule = B3/S23\n9o!"),
            Err(MultiverseError::Codec(_))
        ));
        assert!(multiverse.is_empty());

        let id = multiverse.import_text("x = 3, y = 3, rule = B3/S23\n3o!").unwrap();
        let imported = multiverse.get(id).unwrap();
        assert_eq!(imported.name(), "Imported");
        assert_eq!(imported.population(), 3);
    }

    #[test]
    fn test_import_rejects_generation_that_cannot_advance() {
        let mut multiverse = small();
        let text = "#G 18446744073709551615\nx = 3, y = 3, rule = B3/S23\n3o!";
        assert!(matches!(
            multiverse.import_text(text),
            Err(MultiverseError::Codec(CodecError::InvalidGeneration(u64::MAX)))
        ));
        assert!(multiverse.is_empty());

        let text = format!("#G {MAX_GENERATION}\nx = 3, y = 3, rule = B3/S23\n3o!");
        let id = multiverse.import_text(&text).unwrap();
        let universe = multiverse.get_mut(id).unwrap();
        assert_eq!(universe.advance(), MAX_GENERATION + 1);
        assert_eq!(universe.population(), 3);
        assert!(universe.grid_at(MAX_GENERATION).is_ok());
    }

    #[test]
    fn test_dna_uses_configured_analyzer() {
        let mut multiverse = small();
        let a = multiverse.create("A");
        multiverse.get_mut(a).unwrap().stamp(&patterns::BLOCK, 4, 4);
        multiverse.get_mut(a).unwrap().advance_by(5);
        let dna = multiverse.dna(a).unwrap();
        assert_eq!(dna.stability, 100.0);
    }
}
