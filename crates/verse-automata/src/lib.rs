//! Life-like cellular automata on a toroidal grid.
//!
//! Provides the three building blocks every universe is made of:
//!
//! - [`Grid`]: a fixed-size boolean matrix whose edges wrap around
//! - [`RuleSet`]: birth/survival neighbour counts in `B3/S23` notation
//! - [`step`]: the synchronous transition from one generation to the next
//!
//! # Example
//!
//! ```
//! use rhizome_verse_automata::{Grid, RuleSet, patterns, step};
//!
//! let mut grid = Grid::new(16, 16);
//! grid.stamp(&patterns::BLINKER, 6, 7);
//!
//! let rules = RuleSet::life();
//! let next = step(&grid, &rules);
//! assert_eq!(next.population(), 3);
//! assert!(next.get(7, 6) && next.get(7, 8));
//! ```

mod error;
mod grid;
pub mod patterns;
mod rng;
mod rule;
mod step;

pub use crate::error::{GridShapeError, RuleError};
pub use crate::grid::Grid;
pub use crate::patterns::Pattern;
pub use crate::rng::SimpleRng;
pub use crate::rule::{MAX_NEIGHBORS, NeighborSet, RuleSet, rules};
pub use crate::step::{Stepper, step, step_into};
