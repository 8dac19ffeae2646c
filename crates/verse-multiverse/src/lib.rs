//! Branching cellular universes.
//!
//! A [`Multiverse`] holds any number of independent [`Universe`]s, one of
//! them active. Each universe evolves a toroidal [`Grid`] under a
//! Birth/Survival [`RuleSet`], records every generation in a bounded
//! history ledger, and can jump back to any retained generation. Forking
//! copies a snapshot into a brand-new universe so alternate timelines can
//! be explored side by side.
//!
//! Front ends plug in through three traits:
//!
//! - [`Renderer`] draws grids ([`AsciiRenderer`], [`PixelRenderer`], and
//!   `ImageRenderer` with the `image` feature)
//! - [`Sonifier`] turns [`SoundMetrics`] into sound
//! - [`RuleAdvisor`] suggests rules from free text ([`PresetAdvisor`])
//!
//! # Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` on config and data types
//! - `parallel`: advance all universes concurrently with rayon
//! - `image`: convert rendered frames into `image::RgbaImage`
//!
//! # Example
//!
//! ```
//! use rhizome_verse_automata::patterns;
//! use rhizome_verse_multiverse::{Classification, Multiverse, MultiverseConfig};
//!
//! let mut multiverse = Multiverse::new(MultiverseConfig::with_size(20, 20)).unwrap();
//! let id = multiverse.create("Prime");
//!
//! let universe = multiverse.active_mut().unwrap();
//! universe.stamp_centered(&patterns::BLOCK);
//! universe.advance_by(10);
//!
//! let dna = multiverse.dna(id).unwrap();
//! assert_eq!(dna.classification, Classification::StillLife);
//! ```

mod advisor;
mod config;
mod error;
mod registry;
mod render;
mod sonify;
mod universe;

pub use advisor::{PresetAdvisor, RuleAdvisor, RuleProposal};
pub use config::MultiverseConfig;
pub use error::MultiverseError;
pub use registry::Multiverse;
#[cfg(feature = "image")]
pub use render::ImageRenderer;
pub use render::{AsciiRenderer, PixelBuffer, PixelRenderer, Renderer};
pub use sonify::{Sonifier, SoundMetrics};
pub use universe::{Universe, UniverseId, UniverseMeta, UniverseState};

pub use rhizome_verse_automata::{Grid, Pattern, RuleSet, patterns, rules};
pub use rhizome_verse_dna::{AnalyzerConfig, Classification, PatternDna};
pub use rhizome_verse_history::HistoryError;
