//! `deckforge`: card search and deck statistics for a Magic: The Gathering
//! collection tracker.
//!
//! Two pure engines, plus a stdio tool server that exposes them to a host
//! application:
//!
//! - [`FuzzyMatcher`] ranks card records against a typed query
//!   (prefix/substring rules with a Levenshtein fallback) and merges
//!   collection matches with remote search results for autocomplete.
//! - [`DeckStatsEngine`] computes the mana curve, type and color breakdowns,
//!   average mana cost and a consistency score for a deck list, with synergy
//!   scoring layered on top in [`stats::synergy`].
//!
//! # Architecture
//!
//! ```text
//! external JSON ─→ ExternalCard ─→ CardRecord / DeckEntry
//!                                     │
//!                     ┌───────────────┴───────────────┐
//!                     ↓                               ↓
//!               FuzzyMatcher ←─ SuggestionCache   DeckStatsEngine ─→ SynergyEngine
//!                     ↓                               ↓
//!               Vec<MatchResult>                  DeckStats
//! ```

pub mod card;
pub mod config;
pub mod error;
pub mod mana;
pub mod search;
pub mod server;
pub mod stats;
pub mod tools;

pub use card::{CardRecord, DeckEntry, ExternalCard, merge_duplicates};
pub use config::{EngineConfig, MatcherConfig, StatsConfig};
pub use error::{DeckforgeError, DeckforgeResult};
pub use mana::{ColorPips, ManaColor, ManaCost, ManaSymbol};
pub use search::{FuzzyMatcher, LruCache, MatchResult, NoCache, Source, SuggestionCache};
pub use server::run_server;
pub use stats::{DeckStats, DeckStatsEngine, TypeCategory, compute_stats};
