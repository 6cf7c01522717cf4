//! # camel-race
//!
//! Engine for a camel race board game: tokens move around a track, stack on
//! one another, get pushed around by hazard markers, and the remaining
//! dice of a round can be enumerated exactly to predict the standings.
//!
//! ## Design Principles
//!
//! 1. **Configuration Over Convention**: Which tokens race and which move
//!    backwards is set by `RaceConfig`, not hardcoded.
//!
//! 2. **Validate, then mutate**: Every fallible operation either succeeds or
//!    leaves the board untouched.
//!
//! 3. **Independent clones**: Prediction explores each branch on its own
//!    `Board` clone; the live board is never touched by prediction.
//!
//! ## Architecture
//!
//! - **Arena stacks**: Cells and tokens are nodes in a flat arena linked by
//!   `NodeId` handles instead of owning pointers.
//!
//! - **Weighted outcomes**: The round enumerator stores each ranking with
//!   its multiplicity instead of repeating it.
//!
//! ## Modules
//!
//! - `core`: Token and die identifiers, configuration, errors, RNG
//! - `track`: Position stacks and the board
//! - `rules`: Die resolution
//! - `predict`: Round enumeration and rank prediction

pub mod core;
pub mod track;
pub mod rules;
pub mod predict;

// Re-export commonly used types
pub use crate::core::{
    BoardError, ConfigError, DieId, GameRng, Hazard, RaceConfig, TokenId, TokenList,
};

pub use crate::track::{Board, CellSnapshot, Label, NodeId, Roll, StackArena, StackNode};

pub use crate::rules::MovementEngine;

pub use crate::predict::{
    EnumerationStats, HazardImpact, OutcomeEnumerator, Outcomes, Prediction,
    RankDistribution, RankPredictor, WeightedRanking,
};
