//! Core types: identifiers, configuration, errors, RNG.
//!
//! Everything here is rule-agnostic. Boards are built from a `RaceConfig`
//! rather than from hardcoded token lists.

pub mod token;
pub mod config;
pub mod error;
pub mod rng;

pub use token::{DieId, Hazard, TokenId};
pub use config::{ConfigError, RaceConfig, TokenList};
pub use error::BoardError;
pub use rng::GameRng;
