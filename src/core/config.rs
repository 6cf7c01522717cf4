//! Race configuration.
//!
//! A board is built from a `RaceConfig` that names:
//! - the track length,
//! - which tokens race (and therefore rank),
//! - the two reverse tokens sharing one die,
//! - the highest die face,
//! - how many dice of the pool are rolled before a round ends.
//!
//! The engine never hardcodes token names - the default config describes the
//! standard five-camel game.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use super::token::{DieId, TokenId};

/// Inline capacity for race token lists and rankings.
pub type TokenList = SmallVec<[TokenId; 8]>;

/// Reasons a `RaceConfig` is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("track must have at least one cell")]
    EmptyTrack,
    #[error("at least one race token is required")]
    NoRaceTokens,
    #[error("dice need at least one face")]
    NoFaces,
    #[error("a round must roll at least one die")]
    NoRolls,
    #[error("token `{0}` is configured more than once")]
    DuplicateToken(TokenId),
}

/// Configuration for a race.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceConfig {
    /// Number of cells at creation (coordinates `0..track_length`).
    pub track_length: usize,

    /// Ranking tokens, each with its own die.
    ///
    /// Prediction distributions list tokens in this order.
    pub race_tokens: TokenList,

    /// Backward-moving tokens sharing one die. They never rank.
    pub reverse_tokens: [TokenId; 2],

    /// Highest die face; faces are `1..=max_face`.
    pub max_face: u8,

    /// Dice rolled per round. The pool holds one more die than the
    /// standard round uses, so one die always stays unrolled.
    pub rolls_per_round: usize,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            track_length: 16,
            race_tokens: ['r', 'y', 'g', 'b', 'p'].into_iter().map(TokenId).collect(),
            reverse_tokens: [TokenId('w'), TokenId('k')],
            max_face: 3,
            rolls_per_round: 5,
        }
    }
}

impl RaceConfig {
    /// Set the track length.
    #[must_use]
    pub fn with_track_length(mut self, length: usize) -> Self {
        self.track_length = length;
        self
    }

    /// Replace the race tokens.
    #[must_use]
    pub fn with_race_tokens(mut self, tokens: impl IntoIterator<Item = TokenId>) -> Self {
        self.race_tokens = tokens.into_iter().collect();
        self
    }

    /// Replace the reverse token pair.
    #[must_use]
    pub fn with_reverse_tokens(mut self, first: TokenId, second: TokenId) -> Self {
        self.reverse_tokens = [first, second];
        self
    }

    /// Set the highest die face.
    #[must_use]
    pub fn with_max_face(mut self, max_face: u8) -> Self {
        self.max_face = max_face;
        self
    }

    /// Set how many dice a round rolls.
    #[must_use]
    pub fn with_rolls_per_round(mut self, rolls: usize) -> Self {
        self.rolls_per_round = rolls;
        self
    }

    /// Check the configuration is playable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an empty track, no race tokens, no faces,
    /// no rolls per round, or a token named twice across both lists.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.track_length == 0 {
            return Err(ConfigError::EmptyTrack);
        }
        if self.race_tokens.is_empty() {
            return Err(ConfigError::NoRaceTokens);
        }
        if self.max_face == 0 {
            return Err(ConfigError::NoFaces);
        }
        if self.rolls_per_round == 0 {
            return Err(ConfigError::NoRolls);
        }

        let mut seen = TokenList::new();
        for token in self.all_tokens() {
            if seen.contains(&token) {
                return Err(ConfigError::DuplicateToken(token));
            }
            seen.push(token);
        }
        Ok(())
    }

    /// Number of dice in the pool: one per race token plus the shared die.
    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.race_tokens.len() + 1
    }

    /// Dice rolled before a round ends, capped by the pool size.
    #[must_use]
    pub fn round_length(&self) -> usize {
        self.rolls_per_round.min(self.pool_size())
    }

    /// Die faces, lowest first.
    pub fn faces(&self) -> impl Iterator<Item = u8> {
        1..=self.max_face
    }

    /// Race tokens followed by reverse tokens.
    pub fn all_tokens(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.race_tokens
            .iter()
            .chain(self.reverse_tokens.iter())
            .copied()
    }

    /// Check if a token ranks.
    #[must_use]
    pub fn is_race(&self, token: TokenId) -> bool {
        self.race_tokens.contains(&token)
    }

    /// Check if a token moves backwards.
    #[must_use]
    pub fn is_reverse(&self, token: TokenId) -> bool {
        self.reverse_tokens.contains(&token)
    }

    /// The die that moves a token, or `None` for unknown tokens.
    #[must_use]
    pub fn die_for(&self, token: TokenId) -> Option<DieId> {
        if self.is_race(token) {
            Some(DieId::Race(token))
        } else if self.is_reverse(token) {
            Some(DieId::Reverse)
        } else {
            None
        }
    }

    /// All dice in pool order: race dice, then the shared reverse die.
    pub fn dice(&self) -> impl Iterator<Item = DieId> + '_ {
        self.race_tokens
            .iter()
            .map(|&token| DieId::Race(token))
            .chain(std::iter::once(DieId::Reverse))
    }
}
