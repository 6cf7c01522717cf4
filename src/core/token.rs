//! Token, die and hazard identifiers.
//!
//! ## Tokens
//!
//! Every piece on the track is a `TokenId`. Whether a token races or moves
//! backwards is **not** a property of the id: it is decided by the
//! [`RaceConfig`](super::RaceConfig) the board was built with.
//!
//! ## Dice
//!
//! Each race token owns one die. Both reverse tokens share a single die,
//! so the pool holds `race_tokens + 1` dice.
//!
//! ```
//! use camel_race::core::{DieId, TokenId};
//!
//! let red = TokenId::new('r');
//! assert_eq!(DieId::Race(red).to_string(), "r");
//! assert_eq!(DieId::Reverse.to_string(), "reverse");
//! ```

use serde::{Deserialize, Serialize};

/// Identifier of a token on the track.
///
/// Tokens are named by a single character (`'r'`, `'y'`, `'w'`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub char);

impl TokenId {
    /// Create a token ID.
    #[must_use]
    pub const fn new(name: char) -> Self {
        Self(name)
    }

    /// Get the token's name.
    #[must_use]
    pub const fn name(self) -> char {
        self.0
    }
}

impl From<char> for TokenId {
    fn from(name: char) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A die in the round's pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DieId {
    /// The die belonging to one race token.
    Race(TokenId),
    /// The die shared by both reverse tokens.
    Reverse,
}

impl DieId {
    /// Check if this is the shared reverse die.
    #[must_use]
    pub const fn is_reverse(self) -> bool {
        matches!(self, DieId::Reverse)
    }
}

impl std::fmt::Display for DieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DieId::Race(token) => write!(f, "{}", token),
            DieId::Reverse => write!(f, "reverse"),
        }
    }
}

/// Hazard marker on a cell.
///
/// A token whose move ends on a hazard is pushed one further cell in its
/// direction of travel (`Boost`) or one cell back against it (`Setback`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hazard {
    /// No marker.
    #[default]
    None,
    /// +1 marker.
    Boost,
    /// -1 marker.
    Setback,
}

impl Hazard {
    /// Signed effect value: `+1`, `-1` or `0`.
    #[must_use]
    pub const fn effect(self) -> i32 {
        match self {
            Hazard::None => 0,
            Hazard::Boost => 1,
            Hazard::Setback => -1,
        }
    }

    /// Check if the cell carries no marker.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Hazard::None)
    }
}

impl std::fmt::Display for Hazard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Hazard::None => write!(f, "0"),
            Hazard::Boost => write!(f, "+1"),
            Hazard::Setback => write!(f, "-1"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_display() {
        assert_eq!(format!("{}", TokenId::new('g')), "g");
        assert_eq!(TokenId::from('k').name(), 'k');
    }

    #[test]
    fn test_die_display() {
        assert_eq!(format!("{}", DieId::Race(TokenId::new('b'))), "b");
        assert_eq!(format!("{}", DieId::Reverse), "reverse");
        assert!(DieId::Reverse.is_reverse());
        assert!(!DieId::Race(TokenId::new('b')).is_reverse());
    }

    #[test]
    fn test_hazard_effect() {
        assert_eq!(Hazard::None.effect(), 0);
        assert_eq!(Hazard::Boost.effect(), 1);
        assert_eq!(Hazard::Setback.effect(), -1);
        assert_eq!(Hazard::default(), Hazard::None);
    }

    #[test]
    fn test_serialization() {
        let die = DieId::Race(TokenId::new('y'));
        let json = serde_json::to_string(&die).unwrap();
        let deserialized: DieId = serde_json::from_str(&json).unwrap();
        assert_eq!(die, deserialized);
    }
}
