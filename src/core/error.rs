//! Board operation errors.
//!
//! Every board operation validates before it mutates, so an `Err` always
//! leaves the board exactly as it was.

use thiserror::Error;

use super::token::{DieId, TokenId};

/// Failure of a board operation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("no such token `{0}`")]
    UnknownToken(TokenId),

    #[error("token `{0}` is placed more than once")]
    DuplicatePlacement(TokenId),

    #[error("token `{0}` is not on the track")]
    TokenNotPlaced(TokenId),

    #[error("position {position} is off the track")]
    OffTrack { position: i32 },

    #[error("cannot place a hazard at {position}: a hazard is on or next to it")]
    AdjacentHazard { position: i32 },

    #[error("no hazard to remove at {position}")]
    NoHazardToRemove { position: i32 },

    #[error("die {0} was already rolled this round")]
    DiceAlreadyUsed(DieId),

    #[error("face {0} is not on the die")]
    InvalidFace(u8),

    #[error("the round has already rolled all its dice")]
    RoundOver,

    #[error("the race has already finished")]
    RaceFinished,

    #[error("no remaining die has a token on the track")]
    NothingToMove,
}
