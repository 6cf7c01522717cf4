//! Die resolution.
//!
//! `MovementEngine` borrows a board mutably for one roll and turns the die
//! outcome into a token displacement:
//!
//! 1. Pick the token that actually moves (the shared reverse die may move
//!    the other reverse token).
//! 2. Step `face` cells: forward for race tokens, backward for reverse tokens.
//! 3. A hazard on the landing cell pushes one further cell (boost) or pulls
//!    one cell back (setback) relative to the direction of travel.
//! 4. Landing past either end of the track extends it by one cell, puts the
//!    token there and ends the race.
//! 5. Otherwise land on top of the target stack, or underneath it after a
//!    setback.
//! 6. Mark the die as rolled.

use log::trace;

use crate::core::{BoardError, DieId, TokenId, TokenList};
use crate::track::Board;

/// Resolves one die roll against a board.
pub struct MovementEngine<'a> {
    board: &'a mut Board,
}

impl<'a> MovementEngine<'a> {
    /// Borrow a board for a single resolution.
    pub fn new(board: &'a mut Board) -> Self {
        Self { board }
    }

    /// Move `token`'s die by `face`.
    ///
    /// Returns the final ranking if the move ran off the track.
    ///
    /// # Errors
    ///
    /// Checked in this order; nothing on the board changes when any of
    /// these is returned:
    /// - `UnknownToken` if `token` has no die
    /// - `InvalidFace` for faces outside `1..=max_face`
    /// - `DiceAlreadyUsed` if the die was rolled this round
    /// - `RoundOver` once the round has rolled all its dice
    /// - `RaceFinished` once a previous move ended the race
    /// - `TokenNotPlaced` if the moving token has no cell
    pub fn resolve(mut self, token: TokenId, face: u8) -> Result<Option<TokenList>, BoardError> {
        let die = self
            .board
            .config()
            .die_for(token)
            .ok_or(BoardError::UnknownToken(token))?;
        if face == 0 || face > self.board.config().max_face {
            return Err(BoardError::InvalidFace(face));
        }
        if self.board.is_die_used(die) {
            return Err(BoardError::DiceAlreadyUsed(die));
        }
        if self.board.round_over() {
            return Err(BoardError::RoundOver);
        }
        if self.board.finished().is_some() {
            return Err(BoardError::RaceFinished);
        }

        let (mover, step) = match die {
            DieId::Race(_) => (token, i32::from(face)),
            DieId::Reverse => (self.reverse_mover(token)?, -i32::from(face)),
        };
        let node = self.board.token_node(mover)?;
        let position = self.board.token_position(mover)?;

        let raw_target = position + step;
        let hazard = self.board.hazard_at(raw_target);
        let target = raw_target + hazard.effect() * step.signum();
        trace!(
            "{} rolls {}: {} moves {} -> {} (hazard {})",
            die, face, mover, position, target, hazard
        );

        // Validation is done; the board changes from here on.
        let terminal = if target > self.board.last_position() {
            let index = self.board.extend_end();
            self.board.put_on_top(node, index);
            Some(self.board.current_ranking())
        } else if target < self.board.first_position() {
            let index = self.board.extend_start();
            self.board.put_on_top(node, index);
            Some(self.board.current_ranking())
        } else {
            let index = self.board.cell_index(target)?;
            if hazard.effect() < 0 {
                self.board.put_underneath(node, index);
            } else {
                self.board.put_on_top(node, index);
            }
            None
        };

        self.board.mark_used(die);
        if let Some(ranking) = &terminal {
            self.board.finish(ranking.clone());
        }
        Ok(terminal)
    }

    /// Decide which reverse token the shared die moves.
    ///
    /// In order: the lower of two directly stacked reverse tokens, then the
    /// only one on the track, then the token the die named.
    fn reverse_mover(&self, nominal: TokenId) -> Result<TokenId, BoardError> {
        let [first, second] = self.board.config().reverse_tokens;
        let first_node = self.board.token_node(first)?;
        let second_node = self.board.token_node(second)?;

        if self.board.rests_on(first_node, second_node) {
            return Ok(second);
        }
        if self.board.rests_on(second_node, first_node) {
            return Ok(first);
        }

        match (self.board.is_placed(first), self.board.is_placed(second)) {
            (true, false) => Ok(first),
            (false, true) => Ok(second),
            _ => Ok(nominal),
        }
    }
}
