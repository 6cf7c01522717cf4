//! Exhaustive enumeration of the rest of a round.
//!
//! Starting from a board, every unused die is tried at every face, each on
//! its own clone, and the walk recurses until all dice of the round are
//! rolled or a move ends the race.
//!
//! ## Weighting
//!
//! A race die has `max_face` outcomes while the shared reverse die has
//! `2 * max_face` (either token at any face). To keep both dice equally
//! likely, every outcome reached through a race die counts twice, and so
//! does every ranking recorded beneath it. Multiplicities compound down the
//! tree and are stored as a `weight` instead of repeated rankings.

use std::time::Instant;

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::stats::EnumerationStats;
use crate::core::{BoardError, DieId, TokenId, TokenList};
use crate::track::Board;

/// A ranking and how many times it occurs in the outcome multiset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedRanking {
    pub ranking: TokenList,
    pub weight: u64,
}

/// Multiset of rankings produced by an enumeration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outcomes {
    entries: Vec<WeightedRanking>,
}

impl Outcomes {
    /// Create an empty outcome set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `ranking` with multiplicity `weight`.
    pub fn push(&mut self, ranking: TokenList, weight: u64) {
        self.entries.push(WeightedRanking { ranking, weight });
    }

    /// Number of recorded entries (before expanding weights).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Size of the multiset: sum of all weights.
    #[must_use]
    pub fn total_weight(&self) -> u64 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    /// Iterate over weighted entries in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &WeightedRanking> {
        self.entries.iter()
    }

    /// Iterate over the multiset, repeating each ranking `weight` times.
    pub fn expanded(&self) -> impl Iterator<Item = &[TokenId]> {
        self.entries
            .iter()
            .flat_map(|e| std::iter::repeat(e.ranking.as_slice()).take(e.weight as usize))
    }
}

/// Walks every completion of the current round.
#[derive(Debug, Default)]
pub struct OutcomeEnumerator {
    stats: EnumerationStats,
}

impl OutcomeEnumerator {
    /// Create a new enumerator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics of the last run.
    #[must_use]
    pub fn stats(&self) -> &EnumerationStats {
        &self.stats
    }

    /// Enumerate every way the board's round can finish.
    ///
    /// The board is only read; each explored move happens on a clone.
    ///
    /// # Errors
    ///
    /// Returns a `BoardError` only if a move fails for a reason other than
    /// its token not being on the track (such dice are skipped).
    pub fn enumerate(&mut self, board: &Board) -> Result<Outcomes, BoardError> {
        self.stats.reset();
        let start = Instant::now();

        let mut outcomes = Outcomes::new();
        self.expand(board, 1, 0, &mut outcomes)?;

        self.stats.time_us = start.elapsed().as_micros() as u64;
        debug!(
            "enumerated {} outcomes (weight {}) from {} clones in {}us ({:.0} clones/s)",
            outcomes.len(),
            outcomes.total_weight(),
            self.stats.clones,
            self.stats.time_us,
            self.stats.clones_per_second()
        );
        Ok(outcomes)
    }

    fn expand(
        &mut self,
        board: &Board,
        weight: u64,
        depth: u16,
        outcomes: &mut Outcomes,
    ) -> Result<(), BoardError> {
        self.stats.max_depth = self.stats.max_depth.max(depth);

        if board.finished().is_some() || board.round_over() {
            self.stats.leaves += 1;
            outcomes.push(board.current_ranking(), weight);
            return Ok(());
        }

        let mut moved = false;
        for die in board.available_dice() {
            let tokens: SmallVec<[TokenId; 2]> = match die {
                DieId::Race(token) => SmallVec::from_slice(&[token]),
                DieId::Reverse => SmallVec::from(board.config().reverse_tokens),
            };
            let branch_weight = if die.is_reverse() { weight } else { weight * 2 };

            for token in tokens {
                for face in board.config().faces() {
                    let mut next = board.clone();
                    self.stats.clones += 1;

                    match next.apply_move(token, face) {
                        Ok(Some(ranking)) => {
                            moved = true;
                            self.stats.terminal += 1;
                            outcomes.push(ranking, branch_weight);
                        }
                        Ok(None) => {
                            moved = true;
                            self.stats.branches += 1;
                            self.expand(&next, branch_weight, depth + 1, outcomes)?;
                        }
                        Err(BoardError::TokenNotPlaced(missing)) => {
                            trace!("skipping die {}: {} is not on the track", die, missing);
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }

        // Nothing left that can move: the round ends where it stands.
        if !moved {
            self.stats.leaves += 1;
            outcomes.push(board.current_ranking(), weight);
        }
        Ok(())
    }
}
