//! The race board: cells, tokens, hazards and the round's dice.
//!
//! ## Coordinates
//!
//! Cells are created with coordinates `0..track_length`. An overflowing move
//! extends the track by one cell at either end; the new cell takes the next
//! coordinate outward (`last + 1` or `first - 1`) and existing coordinates
//! never change.
//!
//! ## Cloning
//!
//! `Board::clone` rebuilds every position stack into a fresh arena, so a
//! clone can be mutated freely without the source board observing anything.
//! Prediction relies on this for every branch it explores.
//!
//! ```
//! use camel_race::core::{RaceConfig, TokenId};
//! use camel_race::track::Board;
//!
//! let mut board = Board::new(RaceConfig::default()).unwrap();
//! board.initialize(&[(TokenId('r'), 0), (TokenId('y'), 0)]).unwrap();
//!
//! // Last placed is on top, so it leads
//! assert_eq!(board.current_ranking().as_slice(), &[TokenId('y'), TokenId('r')]);
//! ```

use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::stack::{Label, NodeId, StackArena};
use crate::core::{BoardError, ConfigError, DieId, GameRng, Hazard, RaceConfig, TokenId, TokenList};
use crate::predict::{HazardImpact, OutcomeEnumerator, Prediction, RankPredictor};
use crate::rules::MovementEngine;

/// Dice list with room for a full default round inline.
pub type DiceList = SmallVec<[DieId; 8]>;

/// Read-only view of one cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub position: i32,
    pub hazard: Hazard,
    /// Every token on the cell, topmost first.
    pub tokens: TokenList,
}

/// Result of `Board::roll_random`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roll {
    /// Token named by the roll (the nominal token for the shared die).
    pub token: TokenId,
    pub face: u8,
    /// Final ranking if the roll ended the race.
    pub terminal: Option<TokenList>,
}

/// Race board.
#[derive(Debug)]
pub struct Board {
    config: RaceConfig,

    /// Every cell and token node.
    arena: StackArena,

    /// Cell nodes, lowest coordinate first.
    cells: im::Vector<NodeId>,

    /// Hazard per cell, aligned with `cells`.
    hazards: im::Vector<Hazard>,

    /// Coordinate of `cells[0]`.
    origin: i32,

    /// Token -> its node.
    tokens: FxHashMap<TokenId, NodeId>,

    /// Dice rolled this round, in roll order.
    used_dice: DiceList,

    /// Ranking fixed by a track overflow.
    finished: Option<TokenList>,
}

impl Board {
    /// Create an empty board.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is not playable.
    pub fn new(config: RaceConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let token_count = config.race_tokens.len() + config.reverse_tokens.len();
        let mut arena = StackArena::with_capacity(config.track_length + token_count + 2);

        let cells: im::Vector<NodeId> = (0..config.track_length as i32)
            .map(|position| arena.alloc(Label::Cell(position)))
            .collect();
        let hazards = std::iter::repeat(Hazard::None).take(config.track_length).collect();

        let mut tokens = FxHashMap::default();
        for token in config.all_tokens() {
            tokens.insert(token, arena.alloc(Label::Token(token)));
        }

        Ok(Self {
            config,
            arena,
            cells,
            hazards,
            origin: 0,
            tokens,
            used_dice: DiceList::new(),
            finished: None,
        })
    }

    // === Accessors ===

    /// The configuration this board was built with.
    #[must_use]
    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    /// Underlying stack arena.
    #[must_use]
    pub fn arena(&self) -> &StackArena {
        &self.arena
    }

    /// Current number of cells (grows when the track is extended).
    #[must_use]
    pub fn track_len(&self) -> usize {
        self.cells.len()
    }

    /// Lowest cell coordinate.
    #[must_use]
    pub fn first_position(&self) -> i32 {
        self.origin
    }

    /// Highest cell coordinate.
    #[must_use]
    pub fn last_position(&self) -> i32 {
        self.origin + self.cells.len() as i32 - 1
    }

    /// Hazard on a cell. Off-track positions have none.
    #[must_use]
    pub fn hazard_at(&self, position: i32) -> Hazard {
        self.index_of(position)
            .map_or(Hazard::None, |index| self.hazards[index])
    }

    /// Dice already rolled this round.
    #[must_use]
    pub fn used_dice(&self) -> &[DieId] {
        &self.used_dice
    }

    /// Check if a die was rolled this round.
    #[must_use]
    pub fn is_die_used(&self, die: DieId) -> bool {
        self.used_dice.contains(&die)
    }

    /// Dice still in the pool, in config order.
    #[must_use]
    pub fn available_dice(&self) -> DiceList {
        self.config
            .dice()
            .filter(|die| !self.is_die_used(*die))
            .collect()
    }

    /// Check if rolling `die` would move a token on the track.
    ///
    /// The shared die can move as long as either reverse token is placed.
    #[must_use]
    pub fn die_can_move(&self, die: DieId) -> bool {
        match die {
            DieId::Race(token) => self.is_placed(token),
            DieId::Reverse => self
                .config
                .reverse_tokens
                .iter()
                .any(|&token| self.is_placed(token)),
        }
    }

    /// Check if the round has rolled all the dice it allows.
    #[must_use]
    pub fn round_over(&self) -> bool {
        self.used_dice.len() >= self.config.round_length()
    }

    /// Final ranking, once a track overflow has ended the race.
    #[must_use]
    pub fn finished(&self) -> Option<&[TokenId]> {
        self.finished.as_deref()
    }

    /// Check if a token sits on a cell.
    #[must_use]
    pub fn is_placed(&self, token: TokenId) -> bool {
        self.tokens
            .get(&token)
            .is_some_and(|&node| self.arena.label(self.arena.bottommost(node)).cell().is_some())
    }

    /// Coordinate of the cell a token's stack stands on.
    ///
    /// # Errors
    ///
    /// `UnknownToken` for unregistered tokens, `TokenNotPlaced` for tokens
    /// that have no cell yet.
    pub fn token_position(&self, token: TokenId) -> Result<i32, BoardError> {
        let node = self.token_node(token)?;
        self.arena
            .label(self.arena.bottommost(node))
            .cell()
            .ok_or(BoardError::TokenNotPlaced(token))
    }

    // === Setup and placement ===

    /// Place tokens in the given order; later placements stack on top.
    ///
    /// # Errors
    ///
    /// Fails without placing anything if a token is unknown, named twice,
    /// or targets a position off the track.
    pub fn initialize(&mut self, placements: &[(TokenId, i32)]) -> Result<(), BoardError> {
        let mut seen = TokenList::new();
        for &(token, position) in placements {
            self.token_node(token)?;
            if seen.contains(&token) {
                return Err(BoardError::DuplicatePlacement(token));
            }
            self.cell_index(position)?;
            seen.push(token);
        }

        for &(token, position) in placements {
            self.place_token(token, position)?;
        }
        Ok(())
    }

    /// Move a token (with everything on it) to the top of a cell's stack.
    ///
    /// # Errors
    ///
    /// `UnknownToken` or `OffTrack`.
    pub fn place_token(&mut self, token: TokenId, position: i32) -> Result<(), BoardError> {
        let node = self.token_node(token)?;
        let index = self.cell_index(position)?;
        self.put_on_top(node, index);
        debug!("placed {} on top of cell {}", token, position);
        Ok(())
    }

    /// Move a token (with everything on it) to the bottom of a cell's stack,
    /// underneath any tokens already there.
    ///
    /// # Errors
    ///
    /// `UnknownToken` or `OffTrack`.
    pub fn place_token_underneath(&mut self, token: TokenId, position: i32) -> Result<(), BoardError> {
        let node = self.token_node(token)?;
        let index = self.cell_index(position)?;
        self.put_underneath(node, index);
        debug!("placed {} underneath cell {}", token, position);
        Ok(())
    }

    /// Place a boost or setback hazard, or remove one with `Hazard::None`.
    ///
    /// # Errors
    ///
    /// - `OffTrack` for positions outside the track
    /// - `AdjacentHazard` if a hazard is on the cell or either neighbour
    /// - `NoHazardToRemove` when removing from a cell without a hazard
    pub fn place_hazard(&mut self, hazard: Hazard, position: i32) -> Result<(), BoardError> {
        let index = self.cell_index(position)?;

        if hazard.is_none() {
            if self.hazards[index].is_none() {
                return Err(BoardError::NoHazardToRemove { position });
            }
        } else if (position - 1..=position + 1).any(|p| !self.hazard_at(p).is_none()) {
            return Err(BoardError::AdjacentHazard { position });
        }

        self.hazards.set(index, hazard);
        debug!("hazard {} at cell {}", hazard, position);
        Ok(())
    }

    /// Positions where a player may choose to put `hazard`.
    ///
    /// For a marker: every cell except the first that holds no tokens and
    /// has no hazard on itself or a neighbour. For removal: every cell
    /// holding a hazard.
    #[must_use]
    pub fn hazard_targets(&self, hazard: Hazard) -> Vec<i32> {
        let positions = self.first_position()..=self.last_position();
        if hazard.is_none() {
            return positions
                .filter(|&p| !self.hazard_at(p).is_none())
                .collect();
        }

        positions
            .skip(1)
            .zip(self.cells.iter().skip(1))
            .filter(|&(p, &foot)| {
                self.arena.get(foot).above.is_none()
                    && (p - 1..=p + 1).all(|q| self.hazard_at(q).is_none())
            })
            .map(|(p, _)| p)
            .collect()
    }

    // === Play ===

    /// Roll a die: move `token` by `face` cells.
    ///
    /// `token` names the die; for the shared reverse die either reverse
    /// token may be given. Returns the final ranking if the move ran off the
    /// track and ended the race.
    ///
    /// # Errors
    ///
    /// See [`MovementEngine::resolve`].
    pub fn apply_move(&mut self, token: TokenId, face: u8) -> Result<Option<TokenList>, BoardError> {
        MovementEngine::new(self).resolve(token, face)
    }

    /// Roll a random die from the pool with a random face.
    ///
    /// Only dice that can move a placed token are drawn. When the shared die
    /// is drawn and just one reverse token is placed, that token moves.
    ///
    /// # Errors
    ///
    /// `RaceFinished` after the race ended, `RoundOver` once the round has
    /// rolled all its dice, `NothingToMove` if no remaining die has a token
    /// on the track, or any error from `apply_move`.
    pub fn roll_random(&mut self, rng: &mut GameRng) -> Result<Roll, BoardError> {
        if self.finished.is_some() {
            return Err(BoardError::RaceFinished);
        }
        if self.round_over() {
            return Err(BoardError::RoundOver);
        }

        let movable: DiceList = self
            .available_dice()
            .into_iter()
            .filter(|&die| self.die_can_move(die))
            .collect();
        let die = *rng.choose(&movable).ok_or(BoardError::NothingToMove)?;
        let token = match die {
            DieId::Race(token) => token,
            DieId::Reverse => self.config.reverse_tokens[usize::from(rng.gen_bool(0.5))],
        };
        let face = rng.roll_face(self.config.max_face);

        let terminal = self.apply_move(token, face)?;
        Ok(Roll { token, face, terminal })
    }

    /// Clear hazards and return every die to the pool. Tokens stay put.
    pub fn reset_round(&mut self) {
        self.hazards = std::iter::repeat(Hazard::None).take(self.cells.len()).collect();
        self.used_dice.clear();
        debug!("round reset");
    }

    // === Views ===

    /// Race tokens from leader to last.
    ///
    /// Higher cells lead; on a shared cell the token higher in the stack
    /// leads. Reverse tokens and unplaced tokens are left out.
    #[must_use]
    pub fn current_ranking(&self) -> TokenList {
        let mut ranking = TokenList::new();
        for &foot in self.cells.iter().rev() {
            let top = self.arena.topmost(foot);
            ranking.extend(
                self.arena
                    .downward(top)
                    .filter_map(Label::token)
                    .filter(|&token| self.config.is_race(token)),
            );
        }
        ranking
    }

    /// Every cell, lowest coordinate first.
    #[must_use]
    pub fn track_snapshot(&self) -> Vec<CellSnapshot> {
        self.cells
            .iter()
            .zip(self.hazards.iter())
            .enumerate()
            .map(|(index, (&foot, &hazard))| CellSnapshot {
                position: self.origin + index as i32,
                hazard,
                tokens: self
                    .arena
                    .downward(self.arena.topmost(foot))
                    .filter_map(Label::token)
                    .collect(),
            })
            .collect()
    }

    // === Prediction ===

    /// Rank likelihoods over every way the current round can finish.
    ///
    /// # Errors
    ///
    /// Propagates unexpected move failures from the enumeration.
    pub fn predict_ranking(&self) -> Result<Prediction, BoardError> {
        let outcomes = OutcomeEnumerator::new().enumerate(self)?;
        Ok(RankPredictor::new(&self.config).predict(&outcomes))
    }

    /// Compare predictions with and without a candidate hazard.
    ///
    /// The board itself is left untouched.
    ///
    /// # Errors
    ///
    /// Fails if the hazard could not legally be placed.
    pub fn predict_with_hazard(&self, hazard: Hazard, position: i32) -> Result<HazardImpact, BoardError> {
        let mut what_if = self.clone();
        what_if.place_hazard(hazard, position)?;

        Ok(HazardImpact {
            before: self.predict_ranking()?,
            after: what_if.predict_ranking()?,
        })
    }

    // === Movement support ===

    pub(crate) fn token_node(&self, token: TokenId) -> Result<NodeId, BoardError> {
        self.tokens
            .get(&token)
            .copied()
            .ok_or(BoardError::UnknownToken(token))
    }

    /// Check if `upper` sits directly on `lower`.
    pub(crate) fn rests_on(&self, upper: NodeId, lower: NodeId) -> bool {
        self.arena.get(upper).below == Some(lower)
    }

    pub(crate) fn put_on_top(&mut self, node: NodeId, index: usize) {
        self.arena.detach(node);
        self.arena.attach_on_top(node, self.cells[index]);
    }

    pub(crate) fn put_underneath(&mut self, node: NodeId, index: usize) {
        self.arena.detach(node);
        self.arena.insert_on_foot(node, self.cells[index]);
    }

    /// Append a cell after the last one, returning its index.
    pub(crate) fn extend_end(&mut self) -> usize {
        let position = self.last_position() + 1;
        self.cells.push_back(self.arena.alloc(Label::Cell(position)));
        self.hazards.push_back(Hazard::None);
        debug!("track extended to cell {}", position);
        self.cells.len() - 1
    }

    /// Prepend a cell before the first one, returning its index (always 0).
    pub(crate) fn extend_start(&mut self) -> usize {
        self.origin -= 1;
        self.cells.push_front(self.arena.alloc(Label::Cell(self.origin)));
        self.hazards.push_front(Hazard::None);
        debug!("track extended to cell {}", self.origin);
        0
    }

    pub(crate) fn index_of(&self, position: i32) -> Option<usize> {
        let index = usize::try_from(position - self.origin).ok()?;
        (index < self.cells.len()).then_some(index)
    }

    pub(crate) fn cell_index(&self, position: i32) -> Result<usize, BoardError> {
        self.index_of(position).ok_or(BoardError::OffTrack { position })
    }

    pub(crate) fn mark_used(&mut self, die: DieId) {
        self.used_dice.push(die);
    }

    pub(crate) fn finish(&mut self, ranking: TokenList) {
        debug!("race finished: {:?}", ranking);
        self.finished = Some(ranking);
    }
}

impl Clone for Board {
    /// Rebuild every stack into a new arena.
    fn clone(&self) -> Self {
        let mut arena = StackArena::with_capacity(self.arena.len());
        let mut tokens = FxHashMap::default();

        let cells: im::Vector<NodeId> = self
            .cells
            .iter()
            .map(|&foot| {
                let new_foot = self.arena.copy_chain_into(foot, &mut arena);
                let mut next = arena.get(new_foot).above;
                while let Some(node) = next {
                    if let Label::Token(token) = arena.label(node) {
                        tokens.insert(token, node);
                    }
                    next = arena.get(node).above;
                }
                new_foot
            })
            .collect();

        for token in self.config.all_tokens() {
            if !tokens.contains_key(&token) {
                tokens.insert(token, arena.alloc(Label::Token(token)));
            }
        }

        Self {
            config: self.config.clone(),
            arena,
            cells,
            hazards: self.hazards.clone(),
            origin: self.origin,
            tokens,
            used_dice: self.used_dice.clone(),
            finished: self.finished.clone(),
        }
    }
}
