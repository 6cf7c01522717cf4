//! Property-based tests for board invariants.

use proptest::prelude::*;

use camel_race::core::{BoardError, DieId, Hazard, RaceConfig, TokenId};
use camel_race::track::Board;

/// Strategy: a start cell for each of the seven default tokens, far enough
/// from both ends that a single roll cannot end the race.
fn placements_strategy() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(3..13i32, 7)
}

/// Strategy: a die index into the default pool and a face.
fn roll_strategy() -> impl Strategy<Value = (usize, u8)> {
    (0..6usize, 1..=3u8)
}

fn board_from(positions: &[i32]) -> Board {
    let config = RaceConfig::default();
    let placements: Vec<_> = config.all_tokens().zip(positions.iter().copied()).collect();
    let mut board = Board::new(config).unwrap();
    board.initialize(&placements).unwrap();
    board
}

/// Roll the die at `index` in the default pool, naming `w` for the shared die.
fn roll(board: &mut Board, index: usize, face: u8) -> Result<(), BoardError> {
    let token = match board.config().dice().nth(index) {
        Some(DieId::Race(token)) => token,
        _ => board.config().reverse_tokens[0],
    };
    board.apply_move(token, face).map(|_| ())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // 1. Every placed race token appears exactly once in the ranking
    #[test]
    fn ranking_lists_each_race_token(positions in placements_strategy()) {
        let board = board_from(&positions);
        let ranking = board.current_ranking();

        prop_assert_eq!(ranking.len(), 5);
        for token in &board.config().race_tokens {
            prop_assert_eq!(ranking.iter().filter(|t| *t == token).count(), 1);
        }
    }

    // 2. A clone looks exactly like its source
    #[test]
    fn clone_matches_source(
        positions in placements_strategy(),
        rolls in prop::collection::vec(roll_strategy(), 0..5),
    ) {
        let mut board = board_from(&positions);
        for (index, face) in rolls {
            let _ = roll(&mut board, index, face);
        }

        let copy = board.clone();
        prop_assert_eq!(copy.track_snapshot(), board.track_snapshot());
        prop_assert_eq!(copy.current_ranking(), board.current_ranking());
        prop_assert_eq!(copy.used_dice(), board.used_dice());
        prop_assert!(copy.arena().is_consistent());
    }

    // 3. Moves on a clone never reach the source
    #[test]
    fn clone_moves_are_isolated(
        positions in placements_strategy(),
        rolls in prop::collection::vec(roll_strategy(), 1..5),
    ) {
        let board = board_from(&positions);
        let before = board.track_snapshot();

        let mut copy = board.clone();
        for (index, face) in rolls {
            let _ = roll(&mut copy, index, face);
        }

        prop_assert_eq!(board.track_snapshot(), before);
        prop_assert!(board.used_dice().is_empty());
    }

    // 4. Stacks stay well formed after any sequence of moves
    #[test]
    fn arena_stays_consistent(
        positions in placements_strategy(),
        hazard_at in 1..15i32,
        setback in any::<bool>(),
        rolls in prop::collection::vec(roll_strategy(), 1..8),
    ) {
        let mut board = board_from(&positions);
        let hazard = if setback { Hazard::Setback } else { Hazard::Boost };
        board.place_hazard(hazard, hazard_at).unwrap();

        for (index, face) in rolls {
            let _ = roll(&mut board, index, face);
            prop_assert!(board.arena().is_consistent());
            prop_assert_eq!(board.current_ranking().len(), 5);
        }
    }

    // 5. A hazard is accepted exactly when no hazard is on or next to its cell
    #[test]
    fn hazard_placement_follows_adjacency(
        attempts in prop::collection::vec((0..16i32, any::<bool>()), 0..12),
    ) {
        let mut board = Board::new(RaceConfig::default()).unwrap();
        for (position, boost) in attempts {
            let hazard = if boost { Hazard::Boost } else { Hazard::Setback };
            let crowded = (position - 1..=position + 1).any(|p| !board.hazard_at(p).is_none());
            let expected = if crowded {
                Err(BoardError::AdjacentHazard { position })
            } else {
                Ok(())
            };

            prop_assert_eq!(board.place_hazard(hazard, position), expected);
        }

        for position in 0..15 {
            prop_assert!(
                board.hazard_at(position).is_none() || board.hazard_at(position + 1).is_none(),
                "adjacent hazards at {} and {}", position, position + 1
            );
        }
    }

    // 6. A die cannot be rolled twice in a round, however far the round got
    #[test]
    fn die_reuse_rejected(
        positions in prop::collection::vec(3..10i32, 7),
        order in Just((0..6usize).collect::<Vec<_>>()).prop_shuffle(),
        rolled in 1..=5usize,
        repeat in any::<prop::sample::Index>(),
        face in 1..=3u8,
    ) {
        let mut board = board_from(&positions);
        for &index in &order[..rolled] {
            roll(&mut board, index, 1).unwrap();
        }

        let index = order[repeat.index(rolled)];
        let die = board.config().dice().nth(index).unwrap();
        prop_assert_eq!(roll(&mut board, index, face), Err(BoardError::DiceAlreadyUsed(die)));
    }

    // 7. Every rank's percentages sum to 100
    #[test]
    fn prediction_ranks_sum_to_100(positions in placements_strategy()) {
        let mut board = board_from(&positions);
        for token in ['r', 'y', 'g'] {
            board.apply_move(TokenId(token), 1).unwrap();
        }

        let prediction = board.predict_ranking().unwrap();
        for rank in prediction.ranks() {
            prop_assert!((rank.total() - 100.0).abs() < 1e-9);
        }
    }
}
