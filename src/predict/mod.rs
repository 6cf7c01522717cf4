//! Round-outcome prediction.
//!
//! ## Overview
//!
//! Prediction is exact, not sampled: the enumerator explores every order in
//! which the remaining dice can be rolled and every face each can show, then
//! the predictor turns the weighted rankings into percentages.
//!
//! ## Usage
//!
//! ```
//! use camel_race::core::{RaceConfig, TokenId};
//! use camel_race::track::Board;
//!
//! let mut board = Board::new(RaceConfig::default()).unwrap();
//! board.initialize(&[
//!     (TokenId('r'), 0), (TokenId('y'), 0), (TokenId('g'), 1),
//!     (TokenId('b'), 1), (TokenId('p'), 2), (TokenId('w'), 15), (TokenId('k'), 14),
//! ]).unwrap();
//! // Roll a few dice so the example enumerates quickly
//! board.apply_move(TokenId('r'), 1).unwrap();
//! board.apply_move(TokenId('y'), 2).unwrap();
//! board.apply_move(TokenId('g'), 3).unwrap();
//!
//! let prediction = board.predict_ranking().unwrap();
//! for (token, percent) in prediction.first().unwrap().sorted() {
//!     println!("{}: {:.2}%", token, percent);
//! }
//! ```

pub mod enumerator;
pub mod predictor;
pub mod stats;

pub use enumerator::{OutcomeEnumerator, Outcomes, WeightedRanking};
pub use predictor::{HazardImpact, Prediction, RankDistribution, RankPredictor};
pub use stats::EnumerationStats;
