//! Movement rules.
//!
//! A die roll is resolved by `MovementEngine`, which holds the board
//! mutably for exactly one resolution and never longer.

pub mod movement;

pub use movement::MovementEngine;
