//! The track: position stacks and the board built on them.
//!
//! - `stack`: arena of vertically linked cell and token nodes
//! - `board`: cells, token lookup, hazards, dice bookkeeping

pub mod stack;
pub mod board;

pub use stack::{Label, NodeId, StackArena, StackNode};
pub use board::{Board, CellSnapshot, DiceList, Roll};
