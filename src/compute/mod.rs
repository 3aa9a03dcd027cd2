//! Compute module - Grid storage, neighbourhoods and the evolution engine.

mod automaton;
mod grid;
mod neighbourhood;

pub use automaton::*;
pub use grid::Grid;
pub use neighbourhood::*;
