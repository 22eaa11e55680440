//! Controllers, definition loading and the [`Solver`].

pub mod combo;
pub mod controller;
mod definition;
pub mod solver;

pub use combo::{ComboPair, ComboSolve, solve_state};
pub use controller::{ComboState, ControlRef, ControllerKind, ShapeController, TraversalState};
pub use solver::Solver;
