#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! # Simplex
//!
//! Blendshape combination solving for facial rigs.
//!
//! A scene definition (JSON) lists shapes, the progressions that blend
//! between them, and the controllers that drive those progressions:
//!
//! - **Sliders** read one input value each.
//! - **Combos** fire when several sliders reach their corner targets together.
//! - **Floaters** are combos with in-between targets, interpolated through a
//!   triangulated slider space.
//! - **Traversals** measure progress along a path between two poses.
//!
//! ```no_run
//! use simplex::Solver;
//!
//! # fn main() -> simplex::Result<()> {
//! let definition = std::fs::read_to_string("face.json").unwrap_or_default();
//! let mut solver = Solver::from_json(&definition)?;
//! let weights = solver.solve(&[0.5, 0.0, 1.0]);
//! println!("rest weight: {}", weights[0]);
//! # Ok(())
//! # }
//! ```

pub use simplex_core;
pub use simplex_solver;
pub use simplex_trispace;

pub use simplex_core::{
    EPS, Interpolation, MAX_VALUE, ProgPair, Progression, Rectified, Result, Shape, ShapeWeights,
    SimplexError, soft_min,
};
pub use simplex_solver::{
    ComboPair, ComboSolve, ComboState, ControlRef, ControllerKind, ShapeController, Solver,
    TraversalState, solve_state,
};
pub use simplex_trispace::{Corner, FloaterPoint, TriSpace};
