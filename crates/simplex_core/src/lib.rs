//! Core building blocks of the Simplex rig solver.
//!
//! - [`errors`]: the crate-wide [`SimplexError`] and [`Result`] alias
//! - [`math`]: float tolerances, input rectification and the soft minimum
//! - [`shape`]: named output channels
//! - [`progression`]: curves mapping an activation to weighted shapes

pub mod errors;
pub mod math;
pub mod progression;
pub mod shape;

pub use errors::{Result, SimplexError};
pub use math::{EPS, MAX_VALUE, Rectified, soft_min};
pub use progression::{Interpolation, ProgPair, Progression, ShapeWeights};
pub use shape::Shape;
