//! Simplicial interpolation of floater combos.
//!
//! - [`orthoscheme`]: canonical cube decomposition and its key encoding
//! - [`barycentric`]: coordinates of a point in an n-simplex
//! - [`space`]: [`TriSpace`], the cached triangulation of one floater group

pub mod barycentric;
pub mod orthoscheme;
pub mod space;

pub use barycentric::{Barycentric, barycentric};
pub use orthoscheme::{SimplexKey, adjacent_simplices, point_to_simplex, simplex_corners};
pub use space::{Corner, FloaterPoint, FloaterWeights, RefinedSimplex, TriSpace};
