//! Barycentric coordinates over arbitrary-dimension simplices.
//!
//! The corner matrix is solved with a column-pivoted QR so degenerate
//! simplices are reported instead of producing garbage weights.

use nalgebra::{DMatrix, DVector};
use smallvec::SmallVec;

use simplex_core::math::EPS;

/// Barycentric coordinates, one per simplex corner.
pub type Barycentric = SmallVec<[f64; 8]>;

/// Barycentric coordinates of `point` with respect to `corners`.
///
/// Solves `M x = point - last` where column `i` of `M` is
/// `corners[i] - last`, then appends `1 - sum(x)` for the last corner.
/// Returns `None` when the corners don't span the space (wrong corner count
/// or a degenerate simplex), which callers treat as "not inside".
#[must_use]
pub fn barycentric<P: AsRef<[f64]>>(corners: &[P], point: &[f64]) -> Option<Barycentric> {
    let dim = point.len();
    if dim == 0 || corners.len() != dim + 1 {
        return None;
    }
    let last = corners[dim].as_ref();
    if corners.iter().any(|c| c.as_ref().len() != dim) {
        return None;
    }

    let m = DMatrix::from_fn(dim, dim, |row, col| corners[col].as_ref()[row] - last[row]);
    let rhs = DVector::from_fn(dim, |row, _| point[row] - last[row]);

    let qr = m.col_piv_qr();
    // Pivoting sorts |diag(R)| descending, so rank loss shows up at the tail.
    let diag = qr.r().diagonal();
    let scale = diag.iter().fold(1.0_f64, |m, v| m.max(v.abs()));
    if diag.iter().any(|v| v.abs() <= EPS * scale) {
        return None;
    }
    let x = qr.solve(&rhs)?;
    if x.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let mut out: Barycentric = x.iter().copied().collect();
    let sum: f64 = out.iter().sum();
    out.push(1.0 - sum);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_centroid() {
        let tri = [vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0, 1.0]];
        let b = barycentric(&tri, &[2.0 / 3.0, 1.0 / 3.0]).unwrap();
        for w in &b {
            assert!((w - 1.0 / 3.0).abs() < 1e-9, "{b:?}");
        }
    }

    #[test]
    fn test_outside_point_has_negative_coordinate() {
        let tri = [vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0, 1.0]];
        let b = barycentric(&tri, &[0.2, 0.8]).unwrap();
        assert!(b.iter().any(|&w| w < 0.0));
    }

    #[test]
    fn test_degenerate_simplex_is_rejected() {
        let flat = [vec![0.0, 0.0], vec![1.0, 1.0], vec![0.5, 0.5]];
        assert!(barycentric(&flat, &[0.25, 0.25]).is_none());
    }
}
