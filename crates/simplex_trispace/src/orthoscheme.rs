//! Schlafli orthoscheme encoding of the unit hypercube.
//!
//! Sorting a point's axes by descending magnitude picks one of the
//! `n! * 2^n` orthoschemes that exactly partition the cube `[-1, 1]^n`.
//! A simplex is written as the walk from the origin to the far corner:
//! a leading `0` followed by the signed, 1-based axis taken at each step.
//! `[0, -2, 1, 3]` starts at the origin, steps to `(0, -1, 0)`, then to
//! `(1, -1, 0)`, then to `(1, -1, 1)`.

use smallvec::SmallVec;

use simplex_core::math::{is_positive, is_zero};

/// Signed-axis encoding of an orthoscheme, always starting with `0`.
pub type SimplexKey = SmallVec<[i32; 8]>;

/// The orthoscheme containing `point`.
///
/// Ties in magnitude keep axis order, so a point on a shared face maps to a
/// single, stable key.
#[must_use]
pub fn point_to_simplex(point: &[f64]) -> SimplexKey {
    let mut signed: SmallVec<[(i32, f64); 8]> = point
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let axis = (i + 1) as i32;
            if is_positive(v) { (axis, v) } else { (-axis, -v) }
        })
        .collect();
    signed.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut key = SimplexKey::with_capacity(point.len() + 1);
    key.push(0);
    key.extend(signed.iter().map(|&(axis, _)| axis));
    key
}

/// Every orthoscheme whose closure contains `point`, up to `eps`.
///
/// Axes whose magnitudes tie within `eps` are branched over in every order.
/// Once all remaining coordinates are zero both signs are emitted, since the
/// point then sits on the boundary between the positive and negative halves.
#[must_use]
pub fn adjacent_simplices(point: &[f64], eps: f64) -> Vec<SimplexKey> {
    let axes: SmallVec<[i32; 8]> = (1..=point.len() as i32).collect();
    let mut prefix = SimplexKey::new();
    prefix.push(0);
    let mut out = Vec::new();
    collect_adjacent(point, &axes, &mut prefix, &mut out, eps);
    out
}

fn collect_adjacent(
    point: &[f64],
    axes: &[i32],
    prefix: &mut SimplexKey,
    out: &mut Vec<SimplexKey>,
    eps: f64,
) {
    if point.is_empty() {
        out.push(prefix.clone());
        return;
    }

    let max_abs = point.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    let at_zero = is_zero(max_abs);

    for (i, &v) in point.iter().enumerate() {
        if max_abs - v.abs() >= eps {
            continue;
        }
        let directions: &[i32] = if at_zero {
            &[-1, 1]
        } else if is_positive(v) {
            &[1]
        } else {
            &[-1]
        };

        let sub_point: SmallVec<[f64; 8]> = without(point, i);
        let sub_axes: SmallVec<[i32; 8]> = without(axes, i);
        for &direction in directions {
            prefix.push(axes[i] * direction);
            collect_adjacent(&sub_point, &sub_axes, prefix, out, eps);
            prefix.pop();
        }
    }
}

fn without<A>(items: &[A::Item], skip: usize) -> SmallVec<A>
where
    A: smallvec::Array,
    A::Item: Copy,
{
    items
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != skip)
        .map(|(_, &x)| x)
        .collect()
}

/// Literal corner coordinates of an orthoscheme, origin first.
#[must_use]
pub fn simplex_corners(key: &[i32]) -> Vec<Vec<f64>> {
    let dim = key.len().saturating_sub(1);
    let mut current = vec![0.0; dim];
    key.iter()
        .map(|&step| {
            if step != 0 {
                current[step.unsigned_abs() as usize - 1] = f64::from(step.signum());
            }
            current.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_to_simplex_orders_by_magnitude() {
        assert_eq!(point_to_simplex(&[0.2, -0.9, 0.5]).as_slice(), &[0, -2, 3, 1]);
    }

    #[test]
    fn test_simplex_corners_walk() {
        let corners = simplex_corners(&[0, -2, 1]);
        assert_eq!(corners, vec![vec![0.0, 0.0], vec![0.0, -1.0], vec![1.0, -1.0]]);
    }

    #[test]
    fn test_adjacent_on_diagonal_hits_both_sides() {
        let keys = adjacent_simplices(&[0.5, 0.5], 0.01);
        assert_eq!(keys.len(), 2);
        assert!(keys.iter().any(|k| k.as_slice() == [0, 1, 2]));
        assert!(keys.iter().any(|k| k.as_slice() == [0, 2, 1]));
    }

    #[test]
    fn test_adjacent_interior_point_is_unique() {
        let keys = adjacent_simplices(&[0.7, 0.3, 0.5], 0.01);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].as_slice(), &[0, 1, 3, 2]);
    }
}
