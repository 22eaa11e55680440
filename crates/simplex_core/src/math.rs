//! Numeric helpers shared by every stage of the solver.
//!
//! All comparisons in the solver go through the tolerance helpers here so
//! that "zero", "positive" and "negative" mean the same thing for the combo
//! veto, the orthoscheme encoding and the barycentric containment test.

/// Absolute tolerance for float comparisons.
pub const EPS: f64 = 1e-6;

/// Input magnitudes are clamped to this value before combination.
pub const MAX_VALUE: f64 = 1.0;

/// Tolerance used when searching for orthoschemes adjacent to a floater point.
pub const ADJACENCY_EPS: f64 = 0.01;

/// Smoothing constant of [`soft_min`].
pub const SOFT_MIN_H: f64 = 0.025;

#[inline]
#[must_use]
pub fn float_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

#[inline]
#[must_use]
pub fn is_zero(a: f64) -> bool {
    float_eq(a, 0.0, EPS)
}

/// `true` for anything not meaningfully below zero (zero counts as positive).
#[inline]
#[must_use]
pub fn is_positive(a: f64) -> bool {
    a > -EPS
}

/// `true` for anything not meaningfully above zero (zero counts as negative).
#[inline]
#[must_use]
pub fn is_negative(a: f64) -> bool {
    a < EPS
}

/// A raw input vector split into clamped magnitude and sign.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rectified {
    /// `min(|raw|, MAX_VALUE)`
    pub clamped: Vec<f64>,
    /// `raw < 0`
    pub inverted: Vec<bool>,
}

impl Rectified {
    #[must_use]
    pub fn new(raw: &[f64]) -> Self {
        let mut out = Self {
            clamped: Vec::with_capacity(raw.len()),
            inverted: Vec::with_capacity(raw.len()),
        };
        for &v in raw {
            out.clamped.push(v.abs().min(MAX_VALUE));
            out.inverted.push(v < 0.0);
        }
        out
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clamped.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clamped.is_empty()
    }
}

/// Smooth approximation of `min(x, y)` for values in `[0, 1]`.
///
/// Agrees with the hard minimum at the corners of the unit square but has no
/// crease along the diagonal, so combos driven by two sliders moving
/// together don't pop. Either operand at zero gives exactly zero.
#[must_use]
pub fn soft_min(x: f64, y: f64) -> f64 {
    if is_zero(x) || is_zero(y) {
        return 0.0;
    }
    let (x, y) = if x < y { (y, x) } else { (x, y) };

    let h = SOFT_MIN_H;
    let d = 2.0 * ((1.0 + h).sqrt() - h.sqrt());
    let s = h.sqrt();
    let z = (x * x + h).sqrt() + (y * y + h).sqrt() - ((x - y) * (x - y) + h).sqrt();
    (z - s) / d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectify_splits_sign() {
        let r = Rectified::new(&[0.5, -0.25, -2.0, 3.0]);
        assert_eq!(r.clamped, vec![0.5, 0.25, 1.0, 1.0]);
        assert_eq!(r.inverted, vec![false, true, true, false]);
    }

    #[test]
    fn test_zero_is_both_signs() {
        assert!(is_positive(0.0));
        assert!(is_negative(0.0));
        assert!(!is_positive(-0.1));
        assert!(!is_negative(0.1));
    }

    #[test]
    fn test_soft_min_corners() {
        assert!(float_eq(soft_min(1.0, 1.0), 1.0, 1e-9));
        assert_eq!(soft_min(1.0, 0.0), 0.0);
        assert_eq!(soft_min(0.0, 0.7), 0.0);
    }

    #[test]
    fn test_soft_min_is_symmetric() {
        assert!(float_eq(soft_min(0.3, 0.8), soft_min(0.8, 0.3), 1e-12));
    }
}
