//! Progressions
//!
//! A progression is a curve through an ordered list of shapes. Given a
//! controller's activation it answers "how much of each shape", so a single
//! slider can blend through in-between shapes on its way to the full target.
//!
//! Three interpolation modes are supported:
//! - [`Interpolation::Linear`]: piecewise linear between neighbouring shapes
//! - [`Interpolation::Spline`]: uniform Catmull-Rom over up to four shapes
//! - [`Interpolation::SplitSpline`]: independent splines for the positive and
//!   negative halves of the curve, joined at time zero
//!
//! Every mode is a partition of unity scaled by the multiplier: the weights
//! returned by [`Progression::output`] always sum to `multiplier`.

use smallvec::SmallVec;

use crate::math::is_zero;

/// Weighted shape contributions, as `(shape index, weight)`.
pub type ShapeWeights = SmallVec<[(usize, f64); 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    Linear,
    #[default]
    Spline,
    SplitSpline,
}

impl Interpolation {
    /// Parses the `interp` string of a definition. Unknown names are splines.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "linear" => Interpolation::Linear,
            "spline" => Interpolation::Spline,
            "splitspline" => Interpolation::SplitSpline,
            other => {
                log::warn!("Unknown interpolation '{other}', falling back to spline");
                Interpolation::Spline
            }
        }
    }
}

/// One control point of a progression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgPair {
    /// Index of the shape in the solver's shape list.
    pub shape: usize,
    /// Parametric time at which the shape is fully on.
    pub time: f64,
}

impl ProgPair {
    #[must_use]
    pub fn new(shape: usize, time: f64) -> Self {
        Self { shape, time }
    }
}

#[derive(Debug, Clone)]
pub struct Progression {
    pub name: String,
    pairs: Vec<ProgPair>,
    pub interp: Interpolation,
}

impl Progression {
    /// Creates a progression. Pairs are sorted by time.
    #[must_use]
    pub fn new(name: impl Into<String>, mut pairs: Vec<ProgPair>, interp: Interpolation) -> Self {
        pairs.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self {
            name: name.into(),
            pairs,
            interp,
        }
    }

    #[must_use]
    pub fn pairs(&self) -> &[ProgPair] {
        &self.pairs
    }

    /// Weighted shape contributions for activation `t` scaled by `multiplier`.
    ///
    /// Fewer than two pairs gives no output. A zero multiplier still lists
    /// every shape of the active interval, each with weight zero.
    #[must_use]
    pub fn output(&self, t: f64, multiplier: f64) -> ShapeWeights {
        match self.interp {
            Interpolation::Linear => {
                let all: SmallVec<[&ProgPair; 8]> = self.pairs.iter().collect();
                linear_output(&all, t, multiplier)
            }
            Interpolation::Spline => {
                let all: SmallVec<[&ProgPair; 8]> = self.pairs.iter().collect();
                spline_output(&all, t, multiplier)
            }
            Interpolation::SplitSpline => {
                let positive = t >= 0.0;
                let sided: SmallVec<[&ProgPair; 8]> = self
                    .pairs
                    .iter()
                    .filter(|p| if positive { p.time >= 0.0 } else { p.time <= 0.0 })
                    .collect();
                spline_output(&sided, t, multiplier)
            }
        }
    }
}

/// Finds the interval `[times[i], times[i + 1]]` used for `t`.
///
/// Values before the first time use the first interval, values at or past
/// the second-to-last time use the last one. The flag reports whether `t`
/// lies outside the full range.
fn interval(t: f64, pairs: &[&ProgPair]) -> (usize, bool) {
    let n = pairs.len();
    if n <= 1 {
        return (0, true);
    }
    let outside = t < pairs[0].time || t > pairs[n - 1].time;
    if t >= pairs[n - 2].time {
        return (n - 2, outside);
    }
    if t < pairs[0].time {
        return (0, outside);
    }
    let idx = pairs
        .windows(2)
        .position(|w| w[0].time <= t && t < w[1].time)
        .unwrap_or(0);
    (idx, outside)
}

/// Normalized position of `t` inside `[start, end]`, guarding zero-length spans.
fn segment_fraction(t: f64, start: f64, end: f64) -> f64 {
    let span = end - start;
    if is_zero(span) {
        if t >= end { 1.0 } else { 0.0 }
    } else {
        (t - start) / span
    }
}

fn linear_output(pairs: &[&ProgPair], t: f64, mul: f64) -> ShapeWeights {
    let mut out = ShapeWeights::new();
    if pairs.len() < 2 {
        return out;
    }
    let (idx, _) = interval(t, pairs);
    let u = segment_fraction(t, pairs[idx].time, pairs[idx + 1].time);
    out.push((pairs[idx].shape, mul * (1.0 - u)));
    out.push((pairs[idx + 1].shape, mul * u));
    out
}

fn spline_output(pairs: &[&ProgPair], t: f64, mul: f64) -> ShapeWeights {
    if pairs.len() <= 2 {
        return linear_output(pairs, t, mul);
    }

    let n = pairs.len();
    let (idx, outside) = interval(t, pairs);
    let x = segment_fraction(t, pairs[idx].time, pairs[idx + 1].time);
    let mut out = ShapeWeights::new();

    if outside {
        // Extrapolate linearly along the end tangent, never along the cubic.
        out.push((pairs[idx].shape, mul * (1.0 - x)));
        out.push((pairs[idx + 1].shape, mul * x));
        return out;
    }

    let x2 = x * x;
    let x3 = x2 * x;
    let v0 = -0.5 * x3 + x2 - 0.5 * x;
    let v1 = 1.5 * x3 - 2.5 * x2 + 1.0;
    let v2 = -1.5 * x3 + 2.0 * x2 + 0.5 * x;
    let v3 = 0.5 * x3 - 0.5 * x2;

    if idx == 0 {
        // Phantom leading point at 2*P0 - P1
        out.push((pairs[0].shape, mul * (v1 + 2.0 * v0)));
        out.push((pairs[1].shape, mul * (v2 - v0)));
        out.push((pairs[2].shape, mul * v3));
    } else if idx == n - 2 {
        // Phantom trailing point at 2*Pn - Pn-1
        out.push((pairs[n - 3].shape, mul * v0));
        out.push((pairs[n - 2].shape, mul * (v1 - v3)));
        out.push((pairs[n - 1].shape, mul * (v2 + 2.0 * v3)));
    } else {
        out.push((pairs[idx - 1].shape, mul * v0));
        out.push((pairs[idx].shape, mul * v1));
        out.push((pairs[idx + 1].shape, mul * v2));
        out.push((pairs[idx + 2].shape, mul * v3));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(times: &[f64]) -> Vec<ProgPair> {
        times
            .iter()
            .enumerate()
            .map(|(i, &t)| ProgPair::new(i, t))
            .collect()
    }

    #[test]
    fn test_interval_lookup() {
        let p = pairs(&[0.0, 0.5, 1.0, 2.0]);
        let refs: Vec<&ProgPair> = p.iter().collect();
        assert_eq!(interval(0.25, &refs), (0, false));
        assert_eq!(interval(0.75, &refs), (1, false));
        assert_eq!(interval(1.5, &refs), (2, false));
        assert_eq!(interval(-1.0, &refs), (0, true));
        assert_eq!(interval(3.0, &refs), (2, true));
    }

    #[test]
    fn test_pairs_are_sorted() {
        let prog = Progression::new(
            "p",
            vec![ProgPair::new(2, 1.0), ProgPair::new(0, 0.0), ProgPair::new(1, 0.5)],
            Interpolation::Linear,
        );
        let times: Vec<f64> = prog.pairs().iter().map(|p| p.time).collect();
        assert_eq!(times, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_zero_length_interval_does_not_divide() {
        let prog = Progression::new("p", pairs(&[0.0, 0.0]), Interpolation::Linear);
        let out = prog.output(0.0, 1.0);
        assert!(out.iter().all(|(_, w)| w.is_finite()));
    }
}
