//! Combo solving.
//!
//! A combo fires when all of its sliders move toward their targets at once.
//! [`solve_state`] reduces the members' current values to one activation
//! according to a [`ComboSolve`] rule; traversals reuse the same function
//! over their delta space.

use simplex_core::math::{EPS, MAX_VALUE, float_eq, is_positive, is_zero, soft_min};

/// How member magnitudes are reduced to a combo activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComboSolve {
    /// Minimum magnitude (or the soft minimum when not exact).
    Min,
    /// Product of all magnitudes.
    AllMul,
    /// Product of the smallest and largest magnitude.
    ExtMul,
    /// Harmonic-style mean of the extremes, `2*max*min / (max+min)`.
    MulAvgExt,
    /// `n * product / sum` over all magnitudes.
    MulAvgAll,
    /// Unspecified, behaves like [`ComboSolve::Min`].
    #[default]
    None,
}

impl ComboSolve {
    /// Parses a `solveType` value. Anything unrecognised is [`ComboSolve::None`].
    #[must_use]
    pub fn from_json(value: Option<&serde_json::Value>) -> Self {
        match value.and_then(serde_json::Value::as_str) {
            Some("min") => ComboSolve::Min,
            Some("allMul") => ComboSolve::AllMul,
            Some("extMul") => ComboSolve::ExtMul,
            Some("mulAvgExt") => ComboSolve::MulAvgExt,
            Some("mulAvgAll") => ComboSolve::MulAvgAll,
            Some("None") | None => ComboSolve::None,
            Some(other) => {
                log::warn!("Unknown solveType '{other}', using the default min solve");
                ComboSolve::None
            }
        }
    }
}

/// A slider reference with its target weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComboPair {
    pub slider: usize,
    pub weight: f64,
}

impl ComboPair {
    #[must_use]
    pub fn new(slider: usize, weight: f64) -> Self {
        Self { slider, weight }
    }
}

impl From<(usize, f64)> for ComboPair {
    fn from((slider, weight): (usize, f64)) -> Self {
        Self { slider, weight }
    }
}

/// `true` if any target lies strictly between the cube's corners.
#[must_use]
pub fn has_floating_target(pairs: &[ComboPair]) -> bool {
    pairs
        .iter()
        .any(|p| !float_eq(p.weight.abs(), 1.0, EPS) && !is_zero(p.weight))
}

/// Reduces `(value, target)` pairs to an activation.
///
/// Returns `None` when a value points away from its target (the veto) or
/// when there are no pairs at all. Magnitudes are clamped to [`MAX_VALUE`].
#[must_use]
pub fn solve_state(
    values: impl IntoIterator<Item = (f64, f64)>,
    kind: ComboSolve,
    exact: bool,
) -> Option<f64> {
    let mut mn = f64::INFINITY;
    let mut mx = f64::NEG_INFINITY;
    let mut all_mul = 1.0;
    let mut all_sum = 0.0;
    let mut count = 0_usize;

    for (value, target) in values {
        // is_positive() treats zero as positive, so a resting slider never
        // vetoes a positive target.
        let value_neg = !is_positive(value);
        let target_neg = !is_positive(target);
        if value_neg != target_neg {
            return None;
        }
        let mag = value.abs().min(MAX_VALUE);
        all_mul *= mag;
        all_sum += mag;
        mn = mn.min(mag);
        mx = mx.max(mag);
        count += 1;
    }

    if count == 0 {
        return None;
    }

    let min_solve = || if exact { mn } else { soft_min(mx, mn) };
    Some(match kind {
        ComboSolve::Min | ComboSolve::None => min_solve(),
        ComboSolve::AllMul => all_mul,
        ComboSolve::ExtMul => mx * mn,
        ComboSolve::MulAvgExt => {
            if is_zero(mx + mn) {
                0.0
            } else {
                2.0 * mx * mn / (mx + mn)
            }
        }
        ComboSolve::MulAvgAll => {
            if is_zero(all_sum) {
                0.0
            } else {
                count as f64 * all_mul / all_sum
            }
        }
    })
}

/// [`solve_state`] over combo pairs, reading current slider values.
#[must_use]
pub fn solve_pairs(
    pairs: &[ComboPair],
    slider_values: &[f64],
    kind: ComboSolve,
    exact: bool,
) -> Option<f64> {
    solve_state(
        pairs
            .iter()
            .map(|p| (slider_values.get(p.slider).copied().unwrap_or(0.0), p.weight)),
        kind,
        exact,
    )
}
