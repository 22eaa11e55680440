//! Shape controllers.
//!
//! Every driver of a progression (slider, combo, floater and traversal) is a
//! [`ShapeController`]. The common part (value, multiplier, progression and
//! the accumulation step) lives on the struct; what differs is how the
//! value is stored each solve, selected by [`ControllerKind`].

use std::collections::BTreeMap;

use simplex_core::math::{EPS, float_eq};
use simplex_core::progression::Progression;

use crate::combo::{ComboPair, ComboSolve, has_floating_target, solve_pairs, solve_state};

/// Combo (and floater) state.
#[derive(Debug, Clone)]
pub struct ComboState {
    /// Member sliders and targets, sorted by slider index.
    pub pairs: Vec<ComboPair>,
    pub solve: ComboSolve,
    pub exact: bool,
    /// Set when any target lies strictly inside the cube. Floater values are
    /// written by their trispace instead of by [`solve_pairs`].
    pub is_floater: bool,
}

impl ComboState {
    #[must_use]
    pub fn new(mut pairs: Vec<ComboPair>, solve: ComboSolve) -> Self {
        pairs.sort_by_key(|p| p.slider);
        let is_floater = has_floating_target(&pairs);
        Self {
            pairs,
            solve,
            exact: true,
            is_floater,
        }
    }
}

/// Traversal state: a combo-like progress measured from `start` along `delta`.
#[derive(Debug, Clone)]
pub struct TraversalState {
    /// Slider values where the traversal begins.
    pub start: Vec<ComboPair>,
    /// Per-slider displacement from `start` to the traversal's end.
    pub delta: Vec<ComboPair>,
    /// Sliders that scale the output. Empty means a constant multiplier of 1.
    pub multiplier: Vec<ComboPair>,
    pub solve: ComboSolve,
    pub exact: bool,
}

/// A controller referenced by a traversal, resolved to its slider pairs.
#[derive(Debug, Clone, Copy)]
pub enum ControlRef<'a> {
    Slider { index: usize, flip: bool },
    Combo(&'a [ComboPair]),
}

impl TraversalState {
    /// Traversal driven by a progress controller and a multiplier controller.
    ///
    /// A slider progress runs from 0 to ±1 along its own axis; a combo
    /// progress runs from the origin to the combo's target.
    #[must_use]
    pub fn from_controllers(progress: ControlRef<'_>, multiplier: ControlRef<'_>) -> Self {
        let (start, delta) = match progress {
            ControlRef::Slider { index, flip } => (
                vec![ComboPair::new(index, 0.0)],
                vec![ComboPair::new(index, flip_sign(flip))],
            ),
            ControlRef::Combo(pairs) => (
                pairs.iter().map(|p| ComboPair::new(p.slider, 0.0)).collect(),
                pairs.to_vec(),
            ),
        };
        let multiplier = match multiplier {
            ControlRef::Slider { index, flip } => vec![ComboPair::new(index, flip_sign(flip))],
            ControlRef::Combo(pairs) => pairs.to_vec(),
        };
        Self {
            start,
            delta,
            multiplier,
            solve: ComboSolve::None,
            exact: true,
        }
    }

    /// Traversal between two explicit poses.
    ///
    /// Sliders holding the same value at both ends don't move, so they gate
    /// the traversal through the multiplier instead of its progress.
    #[must_use]
    pub fn from_endpoints(start: &[ComboPair], end: &[ComboPair], solve: ComboSolve) -> Self {
        let mut poses: BTreeMap<usize, (Option<f64>, Option<f64>)> = BTreeMap::new();
        for p in start {
            poses.entry(p.slider).or_default().0 = Some(p.weight);
        }
        for p in end {
            poses.entry(p.slider).or_default().1 = Some(p.weight);
        }

        let mut state = Self {
            start: Vec::new(),
            delta: Vec::new(),
            multiplier: Vec::new(),
            solve,
            exact: true,
        };
        for (slider, pose) in poses {
            let (from, to) = match pose {
                (Some(s), Some(e)) if float_eq(s, e, EPS) => {
                    state.multiplier.push(ComboPair::new(slider, s));
                    continue;
                }
                (Some(s), Some(e)) => (s, e),
                (Some(s), None) => (s, 0.0),
                (None, Some(e)) => (0.0, e),
                (None, None) => continue,
            };
            state.start.push(ComboPair::new(slider, from));
            state.delta.push(ComboPair::new(slider, to - from));
        }
        state
    }
}

fn flip_sign(flip: bool) -> f64 {
    if flip { -1.0 } else { 1.0 }
}

#[derive(Debug, Clone)]
pub enum ControllerKind {
    Slider,
    Combo(ComboState),
    Traversal(TraversalState),
}

/// A named driver of one progression.
#[derive(Debug, Clone)]
pub struct ShapeController {
    pub name: String,
    /// Position in the solver's list for this controller kind. For sliders
    /// this is also the input slot.
    pub index: usize,
    pub enabled: bool,
    /// Index into the solver's progressions.
    pub prog: usize,
    pub kind: ControllerKind,
    value: f64,
    multiplier: f64,
}

impl ShapeController {
    fn with_kind(name: impl Into<String>, index: usize, prog: usize, kind: ControllerKind) -> Self {
        Self {
            name: name.into(),
            index,
            enabled: true,
            prog,
            kind,
            value: 0.0,
            multiplier: 1.0,
        }
    }

    #[must_use]
    pub fn slider(name: impl Into<String>, index: usize, prog: usize) -> Self {
        Self::with_kind(name, index, prog, ControllerKind::Slider)
    }

    #[must_use]
    pub fn combo(name: impl Into<String>, index: usize, prog: usize, state: ComboState) -> Self {
        Self::with_kind(name, index, prog, ControllerKind::Combo(state))
    }

    #[must_use]
    pub fn traversal(
        name: impl Into<String>,
        index: usize,
        prog: usize,
        state: TraversalState,
    ) -> Self {
        Self::with_kind(name, index, prog, ControllerKind::Traversal(state))
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    #[must_use]
    pub fn is_floater(&self) -> bool {
        matches!(&self.kind, ControllerKind::Combo(state) if state.is_floater)
    }

    /// Combo members, or an empty slice for other kinds.
    #[must_use]
    pub fn pairs(&self) -> &[ComboPair] {
        match &self.kind {
            ControllerKind::Combo(state) => &state.pairs,
            _ => &[],
        }
    }

    pub fn set_exact(&mut self, exact: bool) {
        match &mut self.kind {
            ControllerKind::Combo(state) => state.exact = exact,
            ControllerKind::Traversal(state) => state.exact = exact,
            ControllerKind::Slider => {}
        }
    }

    /// Resets the transient per-solve state.
    pub fn clear_value(&mut self) {
        self.value = 0.0;
        self.multiplier = 1.0;
    }

    /// Sets the value directly. Used for floaters, whose values come from
    /// their trispace.
    pub fn set_value(&mut self, value: f64) {
        if self.enabled {
            self.value = value;
        }
    }

    /// Computes this solve's value.
    ///
    /// `raw` holds the solver inputs; `slider_values` the values the sliders
    /// stored earlier in the same pass (empty while sliders are storing).
    /// Floaters are left untouched, see [`ShapeController::set_value`].
    pub fn store_value(&mut self, raw: &[f64], slider_values: &[f64]) {
        if !self.enabled {
            return;
        }
        match &self.kind {
            ControllerKind::Slider => {
                self.value = raw.get(self.index).copied().unwrap_or(0.0);
            }
            ControllerKind::Combo(state) => {
                if state.is_floater {
                    return;
                }
                // A veto leaves the combo off.
                self.value = solve_pairs(&state.pairs, slider_values, state.solve, state.exact)
                    .unwrap_or(0.0);
            }
            ControllerKind::Traversal(state) => {
                self.multiplier = if state.multiplier.is_empty() {
                    1.0
                } else {
                    solve_pairs(&state.multiplier, slider_values, state.solve, state.exact)
                        .unwrap_or(0.0)
                };

                let progress = state.start.iter().zip(&state.delta).map(|(start, delta)| {
                    let value = slider_values.get(start.slider).copied().unwrap_or(0.0);
                    (value - start.weight, delta.weight)
                });
                self.value = solve_state(progress, state.solve, state.exact).unwrap_or(0.0);
            }
        }
    }

    /// Adds this controller's shape weights into `accumulator` and raises
    /// `max_act` to `|value * multiplier|`.
    pub fn solve(&self, progressions: &[Progression], accumulator: &mut [f64], max_act: &mut f64) {
        let activation = (self.value * self.multiplier).abs();
        if activation > *max_act {
            *max_act = activation;
        }

        let Some(prog) = progressions.get(self.prog) else {
            return;
        };
        for (shape, weight) in prog.output(self.value, self.multiplier) {
            if let Some(slot) = accumulator.get_mut(shape) {
                *slot += weight;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simplex_core::progression::{Interpolation, ProgPair};

    fn linear_prog() -> Progression {
        Progression::new(
            "p",
            vec![ProgPair::new(0, 0.0), ProgPair::new(1, 1.0)],
            Interpolation::Linear,
        )
    }

    #[test]
    fn test_slider_reads_its_input_slot() {
        let mut s = ShapeController::slider("s", 1, 0);
        s.store_value(&[0.1, 0.6], &[]);
        assert_eq!(s.value(), 0.6);
    }

    #[test]
    fn test_disabled_controller_stays_at_zero() {
        let mut s = ShapeController::slider("s", 0, 0).with_enabled(false);
        s.store_value(&[0.9], &[]);
        assert_eq!(s.value(), 0.0);
    }

    #[test]
    fn test_combo_veto_is_zero() {
        let state = ComboState::new(
            vec![ComboPair::new(0, 1.0), ComboPair::new(1, 1.0)],
            ComboSolve::Min,
        );
        let mut c = ShapeController::combo("c", 0, 0, state);
        c.store_value(&[], &[0.5, -0.5]);
        assert_eq!(c.value(), 0.0);
        c.store_value(&[], &[0.5, 0.75]);
        assert_eq!(c.value(), 0.5);
    }

    #[test]
    fn test_floater_ignores_store() {
        let state = ComboState::new(
            vec![ComboPair::new(1, 0.5), ComboPair::new(0, 1.0)],
            ComboSolve::None,
        );
        assert!(state.is_floater);
        assert_eq!(state.pairs[0].slider, 0);
        let mut f = ShapeController::combo("f", 0, 0, state);
        f.store_value(&[], &[1.0, 0.5]);
        assert_eq!(f.value(), 0.0);
        f.set_value(0.25);
        assert_eq!(f.value(), 0.25);
    }

    #[test]
    fn test_solve_accumulates_and_tracks_activation() {
        let progs = [linear_prog()];
        let mut s = ShapeController::slider("s", 0, 0);
        s.store_value(&[0.4], &[]);
        let mut acc = [0.0; 2];
        let mut max_act = 0.0;
        s.solve(&progs, &mut acc, &mut max_act);
        assert!((acc[1] - 0.4).abs() < 1e-12);
        assert!((max_act - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_traversal_without_multiplier_sliders() {
        let state = TraversalState {
            start: vec![ComboPair::new(0, 0.0)],
            delta: vec![ComboPair::new(0, 1.0)],
            multiplier: Vec::new(),
            solve: ComboSolve::None,
            exact: true,
        };
        let mut t = ShapeController::traversal("t", 0, 0, state);
        t.store_value(&[], &[0.3]);
        assert_eq!(t.multiplier(), 1.0);
        assert!((t.value() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_traversal_from_slider_controllers() {
        let state = TraversalState::from_controllers(
            ControlRef::Slider { index: 2, flip: true },
            ControlRef::Slider { index: 0, flip: false },
        );
        assert_eq!(state.start, vec![ComboPair::new(2, 0.0)]);
        assert_eq!(state.delta, vec![ComboPair::new(2, -1.0)]);
        assert_eq!(state.multiplier, vec![ComboPair::new(0, 1.0)]);
    }

    #[test]
    fn test_traversal_from_endpoints_splits_moving_sliders() {
        let start = [ComboPair::new(0, 1.0), ComboPair::new(1, 0.5)];
        let end = [ComboPair::new(0, 1.0), ComboPair::new(2, 1.0)];
        let state = TraversalState::from_endpoints(&start, &end, ComboSolve::None);
        assert_eq!(state.multiplier, vec![ComboPair::new(0, 1.0)]);
        assert_eq!(state.start, vec![ComboPair::new(1, 0.5), ComboPair::new(2, 0.0)]);
        assert_eq!(state.delta, vec![ComboPair::new(1, -0.5), ComboPair::new(2, 1.0)]);
    }
}
