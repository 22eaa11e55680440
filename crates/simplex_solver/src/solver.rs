//! The rig solver.
//!
//! A [`Solver`] owns one scene's topology (shapes, progressions and the
//! controllers that drive them) and turns slider input vectors into
//! per-shape blend weights.
//!
//! ```text
//! parse_json ──► build ──► solve ──► solve ──► ...
//!   topology     trispaces  transient values only
//! ```
//!
//! `solve` runs two passes. The store pass lets every controller compute its
//! value in dependency order: sliders, combos, floater spaces, traversals.
//! The accumulate pass then adds each controller's progression output into
//! the result, and finally sets the rest shape to `1 - max activation`.

use simplex_core::errors::{Result, SimplexError};
use simplex_core::math::Rectified;
use simplex_core::progression::Progression;
use simplex_core::shape::Shape;
use simplex_trispace::space::{FloaterPoint, TriSpace};

use crate::controller::ShapeController;
use crate::definition;

#[derive(Debug)]
pub struct Solver {
    shapes: Vec<Shape>,
    progressions: Vec<Progression>,
    sliders: Vec<ShapeController>,
    /// Every combo, floaters included.
    combos: Vec<ShapeController>,
    /// Indices into `combos` of the floaters.
    floaters: Vec<usize>,
    spaces: Vec<TriSpace>,
    traversals: Vec<ShapeController>,
    exact_solve: bool,
    loaded: bool,
    built: bool,
    last_error: Option<String>,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            shapes: Vec::new(),
            progressions: Vec::new(),
            sliders: Vec::new(),
            combos: Vec::new(),
            floaters: Vec::new(),
            spaces: Vec::new(),
            traversals: Vec::new(),
            exact_solve: true,
            loaded: false,
            built: false,
            last_error: None,
        }
    }
}

impl Solver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `json` and builds the result.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut solver = Self::new();
        solver.parse_json(json)?;
        solver.build();
        Ok(solver)
    }

    /// Drops all topology. The exact-solve setting is kept.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.progressions.clear();
        self.sliders.clear();
        self.combos.clear();
        self.floaters.clear();
        self.spaces.clear();
        self.traversals.clear();
        self.loaded = false;
        self.built = false;
        self.last_error = None;
    }

    /// Replaces the topology with the one described by `json`.
    ///
    /// On error the solver is left empty and the message is also available
    /// from [`Solver::last_error`]. [`Solver::build`] must run before the
    /// first solve.
    pub fn parse_json(&mut self, json: &str) -> Result<()> {
        self.clear();
        match definition::load(json) {
            Ok(topology) => {
                self.shapes = topology.shapes;
                self.progressions = topology.progressions;
                self.sliders = topology.sliders;
                self.combos = topology.combos;
                self.traversals = topology.traversals;
                self.floaters = self
                    .combos
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.is_floater())
                    .map(|(i, _)| i)
                    .collect();
                let exact = self.exact_solve;
                self.set_exact_solve(exact);
                self.loaded = true;
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Groups floaters into trispaces and triangulates them.
    pub fn build(&mut self) {
        let points: Vec<FloaterPoint> = self
            .floaters
            .iter()
            .filter_map(|&idx| self.combos.get(idx))
            .map(|combo| {
                let sliders: Vec<usize> = combo.pairs().iter().map(|p| p.slider).collect();
                let target: Vec<f64> = combo.pairs().iter().map(|p| p.weight).collect();
                FloaterPoint::new(combo.index, &sliders, &target)
            })
            .collect();
        self.spaces = TriSpace::build_spaces(&points);
        self.built = true;

        log::debug!(
            "Built solver: {} floaters in {} spaces, {} simplices",
            self.floaters.len(),
            self.spaces.len(),
            self.spaces.iter().map(TriSpace::simplex_count).sum::<usize>()
        );
    }

    /// Resets every controller's transient value.
    pub fn clear_values(&mut self) {
        for controller in self
            .sliders
            .iter_mut()
            .chain(self.combos.iter_mut())
            .chain(self.traversals.iter_mut())
        {
            controller.clear_value();
        }
    }

    /// Switches every combo and traversal between the exact minimum and
    /// the soft minimum.
    pub fn set_exact_solve(&mut self, exact: bool) {
        self.exact_solve = exact;
        for controller in self.combos.iter_mut().chain(self.traversals.iter_mut()) {
            controller.set_exact(exact);
        }
    }

    #[must_use]
    pub fn exact_solve(&self) -> bool {
        self.exact_solve
    }

    /// Computes one weight per shape for the given slider values.
    ///
    /// Index 0 of the result is the rest shape. `inputs` shorter than the
    /// slider count are zero-padded and longer ones truncated.
    pub fn solve(&mut self, inputs: &[f64]) -> Vec<f64> {
        if !self.built {
            if self.loaded {
                log::warn!("solve() called before build(), building now");
                self.build();
            } else {
                log::warn!("solve() called without a loaded definition");
                return Vec::new();
            }
        }

        let raw: Vec<f64> = if inputs.len() == self.sliders.len() {
            inputs.to_vec()
        } else {
            log::warn!(
                "Expected {} slider values, got {}",
                self.sliders.len(),
                inputs.len()
            );
            let mut padded = inputs.to_vec();
            padded.resize(self.sliders.len(), 0.0);
            padded
        };

        self.clear_values();
        self.store_values(&raw);
        self.accumulate()
    }

    fn store_values(&mut self, raw: &[f64]) {
        let rectified = Rectified::new(raw);

        for slider in &mut self.sliders {
            slider.store_value(raw, &[]);
        }
        let slider_values: Vec<f64> = self.sliders.iter().map(ShapeController::value).collect();

        for combo in &mut self.combos {
            combo.store_value(raw, &slider_values);
        }
        for space in &self.spaces {
            for (combo, weight) in space.store_value(&rectified.clamped, &rectified.inverted) {
                if let Some(floater) = self.combos.get_mut(combo) {
                    floater.set_value(weight);
                }
            }
        }
        for traversal in &mut self.traversals {
            traversal.store_value(raw, &slider_values);
        }
    }

    fn accumulate(&self) -> Vec<f64> {
        let mut output = vec![0.0; self.shapes.len()];
        let mut max_act = 0.0_f64;

        let floaters = self.floaters.iter().filter_map(|&idx| self.combos.get(idx));
        let controllers = self
            .sliders
            .iter()
            .chain(self.combos.iter().filter(|c| !c.is_floater()))
            .chain(floaters)
            .chain(self.traversals.iter());
        for controller in controllers {
            controller.solve(&self.progressions, &mut output, &mut max_act);
        }

        if let Some(rest) = output.first_mut() {
            *rest = 1.0 - max_act;
        }
        output
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[must_use]
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Message of the last failed [`Solver::parse_json`], if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    #[must_use]
    pub fn progressions(&self) -> &[Progression] {
        &self.progressions
    }

    #[must_use]
    pub fn sliders(&self) -> &[ShapeController] {
        &self.sliders
    }

    #[must_use]
    pub fn combos(&self) -> &[ShapeController] {
        &self.combos
    }

    /// Indices into [`Solver::combos`] of the floater combos.
    #[must_use]
    pub fn floaters(&self) -> &[usize] {
        &self.floaters
    }

    #[must_use]
    pub fn spaces(&self) -> &[TriSpace] {
        &self.spaces
    }

    #[must_use]
    pub fn traversals(&self) -> &[ShapeController] {
        &self.traversals
    }

    #[must_use]
    pub fn slider_count(&self) -> usize {
        self.sliders.len()
    }

    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Looks up a slider by name.
    #[must_use]
    pub fn slider_index(&self, name: &str) -> Option<usize> {
        self.sliders.iter().position(|s| s.name == name)
    }

    /// Looks up a shape by name.
    #[must_use]
    pub fn shape_index(&self, name: &str) -> Option<usize> {
        self.shapes.iter().position(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SLIDERS: &str = r#"{
        "encodingVersion": 2,
        "shapes": [{"name": "Rest"}, {"name": "A"}, {"name": "B"}, {"name": "AB"}],
        "progressions": [
            {"name": "pa", "pairs": [[0, 0.0], [1, 1.0]], "interp": "linear"},
            {"name": "pb", "pairs": [[0, 0.0], [2, 1.0]], "interp": "linear"},
            {"name": "pab", "pairs": [[0, 0.0], [3, 1.0]], "interp": "linear"}
        ],
        "sliders": [{"name": "a", "prog": 0}, {"name": "b", "prog": 1}],
        "combos": [{"name": "ab", "prog": 2, "pairs": [[0, 1.0], [1, 1.0]]}]
    }"#;

    #[test]
    fn test_rest_pose() {
        let mut solver = Solver::from_json(TWO_SLIDERS).unwrap();
        let out = solver.solve(&[0.0, 0.0]);
        assert_eq!(out, vec![1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_parse_error_clears_solver() {
        let mut solver = Solver::from_json(TWO_SLIDERS).unwrap();
        assert!(solver.parse_json("{").is_err());
        assert!(!solver.is_loaded());
        assert_eq!(solver.shape_count(), 0);
        assert!(solver.last_error().is_some());
    }

    #[test]
    fn test_short_input_is_padded() {
        let mut solver = Solver::from_json(TWO_SLIDERS).unwrap();
        let out = solver.solve(&[0.5]);
        assert_eq!(out.len(), 4);
        assert!((out[1] - 0.5).abs() < 1e-12);
        assert_eq!(out[3], 0.0);
    }

    #[test]
    fn test_solve_before_build_builds() {
        let mut solver = Solver::new();
        solver.parse_json(TWO_SLIDERS).unwrap();
        assert!(!solver.is_built());
        let out = solver.solve(&[1.0, 1.0]);
        assert!(solver.is_built());
        assert!((out[3] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_lookup_by_name() {
        let solver = Solver::from_json(TWO_SLIDERS).unwrap();
        assert_eq!(solver.slider_index("b"), Some(1));
        assert_eq!(solver.shape_index("AB"), Some(3));
        assert_eq!(solver.shape_index("nope"), None);
    }
}
