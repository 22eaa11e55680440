//! Scene definition loading.
//!
//! The definition is a JSON document whose `encodingVersion` (default 1)
//! selects the layout:
//!
//! | Version | Layout                                                         |
//! |---------|----------------------------------------------------------------|
//! | 1       | positional arrays for shapes, progressions, sliders and combos |
//! | 2       | objects everywhere; traversals reference two controllers       |
//! | 3       | as 2, but traversals list explicit start and end poses         |
//!
//! Every cross-reference is bounds-checked here, so the solver can index
//! its lists without further checks.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use simplex_core::errors::{Result, SimplexError};
use simplex_core::progression::{Interpolation, ProgPair, Progression};
use simplex_core::shape::Shape;

use crate::combo::{ComboPair, ComboSolve};
use crate::controller::{ComboState, ControlRef, ShapeController, TraversalState};

/// Everything parsed out of one definition.
#[derive(Debug, Default)]
pub(crate) struct Topology {
    pub shapes: Vec<Shape>,
    pub progressions: Vec<Progression>,
    pub sliders: Vec<ShapeController>,
    pub combos: Vec<ShapeController>,
    pub traversals: Vec<ShapeController>,
}

// ============================================================================
// Version 1
// ============================================================================

#[derive(Deserialize)]
struct DefinitionV1 {
    shapes: Vec<String>,
    progressions: Vec<ProgressionV1>,
    sliders: Vec<(String, usize)>,
    #[serde(default)]
    combos: Vec<(String, usize, Vec<(usize, f64)>)>,
    #[serde(default)]
    traversals: Vec<ControllerTraversal>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProgressionV1 {
    WithInterp(String, Vec<usize>, Vec<f64>, String),
    Plain(String, Vec<usize>, Vec<f64>),
}

// ============================================================================
// Versions 2 and 3
// ============================================================================

#[derive(Deserialize)]
struct DefinitionV2<T> {
    shapes: Vec<ShapeEntry>,
    progressions: Vec<ProgressionEntry>,
    sliders: Vec<SliderEntry>,
    #[serde(default)]
    combos: Vec<ComboEntry>,
    #[serde(default = "Vec::new")]
    traversals: Vec<T>,
}

#[derive(Deserialize)]
struct ShapeEntry {
    name: String,
}

#[derive(Deserialize)]
struct ProgressionEntry {
    name: String,
    pairs: Vec<(usize, f64)>,
    interp: String,
}

#[derive(Deserialize)]
struct SliderEntry {
    name: String,
    prog: usize,
    #[serde(default = "enabled_default")]
    enabled: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComboEntry {
    name: String,
    prog: usize,
    pairs: Vec<(usize, f64)>,
    #[serde(default)]
    solve_type: Option<Value>,
    #[serde(default = "enabled_default")]
    enabled: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ControllerTraversal {
    name: String,
    prog: usize,
    progress_type: String,
    progress_control: usize,
    progress_flip: bool,
    multiplier_type: String,
    multiplier_control: usize,
    multiplier_flip: bool,
    #[serde(default = "enabled_default")]
    enabled: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EndpointTraversal {
    name: String,
    prog: usize,
    start: Vec<(usize, f64)>,
    end: Vec<(usize, f64)>,
    #[serde(default)]
    solve_type: Option<Value>,
    #[serde(default = "enabled_default")]
    enabled: bool,
}

fn enabled_default() -> bool {
    true
}

// ============================================================================
// Entry point
// ============================================================================

/// Parses and validates a definition string.
pub(crate) fn load(json: &str) -> Result<Topology> {
    let document: Value =
        serde_json::from_str(json).map_err(|e| SimplexError::from_syntax(&e, json))?;

    let Some(object) = document.as_object() else {
        return Err(SimplexError::InvalidDefinition(
            "top-level value must be an object".into(),
        ));
    };
    for section in ["shapes", "progressions", "sliders"] {
        if !object.contains_key(section) {
            return Err(SimplexError::InvalidDefinition(format!(
                "missing required section '{section}'"
            )));
        }
    }

    let version = match object.get("encodingVersion") {
        None => 1,
        Some(v) => v.as_u64().ok_or_else(|| {
            SimplexError::InvalidDefinition(format!("encodingVersion must be an integer, got {v}"))
        })?,
    };

    let topology = match version {
        1 => load_v1(decode(document)?)?,
        2 => {
            let def: DefinitionV2<ControllerTraversal> = decode(document)?;
            let mut builder = Builder::from_objects(&def)?;
            for (index, t) in def.traversals.iter().enumerate() {
                builder.controller_traversal(index, t)?;
            }
            builder.topology
        }
        3 => {
            let def: DefinitionV2<EndpointTraversal> = decode(document)?;
            let mut builder = Builder::from_objects(&def)?;
            for (index, t) in def.traversals.iter().enumerate() {
                builder.endpoint_traversal(index, t)?;
            }
            builder.topology
        }
        other => return Err(SimplexError::UnsupportedEncoding(other)),
    };

    log::debug!(
        "Loaded v{version} definition: {} shapes, {} progressions, {} sliders, {} combos, {} traversals",
        topology.shapes.len(),
        topology.progressions.len(),
        topology.sliders.len(),
        topology.combos.len(),
        topology.traversals.len()
    );
    Ok(topology)
}

fn decode<T: DeserializeOwned>(document: Value) -> Result<T> {
    Ok(serde_json::from_value(document)?)
}

fn load_v1(def: DefinitionV1) -> Result<Topology> {
    let mut builder = Builder::default();
    builder.shapes(def.shapes.into_iter());

    for entry in def.progressions {
        let (name, shapes, times, interp) = match entry {
            ProgressionV1::WithInterp(name, shapes, times, interp) => {
                // v1 only distinguishes linear from everything else.
                let interp = if interp == "linear" {
                    Interpolation::Linear
                } else {
                    Interpolation::Spline
                };
                (name, shapes, times, interp)
            }
            ProgressionV1::Plain(name, shapes, times) => {
                (name, shapes, times, Interpolation::Spline)
            }
        };
        if shapes.len() != times.len() {
            return Err(SimplexError::InvalidDefinition(format!(
                "progression '{name}' has {} shapes but {} times",
                shapes.len(),
                times.len()
            )));
        }
        let pairs: Vec<(usize, f64)> = shapes.into_iter().zip(times).collect();
        builder.progression(name, &pairs, interp)?;
    }

    for (name, prog) in def.sliders {
        builder.slider(name, prog, true)?;
    }
    for (name, prog, pairs) in def.combos {
        builder.combo(name, prog, &pairs, ComboSolve::None, true)?;
    }
    for (index, t) in def.traversals.iter().enumerate() {
        builder.controller_traversal(index, t)?;
    }
    Ok(builder.topology)
}

// ============================================================================
// Builder
// ============================================================================

#[derive(Default)]
struct Builder {
    topology: Topology,
}

impl Builder {
    fn from_objects<T>(def: &DefinitionV2<T>) -> Result<Self> {
        let mut builder = Builder::default();
        builder.shapes(def.shapes.iter().map(|s| s.name.clone()));
        for p in &def.progressions {
            builder.progression(p.name.clone(), &p.pairs, Interpolation::from_name(&p.interp))?;
        }
        for s in &def.sliders {
            builder.slider(s.name.clone(), s.prog, s.enabled)?;
        }
        for c in &def.combos {
            let solve = ComboSolve::from_json(c.solve_type.as_ref());
            builder.combo(c.name.clone(), c.prog, &c.pairs, solve, c.enabled)?;
        }
        Ok(builder)
    }

    fn shapes(&mut self, names: impl Iterator<Item = String>) {
        self.topology.shapes = names
            .enumerate()
            .map(|(index, name)| Shape::new(name, index))
            .collect();
    }

    fn progression(
        &mut self,
        name: String,
        pairs: &[(usize, f64)],
        interp: Interpolation,
    ) -> Result<()> {
        if pairs.is_empty() {
            return Err(SimplexError::InvalidDefinition(format!(
                "progression '{name}' has no pairs"
            )));
        }
        let mut prog_pairs = Vec::with_capacity(pairs.len());
        for &(shape, time) in pairs {
            if shape >= self.topology.shapes.len() {
                return Err(SimplexError::out_of_bounds(
                    format!("shape referenced by progression '{name}'"),
                    shape,
                ));
            }
            prog_pairs.push(ProgPair::new(shape, time));
        }
        self.topology
            .progressions
            .push(Progression::new(name, prog_pairs, interp));
        Ok(())
    }

    fn check_prog(&self, owner: &str, prog: usize) -> Result<()> {
        if prog >= self.topology.progressions.len() {
            return Err(SimplexError::out_of_bounds(
                format!("progression referenced by '{owner}'"),
                prog,
            ));
        }
        Ok(())
    }

    fn slider_pairs(&self, owner: &str, pairs: &[(usize, f64)]) -> Result<Vec<ComboPair>> {
        pairs
            .iter()
            .map(|&(slider, weight)| {
                if slider >= self.topology.sliders.len() {
                    Err(SimplexError::out_of_bounds(
                        format!("slider referenced by '{owner}'"),
                        slider,
                    ))
                } else {
                    Ok(ComboPair::new(slider, weight))
                }
            })
            .collect()
    }

    fn slider(&mut self, name: String, prog: usize, enabled: bool) -> Result<()> {
        self.check_prog(&name, prog)?;
        let index = self.topology.sliders.len();
        self.topology
            .sliders
            .push(ShapeController::slider(name, index, prog).with_enabled(enabled));
        Ok(())
    }

    fn combo(
        &mut self,
        name: String,
        prog: usize,
        pairs: &[(usize, f64)],
        solve: ComboSolve,
        enabled: bool,
    ) -> Result<()> {
        self.check_prog(&name, prog)?;
        let pairs = self.slider_pairs(&name, pairs)?;
        let index = self.topology.combos.len();
        let state = ComboState::new(pairs, solve);
        self.topology
            .combos
            .push(ShapeController::combo(name, index, prog, state).with_enabled(enabled));
        Ok(())
    }

    fn control_ref(
        &self,
        owner: &str,
        kind: &str,
        index: usize,
        flip: bool,
    ) -> Result<ControlRef<'_>> {
        if kind.starts_with('S') {
            if index >= self.topology.sliders.len() {
                return Err(SimplexError::out_of_bounds(
                    format!("slider referenced by traversal '{owner}'"),
                    index,
                ));
            }
            Ok(ControlRef::Slider { index, flip })
        } else {
            let combo = self.topology.combos.get(index).ok_or_else(|| {
                SimplexError::out_of_bounds(
                    format!("combo referenced by traversal '{owner}'"),
                    index,
                )
            })?;
            Ok(ControlRef::Combo(combo.pairs()))
        }
    }

    fn controller_traversal(&mut self, index: usize, t: &ControllerTraversal) -> Result<()> {
        self.check_prog(&t.name, t.prog)?;
        let progress =
            self.control_ref(&t.name, &t.progress_type, t.progress_control, t.progress_flip)?;
        let multiplier = self.control_ref(
            &t.name,
            &t.multiplier_type,
            t.multiplier_control,
            t.multiplier_flip,
        )?;
        let state = TraversalState::from_controllers(progress, multiplier);
        self.push_traversal(t.name.clone(), index, t.prog, state, t.enabled);
        Ok(())
    }

    fn endpoint_traversal(&mut self, index: usize, t: &EndpointTraversal) -> Result<()> {
        self.check_prog(&t.name, t.prog)?;
        let start = self.slider_pairs(&t.name, &t.start)?;
        let end = self.slider_pairs(&t.name, &t.end)?;
        let solve = ComboSolve::from_json(t.solve_type.as_ref());
        let state = TraversalState::from_endpoints(&start, &end, solve);
        self.push_traversal(t.name.clone(), index, t.prog, state, t.enabled);
        Ok(())
    }

    fn push_traversal(
        &mut self,
        name: String,
        index: usize,
        prog: usize,
        state: TraversalState,
        enabled: bool,
    ) {
        self.topology
            .traversals
            .push(ShapeController::traversal(name, index, prog, state).with_enabled(enabled));
    }
}
