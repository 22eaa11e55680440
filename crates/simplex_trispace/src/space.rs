//! Triangulated floater spaces.
//!
//! # Overview
//!
//! A floater is a combo whose target sits somewhere inside its sliders'
//! joint space rather than on a corner of it. Floaters that share the same
//! sliders and the same sign pattern live in one [`TriSpace`]: a
//! hypercube-orthant whose axes are those sliders.
//!
//! # Build
//!
//! 1. Each floater target (as magnitudes) becomes a user point. Duplicates
//!    are dropped.
//! 2. Every orthoscheme adjacent to a user point is collected, grouping user
//!    points by orthoscheme.
//! 3. Each touched orthoscheme is split by its user points: a point inside a
//!    simplex replaces, one at a time, every corner with a non-zero
//!    barycentric weight, fanning the simplex out around the point.
//! 4. The refined simplices are cached per orthoscheme key.
//!
//! # Evaluation
//!
//! The current input is reduced to the space's axes, mapped to its
//! orthoscheme, and tested against that orthoscheme's refined simplices.
//! The first simplex containing the point hands its barycentric weights to
//! the floaters sitting on its corners; cube corners absorb the rest.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use simplex_core::math::{ADJACENCY_EPS, EPS, float_eq, is_positive, is_zero};

use crate::barycentric::barycentric;
use crate::orthoscheme::{SimplexKey, adjacent_simplices, point_to_simplex, simplex_corners};

/// `(floater id, weight)` results of one evaluation.
pub type FloaterWeights = SmallVec<[(usize, f64); 4]>;

/// Input description of one floater.
#[derive(Debug, Clone, PartialEq)]
pub struct FloaterPoint {
    /// Identifier reported back in [`FloaterWeights`] (the combo index).
    pub id: usize,
    /// Slider indices spanned by the floater, ascending.
    pub sliders: SmallVec<[usize; 8]>,
    /// Signed target weight per slider, in the same order.
    pub target: SmallVec<[f64; 8]>,
}

impl FloaterPoint {
    #[must_use]
    pub fn new(id: usize, sliders: &[usize], target: &[f64]) -> Self {
        Self {
            id,
            sliders: sliders.iter().copied().collect(),
            target: target.iter().copied().collect(),
        }
    }

    /// Sign pattern of the target: `true` where the slider must be negative.
    #[must_use]
    pub fn inverted(&self) -> SmallVec<[bool; 8]> {
        self.target.iter().map(|&t| t < 0.0).collect()
    }

    #[must_use]
    pub fn magnitude(&self) -> Vec<f64> {
        self.target.iter().map(|t| t.abs()).collect()
    }
}

/// One corner of a refined simplex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    /// The orthoscheme's own corner at this position.
    Cube,
    /// A user point, by index into [`TriSpace::points`].
    Point(usize),
}

/// Corners of a refined simplex, position-aligned with its orthoscheme key.
pub type RefinedSimplex = SmallVec<[Corner; 8]>;

/// Slider span and sign pattern shared by every floater of one space.
type SpaceSignature = (SmallVec<[usize; 8]>, SmallVec<[bool; 8]>);

#[derive(Debug, Clone)]
pub struct TriSpace {
    sliders: SmallVec<[usize; 8]>,
    inverted: SmallVec<[bool; 8]>,
    floaters: Vec<usize>,
    points: Vec<Vec<f64>>,
    point_owner: Vec<usize>,
    simplex_map: FxHashMap<SimplexKey, Vec<RefinedSimplex>>,
}

impl TriSpace {
    /// Groups floaters by shared span and orthant and triangulates each group.
    #[must_use]
    pub fn build_spaces(floaters: &[FloaterPoint]) -> Vec<TriSpace> {
        let mut lookup: FxHashMap<SpaceSignature, usize> = FxHashMap::default();
        let mut groups: Vec<Vec<&FloaterPoint>> = Vec::new();

        for floater in floaters {
            let signature = (floater.sliders.clone(), floater.inverted());
            let slot = *lookup.entry(signature).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(floater);
        }

        let spaces: Vec<TriSpace> = groups.iter().map(|group| TriSpace::new(group)).collect();
        log::debug!(
            "Built {} floater space(s) from {} floater(s)",
            spaces.len(),
            floaters.len()
        );
        spaces
    }

    /// Creates and triangulates a space. All floaters must share the first
    /// one's sliders and sign pattern.
    ///
    /// # Panics
    /// Panics if `floaters` is empty.
    #[must_use]
    pub fn new(floaters: &[&FloaterPoint]) -> Self {
        let template = floaters[0];
        debug_assert!(
            floaters
                .iter()
                .all(|f| f.sliders == template.sliders && f.inverted() == template.inverted()),
            "floaters in one space must share span and orthant"
        );

        let mut space = Self {
            sliders: template.sliders.clone(),
            inverted: template.inverted(),
            floaters: floaters.iter().map(|f| f.id).collect(),
            points: Vec::new(),
            point_owner: Vec::new(),
            simplex_map: FxHashMap::default(),
        };

        let targets: Vec<Vec<f64>> = floaters.iter().map(|f| f.magnitude()).collect();
        for (owner, target) in targets.into_iter().enumerate() {
            if let Some(existing) = space.find_point(&target) {
                log::warn!(
                    "Floater {} duplicates the point of floater {}; only the first is driven",
                    space.floaters[owner],
                    space.floaters[space.point_owner[existing]]
                );
                continue;
            }
            space.points.push(target);
            space.point_owner.push(owner);
        }

        space.triangulate();
        space
    }

    /// Rebuilds the simplex cache from the stored user points.
    pub fn triangulate(&mut self) {
        self.simplex_map.clear();

        let mut touched: FxHashMap<SimplexKey, SmallVec<[usize; 4]>> = FxHashMap::default();
        for (idx, point) in self.points.iter().enumerate() {
            for key in adjacent_simplices(point, ADJACENCY_EPS) {
                touched.entry(key).or_default().push(idx);
            }
        }

        for (key, point_indices) in touched {
            let refined = self.split_simplex(&key, &point_indices);
            self.simplex_map.insert(key, refined);
        }

        log::debug!(
            "Triangulated {}-d space over sliders {:?}: {} point(s), {} orthoscheme(s), {} simplices",
            self.dimension(),
            self.sliders.as_slice(),
            self.points.len(),
            self.simplex_map.len(),
            self.simplex_count()
        );
    }

    fn find_point(&self, target: &[f64]) -> Option<usize> {
        self.points.iter().position(|p| {
            p.len() == target.len() && p.iter().zip(target).all(|(a, b)| float_eq(*a, *b, EPS))
        })
    }

    fn split_simplex(&self, key: &SimplexKey, point_indices: &[usize]) -> Vec<RefinedSimplex> {
        type Working = SmallVec<[(Corner, Vec<f64>); 8]>;

        let mut current: Vec<Working> = vec![
            simplex_corners(key)
                .into_iter()
                .map(|c| (Corner::Cube, c))
                .collect(),
        ];

        for &idx in point_indices {
            let point = &self.points[idx];
            let mut next = Vec::with_capacity(current.len() + point.len());
            for simplex in current {
                let bary = {
                    let coords: SmallVec<[&[f64]; 8]> =
                        simplex.iter().map(|(_, c)| c.as_slice()).collect();
                    barycentric(&coords, point)
                };
                match bary {
                    Some(bary) if bary.iter().all(|&w| is_positive(w)) => {
                        for (k, &w) in bary.iter().enumerate() {
                            if is_zero(w) {
                                continue;
                            }
                            let mut split = simplex.clone();
                            split[k] = (Corner::Point(idx), point.clone());
                            next.push(split);
                        }
                    }
                    _ => next.push(simplex),
                }
            }
            current = next;
        }

        current
            .into_iter()
            .map(|simplex| simplex.into_iter().map(|(corner, _)| corner).collect())
            .collect()
    }

    /// Literal corner coordinates of a refined simplex of orthoscheme `key`.
    fn expand(&self, key: &[i32], refined: &[Corner]) -> SmallVec<[Vec<f64>; 8]> {
        let mut walk = vec![0.0; self.dimension()];
        key.iter()
            .zip(refined)
            .map(|(&step, corner)| {
                if step != 0 {
                    walk[step.unsigned_abs() as usize - 1] = f64::from(step.signum());
                }
                match *corner {
                    Corner::Cube => walk.clone(),
                    Corner::Point(idx) => self.points[idx].clone(),
                }
            })
            .collect()
    }

    /// Floater weights for the current input.
    ///
    /// `clamped` and `inverted` are the solver-wide rectified inputs, indexed
    /// by slider. The space is inactive unless every one of its sliders is
    /// non-zero and carries the space's sign.
    #[must_use]
    pub fn store_value(&self, clamped: &[f64], inverted: &[bool]) -> FloaterWeights {
        let mut out = FloaterWeights::new();

        let mut point: SmallVec<[f64; 8]> = SmallVec::with_capacity(self.sliders.len());
        for (&slider, &want_inverted) in self.sliders.iter().zip(&self.inverted) {
            let value = clamped.get(slider).copied().unwrap_or(0.0);
            if is_zero(value) {
                return out;
            }
            if inverted.get(slider).copied().unwrap_or(false) != want_inverted {
                return out;
            }
            point.push(value);
        }

        let key = point_to_simplex(&point);
        let Some(candidates) = self.simplex_map.get(&key) else {
            return out;
        };

        for refined in candidates {
            let corners = self.expand(&key, refined);
            let Some(bary) = barycentric(&corners, &point) else {
                continue;
            };
            if !bary.iter().all(|&w| is_positive(w)) {
                continue;
            }
            for (corner, &w) in refined.iter().zip(&bary) {
                if let Corner::Point(idx) = *corner {
                    out.push((self.floaters[self.point_owner[idx]], w));
                }
            }
            break;
        }
        out
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.sliders.len()
    }

    /// Slider indices spanned by this space.
    #[must_use]
    pub fn sliders(&self) -> &[usize] {
        &self.sliders
    }

    /// Sign pattern shared by every floater in the space.
    #[must_use]
    pub fn inverted(&self) -> &[bool] {
        &self.inverted
    }

    /// Floater ids, in insertion order.
    #[must_use]
    pub fn floaters(&self) -> &[usize] {
        &self.floaters
    }

    /// Deduplicated user points, as magnitudes.
    #[must_use]
    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    #[must_use]
    pub fn simplex_map(&self) -> &FxHashMap<SimplexKey, Vec<RefinedSimplex>> {
        &self.simplex_map
    }

    /// Total number of refined simplices across all cached orthoschemes.
    #[must_use]
    pub fn simplex_count(&self) -> usize {
        self.simplex_map.values().map(Vec::len).sum()
    }
}
