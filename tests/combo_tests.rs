//! Combo Solve Tests
//!
//! Tests for:
//! - Every solve kind at rest and at partial activation
//! - The sign veto
//! - Soft minimum boundary behaviour

use simplex::{ComboSolve, soft_min, solve_state};

const EPSILON: f64 = 1e-9;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

const KINDS: [ComboSolve; 6] = [
    ComboSolve::Min,
    ComboSolve::AllMul,
    ComboSolve::ExtMul,
    ComboSolve::MulAvgExt,
    ComboSolve::MulAvgAll,
    ComboSolve::None,
];

fn solve(values: &[f64], targets: &[f64], kind: ComboSolve, exact: bool) -> Option<f64> {
    solve_state(
        values.iter().copied().zip(targets.iter().copied()),
        kind,
        exact,
    )
}

// ============================================================================
// Rest and full activation
// ============================================================================

#[test]
fn every_kind_is_zero_at_rest() {
    for kind in KINDS {
        for exact in [true, false] {
            let v = solve(&[0.0, 0.0, 0.0], &[1.0, 0.5, 1.0], kind, exact);
            assert_eq!(v, Some(0.0), "{kind:?} exact={exact}");
            // A negative target vetoes instead, which still leaves the combo off.
            let v = solve(&[0.0, 0.0], &[1.0, -1.0], kind, exact);
            assert_eq!(v.unwrap_or(0.0), 0.0, "{kind:?} exact={exact}");
        }
    }
}

#[test]
fn every_kind_is_one_at_full_activation() {
    for kind in KINDS {
        let v = solve(&[1.0, -1.0], &[1.0, -1.0], kind, true).unwrap();
        assert!(approx(v, 1.0), "{kind:?}: {v}");
    }
    let soft = solve(&[1.0, 1.0], &[1.0, 1.0], ComboSolve::Min, false).unwrap();
    assert!(approx(soft, 1.0), "soft min at the corner: {soft}");
}

// ============================================================================
// Partial activation
// ============================================================================

#[test]
fn min_takes_the_smallest_member() {
    let v = solve(&[0.3, 0.9, 0.6], &[1.0, 1.0, 1.0], ComboSolve::Min, true);
    assert_eq!(v, Some(0.3));
}

#[test]
fn mul_avg_all_over_three_members() {
    let v = solve(&[0.5, 0.5, 1.0], &[1.0, 1.0, 1.0], ComboSolve::MulAvgAll, true).unwrap();
    assert!(approx(v, 3.0 * 0.25 / 2.0), "{v}");
}

#[test]
fn soft_min_differs_from_exact() {
    let exact = solve(&[0.3, 1.0], &[1.0, 1.0], ComboSolve::Min, true).unwrap();
    let soft = solve(&[0.3, 1.0], &[1.0, 1.0], ComboSolve::None, false).unwrap();
    assert!(approx(exact, 0.3));
    assert!(soft > 0.0 && soft < 0.3, "{soft}");
}

// ============================================================================
// Veto
// ============================================================================

#[test]
fn opposite_sign_vetoes_every_kind() {
    for kind in KINDS {
        assert_eq!(solve(&[0.5, -0.2], &[1.0, 1.0], kind, true), None, "{kind:?}");
    }
}

#[test]
fn resting_member_pins_positive_combo_to_zero() {
    let v = solve(&[0.0, 0.5], &[1.0, 1.0], ComboSolve::Min, true);
    assert_eq!(v, Some(0.0));
}

#[test]
fn resting_member_vetoes_negative_target() {
    // Zero counts as positive for the sign test.
    let v = solve(&[0.0, -0.5], &[-1.0, -1.0], ComboSolve::Min, true);
    assert_eq!(v, None);
}

// ============================================================================
// softMin
// ============================================================================

#[test]
fn soft_min_is_zero_on_axes() {
    for x in [0.0, 0.1, 0.5, 1.0] {
        assert_eq!(soft_min(x, 0.0), 0.0);
        assert_eq!(soft_min(0.0, x), 0.0);
    }
}

#[test]
fn soft_min_is_symmetric_and_bounded() {
    for (x, y) in [(0.2, 0.7), (0.9, 0.4), (0.5, 0.5)] {
        let a = soft_min(x, y);
        assert!(approx(a, soft_min(y, x)));
        assert!(a > 0.0 && a <= x.min(y) + EPSILON, "softMin({x}, {y}) = {a}");
    }
}
