//! Solver benchmarks: definition parse/build and per-frame solve.
//! Run: cargo bench --bench solve_bench

use std::fmt::Write as _;
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use simplex::Solver;

/// A rig with `sliders` sliders, every adjacent pair combined, and one
/// floater per adjacent pair.
fn synthetic_rig(sliders: usize) -> String {
    let mut shapes = String::from(r#"{"name": "Rest"}"#);
    let mut progs = String::new();
    let mut slider_defs = String::new();
    let mut combos = String::new();
    let mut shape = 1;

    let mut push_prog = |progs: &mut String, shapes: &mut String, name: &str| -> usize {
        let _ = write!(shapes, r#", {{"name": "{name}"}}"#);
        if !progs.is_empty() {
            progs.push_str(", ");
        }
        let _ = write!(
            progs,
            r#"{{"name": "{name}", "pairs": [[0, 0.0], [{shape}, 1.0]], "interp": "spline"}}"#
        );
        shape += 1;
        shape - 2
    };

    for i in 0..sliders {
        let prog = push_prog(&mut progs, &mut shapes, &format!("S{i}"));
        if i > 0 {
            slider_defs.push_str(", ");
        }
        let _ = write!(slider_defs, r#"{{"name": "s{i}", "prog": {prog}}}"#);
    }
    for i in 1..sliders {
        let prog = push_prog(&mut progs, &mut shapes, &format!("C{i}"));
        let float = push_prog(&mut progs, &mut shapes, &format!("F{i}"));
        if !combos.is_empty() {
            combos.push_str(", ");
        }
        let _ = write!(
            combos,
            r#"{{"name": "c{i}", "prog": {prog}, "pairs": [[{a}, 1.0], [{i}, 1.0]]}},
               {{"name": "f{i}", "prog": {float}, "pairs": [[{a}, 0.5], [{i}, 1.0]]}}"#,
            a = i - 1
        );
    }

    format!(
        r#"{{"encodingVersion": 2, "shapes": [{shapes}], "progressions": [{progs}],
            "sliders": [{slider_defs}], "combos": [{combos}]}}"#
    )
}

fn bench_build(c: &mut Criterion) {
    let definition = synthetic_rig(32);
    c.bench_function("parse_and_build_32", |b| {
        b.iter(|| black_box(Solver::from_json(black_box(&definition)).ok()));
    });
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    for sliders in [8, 32, 128] {
        let Ok(mut solver) = Solver::from_json(&synthetic_rig(sliders)) else {
            continue;
        };
        let pose: Vec<f64> = (0..sliders).map(|i| (i % 5) as f64 * 0.25).collect();
        group.bench_function(format!("sliders_{sliders}"), |b| {
            b.iter(|| black_box(solver.solve(black_box(&pose))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_solve);
criterion_main!(benches);
