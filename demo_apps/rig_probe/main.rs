//! Prints solved shape weights for a rig definition.
//!
//! ```text
//! rig_probe face.json                 # sweep each slider from 0 to 1
//! rig_probe face.json poses.json      # poses.json: [[0.5, 0.0, ...], ...]
//! ```

use anyhow::{Context, bail};
use simplex::Solver;

const SWEEP_STEPS: usize = 4;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(definition_path) = args.next() else {
        bail!("usage: rig_probe <definition.json> [poses.json]");
    };

    let definition = std::fs::read_to_string(&definition_path)
        .with_context(|| format!("reading {definition_path}"))?;
    let mut solver = Solver::from_json(&definition)
        .with_context(|| format!("loading {definition_path}"))?;

    println!(
        "{}: {} shapes, {} sliders, {} combos ({} floaters), {} traversals",
        definition_path,
        solver.shape_count(),
        solver.slider_count(),
        solver.combos().len(),
        solver.floaters().len(),
        solver.traversals().len()
    );

    let poses = match args.next() {
        Some(path) => {
            let text =
                std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str::<Vec<Vec<f64>>>(&text)
                .with_context(|| format!("parsing poses in {path}"))?
        }
        None => sweep(solver.slider_count()),
    };
    log::info!("Solving {} pose(s)", poses.len());

    for pose in &poses {
        let weights = solver.solve(pose);
        println!("{pose:?}");
        for (shape, weight) in solver.shapes().iter().zip(&weights) {
            if weight.abs() > simplex::EPS {
                println!("    {:<24} {weight:>9.5}", shape.name);
            }
        }
    }
    Ok(())
}

/// One pose per slider per step, moving that slider alone from 0 to 1.
fn sweep(sliders: usize) -> Vec<Vec<f64>> {
    let mut poses = Vec::with_capacity(sliders * SWEEP_STEPS);
    for slider in 0..sliders {
        for step in 1..=SWEEP_STEPS {
            let mut pose = vec![0.0; sliders];
            pose[slider] = step as f64 / SWEEP_STEPS as f64;
            poses.push(pose);
        }
    }
    poses
}
