//! Pachinko entry point
//!
//! Runs a headless session: places any requested boxes, drops balls at the
//! given x positions and reports the final score.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use glam::Vec2;

use pachinko::consts::*;
use pachinko::engine::{PhysicsEngine, RapierEngine};
use pachinko::sim::Scene;
use pachinko::{Session, Settings};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Override the RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Drop a ball at this x position (repeatable)
    #[arg(long = "drop", allow_negative_numbers = true)]
    drops: Vec<f32>,

    /// Place a box at X,Y in edit mode before dropping (repeatable)
    #[arg(long = "place", value_parser = parse_point)]
    places: Vec<Vec2>,

    /// Simulated seconds to run after the last drop
    #[arg(long, default_value_t = 5.0)]
    seconds: f32,

    /// Simulated seconds between drops
    #[arg(long, default_value_t = 0.5)]
    drop_interval: f32,
}

fn parse_point(s: &str) -> anyhow::Result<Vec2> {
    let (x, y) = s.split_once(',').context("expected X,Y")?;
    let x = x.trim().parse().with_context(|| format!("bad x in {:?}", s))?;
    let y = y.trim().parse().with_context(|| format!("bad y in {:?}", s))?;
    Ok(Vec2::new(x, y))
}

/// Enter edit mode, place a box at each point, then leave edit mode.
///
/// Points on the edit toggle would flip the mode instead of placing, so they
/// are rejected before anything is touched.
fn place_boxes<E: PhysicsEngine>(session: &mut Session<E>, places: &[Vec2]) -> anyhow::Result<()> {
    if places.is_empty() {
        return Ok(());
    }
    if let Some(point) = places.iter().find(|p| session.scene.edit_toggle.hit(**p)) {
        bail!(
            "--place {},{} lands on the edit toggle",
            point.x,
            point.y
        );
    }

    if !session.scene.edit_mode() {
        session.pointer_down(&[EDIT_LABEL_POS]);
    }
    for point in places {
        session.pointer_down(&[*point]);
    }
    if session.scene.edit_mode() {
        session.pointer_down(&[EDIT_LABEL_POS]);
    }
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.seconds < 0.0 || args.drop_interval < 0.0 {
        bail!("--seconds and --drop-interval must not be negative");
    }

    let mut settings = match args.settings.as_deref() {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load(None),
    };
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }

    log::info!("Pachinko (headless) starting with seed {}", settings.seed);
    let engine = RapierEngine::new(settings.gravity);
    let mut session = Session::new(Scene::new(&settings), engine);
    let frame_dt = 1.0 / 60.0;

    place_boxes(&mut session, &args.places)?;

    for x in &args.drops {
        session.pointer_down(&[Vec2::new(*x, FIELD_HEIGHT)]);
        session.run_for(args.drop_interval, frame_dt);
    }
    session.run_for(args.seconds, frame_dt);

    let stats = &session.stats;
    log::info!(
        "Session done: {} substeps, {} balls, {} boxes, {} good, {} bad",
        stats.substeps,
        stats.balls_dropped,
        stats.boxes_placed,
        stats.good_hits,
        stats.bad_hits
    );
    match session.scene.score_label.as_ref() {
        Some(label) => println!("{}", label.text),
        None => println!("{}", session.scene.score()),
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end
}
