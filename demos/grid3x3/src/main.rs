//! grid3x3 — smallest end-to-end run of the rust_wildfire spread engine.
//!
//! Ignites the centre of a 3 × 3 grid of 100 m cells that each burn for
//! 10 minutes, then runs four scenarios:
//!
//! 1. calm spread, advanced in two 10-minute budgets,
//! 2. the same fire against a firebreak along the centre's east edge,
//! 3. an east wind, comparing east and west ignite times,
//! 4. the randomised cellular model.
//!
//! Usage: `grid3x3 [config.json]`.  The optional file holds a
//! `SpreadConfig`; missing fields keep their defaults.  Set `RUST_LOG=debug`
//! for per-advance diagnostics.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wf_core::{CellId, GeoPoint, IgnitionBoundary, SimRng, SpreadConfig, WindVector};
use wf_grid::{GridIndex, GridIndexBuilder, LazyNeighbors, NeighborGraph};
use wf_output::{CsvWriter, SnapshotObserver};
use wf_spread::{
    FireState, IgnitePropagator, NoopObserver, SpreadPredictor, StochasticSpread, SuppressionMask, WindModel,
};

// ── Constants ─────────────────────────────────────────────────────────────────

const ROWS:          usize = 3;
const COLS:          usize = 3;
const PITCH_M:       f64   = 100.0;
const BURN_MINUTES:  f64   = 10.0;
const STEP_BUDGET:   f64   = 10.0;
const OUTPUT_DIR:    &str  = "output/grid3x3";
const SW:            GeoPoint = GeoPoint { lat: 37.7749, lng: -122.4194 };

// ── Helpers ───────────────────────────────────────────────────────────────────

fn load_config() -> Result<SpreadConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(SpreadConfig::default());
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let config: SpreadConfig = serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    config.validate()?;
    info!(%path, "loaded spread config");
    Ok(config)
}

fn id(r: usize, c: usize) -> CellId {
    CellId((r * COLS + c) as u32)
}

/// One character per cell, north row first: `#` burned, `*` burning,
/// `x` suppressed, `.` unburned.
fn print_grid(state: &FireState) {
    for r in (0..ROWS).rev() {
        let line: String = (0..COLS)
            .map(|c| {
                let cell = id(r, c);
                if state.is_burned(cell) {
                    '#'
                } else if state.is_burning(cell) {
                    '*'
                } else if state.is_suppressed(cell) {
                    'x'
                } else {
                    '.'
                }
            })
            .collect();
        println!("    {line}");
    }
}

fn predictor<'g>(grid: &'g GridIndex, config: &SpreadConfig) -> SpreadPredictor<'g, LazyNeighbors<'g>> {
    SpreadPredictor::new(grid, LazyNeighbors::new(grid, config.neighbors.clone()))
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;

    println!("=== grid3x3 — rust_wildfire spread engine ===");
    println!("Grid: {ROWS} × {COLS} cells, {PITCH_M} m pitch, {BURN_MINUTES} min burn");
    println!();

    // 1. Grid and ignition boundary around the centre cell.
    let grid = GridIndexBuilder::regular(SW, ROWS, COLS, PITCH_M, |_, _| Some(BURN_MINUTES)).build()?;
    let centre = id(1, 1);
    let boundary = IgnitionBoundary::from_bounds(&grid.cell(centre).bounds);

    let graph = NeighborGraph::build(&grid, &config.neighbors);
    println!("Neighbour graph: {} links", graph.link_count());

    // 2. Calm spread, two budgets, with CSV output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = SnapshotObserver::new(&grid, writer);

    let mut calm = predictor(&grid, &config);
    let mut state = FireState::ignite(&grid, &boundary, &mut obs);
    obs.record_state(&state);
    for _ in 0..2 {
        let report = calm.advance(&mut state, STEP_BUDGET, &mut obs);
        println!(
            "Calm: t = {:>5.1} min  burning {}  burned {}  ({} events, {:?})",
            state.clock(),
            state.burning_count(),
            state.burned_count(),
            report.steps,
            report.stop,
        );
        print_grid(&state);
    }
    obs.finish();
    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }
    println!("  {} snapshots written to {OUTPUT_DIR}", obs.recorded());
    println!();

    // 3. Firebreak along the centre's east edge.
    let extent = grid.bounds().context("empty grid")?;
    let line_lng = grid.cell(centre).bounds.max.lng;
    let mut mask = SuppressionMask::new();
    mask.add_firebreak(
        GeoPoint::new(extent.min.lat - 0.001, line_lng),
        GeoPoint::new(extent.max.lat + 0.001, line_lng),
        10.0,
    );
    let mut held = predictor(&grid, &config).with_suppression(mask.clone());
    let mut state = FireState::ignite(&grid, &boundary, &mut NoopObserver);
    held.advance(&mut state, 100.0, &mut NoopObserver);
    println!("Firebreak: t = {:.1} min, burned {}", state.clock(), state.burned_count());
    print_grid(&state);
    println!();

    // 4. East wind.
    let wind = WindModel::new(WindVector::new(30.0, 90.0), config.wind.clone());
    let field = IgnitePropagator::new(&grid, &SuppressionMask::new(), &wind).run(&boundary, &graph, &mut NoopObserver);
    println!(
        "Wind 30 km/h toward 90°: east ignites at {}, west at {}",
        field.ignite_time(id(1, 2)),
        field.ignite_time(id(1, 0)),
    );
    if let Some(last) = field.last_ignition() {
        println!("  last cell catches at {last:.2} min");
    }
    println!();

    // 5. Randomised cellular model.
    let calm_wind = WindModel::calm();
    let no_mask = SuppressionMask::new();
    let mut sim = StochasticSpread::new(&grid, &graph, &no_mask, &calm_wind, config.stochastic.clone());
    let mut stochastic = sim.ignite(&boundary);
    let mut rng = SimRng::new(config.stochastic.seed);
    let steps = sim.run(&mut stochastic, &mut rng, 100);
    println!(
        "Stochastic (seed {}): {} steps, {} of {} cells burned",
        config.stochastic.seed,
        steps,
        stochastic.burned.len(),
        grid.len(),
    );

    Ok(())
}
