//! Galaxy quadtree driver.
//!
//! Runs the viewport traversal outside any renderer:
//! - `frame`: resolve one viewport and print the per-depth census
//! - `sweep`: zoom a viewport over many frames and report timings
//! - `config`: print the effective configuration as TOML

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use galaxy_quad::{OrientedViewport, QuadTree, TraversalOutput};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;

/// Viewport-driven LOD over a lazily expanded galaxy quadtree.
#[derive(Parser, Debug)]
#[command(name = "galaxy_quad")]
#[command(about = "Resolves visible quadtree cells for a rotated viewport")]
struct Args {
  /// Path to configuration TOML file (defaults are used when omitted).
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Resolve the configured viewport once.
  Frame {
    /// Print every visited leaf, not just the census.
    #[arg(long)]
    leaves: bool,
    /// Census depth limit.
    #[arg(long)]
    max_depth: Option<u32>,
  },
  /// Zoom the configured viewport from `zoom_start` to `zoom_end`.
  Sweep {
    #[arg(long, default_value_t = 1.0)]
    zoom_start: f64,
    #[arg(long, default_value_t = 64.0)]
    zoom_end: f64,
    #[arg(long, default_value_t = 120)]
    frames: u32,
  },
  /// Print the effective configuration.
  Config,
}

fn main() -> Result<()> {
  let args = Args::parse();

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
    .init();

  let config = Config::load_or_default(args.config.as_deref())?;
  if let Some(path) = &args.config {
    info!(path = %path.display(), "loaded config");
  }

  match args.command {
    Command::Frame { leaves, max_depth } => run_frame(&config, leaves, max_depth),
    Command::Sweep {
      zoom_start,
      zoom_end,
      frames,
    } => run_sweep(&config, zoom_start, zoom_end, frames),
    Command::Config => {
      print!("{}", config.to_toml()?);
      Ok(())
    }
  }
}

fn run_frame(config: &Config, print_leaves: bool, census_depth: Option<u32>) -> Result<()> {
  let tree = config.build_tree()?;
  let viewport = config.viewport.build()?;

  info!(
    pseudo_depth = tree.pseudo_depth(&viewport),
    desired_depth = tree.desired_depth(&viewport),
    "viewport resolved"
  );

  let output = tree.update(&viewport);
  report_frame(&output);

  if print_leaves {
    for leaf in &output.visited {
      let a = leaf.address();
      let c = leaf.bounds().center;
      println!(
        "L{:02} ({:>6}, {:>6})  center=({:>10.3}, {:>10.3})  stubs={:>3}  fade={:.3}  parent={:.3}",
        a.depth,
        a.x,
        a.y,
        c.x,
        c.y,
        leaf.stubs.len(),
        leaf.fade,
        leaf.parent_weight()
      );
    }
  }

  println!("\nMaterialized cells per depth:");
  print!("{}", tree.census(census_depth));

  let metrics = tree.metrics();
  info!(update_us = metrics.last_update_us, "frame timing");
  Ok(())
}

fn run_sweep(config: &Config, zoom_start: f64, zoom_end: f64, frames: u32) -> Result<()> {
  anyhow::ensure!(frames > 0, "frames must be positive");
  anyhow::ensure!(
    zoom_start > 0.0 && zoom_end > 0.0,
    "zoom factors must be positive, got {zoom_start} .. {zoom_end}"
  );

  let tree = config.build_tree()?;
  let base = config.viewport.build()?;

  info!(zoom_start, zoom_end, frames, "starting zoom sweep");

  // Zoom is interpolated geometrically between the endpoints.
  let ratio = (zoom_end / zoom_start).ln();
  for frame in 0..frames {
    let t = if frames == 1 {
      0.0
    } else {
      f64::from(frame) / f64::from(frames - 1)
    };
    let zoom = zoom_start * (ratio * t).exp();
    let viewport = base
      .scaled(zoom)
      .with_context(|| format!("zoom {zoom} at frame {frame}"))?;
    let output = tree.update(&viewport);
    tracing::debug!(
      frame,
      zoom,
      leaves = output.len(),
      max_depth = output.stats.max_leaf_depth,
      expanded = output.stats.cells_expanded,
      "sweep frame"
    );
  }

  report_sweep(&tree, &base.scaled(zoom_end)?);
  Ok(())
}

fn report_frame(output: &TraversalOutput<'_>) {
  let stats = &output.stats;
  info!(
    leaves = output.len(),
    stubs = output.stub_count(),
    fading_parents = output.fading_parents().len(),
    tested = stats.cells_tested,
    pruned = stats.cells_pruned,
    expanded = stats.cells_expanded,
    max_leaf_depth = stats.max_leaf_depth,
    clamped = stats.total_clamped(),
    "frame complete"
  );
}

fn report_sweep(tree: &QuadTree, last: &OrientedViewport) {
  let metrics = tree.metrics();
  let (min_us, max_us) = metrics.update_timings.min_max().unwrap_or_default();
  info!(
    updates = metrics.total_updates,
    avg_us = metrics.avg_update_timing_us(),
    min_us,
    max_us,
    cells_expanded = metrics.total_cells_expanded,
    stub_lists = metrics.total_stub_lists_generated,
    materialized = tree.materialized_cells(),
    final_depth = tree.desired_depth(last),
    "sweep complete"
  );

  println!("\nLeaves per depth (last frame):");
  for (depth, count) in metrics.leaves_per_depth.iter().enumerate() {
    if *count > 0 {
      println!("L{depth:02} = {count:>5}");
    }
  }
}
