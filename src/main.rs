use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rs_pick_place::cell_config::CellConfig;
use rs_pick_place::sequencer::{TaskPlan, UnreachablePolicy};
use rs_pick_place::utils::format_joints;
use rs_pick_place::visualizer::{ConsoleVisualizer, Paced};

/// Runs the pick-and-place cycle of the cell and streams every step to the console.
#[derive(Parser, Debug)]
#[command(name = "rs-pick-place")]
#[command(about = "Pick-and-place sequencing for a six axis arm with a gripper", long_about = None)]
#[command(version)]
struct Cli {
    /// Cell configuration (YAML). The built-in demo cell is used if not given.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Zero based indices of the items to move, in this order (all items if not given).
    #[arg(short, long, value_delimiter = ',')]
    items: Option<Vec<usize>>,

    /// Maximal position error of a solved pose, meters.
    #[arg(short, long)]
    tolerance: Option<f64>,

    /// Pause after every frame, milliseconds.
    #[arg(long)]
    frame_delay_ms: Option<u64>,

    /// Stop the run when a pose cannot be reached within tolerance.
    #[arg(long)]
    abort_on_unreachable: bool,

    /// Log every frame.
    #[arg(short, long)]
    verbose: bool,

    /// Print the motion settings in use and exit.
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => CellConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load cell configuration from {}", path.display()))?,
        None => CellConfig::default(),
    };
    if let Some(tolerance) = cli.tolerance {
        config.settings.tolerance = tolerance;
    }
    if let Some(delay) = cli.frame_delay_ms {
        config.frame_delay = Duration::from_millis(delay);
    }
    if cli.abort_on_unreachable {
        config.settings.on_unreachable = UnreachablePolicy::Abort;
    }

    if cli.print_config {
        print!("robot:\n{}", config.robot.parameters.to_yaml());
        print!("{}", config.motion_yaml());
        return Ok(());
    }

    let robot = config.robot.build();
    let sequencer = config
        .sequencer(robot.as_ref())
        .context("Invalid motion profile")?;
    let plan = match &cli.items {
        Some(items) => TaskPlan::for_items(items, &config.settings.steps),
        None => sequencer.plan(),
    };

    let visualizer = Paced::new(ConsoleVisualizer::new(), config.frame_delay);
    let summary = sequencer
        .run(&plan, config.start_joints, visualizer)
        .context("Pick-and-place run aborted")?;

    for (item, failure) in &summary.failed {
        warn!(item, "not moved: {}", failure);
    }
    for record in summary.unreachable() {
        warn!(phase = %record.phase, "{}", record.check);
    }
    info!(
        "{} of {} items moved in {} frames, final joints {}",
        summary.completed.len(),
        plan.tasks.len(),
        summary.frames,
        format_joints(&summary.final_joints)
    );
    Ok(())
}
