use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use fl_app::{AppResult, DriveOptions, FactorySession, drive, load_line_file};
use fl_graph::Severity;
use fl_sim::{EngineEvent, SimObserver};
use tracing::info;

#[derive(Parser)]
#[command(name = "flowline")]
#[command(about = "Flowline CLI - factory line analytics and play-by-play simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a line file and print topology diagnostics
    Validate {
        /// Path to the line file (.yaml, .yml or .json)
        line_path: PathBuf,
    },
    /// Print live stats: total cycle time, throughput and bottleneck
    Stats {
        /// Path to the line file (.yaml, .yml or .json)
        line_path: PathBuf,
    },
    /// Run a headless simulation to completion
    Simulate {
        /// Path to the line file (.yaml, .yml or .json)
        line_path: PathBuf,
        /// Speed multiplier (overrides the line file)
        #[arg(long)]
        speed: Option<f64>,
        /// Simulated frame rate
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        /// Stop after this many frames
        #[arg(long, default_value_t = 1_000_000)]
        max_frames: usize,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { line_path } => cmd_validate(&line_path),
        Commands::Stats { line_path } => cmd_stats(&line_path),
        Commands::Simulate {
            line_path,
            speed,
            fps,
            max_frames,
        } => cmd_simulate(&line_path, speed, fps, max_frames),
    }
}

fn load_session(line_path: &Path) -> AppResult<FactorySession> {
    info!(path = %line_path.display(), "loading line file");
    let line = load_line_file(line_path)?;
    if !line.name.is_empty() {
        println!("Line: {}", line.name);
    }
    FactorySession::from_line_file(&line)
}

fn cmd_validate(line_path: &Path) -> AppResult<()> {
    println!("Validating line: {}", line_path.display());
    let session = load_session(line_path)?;
    let graph = session.graph();
    println!(
        "  {} nodes, {} edges, {} connected",
        graph.nodes().len(),
        graph.edges().len(),
        graph.connected_count()
    );

    if session.diagnostics().is_empty() {
        println!("✓ Line is valid");
    }
    for diagnostic in session.diagnostics() {
        let tag = match diagnostic.severity() {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        println!("  {}: {}", tag, diagnostic);
    }
    Ok(())
}

fn cmd_stats(line_path: &Path) -> AppResult<()> {
    let session = load_session(line_path)?;
    let stats = session.live_stats();
    println!("Total cycle time: {:.1} s", stats.total_cycle_time_s);
    println!(
        "Estimated throughput: {} units/hour",
        stats.estimated_throughput_per_hour
    );
    match &stats.bottleneck_name {
        Some(name) => println!(
            "Bottleneck: {} ({:.1} s adjusted)",
            name, stats.bottleneck_adjusted_cycle_time_s
        ),
        None => println!("Bottleneck: none"),
    }
    Ok(())
}

/// Prints engine events as they arrive.
struct EventPrinter;

impl SimObserver for EventPrinter {
    fn on_event(&mut self, event: &EngineEvent) {
        println!("[{}] {}", event.kind, event.message);
    }
}

fn cmd_simulate(
    line_path: &Path,
    speed: Option<f64>,
    fps: f64,
    max_frames: usize,
) -> AppResult<()> {
    let mut session = load_session(line_path)?;
    if let Some(speed) = speed {
        let options = session.options().clone().with_speed(speed);
        session.set_options(options)?;
    }
    println!(
        "Simulating at {:.2}x, {} fps",
        session.options().speed_multiplier,
        fps
    );

    let options = DriveOptions {
        max_frames,
        ..DriveOptions::at_fps(fps)
    };
    let report = drive(&mut session, &options, &mut EventPrinter)?;

    if !report.finished {
        println!(
            "Stopped after {} frames ({} units completed)",
            report.frames, report.units_completed
        );
        return Ok(());
    }

    println!(
        "✓ Finished in {} frames, {} units completed",
        report.frames, report.units_completed
    );
    if let Some(summary) = &report.summary {
        println!("  {:<20} {:>10} {:>6}", "node", "adjusted", "util");
        for (node, util) in session.graph().nodes().iter().zip(&summary.nodes) {
            let marker = if util.bottleneck { " <- bottleneck" } else { "" };
            let pct = if util.connected {
                format!("{}%", util.utilization_pct)
            } else {
                "-".to_string()
            };
            println!(
                "  {:<20} {:>9.1}s {:>6}{}",
                node.display_name(),
                util.adjusted_cycle_time_s,
                pct,
                marker
            );
        }
    }
    Ok(())
}
