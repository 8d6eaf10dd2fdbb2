use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ridgeline_sim::runner::{self, RunSummary, TickRecord};
use ridgeline_sim::script::InputScript;
use ridgeline_sim::{DEFAULT_MAP_PATH, SimError, load_locomotion};

/// Ticks simulated when neither `--ticks` nor a script is given.
const DEFAULT_TICKS: u64 = 600;

#[derive(Parser)]
#[command(name = "ridgeline-sim")]
#[command(about = "Replay a scripted input timeline over a Ridgeline map", long_about = None)]
struct Args {
    /// Map file (JSON). The default is relative to the workspace root, so
    /// pass --map explicitly when running from anywhere else
    #[arg(long, default_value = DEFAULT_MAP_PATH)]
    map: PathBuf,
    /// Locomotion config (TOML). Without it, RIDGELINE_CONFIG or config/locomotion.toml
    #[arg(long)]
    config: Option<PathBuf>,
    /// Input script (TOML). Without it every tick is idle
    #[arg(long)]
    script: Option<PathBuf>,
    /// Ticks to simulate (default: script length, or 600 without a script)
    #[arg(long)]
    ticks: Option<u64>,
    /// Print one JSON snapshot per tick to stdout
    #[arg(long)]
    trace: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match simulate(&args) {
        Ok(summary) => {
            tracing::info!(
                ticks = summary.ticks,
                landings = summary.landings,
                takeoffs = summary.takeoffs,
                wall_contacts = summary.wall_contacts,
                highest_jump_level = summary.highest_jump_level.as_u8(),
                state = %summary.last.state,
                x = summary.last.position.x,
                y = summary.last.position.y,
                "Run finished"
            );
            ExitCode::SUCCESS
        },
        Err(e) => {
            tracing::error!(error = %e, "Simulation failed");
            ExitCode::FAILURE
        },
    }
}

fn simulate(args: &Args) -> Result<RunSummary, SimError> {
    let mut loco = load_locomotion(args.config.as_deref(), &args.map)?;
    let script = match &args.script {
        Some(path) => InputScript::load(path)?,
        None => InputScript::default(),
    };
    let ticks = args.ticks.unwrap_or(if script.spans.is_empty() {
        DEFAULT_TICKS
    } else {
        script.total_ticks()
    });

    tracing::info!(ticks, spans = script.spans.len(), "Simulation starting");

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let summary = runner::run(&mut loco, &script, ticks, |record: &TickRecord| {
        if args.trace {
            serde_json::to_writer(&mut out, record).map_err(std::io::Error::from)?;
            out.write_all(b"\n")?;
        }
        Ok::<_, SimError>(())
    })?;
    out.flush()?;
    Ok(summary)
}
