//! Hypercube CLI
//!
//! Runs a seeded orientation hypercube session, optionally plays a press
//! chain into it, then lets the auto-solver finish the puzzle.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hypercube_core::compiler::format_presses;
use hypercube_core::driver::Compensation;
use hypercube_core::face_map::FaceMap;
use hypercube_core::module::parse_chain;
use hypercube_core::{AutoSolveDriver, HypercubeModule, ModuleConfig, PuzzleControls};

#[derive(Parser)]
#[command(name = "hypercube")]
#[command(about = "Play and auto-solve orientation hypercube sessions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a seeded session and auto-solve it
    Solve {
        /// Session seed (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,

        /// JSON config file (falls back to HYPERCUBE_CONFIG_PATH)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Disable observer drift
        #[arg(long, default_value = "false")]
        no_drift: bool,

        /// Press chain to play before solving, e.g. "clock in set"
        #[arg(long)]
        press: Option<String>,

        /// Print the solve report as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Plan a solve from a JSON request file
    Plan {
        /// Request file path
        #[arg(long)]
        r#in: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve { seed, config, no_drift, press, json } => {
            let mut config = load_config(config)?;
            if let Some(seed) = seed {
                config.seed = seed;
            }
            if no_drift {
                config.drift_enabled = false;
            }
            run_session(&config, press.as_deref(), json)?;
        }

        Commands::Plan { r#in } => {
            let request = std::fs::read_to_string(&r#in)
                .with_context(|| format!("failed to read {}", r#in.display()))?;
            let response = hypercube_core::plan_solve_json(&request).map_err(anyhow::Error::msg)?;
            println!("{response}");
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<ModuleConfig> {
    let config = match path {
        Some(path) => ModuleConfig::from_path(&path.to_string_lossy())?,
        None => ModuleConfig::from_env()?,
    };
    Ok(config)
}

fn run_session(config: &ModuleConfig, press: Option<&str>, json: bool) -> Result<()> {
    let mut module = HypercubeModule::new(1, config)?;

    println!("Session seed {}", config.seed);
    println!("   Facing:  {}", module.facing().name());
    println!("   Targets: {}", module.targets().describe_goals());

    if let Some(chain) = press {
        for control in parse_chain(chain, config.max_chained_presses)? {
            match module.apply(control) {
                Ok(()) => {}
                Err(e) if e.is_recoverable() => log::warn!("{control}: {e}"),
                Err(e) => return Err(e.into()),
            }
        }
        let map = FaceMap::from_queued(module.queued_rotations());
        println!("   After presses: {}", module.targets().describe_positions(&map));
        println!("   Strikes: {}", module.strikes());
    }

    if module.is_solved() {
        println!("\nAlready solved.");
        return Ok(());
    }

    let mut driver = AutoSolveDriver::new();
    let report = driver.run(&mut module)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let rotations: Vec<String> = report.plan.rotations.iter().map(|r| r.to_string()).collect();
    println!("\nSolved.");
    println!("   Rotations: {}", rotations.join(" "));
    println!("   Planned:   {}", format_presses(&report.plan.presses));
    println!("   Issued:    {}", format_presses(&report.issued));
    println!("   Closing:   {}", format_presses(&report.closing));
    for compensation in &report.compensations {
        println!("   Drift:     {}", describe(compensation));
    }
    Ok(())
}

fn describe(compensation: &Compensation) -> String {
    match compensation {
        Compensation::ConsumedNext { at, button } => format!("skipped {button} at press {at}"),
        Compensation::Folded { at, pressed } => format!("folded two presses into {pressed} at {at}"),
        Compensation::Pressed { at, button } => format!("pressed {button} after press {at}"),
        Compensation::Deferred { shift } => format!("deferred shift {shift:+}"),
    }
}
