//! Wordle Accessibility Retrofit - CLI
//!
//! Runs the retrofit engine against a simulated Wordle page: an interactive
//! TUI, a scripted walkthrough, or randomized mutation churn.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wordle_a11y::{
    commands::{run_demo, run_stress},
    output::{print_demo_report, print_stress_result},
};

#[derive(Parser)]
#[command(
    name = "wordle_a11y",
    about = "Screen-reader retrofit for Wordle, driven against a simulated page",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Settle delay (ms) before a game-panel change batch is processed
    #[arg(long, global = true, default_value_t = 500)]
    settle_ms: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive TUI (default): play the game and watch what a screen
    /// reader is told
    Play,

    /// Scripted walkthrough printed to the terminal
    Demo,

    /// Randomized mutation churn with consistency verification
    Stress {
        /// Number of mutation rounds
        #[arg(short = 'n', long, default_value = "500")]
        rounds: usize,

        /// Seed for reproducible churn
        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Play);

    match command {
        Commands::Play => run_play_command(cli.settle_ms),
        Commands::Demo => run_demo_command(cli.settle_ms),
        Commands::Stress { rounds, seed } => run_stress_command(rounds, seed, cli.settle_ms),
    }
}

fn run_play_command(settle_ms: u64) -> Result<()> {
    use wordle_a11y::interactive::{App, run_tui};

    let app = App::new(settle_ms).context("accessibility setup failed")?;
    run_tui(app)
}

fn run_demo_command(settle_ms: u64) -> Result<()> {
    let report = run_demo(settle_ms).context("accessibility setup failed")?;
    print_demo_report(&report);
    Ok(())
}

fn run_stress_command(rounds: usize, seed: u64, settle_ms: u64) -> Result<()> {
    println!("Running {rounds} mutation rounds (seed {seed})...");
    let result = run_stress(rounds, seed, settle_ms).context("accessibility setup failed")?;
    print_stress_result(&result);
    Ok(())
}
