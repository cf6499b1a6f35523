//! CLI frontend for the Arena match simulator.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "arena",
    about = "Arena: a turn-based probabilistic match simulator",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one match between two generated competitors
    Match {
        /// Rule preset: fencing, darts, mma
        #[arg(short, long, conflicts_with = "config")]
        preset: Option<String>,

        /// JSON match config file (unset fields use defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// RNG seed (overrides the config's seed)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Show the full event log
        #[arg(short, long)]
        verbose: bool,

        /// Print the result as JSON
        #[arg(long, conflicts_with_all = ["verbose", "live"])]
        json: bool,

        /// Print each action as it happens
        #[arg(long)]
        live: bool,

        /// Delay between live actions in milliseconds
        #[arg(long, default_value = "40")]
        pace_ms: u64,
    },

    /// Run a single-elimination tournament of generated competitors
    Tournament {
        /// Number of entrants (a power of two)
        #[arg(short, long, default_value = "8")]
        entrants: usize,

        /// Rule preset: fencing, darts, mma
        #[arg(short, long, conflicts_with = "config")]
        preset: Option<String>,

        /// JSON match config file (unset fields use defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// RNG seed (overrides the config's seed)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print the bracket as JSON
        #[arg(long)]
        json: bool,
    },

    /// Estimate win rates over many seeded matches
    Trials {
        /// Skill of the first competitor
        #[arg(long, default_value = "0.7")]
        skill_a: f64,

        /// Skill of the second competitor
        #[arg(long, default_value = "0.5")]
        skill_b: f64,

        /// Number of matches to play
        #[arg(short = 'n', long, default_value = "1000")]
        count: u32,

        /// Rule preset: fencing, darts, mma
        #[arg(short, long, conflicts_with = "config")]
        preset: Option<String>,

        /// JSON match config file (unset fields use defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Base RNG seed; trial i uses seed + i
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a rule preset as a JSON config
    Preset {
        /// Preset name: fencing, darts, mma
        name: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Match {
            preset,
            config,
            seed,
            verbose,
            json,
            live,
            pace_ms,
        } => commands::load_config(preset.as_deref(), config.as_deref(), seed).and_then(|cfg| {
            commands::play_match::run(
                &cfg,
                commands::play_match::Output {
                    verbose,
                    json,
                    live,
                    pace_ms,
                },
            )
        }),
        Commands::Tournament {
            entrants,
            preset,
            config,
            seed,
            json,
        } => commands::load_config(preset.as_deref(), config.as_deref(), seed)
            .and_then(|cfg| commands::tournament::run(&cfg, entrants, json)),
        Commands::Trials {
            skill_a,
            skill_b,
            count,
            preset,
            config,
            seed,
            json,
        } => commands::load_config(preset.as_deref(), config.as_deref(), seed)
            .and_then(|cfg| commands::trials::run(&cfg, skill_a, skill_b, count, json)),
        Commands::Preset { name } => commands::preset::run(&name),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
