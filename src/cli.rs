//! Command-line interface for gomoku_arena.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Gomoku Arena - five-in-a-row match server, participants and tournaments
#[derive(Parser, Debug)]
#[command(name = "gomoku_arena")]
#[command(
    about = "Five-in-a-row match server, remote participants and tournaments",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP match server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Per-participant thinking budget in milliseconds
        #[arg(long)]
        time_budget_ms: Option<u64>,

        /// Seed for the engine's random source
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run a tournament between two built-in strategies
    Tournament {
        /// Number of matches
        #[arg(short = 'n', long)]
        matches: Option<usize>,

        /// Thinking budget per participant per match, in milliseconds
        #[arg(long)]
        time_budget_ms: Option<u64>,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Strategy playing red
        #[arg(long, value_enum, default_value_t = StrategyKind::Random)]
        red: StrategyKind,

        /// Strategy playing blue
        #[arg(long, value_enum, default_value_t = StrategyKind::Random)]
        blue: StrategyKind,
    },

    /// Play one match against a running server
    Client(ClientArgs),
}

/// Options of a remote participant.
#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    /// Server host
    #[arg(long = "IP", default_value = "localhost")]
    pub ip: String,

    /// Server port
    #[arg(long, default_value_t = 10000)]
    pub port: u16,

    /// Participant id (1 = red, 2 = blue)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub player: u8,

    /// Play uniformly random moves instead of the first empty cell
    #[arg(long)]
    pub random: bool,

    /// Delay between protocol rounds in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Longest wait for a server reply in milliseconds
    #[arg(long)]
    pub request_timeout_ms: Option<u64>,

    /// Seed for the random strategy
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Built-in strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum StrategyKind {
    /// Uniformly random empty cell
    Random,
    /// First empty cell in row-major order
    FirstEmpty,
}
