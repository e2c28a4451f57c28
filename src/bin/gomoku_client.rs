//! Gomoku Arena remote participant
//!
//! Plays one match against a running server and exits; a non-zero exit
//! status means the session ended on a transport error.

use anyhow::Result;
use clap::Parser;
use gomoku_arena::ArenaConfig;
use gomoku_arena::app;
use gomoku_arena::cli::ClientArgs;
use std::path::PathBuf;

/// Five-in-a-row remote participant
#[derive(Parser, Debug)]
#[command(name = "gomoku_client", version)]
struct ClientCli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    args: ClientArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = ClientCli::parse();
    app::init_tracing();

    let mut config = ArenaConfig::load_or_default(cli.config.as_deref())?;
    config
        .client_mut()
        .apply_overrides(cli.args.poll_interval_ms, cli.args.request_timeout_ms);

    let end = app::run_client(&cli.args, config.client()).await?;
    println!("{}", end.outcome());
    Ok(())
}
