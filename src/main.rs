//! Gomoku Arena - Unified CLI
//!
//! Match server, remote participant and tournament runner.

use anyhow::Result;
use clap::Parser;
use gomoku_arena::ArenaConfig;
use gomoku_arena::app;
use gomoku_arena::cli::{Cli, Command};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    app::init_tracing();

    let mut config = ArenaConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Serve {
            host,
            port,
            time_budget_ms,
            seed,
        } => {
            config
                .server_mut()
                .apply_overrides(host, port, time_budget_ms, seed);
            app::run_server(config.server()).await
        }
        Command::Tournament {
            matches,
            time_budget_ms,
            seed,
            red,
            blue,
        } => {
            config
                .tournament_mut()
                .apply_overrides(matches, time_budget_ms, seed);
            let report = app::run_tournament(config.tournament(), red, blue).await?;
            println!("{}", report.summary());
            Ok(())
        }
        Command::Client(args) => {
            config
                .client_mut()
                .apply_overrides(args.poll_interval_ms, args.request_timeout_ms);
            let end = app::run_client(&args, config.client()).await?;
            info!(outcome = %end.outcome(), "Client finished");
            Ok(())
        }
    }
}
