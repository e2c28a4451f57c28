//! Entry points behind the command-line subcommands.

use crate::cli::{ClientArgs, StrategyKind};
use crate::client::{MatchClient, RemoteParticipant, SessionEnd};
use crate::config::{ClientConfig, ServerConfig, TournamentConfig};
use crate::events::{ArenaEvent, EventSink};
use crate::participants::StrategyPlayer;
use crate::server::MatchServer;
use crate::session::{MatchSession, SharedMatch};
use crate::strategy::{FirstEmptyStrategy, MoveStrategy, RandomStrategy};
use crate::tournament::{Tournament, TournamentReport, TournamentSettings};
use anyhow::{Context, Result};
use gomoku_rules::{GameEngine, Player};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber; `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Builds a strategy, seeded when `seed` is given.
pub fn build_strategy(kind: StrategyKind, seed: Option<u64>) -> Box<dyn MoveStrategy> {
    match (kind, seed) {
        (StrategyKind::Random, Some(seed)) => Box::new(RandomStrategy::with_seed(seed)),
        (StrategyKind::Random, None) => Box::new(RandomStrategy::new()),
        (StrategyKind::FirstEmpty, _) => Box::new(FirstEmptyStrategy),
    }
}

/// Logs events until every sender is gone.
pub async fn log_events(mut rx: mpsc::UnboundedReceiver<ArenaEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            ArenaEvent::MoveApplied {
                match_index, mv, ..
            } => debug!(match_index, %mv, "Move applied"),
            ArenaEvent::MatchEnded {
                match_index,
                board,
                outcome,
                score,
                ..
            } => info!(
                match_index,
                %outcome,
                red_wins = score.red_wins(),
                blue_wins = score.blue_wins(),
                ties = score.ties(),
                "Match ended\n{}",
                board.display()
            ),
            ArenaEvent::TournamentFinished(summary) => {
                info!(matches = summary.matches(), "Tournament finished")
            }
        }
    }
}

/// Serves one match until the listener fails.
#[instrument(skip(config), fields(host = %config.host(), port = config.port()))]
pub async fn run_server(config: &ServerConfig) -> Result<()> {
    let engine = (*config.seed()).map_or_else(GameEngine::new, GameEngine::with_seed);
    let (events, rx) = EventSink::channel();
    tokio::spawn(log_events(rx));

    let session = SharedMatch::new(MatchSession::new(engine, config.time_budget(), events));
    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port()))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host(), config.port()))?;

    MatchServer::new(session).serve(listener).await?;
    Ok(())
}

/// Runs a tournament between two built-in strategies.
#[instrument(skip(config))]
pub async fn run_tournament(
    config: &TournamentConfig,
    red: StrategyKind,
    blue: StrategyKind,
) -> Result<TournamentReport> {
    let seed = *config.seed();
    let red = StrategyPlayer::new(
        format!("red-{}", red),
        build_strategy(red, seed.map(|s| s.wrapping_add(1))),
    );
    let blue = StrategyPlayer::new(
        format!("blue-{}", blue),
        build_strategy(blue, seed.map(|s| s.wrapping_add(2))),
    );

    let (events, rx) = EventSink::channel();
    let observer = tokio::spawn(log_events(rx));

    let mut tournament = Tournament::new(
        TournamentSettings::from_config(config),
        Box::new(red),
        Box::new(blue),
    )
    .with_events(events);
    let report = tournament.run().await.context("Tournament aborted")?;

    drop(tournament);
    observer.await.context("Event observer panicked")?;
    Ok(report)
}

/// Plays one match against a server.
#[instrument(skip_all, fields(player = args.player, ip = %args.ip, port = args.port))]
pub async fn run_client(args: &ClientArgs, config: &ClientConfig) -> Result<SessionEnd> {
    let player = Player::from_id(i64::from(args.player))
        .with_context(|| format!("Invalid participant id {}", args.player))?;
    let kind = if args.random {
        StrategyKind::Random
    } else {
        StrategyKind::FirstEmpty
    };

    let mut participant = RemoteParticipant::new(
        MatchClient::new(&args.ip, args.port, config.request_timeout())
            .context("Failed to build HTTP client")?,
        player,
        build_strategy(kind, args.seed),
        config.poll_interval(),
    );
    let end = match participant.run().await {
        Ok(end) => end,
        Err(e) => {
            error!(error = %e, "Session aborted");
            return Err(e).context("Match session failed");
        }
    };
    info!(outcome = %end.outcome(), won = end.won_by(player), "Session finished");
    Ok(end)
}
