//! HTTP match server.
//!
//! Exposes one [`SharedMatch`] to remote participants as JSON over HTTP.
//! Malformed bodies are refused by the extractors before they reach the
//! engine; well-formed but illegal moves are answered with
//! `move_accepted: false`.
//!
//! `POST /reset` is an operator action. It is not authenticated and discards
//! any match in progress; remote participants only use the move and state
//! routes, so the server should not be exposed to untrusted callers.

use crate::protocol::{
    HEALTH_PATH, MOVE_PATH, MoveRequest, RESET_PATH, ResetRequest, STATE_PATH, StateSnapshot,
};
use crate::session::SharedMatch;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use gomoku_rules::Player;
use tokio::net::TcpListener;
use tracing::{debug, info, instrument, warn};

/// Serves one match to remote participants.
#[derive(Debug, Clone)]
pub struct MatchServer {
    session: SharedMatch,
}

impl MatchServer {
    /// Creates a server over `session`.
    pub fn new(session: SharedMatch) -> Self {
        Self { session }
    }

    /// Shared match state.
    pub fn session(&self) -> &SharedMatch {
        &self.session
    }

    /// Routes of the match protocol.
    pub fn router(&self) -> Router {
        Router::new()
            .route(MOVE_PATH, post(make_move))
            .route(STATE_PATH, get(get_state))
            .route(RESET_PATH, post(reset_match))
            .route(HEALTH_PATH, get(health))
            .with_state(self.session.clone())
    }

    /// Serves until the listener fails.
    #[instrument(skip_all)]
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        match listener.local_addr() {
            Ok(addr) => info!(%addr, "Match server listening"),
            Err(e) => warn!(error = %e, "Match server listening on unknown address"),
        }
        axum::serve(listener, self.router()).await
    }
}

async fn make_move(
    State(session): State<SharedMatch>,
    Json(request): Json<MoveRequest>,
) -> Json<StateSnapshot> {
    let reply = session.submit(request);
    debug!(
        player_id = request.player_id,
        position = ?request.position,
        accepted = reply.move_accepted,
        "Move handled"
    );
    Json(reply)
}

async fn get_state(State(session): State<SharedMatch>) -> Json<StateSnapshot> {
    Json(session.snapshot())
}

/// Operator-only: replaces the current match, finished or not.
async fn reset_match(
    State(session): State<SharedMatch>,
    Json(request): Json<ResetRequest>,
) -> Result<Json<StateSnapshot>, (StatusCode, String)> {
    debug!(starting_player = ?request.starting_player, "Reset requested");
    let starting_player = match request.starting_player {
        None => None,
        Some(id) => Some(Player::from_id(id).ok_or_else(|| {
            warn!(id, "Reset with unknown starting participant");
            (
                StatusCode::BAD_REQUEST,
                format!("unknown participant id {}", id),
            )
        })?),
    };
    Ok(Json(session.reset(starting_player)))
}

async fn health() -> &'static str {
    "ok"
}
