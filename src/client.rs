//! Remote participant: plays one match against a [`MatchServer`] over HTTP.
//!
//! The loop queries the state while the opponent is to move and submits a
//! move when it is this participant's turn, sleeping a fixed interval
//! between rounds. Any transport failure or incoherent reply ends the
//! session with a [`TransportError`]; the server keeps its own state.
//!
//! [`MatchServer`]: crate::MatchServer

use crate::protocol::{
    HEALTH_PATH, MOVE_PATH, MatchView, MoveRequest, ProtocolError, RESET_PATH, ResetRequest,
    STATE_PATH, StateSnapshot,
};
use crate::strategy::MoveStrategy;
use derive_getters::Getters;
use derive_more::{Display, Error};
use gomoku_rules::{Player, WinResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// What went wrong talking to the server.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum TransportErrorKind {
    /// The request never produced a response.
    #[display("connection failed: {}", _0)]
    Connect(String),
    /// The server answered with a non-success status.
    #[display("server answered {}", _0)]
    Status(u16),
    /// The response body is not a valid snapshot.
    #[display("malformed reply: {}", _0)]
    Malformed(String),
    /// The connection dropped while the reply was being read.
    #[display("connection closed: {}", _0)]
    Closed(String),
    /// The server did not answer within the request timeout.
    #[display("request timed out: {}", _0)]
    TimedOut(String),
}

/// Transport error.
#[derive(Debug, Clone, Display, Error)]
#[display("Transport error: {} at {}:{}", kind, file, line)]
pub struct TransportError {
    /// Error category.
    pub kind: TransportErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl TransportError {
    /// Creates a new transport error.
    #[track_caller]
    pub fn new(kind: TransportErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    #[track_caller]
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            TransportErrorKind::TimedOut(e.to_string())
        } else if e.is_decode() {
            TransportErrorKind::Malformed(e.to_string())
        } else if let Some(status) = e.status() {
            TransportErrorKind::Status(status.as_u16())
        } else if e.is_body() {
            TransportErrorKind::Closed(e.to_string())
        } else {
            TransportErrorKind::Connect(e.to_string())
        };
        Self::new(kind)
    }
}

impl From<ProtocolError> for TransportError {
    #[track_caller]
    fn from(e: ProtocolError) -> Self {
        Self::new(TransportErrorKind::Malformed(e.message))
    }
}

/// Typed client for the match protocol.
#[derive(Debug, Clone)]
pub struct MatchClient {
    base_url: String,
    client: reqwest::Client,
}

impl MatchClient {
    /// Client for the server at `host:port`.
    ///
    /// Every request fails with [`TransportErrorKind::TimedOut`] when the
    /// server has not answered within `request_timeout`.
    pub fn new(host: &str, port: u16, request_timeout: Duration) -> Result<Self, TransportError> {
        Self::from_base_url(format!("http://{}:{}", host, port), request_timeout)
    }

    /// Client for a server at `base_url` (no trailing slash).
    pub fn from_base_url(
        base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Server address.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submits a move and returns the resulting state.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn submit(&self, request: &MoveRequest) -> Result<StateSnapshot, TransportError> {
        self.post(MOVE_PATH, request).await
    }

    /// Fetches the current state.
    pub async fn state(&self) -> Result<StateSnapshot, TransportError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, STATE_PATH))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Starts a new match; random starter when `None`.
    ///
    /// An operator action that abandons any match in progress. Participants
    /// never call it.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn reset(
        &self,
        starting_player: Option<Player>,
    ) -> Result<StateSnapshot, TransportError> {
        let request = ResetRequest {
            starting_player: starting_player.map(|p| i64::from(p.id())),
        };
        self.post(RESET_PATH, &request).await
    }

    /// Checks that the server is up.
    pub async fn health(&self) -> Result<(), TransportError> {
        self.client
            .get(format!("{}{}", self.base_url, HEALTH_PATH))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<StateSnapshot, TransportError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TransportError> {
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Server refused request");
            return Err(TransportError::new(TransportErrorKind::Status(status.as_u16())));
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| TransportError::new(TransportErrorKind::Malformed(e.to_string())))
    }
}

/// How a participant session ended.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct SessionEnd {
    /// Terminal outcome reported by the server.
    outcome: WinResult,
    /// Moves sent.
    moves_sent: usize,
    /// Moves the server accepted.
    moves_accepted: usize,
}

impl SessionEnd {
    /// True when this participant won.
    pub fn won_by(&self, player: Player) -> bool {
        self.outcome.winner() == Some(player)
    }
}

/// Plays one match for `player` using `strategy`.
pub struct RemoteParticipant {
    client: MatchClient,
    player: Player,
    strategy: Box<dyn MoveStrategy>,
    poll_interval: Duration,
}

impl RemoteParticipant {
    /// Creates a remote participant.
    pub fn new(
        client: MatchClient,
        player: Player,
        strategy: Box<dyn MoveStrategy>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            client,
            player,
            strategy,
            poll_interval,
        }
    }

    /// Runs until the server reports a terminal outcome.
    ///
    /// # Errors
    ///
    /// Any failed request or incoherent reply ends the session.
    #[instrument(
        skip(self),
        fields(
            player = %self.player,
            strategy = self.strategy.label(),
            server = %self.client.base_url(),
        )
    )]
    pub async fn run(&mut self) -> Result<SessionEnd, TransportError> {
        info!("Joining match");
        let mut view: Option<MatchView> = None;
        let mut moves_sent = 0;
        let mut moves_accepted = 0;

        loop {
            let my_turn = view.as_ref().is_some_and(|v| v.who_is_next == Some(self.player));
            let choice = match &view {
                Some(v) if my_turn => self.strategy.choose(&v.board, self.player),
                _ => None,
            };

            let snapshot = match choice {
                Some(position) => {
                    moves_sent += 1;
                    let reply = self.client.submit(&MoveRequest::new(position, self.player)).await?;
                    if reply.move_accepted {
                        moves_accepted += 1;
                        debug!(%position, "Move accepted");
                    } else {
                        debug!(%position, "Move rejected");
                    }
                    reply
                }
                None => self.client.state().await?,
            };

            let decoded = snapshot.decode()?;
            if decoded.outcome.is_terminal() {
                info!(outcome = %decoded.outcome, moves_sent, moves_accepted, "Match over");
                return Ok(SessionEnd {
                    outcome: decoded.outcome,
                    moves_sent,
                    moves_accepted,
                });
            }
            view = Some(decoded);

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
