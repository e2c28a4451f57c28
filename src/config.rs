//! Arena configuration loaded from TOML.
//!
//! Every section and field is optional; missing values fall back to the
//! defaults below. Command-line flags override whatever the file says.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 10000
//! time_budget_ms = 10000
//!
//! [client]
//! poll_interval_ms = 100
//! request_timeout_ms = 5000
//!
//! [tournament]
//! matches = 10
//! time_budget_ms = 10000
//! seed = 42
//! max_consecutive_rejections = 1000
//! ```

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Top-level arena configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Match server settings.
    server: ServerConfig,
    /// Remote participant settings.
    client: ClientConfig,
    /// Tournament settings.
    tournament: TournamentConfig,
}

/// Settings for the match server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    host: String,
    /// Port to bind.
    port: u16,
    /// Per-participant thinking budget; unlimited when absent.
    ///
    /// The first countdown starts with the first request the server
    /// receives for a match, not when the server starts.
    time_budget_ms: Option<u64>,
    /// Seed for the engine's random source.
    seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 10000,
            time_budget_ms: None,
            seed: None,
        }
    }
}

impl ServerConfig {
    /// Thinking budget as a duration.
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }
}

/// Settings for a remote participant.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Delay between protocol rounds.
    poll_interval_ms: u64,
    /// Longest wait for any single server reply.
    request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            request_timeout_ms: 5000,
        }
    }
}

impl ClientConfig {
    /// Poll interval as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Settings for a tournament run.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Number of matches.
    matches: usize,
    /// Thinking budget per participant per match.
    time_budget_ms: u64,
    /// Seed for reproducible runs.
    seed: Option<u64>,
    /// Rejected moves in a row tolerated before the run is aborted.
    max_consecutive_rejections: usize,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            matches: 10,
            time_budget_ms: 10_000,
            seed: None,
            max_consecutive_rejections: 1000,
        }
    }
}

impl TournamentConfig {
    /// Thinking budget as a duration.
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }
}

impl ArenaConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(
            port = config.server.port,
            matches = config.tournament.matches,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                debug!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Mutable access for command-line overrides.
    pub fn server_mut(&mut self) -> &mut ServerConfig {
        &mut self.server
    }

    /// Mutable access for command-line overrides.
    pub fn client_mut(&mut self) -> &mut ClientConfig {
        &mut self.client
    }

    /// Mutable access for command-line overrides.
    pub fn tournament_mut(&mut self) -> &mut TournamentConfig {
        &mut self.tournament
    }
}

impl ServerConfig {
    /// Applies command-line overrides.
    pub fn apply_overrides(
        &mut self,
        host: Option<String>,
        port: Option<u16>,
        time_budget_ms: Option<u64>,
        seed: Option<u64>,
    ) {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if time_budget_ms.is_some() {
            self.time_budget_ms = time_budget_ms;
        }
        if seed.is_some() {
            self.seed = seed;
        }
    }
}

impl ClientConfig {
    /// Applies command-line overrides.
    pub fn apply_overrides(
        &mut self,
        poll_interval_ms: Option<u64>,
        request_timeout_ms: Option<u64>,
    ) {
        if let Some(ms) = poll_interval_ms {
            self.poll_interval_ms = ms;
        }
        if let Some(ms) = request_timeout_ms {
            self.request_timeout_ms = ms;
        }
    }
}

impl TournamentConfig {
    /// Applies command-line overrides.
    pub fn apply_overrides(
        &mut self,
        matches: Option<usize>,
        time_budget_ms: Option<u64>,
        seed: Option<u64>,
    ) {
        if let Some(matches) = matches {
            self.matches = matches;
        }
        if let Some(ms) = time_budget_ms {
            self.time_budget_ms = ms;
        }
        if seed.is_some() {
            self.seed = seed;
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: ArenaConfig = toml::from_str("").unwrap();
        assert_eq!(config, ArenaConfig::default());
        assert_eq!(config.server().port(), &10000);
        assert_eq!(config.client().poll_interval(), Duration::from_millis(100));
        assert_eq!(config.client().request_timeout(), Duration::from_secs(5));
        assert_eq!(config.tournament().max_consecutive_rejections(), &1000);
        assert_eq!(config.server().time_budget(), None);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: ArenaConfig = toml::from_str("[tournament]\nmatches = 4\n").unwrap();
        assert_eq!(config.tournament().matches(), &4);
        assert_eq!(config.tournament().time_budget(), Duration::from_secs(10));
        assert_eq!(config.server().host(), "127.0.0.1");
    }

    #[test]
    fn test_overrides_win() {
        let mut config = ArenaConfig::default();
        config
            .server_mut()
            .apply_overrides(None, Some(9000), Some(500), None);
        config.tournament_mut().apply_overrides(Some(2), None, Some(3));
        assert_eq!(config.server().port(), &9000);
        assert_eq!(config.server().time_budget(), Some(Duration::from_millis(500)));
        assert_eq!(config.tournament().matches(), &2);
        assert_eq!(config.tournament().seed(), &Some(3));
    }
}
