// ABOUTME: Configuration loading and validation for the steeple server and CLI.
// ABOUTME: Reads STEEPLE_* environment variables and opens the selected storage backend.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use steeple_agent::AnalyzerKind;
use steeple_store::{FileStore, KvStore, MemoryStore, SqliteStore, StoreError};
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("STEEPLE_BIND is not a valid socket address: {0}")]
    InvalidBind(String),

    #[error("STEEPLE_BACKEND must be one of memory, file, sqlite (got {0:?})")]
    InvalidBackend(String),

    #[error("STEEPLE_QUOTA_BYTES must be a positive integer (got {0:?})")]
    InvalidQuota(String),

    #[error("STEEPLE_LATENCY_MS must be a positive integer (got {0:?})")]
    InvalidLatency(String),

    #[error("STEEPLE_ANALYSIS_TIMEOUT_MS must be a positive integer (got {0:?})")]
    InvalidTimeout(String),

    #[error("STEEPLE_ANALYZER is invalid: {0}")]
    InvalidAnalyzer(String),
}

/// Where the key/value namespace is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Process memory; lost on exit.
    Memory,
    /// One JSON file per key under `$STEEPLE_HOME/data`.
    File,
    /// `$STEEPLE_HOME/steeple.db`.
    Sqlite,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Backend::Memory),
            "file" => Ok(Backend::File),
            "sqlite" => Ok(Backend::Sqlite),
            _ => Err(ConfigError::InvalidBackend(s.to_string())),
        }
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SteepleConfig {
    pub home: PathBuf,
    pub bind: SocketAddr,
    pub backend: Backend,
    pub quota_bytes: Option<usize>,
    pub latency: Duration,
    pub analyzer: AnalyzerKind,
    pub analysis_timeout: Duration,
}

fn positive_ms(var: &str, default: u64, err: fn(String) -> ConfigError) -> Result<Duration, ConfigError> {
    match std::env::var(var) {
        Err(_) => Ok(Duration::from_millis(default)),
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
            _ => Err(err(raw)),
        },
    }
}

impl SteepleConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - STEEPLE_HOME: data directory (default: ~/.steeple)
    /// - STEEPLE_BIND: socket address to bind (default: 127.0.0.1:7340)
    /// - STEEPLE_BACKEND: memory, file, or sqlite (default: sqlite)
    /// - STEEPLE_QUOTA_BYTES: storage quota for the memory backend (optional)
    /// - STEEPLE_LATENCY_MS: simulated latency per repository call (default: 500)
    /// - STEEPLE_ANALYZER: gemini or none (default: gemini when GEMINI_API_KEY is set)
    /// - STEEPLE_ANALYSIS_TIMEOUT_MS: upper bound on one analyzer call (default: 10000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let home = std::env::var("STEEPLE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                std::env::var("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("/tmp"))
                    .join(".steeple")
            });

        let bind_str =
            std::env::var("STEEPLE_BIND").unwrap_or_else(|_| "127.0.0.1:7340".to_string());
        let bind: SocketAddr = bind_str
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind_str))?;

        let backend = match std::env::var("STEEPLE_BACKEND") {
            Ok(raw) => raw.parse()?,
            Err(_) => Backend::Sqlite,
        };

        let quota_bytes = match std::env::var("STEEPLE_QUOTA_BYTES") {
            Err(_) => None,
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => Some(n),
                _ => return Err(ConfigError::InvalidQuota(raw)),
            },
        };

        let latency = positive_ms("STEEPLE_LATENCY_MS", 500, ConfigError::InvalidLatency)?;
        let analysis_timeout =
            positive_ms("STEEPLE_ANALYSIS_TIMEOUT_MS", 10_000, ConfigError::InvalidTimeout)?;

        let analyzer = match std::env::var("STEEPLE_ANALYZER") {
            Ok(raw) => raw.parse().map_err(ConfigError::InvalidAnalyzer)?,
            Err(_) => {
                let has_key = std::env::var("GEMINI_API_KEY").is_ok_and(|k| !k.is_empty());
                if has_key {
                    AnalyzerKind::Gemini
                } else {
                    AnalyzerKind::None
                }
            }
        };

        Ok(Self {
            home,
            bind,
            backend,
            quota_bytes,
            latency,
            analyzer,
            analysis_timeout,
        })
    }

    /// Open the configured storage backend, creating directories as needed.
    pub fn open_store(&self) -> Result<Arc<dyn KvStore>, StoreError> {
        if self.quota_bytes.is_some() && self.backend != Backend::Memory {
            tracing::warn!("STEEPLE_QUOTA_BYTES only applies to the memory backend");
        }
        let store: Arc<dyn KvStore> = match self.backend {
            Backend::Memory => match self.quota_bytes {
                Some(quota) => Arc::new(MemoryStore::with_quota(quota)),
                None => Arc::new(MemoryStore::new()),
            },
            Backend::File => Arc::new(FileStore::open(&self.home.join("data"))?),
            Backend::Sqlite => Arc::new(SqliteStore::open(&self.home.join("steeple.db"))?),
        };
        tracing::info!(backend = ?self.backend, home = %self.home.display(), "storage opened");
        Ok(store)
    }
}
