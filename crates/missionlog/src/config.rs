//! Configuration loading from environment variables.

use anyhow::{Context, Result};

use crate::data::DataSource;

pub const DEFAULT_SOURCE: &str = "data.json";
pub const DEFAULT_PORT: u16 = 8080;

/// Runtime settings. CLI flags override what the environment provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: DataSource,
    pub port: u16,
}

impl Config {
    /// Load settings from the environment.
    ///
    /// Reads `MISSIONLOG_SOURCE` (a path or an http(s) URL) and
    /// `MISSIONLOG_PORT`, either from the environment or a `.env` file.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = lookup("MISSIONLOG_SOURCE")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string());

        let port = match lookup("MISSIONLOG_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("MISSIONLOG_PORT is not a valid port: {raw:?}"))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            source: DataSource::parse(&source),
            port,
        })
    }

    /// Apply command line overrides
    pub fn with_overrides(mut self, source: Option<&str>, port: Option<u16>) -> Self {
        if let Some(source) = source {
            self.source = DataSource::parse(source);
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }
}
