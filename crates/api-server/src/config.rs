use anyhow::{bail, Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use prediction_pipeline::coefficients::DEFAULT_COEFFICIENTS_PATH;

/// Deployment flavour; controls whether internal error detail leaves the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl std::str::FromStr for AppEnv {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(AppEnv::Development),
            "production" | "prod" => Ok(AppEnv::Production),
            other => bail!("unknown APP_ENV '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub environment: AppEnv,
    pub coefficients_path: PathBuf,
    /// Where to keep a copy of the last served dataset, if anywhere
    pub snapshot_path: Option<PathBuf>,
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| "sqlite:market.db".to_string()),
            bind_addr: get("BIND_ADDR")
                .unwrap_or_else(|| "0.0.0.0:3000".to_string())
                .parse()
                .context("BIND_ADDR must be host:port")?,
            environment: get("APP_ENV")
                .unwrap_or_else(|| "development".to_string())
                .parse()?,
            coefficients_path: get("COEFFICIENTS_PATH")
                .unwrap_or_else(|| DEFAULT_COEFFICIENTS_PATH.to_string())
                .into(),
            snapshot_path: get("SNAPSHOT_PATH").map(PathBuf::from),
            cors_origins: get("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        };

        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.environment == AppEnv::Production
    }

    /// Internal failure messages are only returned outside production.
    pub fn expose_error_details(&self) -> bool {
        !self.is_production()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            environment: AppEnv::Development,
            coefficients_path: DEFAULT_COEFFICIENTS_PATH.into(),
            snapshot_path: None,
            cors_origins: Vec::new(),
        }
    }
}
