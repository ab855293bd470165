use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use crate::llm::{ProviderConfig, DEFAULT_API_URL, DEFAULT_MODEL};
use crate::stages::ScoringConfig;

/// Where the HTTP server binds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self.host.parse().map_err(|_| ConfigError::Invalid {
            name: "APP_HOST",
            value: self.host.clone(),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Process configuration, read once at start-up
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub server: ServerConfig,
    /// JSON file backing the store; in-memory when unset
    pub store_path: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    #[error("invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
}

impl AppConfig {
    /// Load from the process environment after applying any `.env` file
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {:?}", path);
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = var("GROQ_API_KEY").ok_or(ConfigError::Missing("GROQ_API_KEY"))?;
        let mut provider = ProviderConfig::new(api_key);
        provider.api_url = var("GROQ_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        provider.model = var("SCORING_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        if let Some(secs) = parsed::<u64>("PROVIDER_TIMEOUT_SECS", var("PROVIDER_TIMEOUT_SECS"))? {
            provider.timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = parsed::<u32>("PROVIDER_MAX_RETRIES", var("PROVIDER_MAX_RETRIES"))? {
            provider.max_retries = retries;
        }

        let mut server = ServerConfig::default();
        if let Some(host) = var("APP_HOST") {
            server.host = host;
        }
        if let Some(port) = parsed::<u16>("APP_PORT", var("APP_PORT"))? {
            server.port = port;
        }

        Ok(Self {
            provider,
            server,
            store_path: var("INTERVIEW_STORE_PATH").map(PathBuf::from),
        })
    }

    /// A `--store` flag wins over `INTERVIEW_STORE_PATH`; without either the
    /// store stays in memory
    pub fn override_store_path(&mut self, flag: Option<PathBuf>) {
        if flag.is_some() {
            self.store_path = flag;
        }
    }

    pub fn scoring(&self) -> ScoringConfig {
        ScoringConfig {
            timeout: self.provider.timeout,
            max_retries: self.provider.max_retries,
        }
    }
}

fn parsed<T: FromStr>(name: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError> {
    value
        .map(|v| {
            v.trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value: v })
        })
        .transpose()
}
