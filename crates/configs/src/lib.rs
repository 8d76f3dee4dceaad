use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

/// Where role → feature grants live.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process memory only; lost on restart.
    #[default]
    Memory,
    /// JSON file rewritten after every mutation.
    File,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            other => Err(anyhow!("unknown store backend `{other}` (expected memory|file)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_store_path")]
    pub path: String,
    /// Optional JSON file applied to an empty store at startup.
    #[serde(default)]
    pub seed_path: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { backend: StoreBackend::Memory, path: default_store_path(), seed_path: None }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(anyhow!("unknown log format `{other}` (expected compact|json)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// `CONFIG_PATH` if set and non-blank, else `config.toml`.
pub fn config_path<F>(lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("CONFIG_PATH")
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8081 }
fn default_store_path() -> String { "data/features.json".into() }

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Resolve configuration from the process environment.
    pub fn load_and_validate() -> Result<Self> {
        let lookup = |key: &str| std::env::var(key).ok();
        let path = config_path(&lookup);
        Self::load_and_validate_from(&path, lookup)
    }

    /// Config file at `path` if present (defaults otherwise), then overrides
    /// from `lookup`, then validation.
    pub fn load_and_validate_from<F>(path: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = if Path::new(path).exists() {
            load_from_file(path).map_err(|e| anyhow!("failed to load {path}: {e}"))?
        } else {
            AppConfig::default()
        };
        cfg.apply_overrides(lookup)?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Apply `SERVER_HOST`-style overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| anyhow!("SERVER_PORT must be a port number, got `{port}`"))?;
        }
        if let Some(threads) = lookup("TOKIO_WORKER_THREADS") {
            self.server.worker_threads = Some(
                threads
                    .parse()
                    .map_err(|_| anyhow!("TOKIO_WORKER_THREADS must be a number, got `{threads}`"))?,
            );
        }
        if let Some(backend) = lookup("STORE_BACKEND") {
            self.store.backend = backend.parse()?;
        }
        if let Some(path) = lookup("STORE_PATH") {
            self.store.path = path;
        }
        if let Some(seed) = lookup("STORE_SEED_PATH") {
            self.store.seed_path = if seed.trim().is_empty() { None } else { Some(seed) };
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.logging.format = format.parse()?;
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.store.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<()> {
        if self.backend == StoreBackend::File && self.path.trim().is_empty() {
            return Err(anyhow!("store.path is required for the file backend"));
        }
        Ok(())
    }
}
