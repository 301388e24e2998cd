//! Configuration loading for pediad.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.pedia/config.toml` (user)
//! 3. `/etc/pedia/config.toml` (system)
//! 4. built-in defaults
//!
//! Environment variables are applied on top of the file:
//! `PEDIA_CACHE_TTL_SECONDS`, `MCP_TRANSPORT`, `MCP_HOST`, `MCP_PORT`, `MCP_PATH`.
//!
//! The API key is loaded separately with mandatory permission checks:
//! 1. `~/.pedia/secrets.toml` (user, must be 0600)
//! 2. `/etc/pedia/secrets.toml` (system, must be 0600)
//! 3. `PEDIA_API_KEY` environment variable

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::tools::API_KEY_NAME;
use crate::types::DEFAULT_BASE_URL;
use crate::{CacheConfig, Pedia, PediaBuilder, PediaError, Result, RetryConfig};

/// How the tools are exposed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Transport {
    /// JSON-RPC over HTTP POST.
    #[default]
    Http,
    /// JSON-RPC with responses pushed over server-sent events.
    Sse,
    /// Newline-delimited JSON-RPC on stdin/stdout.
    Stdio,
}

impl Transport {
    /// Parse a transport name. Case-insensitive; anything unrecognised
    /// selects stdio.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "http" => Transport::Http,
            "sse" => Transport::Sse,
            _ => Transport::Stdio,
        }
    }
}

impl From<String> for Transport {
    fn from(s: String) -> Self {
        Transport::parse(&s)
    }
}

impl FromStr for Transport {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Transport::parse(s))
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Transport::Http => "http",
            Transport::Sse => "sse",
            Transport::Stdio => "stdio",
        })
    }
}

/// Daemon configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub retry: RetrySection,
}

/// Transport selection and addressing.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub transport: Transport,
    /// Bind host (default: 127.0.0.1).
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port (default: 8001).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Endpoint path in http mode (default: /mcp_pedia).
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            host: default_host(),
            port: default_port(),
            path: default_path(),
        }
    }
}

impl ServerConfig {
    /// `host:port` bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8001
}

fn default_path() -> String {
    "/mcp_pedia".to_string()
}

/// Upstream API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (default: 20).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    20
}

/// Cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    /// Seconds an entry stays fresh (default: 60).
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
        }
    }
}

fn default_ttl() -> u64 {
    60
}

/// Retry settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySection {
    /// Attempts including the first (default: 3).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Linear backoff unit in milliseconds (default: 400).
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    400
}

impl Config {
    /// Load configuration from the standard locations, then apply
    /// environment overrides.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path)?,
            None => Config::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Parse a single config file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PediaError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            PediaError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path. `Ok(None)` means no file anywhere.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(PediaError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".pedia").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/pedia/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ttl) = lookup("PEDIA_CACHE_TTL_SECONDS") {
            self.cache.ttl_secs = parse_env("PEDIA_CACHE_TTL_SECONDS", &ttl)?;
        }
        if let Some(transport) = lookup("MCP_TRANSPORT") {
            self.server.transport = Transport::parse(&transport);
        }
        if let Some(host) = lookup("MCP_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("MCP_PORT") {
            self.server.port = parse_env("MCP_PORT", &port)?;
        }
        if let Some(path) = lookup("MCP_PATH") {
            self.server.path = path;
        }
        Ok(())
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new().ttl(Duration::from_secs(self.cache.ttl_secs))
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new()
            .max_attempts(self.retry.max_attempts)
            .base_delay(Duration::from_millis(self.retry.base_delay_ms))
    }

    /// A tools builder carrying every upstream/cache/retry setting.
    pub fn builder(&self, api_key: Option<String>) -> PediaBuilder {
        Pedia::builder()
            .api_key_opt(api_key)
            .base_url(&self.upstream.base_url)
            .timeout(Duration::from_secs(self.upstream.timeout_secs))
            .cache(self.cache_config())
            .retry(self.retry_config())
    }
}

fn parse_env<T: FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e| {
        PediaError::Configuration(format!("Invalid value {value:?} for {name}: {e}"))
    })
}

/// Secrets configuration (API key).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Returns empty secrets if no file exists (the key may come from the
    /// environment).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".pedia").join("secrets.toml");
            if user_secrets.exists() {
                Self::check_permissions(&user_secrets)?;
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/pedia/secrets.toml");
        if system_secrets.exists() {
            Self::check_permissions(&system_secrets)?;
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PediaError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            PediaError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    pub fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            PediaError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            return Err(PediaError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    pub fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// API key from the secrets file, falling back to `PEDIA_API_KEY`.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_with(|name| std::env::var(name).ok())
    }

    /// Same as [`api_key`](Self::api_key) with an explicit environment.
    /// Empty values count as absent.
    pub fn api_key_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| lookup(API_KEY_NAME).filter(|k| !k.is_empty()))
    }
}
