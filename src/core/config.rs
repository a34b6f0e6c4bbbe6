//! Configuration management for the MCP server.
//!
//! Configuration is resolved exactly once at startup into a [`Config`]
//! value that is then shared read-only. Sources, in precedence order:
//!
//! 1. the process environment,
//! 2. comma-separated `KEY=VALUE` lists packed into a single variable
//!    (some workflow runners can only pass one env var),
//! 3. `.env.<profile>`, the profile being `CARITY_ENV`, else `NODE_ENV`,
//!    else `local`,
//! 4. `.env`.
//!
//! Later sources never override earlier ones, except for the comma-separated
//! expansion which overrides the variables it names.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::error::{Error, Result};
use super::transport::TransportConfig;

/// Snapshot of environment variables used to build a [`Config`].
pub type EnvVars = HashMap<String, String>;

/// Variables inspected for a packed comma-separated `KEY=VALUE` list.
const PACKED_ENV_CANDIDATES: &[&str] = &[
    "SERVER_API_KEY",
    "API_KEY",
    "CARITY_ENV",
    "NODE_ENV",
    "CARITY_API_URL",
    "CARITY_BASE_URL",
];

const DEFAULT_PROFILE: &str = "local";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// API keys for the MCP caller and the upstream API.
    pub credentials: CredentialsConfig,

    /// Upstream Carity API connection settings.
    pub upstream: UpstreamConfig,

    /// Which tools are exposed.
    pub tools: ToolsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// API keys.
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Key callers must present to this server (checked by the HTTP transport).
    pub server_api_key: String,

    /// Key sent to the upstream API in the `X-API-KEY` header.
    pub upstream_api_key: String,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("server_api_key", &"[REDACTED]")
            .field("upstream_api_key", &"[REDACTED]")
            .finish()
    }
}

/// Upstream Carity API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL without trailing slash, e.g. `https://api.example.com`.
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

/// Which endpoint backs the `retrieve_chunks` tool.
///
/// Two deployments of the API expose the same operation under different
/// paths; neither is versioned, so the choice is explicit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrieveChunksEndpoint {
    /// `/mcp/v1/knowledge_models/retrieve_chunks`
    #[default]
    Standard,
    /// `/mcp/v1/knowledge_models/mcp_retrieve_chunks`
    Mcp,
}

impl RetrieveChunksEndpoint {
    /// Path of the endpoint relative to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::Standard => "/mcp/v1/knowledge_models/retrieve_chunks",
            Self::Mcp => "/mcp/v1/knowledge_models/mcp_retrieve_chunks",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "mcp" => Some(Self::Mcp),
            _ => None,
        }
    }
}

/// Tool exposure configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Names of the tools to expose. `None` exposes every tool.
    pub enabled: Option<Vec<String>>,

    /// Endpoint used by `retrieve_chunks`.
    pub retrieve_chunks_endpoint: RetrieveChunksEndpoint,
}

impl Config {
    /// Create a configuration with defaults for everything except the
    /// three required values.
    pub fn new(
        base_url: impl Into<String>,
        server_api_key: impl Into<String>,
        upstream_api_key: impl Into<String>,
    ) -> Self {
        Self {
            server: ServerConfig {
                name: "carity-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            credentials: CredentialsConfig {
                server_api_key: server_api_key.into(),
                upstream_api_key: upstream_api_key.into(),
            },
            upstream: UpstreamConfig {
                base_url: normalize_base_url(&base_url.into()),
                timeout_ms: DEFAULT_TIMEOUT_MS,
            },
            tools: ToolsConfig::default(),
        }
    }

    /// Load configuration from the process environment and dotenv files.
    pub fn from_env() -> Result<Self> {
        let mut vars: EnvVars = std::env::vars().collect();
        expand_packed_vars(&mut vars);

        let profile = dotenv_profile(&vars);
        merge_dotenv_file(&mut vars, format!(".env.{profile}"));
        merge_dotenv_file(&mut vars, ".env");

        Self::from_vars(&vars)
    }

    /// Build configuration from an explicit variable map.
    pub fn from_vars(vars: &EnvVars) -> Result<Self> {
        let server_api_key = required(vars, "SERVER_API_KEY")?;
        let upstream_api_key = required(vars, "API_KEY")?;
        let base_url = required(vars, "CARITY_API_URL")?;

        let mut config = Self::new(base_url, server_api_key, upstream_api_key);

        if let Some(name) = vars.get("MCP_SERVER_NAME") {
            config.server.name = name.clone();
        }

        if let Some(level) = vars.get("MCP_LOG_LEVEL") {
            config.logging.level = level.clone();
        }

        if let Some(timeout) = vars.get("CARITY_TIMEOUT_MS") {
            config.upstream.timeout_ms = timeout.trim().parse().map_err(|_| {
                Error::config(format!(
                    "CARITY_TIMEOUT_MS must be a number of milliseconds, got '{timeout}'"
                ))
            })?;
        }

        if let Some(endpoint) = vars.get("CARITY_RETRIEVE_CHUNKS_ENDPOINT") {
            config.tools.retrieve_chunks_endpoint = RetrieveChunksEndpoint::parse(endpoint)
                .ok_or_else(|| {
                    Error::config(format!(
                        "CARITY_RETRIEVE_CHUNKS_ENDPOINT must be 'standard' or 'mcp', got '{endpoint}'"
                    ))
                })?;
        }

        if let Some(enabled) = vars.get("MCP_ENABLED_TOOLS") {
            let names: Vec<String> = enabled
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
            info!("Tool subset enabled: {}", names.join(", "));
            config.tools.enabled = Some(names);
        }

        config.transport = TransportConfig::from_vars(vars);

        Ok(config)
    }

    /// Upstream request timeout.
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.upstream.timeout_ms)
    }
}

/// Dotenv profile name: `CARITY_ENV`, then `NODE_ENV`, then `local`.
fn dotenv_profile(vars: &EnvVars) -> String {
    ["CARITY_ENV", "NODE_ENV"]
        .iter()
        .filter_map(|name| vars.get(*name))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .unwrap_or(DEFAULT_PROFILE)
        .to_string()
}

fn required(vars: &EnvVars, name: &str) -> Result<String> {
    vars.get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::missing_var(name))
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Expand the first candidate variable holding a `K1=V1,K2=V2` list.
///
/// Pairs are split at the first `=`, so values may themselves contain `=`.
pub fn expand_packed_vars(vars: &mut EnvVars) {
    let Some(packed) = PACKED_ENV_CANDIDATES
        .iter()
        .filter_map(|name| vars.get(*name))
        .find(|value| value.contains(','))
        .cloned()
    else {
        return;
    };

    for pair in packed.split(',') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            continue;
        }
        debug!("Expanded packed variable {}", key);
        vars.insert(key.to_string(), value.to_string());
    }
}

/// Merge a dotenv file into `vars` without overriding existing keys.
fn merge_dotenv_file(vars: &mut EnvVars, path: impl AsRef<Path>) {
    let path = path.as_ref();
    let entries = match dotenvy::from_filename_iter(path) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Skipping {}: {}", path.display(), e);
            return;
        }
    };

    for entry in entries {
        match entry {
            Ok((key, value)) => {
                vars.entry(key).or_insert(value);
            }
            Err(e) => {
                warn!("Ignoring malformed line in {}: {}", path.display(), e);
            }
        }
    }
}
