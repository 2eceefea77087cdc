use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub method: AuthMethod,
    /// Shared key, required when `method = "api_key"`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// User id stamped on requests that present the shared key. Ends up in
    /// download records when the payload carries no `userId`.
    #[serde(default = "default_api_key_user_id")]
    pub api_key_user_id: String,
}

impl AuthConfig {
    pub fn new(method: AuthMethod, api_key: Option<String>) -> Self {
        Self {
            method,
            api_key,
            api_key_user_id: default_api_key_user_id(),
        }
    }
}

fn default_api_key_user_id() -> String {
    "api_key_user".to_string()
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    None,
    ApiKey,
    /// Accepts any bearer token except `invalid` and assigns a fixed identity.
    /// Only meant for development setups.
    Placeholder,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::None => "none",
            AuthMethod::ApiKey => "api_key",
            AuthMethod::Placeholder => "placeholder",
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("pansearch.db")
}

/// Search, hot list and suggestion tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Page size used when the request gives none (or a non-positive one).
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Upper bound applied to the requested page size.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
    #[serde(default = "default_hot_limit")]
    pub hot_default_limit: u32,
    #[serde(default = "default_hot_max_limit")]
    pub hot_max_limit: u32,
    /// Common suffixes appended to the query when suggestions run short.
    #[serde(default = "default_suggestion_suffixes")]
    pub suggestion_suffixes: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            hot_default_limit: default_hot_limit(),
            hot_max_limit: default_hot_max_limit(),
            suggestion_suffixes: default_suggestion_suffixes(),
        }
    }
}

fn default_page_size() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    100
}

fn default_hot_limit() -> u32 {
    10
}

fn default_hot_max_limit() -> u32 {
    50
}

pub fn default_suggestion_suffixes() -> Vec<String> {
    [
        "collection",
        "resource",
        "download",
        "latest",
        "HD",
        "free",
        "complete",
        "dubbed",
        "subtitled",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Search telemetry (search log) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Capacity of the channel between request handlers and the writer task.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            buffer_size: default_buffer_size(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_buffer_size() -> usize {
    1000
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub auth: SanitizedAuthConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub search: SearchConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAuthConfig {
    pub method: String,
    pub api_key_configured: bool,
    pub api_key_user_id: String,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            auth: SanitizedAuthConfig {
                method: config.auth.method.as_str().to_string(),
                api_key_configured: config
                    .auth
                    .api_key
                    .as_ref()
                    .is_some_and(|k| !k.is_empty()),
                api_key_user_id: config.auth.api_key_user_id.clone(),
            },
            server: config.server.clone(),
            database: config.database.clone(),
            search: config.search.clone(),
            telemetry: config.telemetry.clone(),
        }
    }
}
