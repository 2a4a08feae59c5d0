// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub upstream: UpstreamConfig,
    pub platforms: PlatformsConfig,
    #[serde(default)]
    pub health: HealthConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Minimum level written: error, warn, info or debug
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Upstream hosting API configuration
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    /// Base URL of the hosting API, without trailing slash
    pub api_url: String,
    pub owner: String,
    pub repo: String,
    /// Package name used to build release tags (`<package>@<version>`)
    pub package: String,
    /// Directory in the repository holding one sub-directory per example
    pub examples_path: String,
    /// Name of the environment variable carrying the API token
    pub token_env: String,
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub request_timeout: u64,
}

impl UpstreamConfig {
    /// Human-facing release listing filtered to this package
    pub fn releases_url(&self) -> String {
        format!(
            "https://github.com/{}/{}/releases?q={}%40",
            self.owner, self.repo, self.package
        )
    }
}

/// Redirect target URL configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PlatformsConfig {
    /// Static site every `netlify` redirect points to
    pub netlify_url: String,
    pub stackblitz_base: String,
    pub codesandbox_base: String,
}

/// Health check configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HealthConfig {
    /// Enable health check endpoints
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    /// Liveness probe path (default: /healthz)
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    /// Readiness probe path (default: /readyz)
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_healthz_path() -> String {
    "/healthz".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}
