// Configuration module entry point
// Loads layered configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{
    Config, HealthConfig, LoggingConfig, PerformanceConfig, PlatformsConfig, ServerConfig,
    UpstreamConfig,
};

/// Config file used when neither a CLI argument nor `REDIRECT_CONFIG` names one
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from the default location
    ///
    /// The first CLI argument wins over `REDIRECT_CONFIG`, which wins over `config.toml`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::args()
            .nth(1)
            .or_else(|| std::env::var("REDIRECT_CONFIG").ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (extension optional)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("REDIRECT").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("upstream.api_url", "https://api.github.com")?
            .set_default("upstream.owner", "withastro")?
            .set_default("upstream.repo", "astro")?
            .set_default("upstream.package", "astro")?
            .set_default("upstream.examples_path", "examples")?
            .set_default("upstream.token_env", "VITE_GITHUB_TOKEN")?
            .set_default(
                "upstream.user_agent",
                concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("upstream.request_timeout", 10)?
            .set_default("platforms.netlify_url", "https://astro.build")?
            .set_default("platforms.stackblitz_base", "https://stackblitz.com/github")?
            .set_default("platforms.codesandbox_base", "https://githubbox.com")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Read the upstream API token from the configured environment variable
    pub fn upstream_token(&self) -> Option<String> {
        std::env::var(&self.upstream.token_env)
            .ok()
            .filter(|t| !t.is_empty())
    }
}
