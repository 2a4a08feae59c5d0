// Application state module
// Holds the configuration and the process-wide resolver shared by every connection

use std::sync::Arc;

use super::types::Config;
use crate::resolve::{Resolver, UrlTemplates};
use crate::upstream::Upstream;

/// Application state
pub struct AppState {
    pub config: Config,
    pub resolver: Resolver,
}

impl AppState {
    pub fn new(config: Config, upstream: Arc<dyn Upstream>) -> Self {
        let templates = UrlTemplates::from_config(&config);
        let resolver = Resolver::new(
            upstream,
            templates,
            config.upstream.package.clone(),
            config.upstream.releases_url(),
        );
        Self { config, resolver }
    }
}
