//! Template resolution pipeline
//!
//! Turns `/<template>[@<version>]?on=<platform>` into the URL a client is
//! redirected to:
//!
//! 1. Parse the platform (no network access)
//! 2. Validate the version token against the release cache
//! 3. Load the example listing for the reference from the example cache
//! 4. Pick the platform URL of the matching example

mod cache;
mod example;
mod platform;
mod reference;
mod request;

use std::sync::Arc;

pub use cache::MemoCache;
pub use example::{Example, UrlTemplates};
pub use platform::Platform;
pub use reference::Reference;
pub use request::ResolvedRequest;

use crate::error::RedirectError;
use crate::logger;
use crate::upstream::{Release, Upstream};

pub struct Resolver {
    upstream: Arc<dyn Upstream>,
    templates: UrlTemplates,
    package: String,
    releases_url: String,
    examples: MemoCache<Arc<[Example]>>,
    releases: MemoCache<Option<Release>>,
}

impl Resolver {
    pub fn new(
        upstream: Arc<dyn Upstream>,
        templates: UrlTemplates,
        package: String,
        releases_url: String,
    ) -> Self {
        Self {
            upstream,
            templates,
            package,
            releases_url,
            examples: MemoCache::new(),
            releases: MemoCache::new(),
        }
    }

    /// Accept `next`, `latest`, or any version with a published release
    pub async fn validate_reference(&self, token: &str) -> Result<(), RedirectError> {
        if Reference::is_sentinel(token) {
            return Ok(());
        }

        let release = self
            .releases
            .get_or_try_fetch(token, || self.upstream.fetch_release(token))
            .await?;

        match release {
            Some(release) => {
                logger::log_debug(&format!("[Release] '{token}' resolved to {}", release.tag_name));
                Ok(())
            }
            None => Err(RedirectError::InvalidVersion {
                token: token.to_string(),
                releases_url: self.releases_url.clone(),
            }),
        }
    }

    /// Example listing for `reference`, fetched once per process
    pub async fn examples(&self, reference: &Reference) -> Result<Arc<[Example]>, RedirectError> {
        let key = reference.as_str();
        self.examples
            .get_or_try_fetch(key, || async {
                let entries = self.upstream.fetch_examples(key).await?;
                let examples: Arc<[Example]> = self.templates.examples(key, &entries).into();
                logger::log_info(&format!(
                    "[Cache] Stored {} examples for ref '{key}' ({} refs cached)",
                    examples.len(),
                    self.examples.filled().await + 1
                ));
                Ok::<_, RedirectError>(examples)
            })
            .await
    }

    /// Build a [`ResolvedRequest`] from the raw URI path and query string
    ///
    /// The platform is checked before anything touches the network.
    pub async fn parse_request(
        &self,
        raw_path: &str,
        query: Option<&str>,
    ) -> Result<ResolvedRequest, RedirectError> {
        let platform = request::parse_platform(query)?;
        let spec = request::template_spec(raw_path);

        let (template, reference) = match request::split_spec(&spec) {
            (template, Some(token)) => {
                self.validate_reference(token).await?;
                (template, Reference::from_token(token, &self.package))
            }
            (template, None) => (template, Reference::Latest),
        };

        Ok(ResolvedRequest {
            reference,
            template: template.to_string(),
            platform,
        })
    }

    /// Redirect target for an already parsed request
    pub async fn resolve(&self, request: &ResolvedRequest) -> Result<String, RedirectError> {
        let examples = self.examples(&request.reference).await?;

        examples
            .iter()
            .find(|example| example.name == request.template)
            .map(|example| example.url(request.platform).to_string())
            .ok_or_else(|| RedirectError::TemplateNotFound {
                template: request.template.clone(),
                available: examples.iter().map(|e| e.name.clone()).collect(),
            })
    }

    /// Parse and resolve in one step
    pub async fn redirect_target(
        &self,
        raw_path: &str,
        query: Option<&str>,
    ) -> Result<String, RedirectError> {
        let request = self.parse_request(raw_path, query).await?;
        self.resolve(&request).await
    }
}
