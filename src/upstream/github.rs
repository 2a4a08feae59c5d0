//! GitHub REST API backend

use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;

use super::{DirectoryEntry, Release, Upstream};
use crate::config::UpstreamConfig;
use crate::error::RedirectError;
use crate::logger;

/// API version negotiated with every request
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Characters escaped inside a single path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    owner: String,
    repo: String,
    package: String,
    examples_path: String,
    token_env: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(config: &UpstreamConfig, token: Option<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            package: config.package.clone(),
            examples_path: config.examples_path.clone(),
            token_env: config.token_env.clone(),
            token,
        })
    }

    /// Build a GET request carrying the version header and, if configured, the token
    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.http.get(url).header(ACCEPT, GITHUB_ACCEPT);
        if let Some(token) = &self.token {
            request.header(AUTHORIZATION, format!("token {token}"))
        } else {
            logger::log_warning(&format!(
                "{} is undefined. You may run into rate-limiting issues.",
                self.token_env
            ));
            request
        }
    }

    fn contents_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url, self.owner, self.repo, self.examples_path
        )
    }

    fn release_url(&self, version: &str) -> String {
        let tag = format!("{}@{version}", self.package);
        format!(
            "{}/repos/{}/{}/releases/tags/{}",
            self.api_url,
            self.owner,
            self.repo,
            utf8_percent_encode(&tag, PATH_SEGMENT)
        )
    }
}

#[async_trait]
impl Upstream for GitHubClient {
    async fn fetch_examples(&self, reference: &str) -> Result<Vec<DirectoryEntry>, RedirectError> {
        let resp = self
            .get(&self.contents_url())
            .query(&[("ref", reference)])
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;

        // A missing ref yields an error object instead of a listing
        match serde_json::from_str::<Vec<DirectoryEntry>>(&body) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                logger::log_error(&format!(
                    "Unexpected contents listing for ref '{reference}' ({status}): {e}: {body}"
                ));
                Err(RedirectError::UpstreamShape)
            }
        }
    }

    async fn fetch_release(&self, version: &str) -> Result<Option<Release>, RedirectError> {
        let resp = self.get(&self.release_url(version)).send().await?;

        match resp.status() {
            StatusCode::OK => Ok(Some(resp.json::<Release>().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            status => {
                logger::log_warning(&format!(
                    "Release lookup for '{}@{version}' returned {status}",
                    self.package
                ));
                Err(RedirectError::UpstreamStatus(status.as_u16()))
            }
        }
    }
}
