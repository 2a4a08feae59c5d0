//! Upstream hosting API abstraction
//!
//! The resolver only talks to the hosting API through the [`Upstream`] trait,
//! so that URL construction and response parsing stay inside this module.

pub mod github;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::RedirectError;

pub use github::GitHubClient;

/// One entry of a repository contents listing
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    /// Zero for directories, byte size for regular files
    #[serde(default)]
    pub size: u64,
    /// Null for submodules and symlinks
    #[serde(default)]
    pub html_url: Option<String>,
}

impl DirectoryEntry {
    pub const fn is_directory(&self) -> bool {
        self.size == 0
    }
}

/// Release metadata; only its presence matters to callers
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Release {
    pub tag_name: String,
}

/// Read access to the hosting API
#[async_trait]
pub trait Upstream: Send + Sync {
    /// List the examples directory at `reference`
    async fn fetch_examples(&self, reference: &str) -> Result<Vec<DirectoryEntry>, RedirectError>;

    /// Look up the release tagged `<package>@<version>`
    ///
    /// Returns `Ok(None)` when the hosting API reports no such release. Any
    /// other unexpected status is an error, so the lookup is retried later.
    async fn fetch_release(&self, version: &str) -> Result<Option<Release>, RedirectError>;
}
