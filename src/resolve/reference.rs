//! Version references

/// Sentinel for the most recent stable examples
pub const LATEST: &str = "latest";
/// Sentinel for the development branch
pub const NEXT: &str = "next";

/// Snapshot of the example set a request resolves against
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Reference {
    #[default]
    Latest,
    /// Development branch, requested as `next`
    Main,
    /// Full release tag, e.g. `astro@1.2.3`
    Release(String),
}

impl Reference {
    /// Whether `token` is accepted without asking the hosting API
    pub fn is_sentinel(token: &str) -> bool {
        token == LATEST || token == NEXT
    }

    /// Map a user-supplied version token to the ref used for listings and URLs
    pub fn from_token(token: &str, package: &str) -> Self {
        match token {
            NEXT => Self::Main,
            LATEST => Self::Latest,
            version => Self::Release(format!("{package}@{version}")),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Latest => LATEST,
            Self::Main => "main",
            Self::Release(tag) => tag,
        }
    }
}
