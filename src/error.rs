//! Error taxonomy for the redirect pipeline
//!
//! Every failure that can surface to a client is a variant of [`RedirectError`].
//! The message text is what browsers see; [`RedirectError::kind`] is the stable
//! identifier API consumers can branch on.

use thiserror::Error;

use crate::resolve::Platform;

#[derive(Debug, Error)]
pub enum RedirectError {
    #[error("Unsupported \"on\" query! Supported platforms are:\n  - {}", Platform::names().join("\n  - "))]
    UnsupportedPlatform,

    #[error("Invalid version \"{}\"! Supported versions are \"next\", \"latest\", or any <a href=\"{releases_url}\">GitHub release</a>.", escape_html(.token))]
    InvalidVersion { token: String, releases_url: String },

    #[error("Unable to fetch templates from GitHub")]
    UpstreamShape,

    #[error("GitHub responded with status {0}")]
    UpstreamStatus(u16),

    #[error("Unable to reach GitHub: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Unable to find {template}! Supported templates are:\n  - {}", .available.join("\n  - "))]
    TemplateNotFound {
        template: String,
        available: Vec<String>,
    },
}

impl RedirectError {
    /// Machine-readable error kind
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedPlatform => "unsupported_platform",
            Self::InvalidVersion { .. } => "invalid_version",
            Self::UpstreamShape => "upstream_shape",
            Self::UpstreamStatus(_) => "upstream_status",
            Self::Upstream(_) => "upstream_unavailable",
            Self::TemplateNotFound { .. } => "template_not_found",
        }
    }

    /// HTTP status code this error is rendered with
    pub const fn status(&self) -> u16 {
        match self {
            Self::TemplateNotFound { .. } => 404,
            _ => 400,
        }
    }
}

/// Escape text interpolated into an HTML error body
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_platform_lists_all_platforms() {
        let err = RedirectError::UnsupportedPlatform;
        assert_eq!(
            err.to_string(),
            "Unsupported \"on\" query! Supported platforms are:\n  - stackblitz\n  - codesandbox\n  - netlify\n  - github"
        );
        assert_eq!(err.kind(), "unsupported_platform");
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_invalid_version_message() {
        let err = RedirectError::InvalidVersion {
            token: "bogus".to_string(),
            releases_url: "https://github.com/withastro/astro/releases?q=astro%40".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Invalid version \"bogus\"!"));
        assert!(msg.contains("\"next\", \"latest\""));
        assert!(msg.contains("https://github.com/withastro/astro/releases?q=astro%40"));
    }

    #[test]
    fn test_template_not_found_lists_names() {
        let err = RedirectError::TemplateNotFound {
            template: "nope".to_string(),
            available: vec!["basics".to_string(), "blog".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unable to find nope! Supported templates are:\n  - basics\n  - blog"
        );
        assert_eq!(err.status(), 404);
        assert_eq!(err.kind(), "template_not_found");
    }

    #[test]
    fn test_invalid_version_escapes_token() {
        let err = RedirectError::InvalidVersion {
            token: "<script>alert(\"x\")&</script>".to_string(),
            releases_url: "https://github.com/withastro/astro/releases?q=astro%40".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with(
            "Invalid version \"&lt;script&gt;alert(&quot;x&quot;)&amp;&lt;/script&gt;\"!"
        ));
        assert!(!msg.contains("<script>"));
        assert!(msg.contains("<a href=\"https://github.com/withastro/astro/releases?q=astro%40\">"));
    }

    #[test]
    fn test_upstream_status_kind() {
        let err = RedirectError::UpstreamStatus(403);
        assert_eq!(err.to_string(), "GitHub responded with status 403");
        assert_eq!(err.kind(), "upstream_status");
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_upstream_shape_message() {
        let err = RedirectError::UpstreamShape;
        assert_eq!(err.to_string(), "Unable to fetch templates from GitHub");
        assert_eq!(err.status(), 400);
    }
}
