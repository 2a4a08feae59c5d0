//! Redirect target platforms

use std::fmt;
use std::str::FromStr;

use crate::error::RedirectError;

/// Destination service a redirect points to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    /// Live editor
    #[default]
    Stackblitz,
    /// Sandbox
    Codesandbox,
    /// Static site
    Netlify,
    /// Source browser
    Github,
}

impl Platform {
    /// All platforms, in the order they are listed to clients
    pub const ALL: [Self; 4] = [
        Self::Stackblitz,
        Self::Codesandbox,
        Self::Netlify,
        Self::Github,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stackblitz => "stackblitz",
            Self::Codesandbox => "codesandbox",
            Self::Netlify => "netlify",
            Self::Github => "github",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|p| p.as_str()).collect()
    }
}

impl FromStr for Platform {
    type Err = RedirectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or(RedirectError::UnsupportedPlatform)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
