//! Inbound request parsing
//!
//! Only the pure parts live here; reference validation needs the hosting API and
//! is driven by [`super::Resolver::parse_request`].

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

use super::{Platform, Reference};
use crate::error::RedirectError;

/// Separates the template name from the version token in the path
pub const VERSION_SEPARATOR: char = '@';

/// Query parameter selecting the platform
pub const PLATFORM_PARAM: &str = "on";

/// Fully validated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    pub reference: Reference,
    pub template: String,
    pub platform: Platform,
}

/// Read the `on` query parameter, defaulting to StackBlitz when absent
pub fn parse_platform(query: Option<&str>) -> Result<Platform, RedirectError> {
    let requested = query.and_then(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .find(|(key, _)| key == PLATFORM_PARAM)
            .map(|(_, value)| value)
    });

    match requested {
        Some(value) => value.parse(),
        None => Ok(Platform::default()),
    }
}

/// Decode the raw URI path and strip a single leading `/`
pub fn template_spec(raw_path: &str) -> Cow<'_, str> {
    let decoded = percent_decode_str(raw_path).decode_utf8_lossy();
    match decoded {
        Cow::Borrowed(path) => Cow::Borrowed(path.strip_prefix('/').unwrap_or(path)),
        Cow::Owned(path) => Cow::Owned(path.strip_prefix('/').unwrap_or(&path).to_string()),
    }
}

/// Split `template@token` at the first separator
pub fn split_spec(spec: &str) -> (&str, Option<&str>) {
    match spec.split_once(VERSION_SEPARATOR) {
        Some((template, token)) => (template, Some(token)),
        None => (spec, None),
    }
}
