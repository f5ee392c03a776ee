//! Inbound request translation.
//!
//! # Responsibilities
//! - Strip the mount prefix from the inbound path
//! - Build the upstream URL with the server-held key injected
//! - Keep a redacted rendering of that URL for logs
//!
//! Query values are form-decoded and concatenated as-is. The HTTP client
//! re-encodes whatever is not legal in a URL (e.g. Hangul character names).

use std::fmt;
use url::form_urlencoded;

use crate::config::{ApiKey, UpstreamConfig};

const REDACTED: &str = "***";

/// Drop the leading `mount_depth` segments of `path` and rejoin the rest.
///
/// The cut is positional: `/api/proxy/servers` with depth 2 yields `servers`
/// whatever the first two segments say. A trailing slash survives as a
/// trailing empty segment.
pub fn upstream_path(path: &str, mount_depth: usize) -> String {
    path.split('/')
        .skip(mount_depth + 1)
        .collect::<Vec<_>>()
        .join("/")
}

/// Fully assembled upstream URL.
///
/// `Display` and `Debug` show the redacted form; only [`UpstreamUrl::as_str`]
/// exposes the key.
#[derive(Clone, PartialEq, Eq)]
pub struct UpstreamUrl {
    url: String,
    redacted: String,
}

impl UpstreamUrl {
    /// `<base>/<suffix>?<key_param>=<key>` followed by every inbound query
    /// pair except `key_param`, in inbound order.
    pub fn build(
        upstream: &UpstreamConfig,
        api_key: &ApiKey,
        suffix: &str,
        query: Option<&str>,
    ) -> Self {
        let base = format!("{}/{}", upstream.base_url.trim_end_matches('/'), suffix);
        let key_param = upstream.key_param.as_str();

        let mut url = format!("{base}?{key_param}={}", api_key.expose());
        let mut redacted = format!("{base}?{key_param}={REDACTED}");

        let query = query.unwrap_or_default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if key == key_param {
                continue;
            }
            let pair = format!("&{key}={value}");
            url.push_str(&pair);
            redacted.push_str(&pair);
        }

        Self { url, redacted }
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn redacted(&self) -> &str {
        &self.redacted
    }
}

impl fmt::Display for UpstreamUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted)
    }
}

impl fmt::Debug for UpstreamUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UpstreamUrl").field(&self.redacted).finish()
    }
}
