//! Relaying the upstream response to the caller.
//!
//! Status and body pass through unchanged once the body has been checked to
//! be JSON. A leading UTF-8 BOM is tolerated during that check and still
//! forwarded. `Content-Type` is mirrored, falling back to `application/json`.

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::de::IgnoredAny;

use crate::error::ProxyError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub async fn relay(upstream: reqwest::Response) -> Result<Response, ProxyError> {
    let status = upstream.status();
    let content_type = upstream
        .headers()
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    let body = upstream.bytes().await?;
    let json = body.strip_prefix(UTF8_BOM).unwrap_or(&body[..]);
    serde_json::from_slice::<IgnoredAny>(json)?;

    Ok((status, [(CONTENT_TYPE, content_type)], body).into_response())
}
