//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Every error is reported,
//! not just the first.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in a [`ProxyConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("upstream.base_url '{0}' is not an absolute http(s) URL")]
    InvalidBaseUrl(String),

    #[error("upstream.key_param must not be empty")]
    EmptyKeyParam,

    #[error("listener.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let base = &config.upstream.base_url;
    match Url::parse(base) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
        _ => errors.push(ValidationError::InvalidBaseUrl(base.clone())),
    }

    if config.upstream.key_param.is_empty() {
        errors.push(ValidationError::EmptyKeyParam);
    }

    let bind = &config.listener.bind_address;
    if bind.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(bind.clone()));
    }

    let metrics = &config.observability.metrics_address;
    if config.observability.metrics_enabled && metrics.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(metrics.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
