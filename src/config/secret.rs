//! The server-held Neople API key.

use std::fmt;
use std::sync::Arc;

/// Environment variable the key is read from at startup.
pub const API_KEY_ENV: &str = "NEOPLE_API_KEY";

/// Immutable API key shared by every request.
///
/// `Debug` never prints the value, so the key can sit inside structs that get
/// logged with `?`.
#[derive(Clone, Default)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Arc::from(key.into()))
    }

    /// Read the key from `NEOPLE_API_KEY`. A missing variable yields an empty key.
    pub fn from_env() -> Self {
        Self::new(std::env::var(API_KEY_ENV).unwrap_or_default())
    }

    /// The raw key, for building upstream URLs only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
