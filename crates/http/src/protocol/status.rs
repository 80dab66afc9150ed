//! Reason phrases for status lines.
//!
//! The registry is an open table keyed by numeric status code. Callers extend
//! it with [`StatusRegistry::register`] instead of touching the writer. Codes
//! that were never registered fall back to the canonical phrase known to
//! [`http::StatusCode`], and finally to an empty phrase.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

pub use http::StatusCode;

static DEFAULT_REGISTRY: LazyLock<Arc<StatusRegistry>> = LazyLock::new(|| Arc::new(StatusRegistry::new()));

#[derive(Debug, Clone)]
pub struct StatusRegistry {
    reasons: HashMap<u16, Cow<'static, str>>,
}

impl StatusRegistry {
    /// Creates a registry holding the phrases for 200, 400 and 500.
    pub fn new() -> Self {
        let mut registry = Self { reasons: HashMap::with_capacity(8) };
        registry.register(StatusCode::OK, "OK");
        registry.register(StatusCode::BAD_REQUEST, "Bad Request");
        registry.register(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
        registry
    }

    /// Shared read-only registry used by writers built without one.
    pub fn shared() -> Arc<StatusRegistry> {
        Arc::clone(&DEFAULT_REGISTRY)
    }

    pub fn register<R: Into<Cow<'static, str>>>(&mut self, code: StatusCode, reason: R) -> &mut Self {
        self.reasons.insert(code.as_u16(), reason.into());
        self
    }

    /// Returns the reason phrase for `code`, empty if none is known.
    pub fn reason(&self, code: StatusCode) -> &str {
        self.reasons.get(&code.as_u16()).map(|reason| &**reason).or_else(|| code.canonical_reason()).unwrap_or("")
    }
}

impl Default for StatusRegistry {
    fn default() -> Self {
        Self::new()
    }
}
