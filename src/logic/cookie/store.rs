//! Cookie Store Collaborator
//!
//! The engine never deletes cookies itself. A store implementation
//! (browser bridge, test double) supplies raw cookies and performs removal.

use serde_json::Value;
use thiserror::Error;

/// Errors raised by a cookie store implementation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cookie store unavailable: {0}")]
    Unavailable(String),
    #[error("failed to remove cookie {name} at {url}: {reason}")]
    RemoveFailed {
        url: String,
        name: String,
        reason: String,
    },
}

/// External cookie store accessor
pub trait CookieStore: Send + Sync {
    /// Raw cookie records visible for `url`
    fn get_all(&self, url: &str) -> Result<Vec<Value>, StoreError>;

    /// Remove cookie `name` scoped to `url`
    fn remove(&self, url: &str, name: &str) -> Result<(), StoreError>;
}

/// HTTPS URL a store needs to delete a cookie set on `domain`
pub fn removal_url(domain: &str) -> String {
    format!("https://{}", domain.strip_prefix('.').unwrap_or(domain))
}
