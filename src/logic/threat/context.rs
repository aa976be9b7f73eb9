//! Scan Context
//!
//! Everything a classification call needs from the calling page, passed
//! explicitly instead of read from ambient state.

use serde::{Deserialize, Serialize};

/// Page context for a scan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanContext {
    /// Hostname of the page being evaluated (third-party reference)
    pub hostname: String,
    /// "Now" in epoch seconds, used for expiry features
    pub now: f64,
}

impl ScanContext {
    /// Context for `hostname` at the current wall-clock time
    pub fn new(hostname: &str) -> Self {
        Self {
            hostname: hostname.to_string(),
            now: chrono::Utc::now().timestamp_millis() as f64 / 1000.0,
        }
    }

    /// Pin "now" (tests, replay)
    pub fn at(mut self, epoch_secs: f64) -> Self {
        self.now = epoch_secs;
        self
    }

    /// Context derived from a page URL (`https://host:port/path` → `host`)
    pub fn from_url(url: &str) -> Self {
        Self::new(hostname_of(url))
    }
}

/// Hostname portion of a URL
fn hostname_of(url: &str) -> &str {
    let rest = url.split_once("://").map(|(_, r)| r).unwrap_or(url);
    let authority = rest.split(&['/', '?', '#'][..]).next().unwrap_or("");
    let host = authority.rsplit_once('@').map(|(_, h)| h).unwrap_or(authority);
    host.split(':').next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url() {
        assert_eq!(ScanContext::from_url("https://www.example.com/a?b").hostname, "www.example.com");
        assert_eq!(ScanContext::from_url("http://user@host.test:8080/").hostname, "host.test");
        assert_eq!(ScanContext::from_url("example.org").hostname, "example.org");
    }

    #[test]
    fn test_pinned_now() {
        let ctx = ScanContext::new("a.test").at(1_000.0);
        assert_eq!(ctx.now, 1_000.0);
    }
}
