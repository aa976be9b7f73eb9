//! Cookie Record & Normalizer
//!
//! Normalization is total: any JSON shape produces a record,
//! missing or wrongly-typed fields get their documented defaults.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// SAMESITE
// ============================================================================

/// SameSite attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    None,
    Lax,
    Strict,
    #[default]
    Unset,
}

impl SameSite {
    /// Parse browser spelling, unknown values become `Unset`
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "none" | "no_restriction" => SameSite::None,
            "lax" => SameSite::Lax,
            "strict" => SameSite::Strict,
            _ => SameSite::Unset,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::None => "none",
            SameSite::Lax => "lax",
            SameSite::Strict => "strict",
            SameSite::Unset => "unset",
        }
    }
}

impl std::fmt::Display for SameSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// RAW COOKIE (untrusted input)
// ============================================================================

/// Cookie as handed over by the cookie store, every field optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCookie {
    pub name: Option<String>,
    pub value: Option<String>,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub secure: Option<bool>,
    pub http_only: Option<bool>,
    pub same_site: Option<String>,
    pub expiration_date: Option<f64>,
}

impl RawCookie {
    /// Lenient field-by-field read of an arbitrary JSON value.
    ///
    /// Unlike `serde_json::from_value`, a single wrongly-typed field never
    /// rejects the whole record; it is simply treated as missing.
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        let flag = |key: &str| value.get(key).and_then(Value::as_bool);

        let expiration_date = match value.get("expirationDate") {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        Self {
            name: text("name"),
            value: text("value"),
            domain: text("domain"),
            path: text("path"),
            secure: flag("secure"),
            http_only: flag("httpOnly"),
            same_site: text("sameSite"),
            expiration_date,
        }
    }
}

// ============================================================================
// COOKIE RECORD (normalized)
// ============================================================================

/// Normalized cookie, read-only to the engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    /// May start with `.` to denote broad scope
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    /// Epoch seconds, `None` for session cookies
    pub expiration_date: Option<f64>,
}

impl CookieRecord {
    /// Convenience constructor used by tests and collaborators
    pub fn new(name: &str, value: &str, domain: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            domain: domain.to_string(),
            ..Default::default()
        }
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    pub fn with_expiration(mut self, epoch_secs: f64) -> Self {
        self.expiration_date = valid_expiration(Some(epoch_secs));
        self
    }

    /// Identity used as the batch result key
    pub fn id(&self) -> CookieId {
        CookieId {
            name: self.name.clone(),
            domain: self.domain.clone(),
            path: self.path.clone(),
        }
    }

    /// Domain without the leading scope dot
    pub fn bare_domain(&self) -> &str {
        self.domain.strip_prefix('.').unwrap_or(&self.domain)
    }

    pub fn is_session(&self) -> bool {
        self.expiration_date.is_none()
    }

    /// Third-party: page hostname does not end with the (dot-stripped) domain
    pub fn is_third_party(&self, hostname: &str) -> bool {
        !self.domain.is_empty() && !hostname.ends_with(self.bare_domain())
    }
}

/// Cookie identity (name + domain + path)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CookieId {
    pub name: String,
    pub domain: String,
    pub path: String,
}

impl std::fmt::Display for CookieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}{}", self.name, self.domain, self.path)
    }
}

// ============================================================================
// NORMALIZER
// ============================================================================

/// Normalize a raw cookie, defaulting every missing field
pub fn normalize(raw: &RawCookie) -> CookieRecord {
    CookieRecord {
        name: raw.name.clone().unwrap_or_default(),
        value: raw.value.clone().unwrap_or_default(),
        domain: raw.domain.clone().unwrap_or_default(),
        path: raw.path.clone().unwrap_or_default(),
        secure: raw.secure.unwrap_or(false),
        http_only: raw.http_only.unwrap_or(false),
        same_site: raw.same_site.as_deref().map(SameSite::parse).unwrap_or_default(),
        expiration_date: valid_expiration(raw.expiration_date),
    }
}

/// Normalize any JSON value (non-objects yield an all-default record)
pub fn normalize_value(value: &Value) -> CookieRecord {
    normalize(&RawCookie::from_value(value))
}

/// Non-finite or non-positive expiry means session cookie
fn valid_expiration(raw: Option<f64>) -> Option<f64> {
    raw.filter(|t| t.is_finite() && *t > 0.0)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_empty_object() {
        let record = normalize_value(&json!({}));
        assert_eq!(record, CookieRecord::default());
        assert!(record.is_session());
        assert_eq!(record.same_site, SameSite::Unset);
    }

    #[test]
    fn test_normalize_non_object() {
        assert_eq!(normalize_value(&json!(42)), CookieRecord::default());
        assert_eq!(normalize_value(&Value::Null), CookieRecord::default());
    }

    #[test]
    fn test_normalize_full_record() {
        let record = normalize_value(&json!({
            "name": "_ga",
            "value": "GA1.2.3",
            "domain": ".example.com",
            "path": "/",
            "secure": true,
            "httpOnly": true,
            "sameSite": "no_restriction",
            "expirationDate": 1900000000.5
        }));

        assert_eq!(record.name, "_ga");
        assert_eq!(record.bare_domain(), "example.com");
        assert!(record.secure && record.http_only);
        assert_eq!(record.same_site, SameSite::None);
        assert_eq!(record.expiration_date, Some(1900000000.5));
    }

    #[test]
    fn test_wrong_types_are_defaulted() {
        let record = normalize_value(&json!({
            "name": 7,
            "secure": "yes",
            "sameSite": false,
            "expirationDate": "soon"
        }));

        assert_eq!(record.name, "");
        assert!(!record.secure);
        assert_eq!(record.same_site, SameSite::Unset);
        assert!(record.expiration_date.is_none());
    }

    #[test]
    fn test_invalid_expiration_is_session() {
        let raw = RawCookie {
            expiration_date: Some(f64::NAN),
            ..Default::default()
        };
        assert!(normalize(&raw).is_session());

        let zero = normalize_value(&json!({ "expirationDate": 0 }));
        assert!(zero.is_session());
    }

    #[test]
    fn test_same_site_parse() {
        assert_eq!(SameSite::parse("Lax"), SameSite::Lax);
        assert_eq!(SameSite::parse("STRICT"), SameSite::Strict);
        assert_eq!(SameSite::parse("unspecified"), SameSite::Unset);
    }

    #[test]
    fn test_third_party() {
        let cookie = CookieRecord::new("a", "b", ".tracker.net");
        assert!(cookie.is_third_party("www.example.com"));
        assert!(!cookie.is_third_party("cdn.tracker.net"));

        let empty = CookieRecord::default();
        assert!(!empty.is_third_party("www.example.com"));
    }
}
