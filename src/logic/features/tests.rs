//! Extractor tests against the slot contract in `layout.rs`

use crate::logic::config::RiskConfig;
use crate::logic::cookie::{normalize_value, CookieRecord, SameSite};
use crate::logic::threat::ScanContext;
use super::extractor::extract;
use super::layout::{feature_index, FEATURE_COUNT};

const NOW: f64 = 1_700_000_000.0;
const YEAR: f64 = 365.0 * 24.0 * 3600.0;

fn ctx() -> ScanContext {
    ScanContext::new("www.example.com").at(NOW)
}

fn slot(name: &str) -> usize {
    feature_index(name).expect("known feature")
}

#[test]
fn test_empty_cookie_vector() {
    let v = extract(&normalize_value(&serde_json::json!({})), &ctx(), &RiskConfig::default());
    assert_eq!(v.len(), FEATURE_COUNT);
    assert!(v.as_slice().iter().all(|x| *x == 0.0), "all-default cookie should be all zeros: {:?}", v);
}

#[test]
fn test_tracker_cookie_vector() {
    let cookie = CookieRecord::new("_ga", &"ab".repeat(125), ".doubleclick.net")
        .with_path("/ads/track")
        .with_same_site(SameSite::None)
        .with_expiration(NOW + 2.0 * YEAR);
    let v = extract(&cookie, &ctx(), &RiskConfig::default());
    let f = v.as_array();

    assert!((f[0] - 3.0 / 50.0).abs() < 1e-6);
    assert!((f[1] - 0.25).abs() < 1e-6);
    assert!((f[2] - 0.4).abs() < 1e-6);
    assert_eq!(f[slot("third_party")], 1.0);
    assert_eq!(f[slot("secure")], 0.0);
    assert_eq!(f[slot("expiry_ratio")], 1.0);
    assert_eq!(f[slot("tracking_name")], 1.0);
    assert!((f[slot("value_entropy")] - 1.0 / 8.0).abs() < 1e-6);
    assert_eq!(f[slot("base64_value")], 1.0);
    assert_eq!(f[slot("name_has_digit")], 0.0);
    assert_eq!(f[slot("name_has_special")], 0.0);
    assert!((f[slot("path_depth")] - 0.2).abs() < 1e-6);
    assert_eq!(f[slot("same_site")], 1.0);
    assert_eq!(f[slot("broad_domain")], 1.0);
    assert_eq!(f[slot("long_expiry")], 1.0);
    assert_eq!(f[slot("ad_network")], 1.0);
    assert_eq!(f[slot("value_has_url")], 0.0);
    assert_eq!(f[slot("identity_name")], 0.0);
    // long value 0.2 + insecure dotted 0.2 + broad 0.1
    assert!((f[slot("overall_suspicion")] - 0.5).abs() < 1e-6);
}

#[test]
fn test_expiry_features() {
    let config = RiskConfig::default();

    let half = CookieRecord::new("a", "", "").with_expiration(NOW + YEAR / 2.0);
    let v = extract(&half, &ctx(), &config);
    assert!((v.as_array()[6] - 0.5).abs() < 1e-4);
    assert_eq!(v.as_array()[15], 0.0);

    let expired = CookieRecord::new("a", "", "").with_expiration(NOW - 10.0);
    let v = extract(&expired, &ctx(), &config);
    assert_eq!(v.as_array()[6], 0.0);

    let session = CookieRecord::new("a", "", "");
    let v = extract(&session, &ctx(), &config);
    assert_eq!(v.as_array()[6], 0.0);
    assert_eq!(v.as_array()[15], 0.0);
}

#[test]
fn test_name_shape_features() {
    let config = RiskConfig::default();

    let cookie = CookieRecord::new("User.Id2", "see https://x.test", "example.com");
    let f = *extract(&cookie, &ctx(), &config).as_array();
    assert_eq!(f[10], 1.0, "digit");
    assert_eq!(f[11], 1.0, "special char");
    assert_eq!(f[17], 1.0, "embedded url");
    assert_eq!(f[18], 1.0, "identity name");
    assert_eq!(f[3], 0.0, "first party");
}

#[test]
fn test_same_site_mapping() {
    let config = RiskConfig::default();
    for (same_site, expected) in [
        (SameSite::None, 1.0),
        (SameSite::Lax, 0.5),
        (SameSite::Strict, 0.0),
        (SameSite::Unset, 0.0),
    ] {
        let cookie = CookieRecord::new("a", "", "").with_same_site(same_site);
        assert_eq!(extract(&cookie, &ctx(), &config).as_array()[13], expected);
    }
}

#[test]
fn test_long_name_not_clamped() {
    let cookie = CookieRecord::new(&"n".repeat(100), "", "");
    let v = extract(&cookie, &ctx(), &RiskConfig::default());
    assert_eq!(v.as_array()[0], 2.0);
}

#[test]
fn test_configured_lists_drive_features() {
    let mut config = RiskConfig::default();
    config.ad_network_domains = vec!["adserver".to_string()];
    config.tracking_name_patterns = vec!["trk".to_string()];

    let cookie = CookieRecord::new("trk_id", "", "eu.adserver.test");
    let f = *extract(&cookie, &ctx(), &config).as_array();
    assert_eq!(f[7], 1.0);
    assert_eq!(f[16], 1.0);
}
