//! Feature Extractor
//!
//! Normalized cookie → 20-slot vector. Pure and deterministic given the
//! context (hostname, now) and the configured lists.

use crate::constants::ONE_YEAR_SECS;
use crate::logic::config::RiskConfig;
use crate::logic::cookie::{CookieRecord, SameSite};
use crate::logic::threat::ScanContext;
use super::heuristics::{
    contains_url, has_special_char, looks_like_base64, overall_suspicion, shannon_entropy,
};
use super::layout::FEATURE_COUNT;
use super::vector::FeatureVector;

fn flag(b: bool) -> f32 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Extract the feature vector for one cookie
pub fn extract(cookie: &CookieRecord, ctx: &ScanContext, config: &RiskConfig) -> FeatureVector {
    let mut f = [0.0f32; FEATURE_COUNT];

    let name_len = cookie.name.chars().count();
    let value_len = cookie.value.chars().count();

    f[0] = name_len as f32 / 50.0;
    f[1] = value_len as f32 / 1000.0;
    f[2] = cookie.domain.matches('.').count() as f32 / 5.0;
    f[3] = flag(cookie.is_third_party(&ctx.hostname));
    f[4] = flag(cookie.secure);
    f[5] = flag(cookie.http_only);

    if let Some(expires) = cookie.expiration_date {
        let remaining = expires - ctx.now;
        f[6] = (remaining / ONE_YEAR_SECS).clamp(0.0, 1.0) as f32;
        f[15] = flag(expires > ctx.now + ONE_YEAR_SECS);
    }

    f[7] = flag(config.matches_tracking_name(&cookie.name));
    f[8] = (shannon_entropy(&cookie.value) / 8.0) as f32;
    f[9] = flag(looks_like_base64(&cookie.value));
    f[10] = flag(cookie.name.chars().any(|c| c.is_ascii_digit()));
    f[11] = flag(has_special_char(&cookie.name));

    if !cookie.path.is_empty() {
        f[12] = cookie.path.matches('/').count() as f32 / 10.0;
    }

    f[13] = match cookie.same_site {
        SameSite::None => 1.0,
        SameSite::Lax => 0.5,
        SameSite::Strict | SameSite::Unset => 0.0,
    };

    f[14] = flag(cookie.domain.starts_with('.'));
    f[16] = flag(config.matches_ad_network(&cookie.domain));
    f[17] = flag(contains_url(&cookie.value));
    f[18] = flag(config.matches_identity_name(&cookie.name));
    f[19] = overall_suspicion(cookie);

    FeatureVector::from_values(f)
}
