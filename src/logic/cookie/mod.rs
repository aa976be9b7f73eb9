//! Cookie Module - Input records
//!
//! Raw cookie attributes from the browser store are untrusted and partial.
//! Everything downstream only ever sees a normalized `CookieRecord`.

pub mod record;
pub mod store;

pub use record::{normalize, normalize_value, CookieId, CookieRecord, RawCookie, SameSite};
pub use store::{removal_url, CookieStore, StoreError};
