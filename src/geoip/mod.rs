//! GeoIP and ASN lookup using MaxMind GeoLite2 databases.
//!
//! The enrichment pipeline only sees the `GeoLookup` capability; this module
//! provides the MaxMind-backed implementation and the cached `GeoBundle`.

mod lookup;
mod types;

// Re-export public API
pub use lookup::MaxMindGeoLookup;
pub use types::{AsnMatch, CityMatch, GeoBundle, GeoLookup};
