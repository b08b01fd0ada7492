//! GeoIP data structures.

use std::net::IpAddr;

use serde::Serialize;

use crate::config::UNKNOWN_LABEL;

/// City database hit. The city database also carries a country, which takes
/// precedence over the country database when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityMatch {
    pub city: Option<String>,
    pub country: Option<String>,
}

/// ASN database hit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsnMatch {
    pub number: u32,
    pub organization: String,
}

impl AsnMatch {
    /// Formats the ASN as `AS<number> (<organization>)`.
    pub fn label(&self) -> String {
        format!("AS{} ({})", self.number, self.organization)
    }
}

/// Geo/ASN lookup capability.
///
/// Each method returns `None` on a miss or when the underlying source is
/// absent; the enrichment pipeline maps misses to `"Unknown"`.
pub trait GeoLookup: Send + Sync {
    fn country(&self, ip: IpAddr) -> Option<String>;
    fn city(&self, ip: IpAddr) -> Option<CityMatch>;
    fn asn(&self, ip: IpAddr) -> Option<AsnMatch>;
}

/// Geo fields attached to a resolved address, cached together per IP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoBundle {
    pub country: String,
    pub city: String,
    pub asn: String,
    pub isp: String,
}

impl Default for GeoBundle {
    fn default() -> Self {
        Self {
            country: UNKNOWN_LABEL.to_string(),
            city: UNKNOWN_LABEL.to_string(),
            asn: UNKNOWN_LABEL.to_string(),
            isp: UNKNOWN_LABEL.to_string(),
        }
    }
}

impl GeoBundle {
    /// Runs the three lookups for `ip` and folds them into one bundle.
    pub fn lookup(source: &dyn GeoLookup, ip: IpAddr) -> Self {
        let mut bundle = GeoBundle::default();

        if let Some(country) = source.country(ip) {
            bundle.country = country;
        }

        if let Some(city_match) = source.city(ip) {
            if let Some(city) = city_match.city.filter(|c| !c.is_empty()) {
                bundle.city = city;
            }
            if let Some(country) = city_match.country {
                bundle.country = country;
            }
        }

        if let Some(asn) = source.asn(ip) {
            bundle.asn = asn.label();
            bundle.isp = asn.organization;
        }

        bundle
    }
}
