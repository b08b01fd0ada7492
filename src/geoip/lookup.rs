//! MaxMind GeoLite2 backed lookups.
//!
//! The Country, City and ASN databases are loaded independently; a missing or
//! unreadable file only disables that one source.

use std::net::IpAddr;
use std::path::Path;

use maxminddb::Reader;

use super::types::{AsnMatch, CityMatch, GeoLookup};
use crate::config::{GEOLITE2_ASN_DB, GEOLITE2_CITY_DB, GEOLITE2_COUNTRY_DB};
use crate::error_handling::InitializationError;

/// `GeoLookup` over the three GeoLite2 databases.
pub struct MaxMindGeoLookup {
    country: Option<Reader<Vec<u8>>>,
    city: Option<Reader<Vec<u8>>>,
    asn: Option<Reader<Vec<u8>>>,
}

impl MaxMindGeoLookup {
    /// A lookup with no databases; every query misses.
    pub fn disabled() -> Self {
        Self {
            country: None,
            city: None,
            asn: None,
        }
    }

    /// Opens `GeoLite2-Country.mmdb`, `GeoLite2-City.mmdb` and `GeoLite2-ASN.mmdb`
    /// from `dir`, logging (not failing) for each one that cannot be loaded.
    pub fn open(dir: &Path) -> Self {
        let open_or_warn = |file_name: &str| match load_reader(&dir.join(file_name)) {
            Ok(reader) => {
                log::info!("Loaded GeoIP database {}", file_name);
                Some(reader)
            }
            Err(e) => {
                log::warn!("{}. Continuing without it.", e);
                None
            }
        };

        Self {
            country: open_or_warn(GEOLITE2_COUNTRY_DB),
            city: open_or_warn(GEOLITE2_CITY_DB),
            asn: open_or_warn(GEOLITE2_ASN_DB),
        }
    }

    /// Checks if at least one database is loaded.
    pub fn is_enabled(&self) -> bool {
        self.country.is_some() || self.city.is_some() || self.asn.is_some()
    }
}

/// Reads a .mmdb file into memory and opens it.
fn load_reader(path: &Path) -> Result<Reader<Vec<u8>>, InitializationError> {
    let bytes = std::fs::read(path).map_err(|e| {
        InitializationError::GeoIpError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    Reader::from_source(bytes).map_err(|e| {
        InitializationError::GeoIpError(format!("Failed to open {}: {}", path.display(), e))
    })
}

impl GeoLookup for MaxMindGeoLookup {
    fn country(&self, ip: IpAddr) -> Option<String> {
        let reader = self.country.as_ref()?;
        let lookup = reader.lookup(ip).ok()?;
        if !lookup.has_data() {
            return None;
        }
        let country: maxminddb::geoip2::Country = match lookup.decode() {
            Ok(Some(country)) => country,
            Ok(None) | Err(_) => return None,
        };
        country.country.names.english.map(|s| s.to_string())
    }

    fn city(&self, ip: IpAddr) -> Option<CityMatch> {
        let reader = self.city.as_ref()?;
        let lookup = reader.lookup(ip).ok()?;
        if !lookup.has_data() {
            return None;
        }
        let city: maxminddb::geoip2::City = match lookup.decode() {
            Ok(Some(city)) => city,
            Ok(None) | Err(_) => return None,
        };
        Some(CityMatch {
            city: city.city.names.english.map(|s| s.to_string()),
            country: city.country.names.english.map(|s| s.to_string()),
        })
    }

    fn asn(&self, ip: IpAddr) -> Option<AsnMatch> {
        let reader = self.asn.as_ref()?;
        let lookup = reader.lookup(ip).ok()?;
        if !lookup.has_data() {
            return None;
        }
        let asn: maxminddb::geoip2::Asn = match lookup.decode() {
            Ok(Some(asn)) => asn,
            Ok(None) | Err(_) => return None,
        };
        Some(AsnMatch {
            number: asn.autonomous_system_number.unwrap_or_default(),
            organization: asn
                .autonomous_system_organization
                .map(|s| s.to_string())
                .unwrap_or_default(),
        })
    }
}
