//! Location providers: the geocoding and timezone-lookup seams and their
//! HTTP implementations (OpenStreetMap Nominatim, timeapi.io).

use serde::Deserialize;
use std::time::Duration;

use super::types::{GeoLocation, GeocodeMatch};
use crate::error::{ChartError, Result};

const USER_AGENT: &str = concat!("horoscope/", env!("CARGO_PKG_VERSION"), " (natal-chart-cli)");
const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";
const TIMEAPI_COORDINATE_URL: &str = "https://timeapi.io/api/timezone/coordinate";

/// Free-text place name → coordinates.
pub trait Geocoder {
    /// `Ok(None)` means the service answered but knows no such place.
    fn geocode(&self, query: &str, country: Option<&str>) -> Result<Option<GeocodeMatch>>;
}

/// Coordinates → IANA timezone identifier.
pub trait TimezoneFinder {
    /// `Ok(None)` means no timezone region covers the point (e.g. open ocean).
    fn timezone_at(&self, lat: f64, lon: f64) -> Result<Option<String>>;
}

// ─── Nominatim ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Geocoder backed by the public Nominatim search API.
pub struct NominatimGeocoder {
    agent: ureq::Agent,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new() -> Self {
        Self::with_base_url(NOMINATIM_SEARCH_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .user_agent(USER_AGENT)
                .timeout(Duration::from_secs(10))
                .build(),
            base_url: base_url.to_string(),
        }
    }

    fn search_url(&self, query: &str, country: Option<&str>) -> String {
        let country_param = match country {
            Some(cc) => format!("&countrycodes={}", urlencod(&cc.to_lowercase())),
            None => String::new(),
        };
        format!(
            "{}?q={}&format=json&limit=1&addressdetails=0{}",
            self.base_url,
            urlencod(query),
            country_param,
        )
    }
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, query: &str, country: Option<&str>) -> Result<Option<GeocodeMatch>> {
        let url = self.search_url(query, country);
        log::debug!("GET {}", url);

        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| ChartError::Network(e.to_string()))?;

        let results: Vec<NominatimResult> = response
            .into_json()
            .map_err(|e| ChartError::InvalidResponse(e.to_string()))?;

        parse_first_match(results)
    }
}

fn parse_first_match(results: Vec<NominatimResult>) -> Result<Option<GeocodeMatch>> {
    let Some(first) = results.into_iter().next() else {
        return Ok(None);
    };
    let lat: f64 = first
        .lat
        .parse()
        .map_err(|_| ChartError::InvalidResponse(format!("bad latitude '{}'", first.lat)))?;
    let lon: f64 = first
        .lon
        .parse()
        .map_err(|_| ChartError::InvalidResponse(format!("bad longitude '{}'", first.lon)))?;
    Ok(Some(GeocodeMatch {
        location: GeoLocation::new(lat, lon),
        display_name: first.display_name,
    }))
}

// ─── timeapi.io ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeApiZone {
    #[serde(default)]
    time_zone: Option<String>,
}

/// Timezone lookup backed by timeapi.io's coordinate endpoint.
pub struct TimeApiTimezoneFinder {
    agent: ureq::Agent,
    base_url: String,
}

impl TimeApiTimezoneFinder {
    pub fn new() -> Self {
        Self::with_base_url(TIMEAPI_COORDINATE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .user_agent(USER_AGENT)
                .timeout(Duration::from_secs(10))
                .build(),
            base_url: base_url.to_string(),
        }
    }
}

impl Default for TimeApiTimezoneFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl TimezoneFinder for TimeApiTimezoneFinder {
    fn timezone_at(&self, lat: f64, lon: f64) -> Result<Option<String>> {
        let url = format!("{}?latitude={}&longitude={}", self.base_url, lat, lon);
        log::debug!("GET {}", url);

        let response = match self.agent.get(&url).call() {
            Ok(r) => r,
            // The service rejects coordinates it cannot place with a client error.
            Err(ureq::Error::Status(code, _)) if (400..500).contains(&code) => {
                log::debug!("timezone lookup returned HTTP {}", code);
                return Ok(None);
            }
            Err(e) => return Err(ChartError::Network(e.to_string())),
        };

        let zone: TimeApiZone = response
            .into_json()
            .map_err(|e| ChartError::InvalidResponse(e.to_string()))?;

        Ok(zone.time_zone.filter(|tz| !tz.trim().is_empty()))
    }
}

// ─── URL encoding (minimal, no extra dep) ───────────────────────

fn urlencod(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b' ' => out.push_str("%20"),
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(b as char),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}
