//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic coordinates in decimal degrees (east and north positive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
}

impl GeoLocation {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.lat >= 0.0 { 'N' } else { 'S' };
        let ew = if self.lon >= 0.0 { 'E' } else { 'W' };
        write!(f, "{:.4}°{}, {:.4}°{}", self.lat.abs(), ns, self.lon.abs(), ew)
    }
}

/// How a location was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationSource {
    Cache,
    Nominatim,
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cache => write!(f, "Cache"),
            Self::Nominatim => write!(f, "Nominatim"),
        }
    }
}

/// One geocoder hit.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeMatch {
    pub location: GeoLocation,
    /// Full display name from the provider (e.g. "Greenwich, London, England, United Kingdom")
    pub display_name: Option<String>,
}

/// A resolved place: coordinates, timezone, and provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    /// The query text as the user typed it.
    pub name: String,
    pub location: GeoLocation,
    /// IANA timezone identifier.
    pub tz: String,
    pub source: LocationSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Options for city resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// ISO 3166-1 alpha-2 country code filter (e.g. "GB")
    pub country: Option<String>,
}
