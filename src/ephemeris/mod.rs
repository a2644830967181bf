//! Ephemeris: geocentric longitudes of the chart bodies and house cusps.
//!
//! [`Ephemeris`] is the seam the chart calculator talks to;
//! [`AnalyticEphemeris`] is the in-process implementation built on the
//! solar, lunar, and Keplerian planetary theories in the submodules.

pub mod houses;
pub mod lunar;
pub mod planets;
pub mod solar;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
pub use houses::{HouseCusps, HouseSystem};
use planets::Planet;

/// A tracked body. Variant order is the canonical chart order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Body {
    pub const ALL: [Body; 10] = [
        Self::Sun,
        Self::Moon,
        Self::Mercury,
        Self::Venus,
        Self::Mars,
        Self::Jupiter,
        Self::Saturn,
        Self::Uranus,
        Self::Neptune,
        Self::Pluto,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Sun => "Sun",
            Self::Moon => "Moon",
            Self::Mercury => "Mercury",
            Self::Venus => "Venus",
            Self::Mars => "Mars",
            Self::Jupiter => "Jupiter",
            Self::Saturn => "Saturn",
            Self::Uranus => "Uranus",
            Self::Neptune => "Neptune",
            Self::Pluto => "Pluto",
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source of body longitudes and house cusps.
pub trait Ephemeris {
    /// Geocentric ecliptic longitude of `body` at `jd_ut`, degrees.
    fn longitude(&self, body: Body, jd_ut: f64) -> Result<f64>;

    /// Cusps for houses 1–12 in order, with the system actually used.
    fn house_cusps(&self, jd_ut: f64, lat: f64, lon: f64, system: HouseSystem) -> Result<HouseCusps>;
}

/// Closed-form ephemeris; needs no data files and never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticEphemeris;

impl AnalyticEphemeris {
    pub fn new() -> Self {
        Self
    }
}

impl Ephemeris for AnalyticEphemeris {
    fn longitude(&self, body: Body, jd_ut: f64) -> Result<f64> {
        let t = solar::julian_century(jd_ut);
        let lon = match body {
            Body::Sun => solar::sun_apparent_longitude(t),
            Body::Moon => lunar::moon_longitude(t),
            Body::Mercury => planets::planet_longitude(Planet::Mercury, t),
            Body::Venus => planets::planet_longitude(Planet::Venus, t),
            Body::Mars => planets::planet_longitude(Planet::Mars, t),
            Body::Jupiter => planets::planet_longitude(Planet::Jupiter, t),
            Body::Saturn => planets::planet_longitude(Planet::Saturn, t),
            Body::Uranus => planets::planet_longitude(Planet::Uranus, t),
            Body::Neptune => planets::planet_longitude(Planet::Neptune, t),
            Body::Pluto => planets::planet_longitude(Planet::Pluto, t),
        };
        Ok(lon)
    }

    fn house_cusps(&self, jd_ut: f64, lat: f64, lon: f64, system: HouseSystem) -> Result<HouseCusps> {
        Ok(houses::house_cusps(jd_ut, lat, lon, system))
    }
}
