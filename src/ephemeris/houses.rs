//! House cusps from sidereal time, latitude, and obliquity.
//!
//! Cusp 1 = Ascendant, 4 = IC, 7 = Descendant, 10 = MC for every quadrant
//! system. Placidus and Koch have no solution inside the polar circles;
//! there the cusps are computed with Porphyry instead.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::solar::{julian_century, normalize_degrees, obliquity_corrected, DEG};
use crate::time::J2000;

/// Supported house division methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HouseSystem {
    /// Time trisection of each point's own semi-arc.
    #[default]
    Placidus,
    /// Time trisection of the MC degree's semi-arc.
    Koch,
    /// Space trisection of each quadrant on the ecliptic.
    Porphyry,
    /// 30° houses from the Ascendant.
    Equal,
    /// Each house is a whole sign, starting with the rising sign.
    WholeSign,
}

impl HouseSystem {
    /// Single-letter code used by most ephemeris software.
    pub fn code(self) -> char {
        match self {
            Self::Placidus => 'P',
            Self::Koch => 'K',
            Self::Porphyry => 'O',
            Self::Equal => 'E',
            Self::WholeSign => 'W',
        }
    }

    fn is_time_based(self) -> bool {
        matches!(self, Self::Placidus | Self::Koch)
    }
}

impl fmt::Display for HouseSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placidus => write!(f, "Placidus"),
            Self::Koch => write!(f, "Koch"),
            Self::Porphyry => write!(f, "Porphyry"),
            Self::Equal => write!(f, "Equal"),
            Self::WholeSign => write!(f, "Whole Sign"),
        }
    }
}

impl FromStr for HouseSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "p" | "placidus" => Ok(Self::Placidus),
            "k" | "koch" => Ok(Self::Koch),
            "o" | "porphyry" | "porphyrius" => Ok(Self::Porphyry),
            "e" | "equal" => Ok(Self::Equal),
            "w" | "whole-sign" | "whole_sign" | "wholesign" => Ok(Self::WholeSign),
            _ => Err(format!(
                "Unknown house system '{}'. Use placidus, koch, porphyry, equal or whole-sign.",
                s
            )),
        }
    }
}

/// Computed cusps together with the chart angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseCusps {
    /// Cusp longitudes, houses 1–12, degrees in [0, 360).
    pub cusps: [f64; 12],
    pub ascendant: f64,
    pub midheaven: f64,
    /// The system actually used (differs from the request after a polar fallback).
    pub system: HouseSystem,
}

/// Local apparent sidereal time in degrees for a given JD (UT) and east longitude.
pub fn local_sidereal_time(jd: f64, lon: f64) -> f64 {
    let t = julian_century(jd);
    let gmst = normalize_degrees(
        280.46061837 + 360.98564736629 * (jd - J2000)
            + 0.000387933 * t * t
            - t * t * t / 38710000.0,
    );
    normalize_degrees(gmst + lon)
}

/// Ecliptic longitude culminating at sidereal time `ramc`.
pub fn midheaven(ramc: f64, eps: f64) -> f64 {
    let (r, e) = (ramc * DEG, eps * DEG);
    normalize_degrees(r.sin().atan2(r.cos() * e.cos()) / DEG)
}

/// Ecliptic longitude rising at sidereal time `ramc` and latitude `lat`.
pub fn ascendant(ramc: f64, lat: f64, eps: f64) -> f64 {
    let (r, e, phi) = (ramc * DEG, eps * DEG, lat * DEG);
    let y = r.cos();
    let x = -(r.sin() * e.cos() + phi.tan() * e.sin());
    normalize_degrees(y.atan2(x) / DEG)
}

/// Ecliptic longitude of the ecliptic point with right ascension `ra`.
fn ra_to_longitude(ra: f64, eps: f64) -> f64 {
    let (r, e) = (ra * DEG, eps * DEG);
    normalize_degrees(r.sin().atan2(r.cos() * e.cos()) / DEG)
}

/// Declination of the ecliptic point with right ascension `ra`.
fn ecliptic_declination(ra: f64, eps: f64) -> f64 {
    ((eps * DEG).tan() * (ra * DEG).sin()).atan() / DEG
}

/// Diurnal semi-arc in degrees of a point with declination `dec`.
fn diurnal_semi_arc(dec: f64, lat: f64) -> f64 {
    let cos_h = -(lat * DEG).tan() * (dec * DEG).tan();
    cos_h.clamp(-1.0, 1.0).acos() / DEG
}

/// Forward arc from a to b in degrees (always in [0, 360)).
fn arc_forward(a: f64, b: f64) -> f64 {
    (b - a).rem_euclid(360.0)
}

/// Compute the twelve cusps for a Julian Day (UT) and observer position.
pub fn house_cusps(jd: f64, lat: f64, lon: f64, system: HouseSystem) -> HouseCusps {
    let eps = obliquity_corrected(julian_century(jd));
    let ramc = local_sidereal_time(jd, lon);
    cusps_for(ramc, lat, eps, system)
}

/// Cusps for a given RAMC, latitude, and obliquity (all degrees).
pub fn cusps_for(ramc: f64, lat: f64, eps: f64, requested: HouseSystem) -> HouseCusps {
    let asc = ascendant(ramc, lat, eps);
    let mc = midheaven(ramc, eps);

    let system = if requested.is_time_based() && lat.abs() >= 90.0 - eps {
        log::warn!(
            "{} houses are undefined at latitude {:.2}°; using Porphyry",
            requested,
            lat
        );
        HouseSystem::Porphyry
    } else {
        requested
    };

    let cusps = match system {
        HouseSystem::Placidus => placidus(asc, mc, ramc, lat, eps),
        HouseSystem::Koch => koch(asc, mc, ramc, lat, eps),
        HouseSystem::Porphyry => porphyry(asc, mc),
        HouseSystem::Equal => equal(asc),
        HouseSystem::WholeSign => equal((asc / 30.0).floor() * 30.0),
    };

    HouseCusps { cusps, ascendant: asc, midheaven: mc, system }
}

/// Fill the angles and mirror cusps 11, 12, 2, 3 into their opposites.
fn quadrant_cusps(asc: f64, mc: f64, c11: f64, c12: f64, c2: f64, c3: f64) -> [f64; 12] {
    [
        asc,
        c2,
        c3,
        normalize_degrees(mc + 180.0),
        normalize_degrees(c11 + 180.0),
        normalize_degrees(c12 + 180.0),
        normalize_degrees(asc + 180.0),
        normalize_degrees(c2 + 180.0),
        normalize_degrees(c3 + 180.0),
        mc,
        c11,
        c12,
    ]
}

fn placidus(asc: f64, mc: f64, ramc: f64, lat: f64, eps: f64) -> [f64; 12] {
    // Above the horizon the cusp sits `fraction` of its diurnal semi-arc east
    // of the meridian; below it, `fraction` of the nocturnal semi-arc west of
    // the lower meridian.
    let above = |fraction: f64| {
        let mut ra = ramc + 90.0 * fraction;
        for _ in 0..50 {
            let dec = ecliptic_declination(ra, eps);
            let next = ramc + fraction * diurnal_semi_arc(dec, lat);
            if (next - ra).abs() < 1e-9 {
                ra = next;
                break;
            }
            ra = next;
        }
        ra_to_longitude(ra, eps)
    };
    let below = |fraction: f64| {
        let mut ra = ramc + 180.0 - 90.0 * fraction;
        for _ in 0..50 {
            let dec = ecliptic_declination(ra, eps);
            let nocturnal = 180.0 - diurnal_semi_arc(dec, lat);
            let next = ramc + 180.0 - fraction * nocturnal;
            if (next - ra).abs() < 1e-9 {
                ra = next;
                break;
            }
            ra = next;
        }
        ra_to_longitude(ra, eps)
    };

    quadrant_cusps(asc, mc, above(1.0 / 3.0), above(2.0 / 3.0), below(2.0 / 3.0), below(1.0 / 3.0))
}

fn koch(asc: f64, mc: f64, ramc: f64, lat: f64, eps: f64) -> [f64; 12] {
    // Ascensional difference of the MC degree, split in thirds.
    let dec_mc = ((eps * DEG).sin() * (mc * DEG).sin()).asin();
    let ad3 = ((lat * DEG).tan() * dec_mc.tan()).clamp(-1.0, 1.0).asin() / DEG / 3.0;

    quadrant_cusps(
        asc,
        mc,
        ascendant(ramc - 60.0 - 2.0 * ad3, lat, eps),
        ascendant(ramc - 30.0 - ad3, lat, eps),
        ascendant(ramc + 30.0 + ad3, lat, eps),
        ascendant(ramc + 60.0 + 2.0 * ad3, lat, eps),
    )
}

fn porphyry(asc: f64, mc: f64) -> [f64; 12] {
    let ic = normalize_degrees(mc + 180.0);
    let q4 = arc_forward(mc, asc);
    let q1 = arc_forward(asc, ic);
    quadrant_cusps(
        asc,
        mc,
        normalize_degrees(mc + q4 / 3.0),
        normalize_degrees(mc + 2.0 * q4 / 3.0),
        normalize_degrees(asc + q1 / 3.0),
        normalize_degrees(asc + 2.0 * q1 / 3.0),
    )
}

fn equal(start: f64) -> [f64; 12] {
    let mut cusps = [0.0; 12];
    for (i, cusp) in cusps.iter_mut().enumerate() {
        *cusp = normalize_degrees(start + i as f64 * 30.0);
    }
    cusps
}
