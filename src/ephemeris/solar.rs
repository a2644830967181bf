//! Low-precision solar theory (Meeus ch. 25).
//!
//! Apparent geocentric longitude of the Sun, plus the obliquity and
//! century helpers shared by the other ephemeris modules.
//! Accuracy: ~0.01° for dates within a few centuries of J2000.

use std::f64::consts::PI;

use crate::time::J2000;

pub(crate) const DEG: f64 = PI / 180.0;

/// Julian centuries since J2000.0.
pub fn julian_century(jd: f64) -> f64 {
    (jd - J2000) / 36525.0
}

pub fn normalize_degrees(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d < 0.0 {
        d += 360.0;
    }
    d
}

fn sun_mean_longitude(t: f64) -> f64 {
    normalize_degrees(280.46646 + t * (36000.76983 + t * 0.0003032))
}

fn sun_mean_anomaly(t: f64) -> f64 {
    normalize_degrees(357.52911 + t * (35999.05029 - t * 0.0001537))
}

fn sun_equation_of_center(t: f64) -> f64 {
    let m = sun_mean_anomaly(t) * DEG;
    m.sin() * (1.914602 - t * (0.004817 + t * 0.000014))
        + (2.0 * m).sin() * (0.019993 - t * 0.000101)
        + (3.0 * m).sin() * 0.000289
}

fn sun_true_longitude(t: f64) -> f64 {
    sun_mean_longitude(t) + sun_equation_of_center(t)
}

/// Longitude of the Moon's ascending node, degrees. Drives nutation.
fn nutation_node(t: f64) -> f64 {
    125.04 - 1934.136 * t
}

/// Apparent geocentric ecliptic longitude of the Sun, degrees in [0, 360).
pub fn sun_apparent_longitude(t: f64) -> f64 {
    let omega = nutation_node(t);
    normalize_degrees(sun_true_longitude(t) - 0.00569 - 0.00478 * (omega * DEG).sin())
}

pub fn mean_obliquity(t: f64) -> f64 {
    23.0 + (26.0 + (21.448 - t * (46.815 + t * (0.00059 - t * 0.001813))) / 60.0) / 60.0
}

/// Obliquity of the ecliptic corrected for the main nutation term, degrees.
pub fn obliquity_corrected(t: f64) -> f64 {
    mean_obliquity(t) + 0.00256 * (nutation_node(t) * DEG).cos()
}
