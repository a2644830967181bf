//! Lunar longitude based on Jean Meeus "Astronomical Algorithms" Ch. 47.
//!
//! Uses the top periodic terms from Table 47.A for ~0.3° accuracy,
//! which is far inside the tolerance needed to place the Moon in a sign.

use super::solar::{normalize_degrees, DEG};

// Periodic terms for longitude (Table 47.A)
// Each entry: (D, M, Mp, F, coeff_l), coeff_l in units of 0.000001 degrees
const TERMS_L: [(f64, f64, f64, f64, f64); 20] = [
    (0.0, 0.0, 1.0, 0.0, 6288774.0),
    (2.0, 0.0, -1.0, 0.0, 1274027.0),
    (2.0, 0.0, 0.0, 0.0, 658314.0),
    (0.0, 0.0, 2.0, 0.0, 213618.0),
    (0.0, 1.0, 0.0, 0.0, -185116.0),
    (0.0, 0.0, 0.0, 2.0, -114332.0),
    (2.0, 0.0, -2.0, 0.0, 58793.0),
    (2.0, -1.0, -1.0, 0.0, 57066.0),
    (2.0, 0.0, 1.0, 0.0, 53322.0),
    (2.0, -1.0, 0.0, 0.0, 45758.0),
    (0.0, 1.0, -1.0, 0.0, -40923.0),
    (1.0, 0.0, 0.0, 0.0, -34720.0),
    (0.0, 1.0, 1.0, 0.0, -30383.0),
    (2.0, 0.0, 0.0, -2.0, 15327.0),
    (0.0, 0.0, 1.0, 2.0, -12528.0),
    (0.0, 0.0, 1.0, -2.0, 10980.0),
    (4.0, 0.0, -1.0, 0.0, 10675.0),
    (0.0, 0.0, 3.0, 0.0, 10034.0),
    (4.0, 0.0, -2.0, 0.0, 8548.0),
    (2.0, 1.0, -1.0, 0.0, -7888.0),
];

/// Fundamental arguments of the lunar theory, degrees.
struct Arguments {
    /// Moon mean longitude L'
    lp: f64,
    /// Mean elongation D
    d: f64,
    /// Sun mean anomaly M
    m: f64,
    /// Moon mean anomaly M'
    mp: f64,
    /// Argument of latitude F
    f: f64,
}

/// Horner evaluation of c0 + c1·t + c2·t² + c3·t³ + c4·t⁴, reduced to [0, 360).
fn quartic(t: f64, c: [f64; 5]) -> f64 {
    normalize_degrees(c.iter().rev().fold(0.0, |acc, &k| acc * t + k))
}

impl Arguments {
    fn at(t: f64) -> Self {
        Self {
            lp: quartic(t, [218.3164477, 481267.88123421, -0.0015786, 1.0 / 538841.0, -1.0 / 65194000.0]),
            d: quartic(t, [297.8501921, 445267.1114034, -0.0018819, 1.0 / 545868.0, -1.0 / 113065000.0]),
            m: quartic(t, [357.5291092, 35999.0502909, -0.0001536, 1.0 / 24490000.0, 0.0]),
            mp: quartic(t, [134.9633964, 477198.8675055, 0.0087414, 1.0 / 69699.0, -1.0 / 14712000.0]),
            f: quartic(t, [93.2720950, 483202.0175233, -0.0036539, -1.0 / 3526000.0, 1.0 / 863310000.0]),
        }
    }
}

/// Geocentric ecliptic longitude of the Moon, degrees in [0, 360).
pub fn moon_longitude(t: f64) -> f64 {
    let a = Arguments::at(t);

    // Terms in M are scaled by the decreasing eccentricity of Earth's orbit.
    let ecc = 1.0 - 0.002516 * t - 0.0000074 * t * t;

    let periodic: f64 = TERMS_L
        .iter()
        .map(|&(cd, cm, cmp, cf, coeff)| {
            let angle = (cd * a.d + cm * a.m + cmp * a.mp + cf * a.f) * DEG;
            coeff * ecc.powi(cm.abs() as i32) * angle.sin()
        })
        .sum();

    // Venus (A1), Earth flattening (L' - F), Jupiter (A2)
    let a1 = (119.75 + 131.849 * t) * DEG;
    let a2 = (53.09 + 479264.290 * t) * DEG;
    let additive = 3958.0 * a1.sin() + 1962.0 * ((a.lp - a.f) * DEG).sin() + 318.0 * a2.sin();

    normalize_degrees(a.lp + (periodic + additive) / 1_000_000.0)
}
