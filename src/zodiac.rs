//! The twelve tropical signs and the longitude → (sign, degree) mapping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of one sign in degrees of ecliptic longitude.
pub const SIGN_WIDTH: f64 = 30.0;

/// A zodiac sign. Variants are in canonical order starting at 0° Aries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        Self::Aries,
        Self::Taurus,
        Self::Gemini,
        Self::Cancer,
        Self::Leo,
        Self::Virgo,
        Self::Libra,
        Self::Scorpio,
        Self::Sagittarius,
        Self::Capricorn,
        Self::Aquarius,
        Self::Pisces,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Aries => "aries",
            Self::Taurus => "taurus",
            Self::Gemini => "gemini",
            Self::Cancer => "cancer",
            Self::Leo => "leo",
            Self::Virgo => "virgo",
            Self::Libra => "libra",
            Self::Scorpio => "scorpio",
            Self::Sagittarius => "sagittarius",
            Self::Capricorn => "capricorn",
            Self::Aquarius => "aquarius",
            Self::Pisces => "pisces",
        }
    }

    /// Position in the canonical order (Aries = 0).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Ecliptic longitude where this sign begins.
    pub fn start_longitude(self) -> f64 {
        self.index() as f64 * SIGN_WIDTH
    }

    /// The sign containing `longitude`. Any finite input is accepted;
    /// the index is taken with floored division so negative and wrapped
    /// longitudes land on the same sign as their [0, 360) equivalent.
    pub fn from_longitude(longitude: f64) -> Self {
        split_longitude(longitude).0
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reduce a longitude to [0, 360).
///
/// `rem_euclid` can round a tiny negative input up to exactly 360.0,
/// which is folded back to 0.
pub fn normalize_longitude(longitude: f64) -> f64 {
    let l = longitude.rem_euclid(360.0);
    if l >= 360.0 {
        0.0
    } else {
        l
    }
}

/// Split a longitude into its sign and the degree within that sign.
/// The degree is always in [0, 30).
pub fn split_longitude(longitude: f64) -> (ZodiacSign, f64) {
    let l = normalize_longitude(longitude);
    let index = ((l / SIGN_WIDTH).floor() as usize).min(11);
    let mut degree = l - index as f64 * SIGN_WIDTH;
    if degree >= SIGN_WIDTH {
        degree = SIGN_WIDTH - f64::EPSILON * SIGN_WIDTH;
    }
    (ZodiacSign::ALL[index], degree.max(0.0))
}

/// Degree within the sign, floored modulo 30.
pub fn degree_in_sign(longitude: f64) -> f64 {
    split_longitude(longitude).1
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_canonical_order() {
        assert_eq!(ZodiacSign::ALL[0], ZodiacSign::Aries);
        assert_eq!(ZodiacSign::ALL[11], ZodiacSign::Pisces);
        for (i, sign) in ZodiacSign::ALL.iter().enumerate() {
            assert_eq!(sign.index(), i);
        }
    }

    #[test]
    fn test_arcs_partition_the_circle() {
        // Every whole and half degree lands in exactly the arc that starts at or before it.
        let mut d = 0.0;
        while d < 360.0 {
            let sign = ZodiacSign::from_longitude(d);
            assert!(sign.start_longitude() <= d && d < sign.start_longitude() + SIGN_WIDTH);
            d += 0.5;
        }
        for sign in ZodiacSign::ALL {
            assert_eq!(ZodiacSign::from_longitude(sign.start_longitude()), sign);
        }
    }

    #[test]
    fn test_periodicity() {
        for d in [0.0, 12.5, 89.99, 180.0, 271.3, 359.5] {
            for k in [-3.0, -1.0, 1.0, 2.0, 10.0] {
                assert_eq!(
                    ZodiacSign::from_longitude(d),
                    ZodiacSign::from_longitude(d + 360.0 * k),
                    "d={} k={}",
                    d,
                    k
                );
            }
        }
    }

    #[test]
    fn test_negative_longitude_uses_floor() {
        assert_eq!(ZodiacSign::from_longitude(-1.0), ZodiacSign::from_longitude(359.0));
        assert_eq!(ZodiacSign::from_longitude(-1.0), ZodiacSign::Pisces);
        assert_abs_diff_eq!(degree_in_sign(-1.0), 29.0, epsilon = 1e-9);
        assert_eq!(ZodiacSign::from_longitude(-31.0), ZodiacSign::Aquarius);
    }

    #[test]
    fn test_degree_in_sign_bounds() {
        for d in [-720.5, -30.0, -0.0001, 0.0, 29.999, 30.0, 359.999, 360.0, 725.25] {
            let deg = degree_in_sign(d);
            assert!((0.0..30.0).contains(&deg), "degree_in_sign({}) = {}", d, deg);
        }
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(ZodiacSign::from_longitude(330.0), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_longitude(329.999), ZodiacSign::Aquarius);
        assert_eq!(ZodiacSign::from_longitude(359.999), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_longitude(360.0), ZodiacSign::Aries);
        assert_abs_diff_eq!(degree_in_sign(360.0), 0.0);
        // A tiny negative value must not produce sign index 12.
        assert_eq!(ZodiacSign::from_longitude(-1e-20), ZodiacSign::Aries);
    }

    #[test]
    fn test_display_is_lowercase() {
        assert_eq!(ZodiacSign::Sagittarius.to_string(), "sagittarius");
        assert_eq!(
            serde_json::to_string(&ZodiacSign::Capricorn).unwrap(),
            "\"capricorn\""
        );
    }
}
