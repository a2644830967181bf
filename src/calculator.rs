//! Chart calculator: raw ephemeris longitudes → sign placements.

use serde::Serialize;

use crate::ephemeris::{Body, Ephemeris, HouseSystem};
use crate::error::Result;
use crate::zodiac::{normalize_longitude, split_longitude, ZodiacSign};

/// A body's position expressed as sign + degree within the sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanetPlacement {
    pub planet: Body,
    /// Ecliptic longitude, degrees in [0, 360).
    pub longitude: f64,
    /// Degrees into `sign`, in [0, 30).
    pub degree: f64,
    pub sign: ZodiacSign,
}

/// A house cusp expressed as sign + degree within the sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HousePlacement {
    /// 1–12
    pub house: u8,
    pub longitude: f64,
    pub degree: f64,
    pub sign: ZodiacSign,
}

/// Degree within a sign as shown in reports: truncated to hundredths so
/// that 29.999 reads 29.99, never 30.00.
pub fn format_degree(degree: f64) -> String {
    // The 1e-9 nudge keeps 0.29 (stored as 0.28999…) from reading 0.28.
    let hundredths = (degree * 100.0 + 1e-9).floor().clamp(0.0, 2999.0);
    format!("{:.2}", hundredths / 100.0)
}

pub struct ChartCalculator<'a> {
    ephemeris: &'a dyn Ephemeris,
}

impl<'a> ChartCalculator<'a> {
    pub fn new(ephemeris: &'a dyn Ephemeris) -> Self {
        Self { ephemeris }
    }

    /// One placement per tracked body, in canonical order.
    pub fn planet_positions(&self, jd_ut: f64) -> Result<Vec<PlanetPlacement>> {
        Body::ALL
            .iter()
            .map(|&planet| {
                let raw = self.ephemeris.longitude(planet, jd_ut)?;
                let (sign, degree) = split_longitude(raw);
                Ok(PlanetPlacement { planet, longitude: normalize_longitude(raw), degree, sign })
            })
            .collect()
    }

    /// Twelve cusp placements numbered 1–12, and the house system the
    /// ephemeris actually used (it may differ from `system` near the poles).
    pub fn house_cusps(
        &self,
        jd_ut: f64,
        lat: f64,
        lon: f64,
        system: HouseSystem,
    ) -> Result<(HouseSystem, Vec<HousePlacement>)> {
        let computed = self.ephemeris.house_cusps(jd_ut, lat, lon, system)?;
        let placements = computed
            .cusps
            .iter()
            .zip(1u8..)
            .map(|(&raw, house)| {
                let (sign, degree) = split_longitude(raw);
                HousePlacement { house, longitude: normalize_longitude(raw), degree, sign }
            })
            .collect();
        Ok((computed.system, placements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::{AnalyticEphemeris, HouseCusps};
    use crate::time::J2000;
    use approx::assert_abs_diff_eq;

    /// Returns a fixed longitude per body and fixed cusps, some out of range.
    struct FixedEphemeris;

    impl Ephemeris for FixedEphemeris {
        fn longitude(&self, body: Body, _jd: f64) -> Result<f64> {
            Ok(match body {
                Body::Sun => 330.0,
                Body::Moon => -1.0,
                Body::Mercury => 725.5,
                _ => 15.25,
            })
        }

        fn house_cusps(&self, _jd: f64, _lat: f64, _lon: f64, _s: HouseSystem) -> Result<HouseCusps> {
            let mut cusps = [0.0; 12];
            for (i, c) in cusps.iter_mut().enumerate() {
                *c = 100.0 + 30.0 * i as f64;
            }
            Ok(HouseCusps { cusps, ascendant: 100.0, midheaven: 10.0, system: HouseSystem::Equal })
        }
    }

    #[test]
    fn test_planet_mapping() {
        let calc = ChartCalculator::new(&FixedEphemeris);
        let planets = calc.planet_positions(J2000).unwrap();
        assert_eq!(planets.len(), 10);

        assert_eq!(planets[0].planet, Body::Sun);
        assert_eq!(planets[0].sign, ZodiacSign::Pisces);
        assert_abs_diff_eq!(planets[0].degree, 0.0);

        assert_eq!(planets[1].sign, ZodiacSign::Pisces);
        assert_abs_diff_eq!(planets[1].degree, 29.0, epsilon = 1e-9);
        assert_abs_diff_eq!(planets[1].longitude, 359.0, epsilon = 1e-9);

        assert_eq!(planets[2].sign, ZodiacSign::Aries);
        assert_abs_diff_eq!(planets[2].degree, 5.5, epsilon = 1e-9);

        // Several bodies may share a sign.
        assert!(planets[3..].iter().all(|p| p.sign == ZodiacSign::Aries));
    }

    #[test]
    fn test_house_numbering() {
        let calc = ChartCalculator::new(&FixedEphemeris);
        let (system, houses) = calc.house_cusps(J2000, 51.5, 0.0, HouseSystem::Placidus).unwrap();
        // Whatever the ephemeris reports as used is passed through.
        assert_eq!(system, HouseSystem::Equal);
        let numbers: Vec<u8> = houses.iter().map(|h| h.house).collect();
        assert_eq!(numbers, (1..=12).collect::<Vec<u8>>());
        assert_eq!(houses[0].sign, ZodiacSign::Cancer);
        assert_abs_diff_eq!(houses[0].degree, 10.0);
        // 100 + 330 = 430 wraps to 70° Gemini.
        assert_eq!(houses[11].sign, ZodiacSign::Gemini);
        assert_abs_diff_eq!(houses[11].longitude, 70.0);
    }

    #[test]
    fn test_j2000_signs() {
        let eph = AnalyticEphemeris::new();
        let calc = ChartCalculator::new(&eph);
        let signs: Vec<ZodiacSign> = calc
            .planet_positions(J2000)
            .unwrap()
            .iter()
            .map(|p| p.sign)
            .collect();
        use ZodiacSign::*;
        assert_eq!(
            signs,
            [Capricorn, Scorpio, Capricorn, Sagittarius, Aquarius, Aries, Taurus, Aquarius, Aquarius, Sagittarius]
        );
    }

    #[test]
    fn test_format_degree() {
        assert_eq!(format_degree(10.3725), "10.37");
        assert_eq!(format_degree(0.0), "0.00");
        assert_eq!(format_degree(0.29), "0.29");
        assert_eq!(format_degree(12.5), "12.50");
    }

    #[test]
    fn test_degree_display_stays_below_thirty() {
        // 59.999° is 29.999° Taurus; rounding would print 30.00.
        let (sign, degree) = split_longitude(59.999);
        assert_eq!(sign, ZodiacSign::Taurus);
        assert_eq!(format_degree(degree), "29.99");
        assert_eq!(format_degree(30.0 - 1e-12), "29.99");
    }
}
