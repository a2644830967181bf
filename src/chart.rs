//! The chart builder, the primary public API.
//!
//! Resolves the place, converts the civil time to a Julian Day, and asks
//! the calculator for planet and (when the time of day is known) house
//! placements. Also renders the result as GitHub-style tables.

use serde::Serialize;

use crate::calculator::{format_degree, ChartCalculator, HousePlacement, PlanetPlacement};
use crate::ephemeris::{Ephemeris, HouseSystem};
use crate::error::Result;
use crate::location::{LocationResolver, ResolveOptions, ResolvedLocation};
use crate::time::{self, CivilDateTime};

/// Everything computed for one chart request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartResult {
    pub location: ResolvedLocation,
    pub date: CivilDateTime,
    pub julian_day: f64,
    /// The system the cusps were computed with; `None` when there are no houses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_system: Option<HouseSystem>,
    /// Always one entry per tracked body.
    pub planets: Vec<PlanetPlacement>,
    /// Empty when the time of day is unknown.
    pub houses: Vec<HousePlacement>,
}

/// Composes location resolution, time conversion, and chart calculation.
pub struct ChartBuilder<'a> {
    resolver: &'a mut LocationResolver,
    ephemeris: &'a dyn Ephemeris,
    house_system: HouseSystem,
    options: ResolveOptions,
}

impl<'a> ChartBuilder<'a> {
    pub fn new(resolver: &'a mut LocationResolver, ephemeris: &'a dyn Ephemeris) -> Self {
        Self {
            resolver,
            ephemeris,
            house_system: HouseSystem::default(),
            options: ResolveOptions::default(),
        }
    }

    pub fn with_house_system(mut self, system: HouseSystem) -> Self {
        self.house_system = system;
        self
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the chart. Each step runs only after the previous succeeded;
    /// the first failure is returned unchanged.
    pub fn build(&mut self, city: &str, date: &CivilDateTime) -> Result<ChartResult> {
        let location = self.resolver.resolve_with_opts(city, &self.options)?;
        let julian_day = time::to_julian_day(&location.tz, date)?;

        let calculator = ChartCalculator::new(self.ephemeris);
        let planets = calculator.planet_positions(julian_day)?;

        let (house_system, houses) = if date.has_time_of_day() {
            let (used, houses) = calculator.house_cusps(
                julian_day,
                location.location.lat,
                location.location.lon,
                self.house_system,
            )?;
            (Some(used), houses)
        } else {
            log::info!("No time of day given; skipping houses");
            (None, Vec::new())
        };

        Ok(ChartResult {
            location,
            date: *date,
            julian_day,
            house_system,
            planets,
            houses,
        })
    }
}

// ─── Table rendering ─────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

/// Render rows as a GitHub-flavoured markdown table with fitted columns.
fn render_table(headers: &[&str], aligns: &[Align], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| {
        let mut out = String::from("|");
        for (i, cell) in cells.iter().enumerate() {
            let w = widths[i];
            match aligns[i] {
                Align::Left => out.push_str(&format!(" {:<w$} |", cell, w = w)),
                Align::Right => out.push_str(&format!(" {:>w$} |", cell, w = w)),
            }
        }
        out.push('\n');
        out
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut out = line(&header_cells);
    out.push('|');
    for w in &widths {
        out.push_str(&"-".repeat(w + 2));
        out.push('|');
    }
    out.push('\n');
    for row in rows {
        out.push_str(&line(row));
    }
    out
}

/// The planet table, and the house table when houses were computed.
pub fn render_tables(chart: &ChartResult) -> String {
    let aligns = [Align::Left, Align::Right, Align::Left];

    let planet_rows: Vec<Vec<String>> = chart
        .planets
        .iter()
        .map(|p| vec![p.planet.to_string(), format_degree(p.degree), p.sign.to_string()])
        .collect();

    let mut out = String::from("\n");
    out.push_str(&render_table(&["Planet", "Degree", "Sign"], &aligns, &planet_rows));

    if !chart.houses.is_empty() {
        let house_rows: Vec<Vec<String>> = chart
            .houses
            .iter()
            .map(|h| vec![h.house.to_string(), format_degree(h.degree), h.sign.to_string()])
            .collect();
        out.push('\n');
        out.push_str(&render_table(
            &["House", "Degree", "Sign"],
            &[Align::Right, Align::Right, Align::Left],
            &house_rows,
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::{AnalyticEphemeris, Body};
    use crate::error::ChartError;
    use crate::location::resolver::fakes::{FakeGeocoder, FakeTimezones};
    use crate::zodiac::ZodiacSign;

    fn greenwich_resolver() -> LocationResolver {
        LocationResolver::new(
            Box::new(FakeGeocoder::with(&[("Greenwich", 51.4779, -0.0015)])),
            Box::new(FakeTimezones::with("Europe/London")),
        )
    }

    #[test]
    fn test_date_only_chart_has_no_houses() {
        let mut resolver = greenwich_resolver();
        let eph = AnalyticEphemeris::new();
        let chart = ChartBuilder::new(&mut resolver, &eph)
            .build("Greenwich", &CivilDateTime::date_only(2000, 1, 1))
            .unwrap();

        assert!(chart.houses.is_empty());
        assert_eq!(chart.house_system, None);
        assert_eq!(chart.planets.len(), 10);
        let order: Vec<Body> = chart.planets.iter().map(|p| p.planet).collect();
        assert_eq!(order, Body::ALL);
    }

    #[test]
    fn test_timed_chart_has_twelve_houses() {
        let mut resolver = greenwich_resolver();
        let eph = AnalyticEphemeris::new();
        let mut builder = ChartBuilder::new(&mut resolver, &eph);

        let untimed = builder.build("Greenwich", &CivilDateTime::date_only(2000, 1, 1)).unwrap();
        let timed = builder
            .build("Greenwich", &CivilDateTime::new(2000, 1, 1, Some(12), Some(0)))
            .unwrap();

        assert_eq!(timed.houses.len(), 12);
        let numbers: Vec<u8> = timed.houses.iter().map(|h| h.house).collect();
        assert_eq!(numbers, (1..=12).collect::<Vec<u8>>());

        // Same planets, same order; noon vs midnight only moves them a little.
        for (a, b) in untimed.planets.iter().zip(&timed.planets) {
            assert_eq!(a.planet, b.planet);
        }
        assert_eq!(timed.planets[0].sign, ZodiacSign::Capricorn);
        // Greenwich noon on 2000-01-01 has Aries rising.
        assert_eq!(timed.houses[0].sign, ZodiacSign::Aries);
    }

    #[test]
    fn test_hour_without_minute_skips_houses() {
        let mut resolver = greenwich_resolver();
        let eph = AnalyticEphemeris::new();
        let chart = ChartBuilder::new(&mut resolver, &eph)
            .build("Greenwich", &CivilDateTime::new(2000, 1, 1, Some(12), None))
            .unwrap();
        assert!(chart.houses.is_empty());
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut resolver = greenwich_resolver();
        let eph = AnalyticEphemeris::new();
        let mut builder = ChartBuilder::new(&mut resolver, &eph);
        let date = CivilDateTime::new(1987, 6, 5, Some(4), Some(20));
        assert_eq!(
            builder.build("Greenwich", &date).unwrap(),
            builder.build("Greenwich", &date).unwrap()
        );
    }

    #[test]
    fn test_unknown_city_stops_after_one_geocode() {
        let geo = FakeGeocoder::with(&[]);
        let tz = FakeTimezones::with("UTC");
        let (geo_calls, tz_calls) = (geo.calls.clone(), tz.calls.clone());
        let mut resolver = LocationResolver::new(Box::new(geo), Box::new(tz));
        let eph = AnalyticEphemeris::new();

        let err = ChartBuilder::new(&mut resolver, &eph)
            .build("Zzqxnowhere123", &CivilDateTime::date_only(2000, 1, 1))
            .unwrap_err();

        assert_eq!(err, ChartError::LocationNotFound { city: "Zzqxnowhere123".into() });
        assert_eq!(geo_calls.get(), 1);
        assert_eq!(tz_calls.get(), 0);
    }

    #[test]
    fn test_dst_gap_is_an_error() {
        let mut resolver = LocationResolver::new(
            Box::new(FakeGeocoder::with(&[("New York", 40.7128, -74.006)])),
            Box::new(FakeTimezones::with("America/New_York")),
        );
        let eph = AnalyticEphemeris::new();
        let err = ChartBuilder::new(&mut resolver, &eph)
            .build("New York", &CivilDateTime::new(2021, 3, 14, Some(2), Some(30)))
            .unwrap_err();
        assert!(matches!(err, ChartError::AmbiguousOrInvalidLocalTime { .. }));
    }

    #[test]
    fn test_render_tables() {
        let mut resolver = greenwich_resolver();
        let eph = AnalyticEphemeris::new();
        let mut builder = ChartBuilder::new(&mut resolver, &eph);

        let untimed = builder.build("Greenwich", &CivilDateTime::date_only(2000, 1, 1)).unwrap();
        let text = render_tables(&untimed);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "");
        assert!(lines[1].starts_with("| Planet  |"));
        assert!(lines[2].starts_with("|---------|"));
        assert!(lines[3].starts_with("| Sun     |"));
        assert!(lines[3].ends_with("| capricorn   |"));
        assert_eq!(lines.len(), 13);
        assert!(!text.contains("House"));

        let timed = builder
            .build("Greenwich", &CivilDateTime::new(2000, 1, 1, Some(12), Some(0)))
            .unwrap();
        let text = render_tables(&timed);
        assert!(text.contains("| House |"));
        assert!(text.contains("\n|     1 |"));
        assert!(text.contains("\n|    12 |"));
    }

    #[test]
    fn test_house_system_and_options_are_applied() {
        let geo = FakeGeocoder::with(&[("Greenwich", 51.4779, -0.0015)]);
        let last_country = geo.last_country.clone();
        let mut resolver =
            LocationResolver::new(Box::new(geo), Box::new(FakeTimezones::with("Europe/London")));
        let eph = AnalyticEphemeris::new();

        let chart = ChartBuilder::new(&mut resolver, &eph)
            .with_house_system(HouseSystem::Equal)
            .with_options(ResolveOptions { country: Some("GB".into()) })
            .build("Greenwich", &CivilDateTime::new(2000, 1, 1, Some(12), Some(0)))
            .unwrap();

        assert_eq!(chart.house_system, Some(HouseSystem::Equal));
        assert_eq!(last_country.borrow().as_deref(), Some("GB"));
        // Equal houses: every cusp sits at the same degree of consecutive signs.
        let first = chart.houses[0].degree;
        for h in &chart.houses {
            assert!((h.degree - first).abs() < 1e-6, "house {} at {:.4}", h.house, h.degree);
        }
    }

    #[test]
    fn test_polar_chart_reports_fallback_system() {
        let mut resolver = LocationResolver::new(
            Box::new(FakeGeocoder::with(&[("Longyearbyen", 78.22, 15.65)])),
            Box::new(FakeTimezones::with("Arctic/Longyearbyen")),
        );
        let eph = AnalyticEphemeris::new();
        let chart = ChartBuilder::new(&mut resolver, &eph)
            .build("Longyearbyen", &CivilDateTime::new(2000, 1, 1, Some(12), Some(0)))
            .unwrap();

        assert_eq!(chart.houses.len(), 12);
        assert_eq!(chart.house_system, Some(HouseSystem::Porphyry));
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["house_system"], "porphyry");
    }

    #[test]
    fn test_date_only_json_omits_house_system() {
        let mut resolver = greenwich_resolver();
        let eph = AnalyticEphemeris::new();
        let chart = ChartBuilder::new(&mut resolver, &eph)
            .build("Greenwich", &CivilDateTime::date_only(2000, 1, 1))
            .unwrap();
        let json = serde_json::to_value(&chart).unwrap();
        assert!(json.get("house_system").is_none());
        assert_eq!(json["houses"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn test_render_table_alignment() {
        let rows = vec![vec!["a".to_string(), "1.50".to_string()]];
        let table = render_table(&["Name", "Value"], &[Align::Left, Align::Right], &rows);
        assert_eq!(table, "| Name | Value |\n|------|-------|\n| a    |  1.50 |\n");
    }
}
