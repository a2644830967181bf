use std::process::ExitCode;

use clap::{ArgAction, Parser};
use horoscope::ephemeris::AnalyticEphemeris;
use horoscope::location::{LocationCache, LocationResolver, ResolveOptions};
use horoscope::time::{parse_clock_time, CivilDateTime};
use horoscope::{render_tables, ChartBuilder, ChartError, ChartResult};

/// Horoscope: planet signs and house cusps for a birth place and date.
///
/// Houses (Placidus) are only computed when --time is given.
///
/// Examples:
///   horoscope London 1990 6 15
///   horoscope "New York" 1987 3 2 --time 14:30
///   horoscope Paris 2000 1 1 --country US --json
#[derive(Parser)]
#[command(name = "horoscope", version, about, long_about = None)]
struct Cli {
    /// City name. Example: horoscope "Buenos Aires" 1975 11 3
    city: String,

    /// Year (e.g. 1990).
    #[arg(allow_hyphen_values = true)]
    year: i32,

    /// Month (1-12).
    month: u32,

    /// Day of month (1-31).
    day: u32,

    /// Local time of birth, HH:MM (24-hour).
    #[arg(long, short = 't')]
    time: Option<String>,

    /// Country hint (ISO 3166-1 alpha-2, e.g. GB, US).
    /// Filters geocoding results to this country.
    #[arg(long)]
    country: Option<String>,

    /// Print the chart as JSON instead of tables.
    #[arg(long)]
    json: bool,

    /// Keep resolved locations in ~/.horoscope/locations.json (30 days).
    #[arg(long)]
    cache: bool,

    /// More log output on stderr (-v info, -vv debug).
    #[arg(long, short = 'v', action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut resolver = LocationResolver::online();
    if cli.cache {
        resolver = resolver.with_cache(LocationCache::load());
    }

    let (text, status) = report(run(&cli, &mut resolver), cli.json);
    println!("{}", text);
    ExitCode::from(status)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(cli: &Cli, resolver: &mut LocationResolver) -> Result<ChartResult, ChartError> {
    // ── Parse time ──────────────────────────────────────────────

    let (hour, minute) = match cli.time.as_deref() {
        Some(t) => {
            let (h, m) = parse_clock_time(t)?;
            (Some(h), Some(m))
        }
        None => (None, None),
    };
    let date = CivilDateTime::new(cli.year, cli.month, cli.day, hour, minute);

    // ── Resolve and compute ─────────────────────────────────────

    let opts = ResolveOptions { country: cli.country.clone() };
    let ephemeris = AnalyticEphemeris::new();
    let mut builder = ChartBuilder::new(resolver, &ephemeris).with_options(opts);
    builder.build(&cli.city, &date)
}

/// Stdout text and exit status for a run: the report and 0, or a single
/// `Error:` line and 1.
fn report(result: Result<ChartResult, ChartError>, json: bool) -> (String, u8) {
    let chart = match result {
        Ok(chart) => chart,
        Err(e) => return (format!("Error: {}", e), 1),
    };
    if !json {
        return (render_tables(&chart), 0);
    }
    match serde_json::to_string_pretty(&chart) {
        Ok(text) => (text, 0),
        Err(e) => (format!("Error: {}", e), 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horoscope::location::{GeoLocation, GeocodeMatch, Geocoder, TimezoneFinder};
    use std::cell::Cell;
    use std::rc::Rc;

    struct OnePlace {
        calls: Rc<Cell<usize>>,
    }

    impl Geocoder for OnePlace {
        fn geocode(&self, query: &str, _country: Option<&str>) -> horoscope::Result<Option<GeocodeMatch>> {
            self.calls.set(self.calls.get() + 1);
            Ok((query == "Greenwich").then(|| GeocodeMatch {
                location: GeoLocation::new(51.4779, -0.0015),
                display_name: None,
            }))
        }
    }

    struct London;

    impl TimezoneFinder for London {
        fn timezone_at(&self, _lat: f64, _lon: f64) -> horoscope::Result<Option<String>> {
            Ok(Some("Europe/London".to_string()))
        }
    }

    fn offline() -> (LocationResolver, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let resolver = LocationResolver::new(Box::new(OnePlace { calls: calls.clone() }), Box::new(London));
        (resolver, calls)
    }

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["horoscope"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_bad_time_stops_before_any_lookup() {
        let (mut resolver, calls) = offline();
        let cli = cli(&["Greenwich", "2000", "1", "1", "--time", "99:99"]);

        let result = run(&cli, &mut resolver);
        assert!(matches!(result, Err(ChartError::TimeFormat(_))));
        assert_eq!(calls.get(), 0);

        let (text, status) = report(result, false);
        assert_eq!(status, 1);
        assert_eq!(text, "Error: Time must be in HH:MM format");
    }

    #[test]
    fn test_unknown_city_is_one_error_line() {
        let (mut resolver, calls) = offline();
        let cli = cli(&["Zzqxnowhere123", "2000", "1", "1", "--json"]);

        let (text, status) = report(run(&cli, &mut resolver), cli.json);
        assert_eq!(status, 1);
        assert_eq!(text, "Error: Location 'Zzqxnowhere123' not found.");
        assert_eq!(text.lines().count(), 1);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_success_prints_tables() {
        let (mut resolver, _) = offline();
        let cli = cli(&["Greenwich", "2000", "1", "1", "--time", "12:00"]);

        let (text, status) = report(run(&cli, &mut resolver), cli.json);
        assert_eq!(status, 0);
        assert!(text.starts_with("\n| Planet"));
        assert!(text.contains("| House"));
        assert!(!text.contains("Error"));
    }

    #[test]
    fn test_json_output() {
        let (mut resolver, _) = offline();
        let cli = cli(&["Greenwich", "2000", "1", "1", "--json"]);

        let (text, status) = report(run(&cli, &mut resolver), cli.json);
        assert_eq!(status, 0);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["planets"].as_array().map(Vec::len), Some(10));
        assert!(value.get("house_system").is_none());
    }

    #[test]
    fn test_flags() {
        let cli = cli(&["New York", "1987", "3", "2", "--country", "US", "--cache", "-vv"]);
        assert_eq!(cli.city, "New York");
        assert_eq!(cli.country.as_deref(), Some("US"));
        assert!(cli.cache);
        assert!(!cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(cli.time.is_none());
    }
}
