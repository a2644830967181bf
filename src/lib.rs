//! Natal chart calculator.
//!
//! City name → coordinates and timezone → Julian Day (UT) → ecliptic
//! longitudes → zodiac signs, plus house cusps when the birth time is known.

pub mod calculator;
pub mod chart;
pub mod ephemeris;
pub mod error;
pub mod location;
pub mod time;
pub mod zodiac;

pub use chart::{render_tables, ChartBuilder, ChartResult};
pub use error::{ChartError, Result};
