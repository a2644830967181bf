//! Error taxonomy shared by every stage of chart construction.

use thiserror::Error;

/// Every failure a chart request can produce.
///
/// `main` is the only place these are turned into user-visible text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("Location '{city}' not found.")]
    LocationNotFound { city: String },

    #[error("Timezone for location '{city}' not found.")]
    TimezoneNotFound { city: String },

    #[error("Unknown timezone identifier '{0}'")]
    UnknownTimezone(String),

    /// The local time falls in a DST gap or overlap.
    #[error("Local time {local} is ambiguous or does not exist in timezone {timezone}")]
    AmbiguousOrInvalidLocalTime { timezone: String, local: String },

    #[error("{0}")]
    TimeFormat(String),

    #[error("Invalid date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, ChartError>;
