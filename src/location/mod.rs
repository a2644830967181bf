//! Location subsystem: place name → coordinates + IANA timezone.
//!
//! Provides the geocoding and timezone-lookup seams, their HTTP
//! implementations, and a local cache of past resolutions.

pub mod cache;
pub mod providers;
pub mod resolver;
pub mod types;

pub use cache::LocationCache;
pub use providers::{Geocoder, NominatimGeocoder, TimeApiTimezoneFinder, TimezoneFinder};
pub use resolver::LocationResolver;
pub use types::{GeoLocation, GeocodeMatch, LocationSource, ResolvedLocation, ResolveOptions};
