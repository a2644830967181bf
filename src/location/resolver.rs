//! Location resolver: memo → optional file cache → geocoder → timezone finder.
//!
//! The city text goes to the geocoder verbatim; the only country filter is
//! the explicit one in [`ResolveOptions`]. One geocoding query and one
//! timezone lookup per miss, no retries. Failures propagate unchanged and
//! are never remembered.

use std::collections::HashMap;

use super::cache::{cache_key, LocationCache};
use super::providers::{Geocoder, NominatimGeocoder, TimeApiTimezoneFinder, TimezoneFinder};
use super::types::{LocationSource, ResolvedLocation, ResolveOptions};
use crate::error::{ChartError, Result};

/// Turns a free-text place name into coordinates and a timezone.
///
/// The collaborators are injected so tests can substitute fakes. Successful
/// resolutions are remembered in memory for the life of the resolver; the
/// on-disk cache is only used when one is attached with [`with_cache`].
///
/// [`with_cache`]: LocationResolver::with_cache
pub struct LocationResolver {
    geocoder: Box<dyn Geocoder>,
    timezones: Box<dyn TimezoneFinder>,
    memo: HashMap<String, ResolvedLocation>,
    cache: Option<LocationCache>,
}

impl LocationResolver {
    pub fn new(geocoder: Box<dyn Geocoder>, timezones: Box<dyn TimezoneFinder>) -> Self {
        Self { geocoder, timezones, memo: HashMap::new(), cache: None }
    }

    /// Resolver using the public Nominatim and timeapi.io services.
    pub fn online() -> Self {
        Self::new(
            Box::new(NominatimGeocoder::new()),
            Box::new(TimeApiTimezoneFinder::new()),
        )
    }

    /// Attach a file cache consulted before, and filled after, network lookups.
    pub fn with_cache(mut self, cache: LocationCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Resolve a city name (no options).
    pub fn resolve(&mut self, city: &str) -> Result<ResolvedLocation> {
        self.resolve_with_opts(city, &ResolveOptions::default())
    }

    /// Resolve a city name with options (country filter).
    pub fn resolve_with_opts(&mut self, city: &str, opts: &ResolveOptions) -> Result<ResolvedLocation> {
        let country = opts.country.as_deref();
        let key = cache_key(city, country);

        // 1. In-process memo
        if let Some(loc) = self.memo.get(&key) {
            log::debug!("Reusing resolution of '{}' from this run", city);
            return Ok(loc.clone());
        }

        // 2. File cache (opt-in)
        if let Some(mut loc) = self.cache.as_ref().and_then(|c| c.get(city, country)) {
            loc.name = city.to_string();
            log::info!("Using cached location for '{}': {} ({})", city, loc.location, loc.tz);
            self.memo.insert(key, loc.clone());
            return Ok(loc);
        }

        // 3. Geocoder
        let hit = self
            .geocoder
            .geocode(city, country)?
            .ok_or_else(|| ChartError::LocationNotFound { city: city.to_string() })?;

        // 4. Timezone at the resolved point
        let tz = self
            .timezones
            .timezone_at(hit.location.lat, hit.location.lon)?
            .ok_or_else(|| ChartError::TimezoneNotFound { city: city.to_string() })?;

        let resolved = ResolvedLocation {
            name: city.to_string(),
            location: hit.location,
            tz,
            source: LocationSource::Nominatim,
            display_name: hit.display_name,
        };
        log::info!("Resolved '{}' to {} ({})", city, resolved.location, resolved.tz);

        if let Some(cache) = self.cache.as_mut() {
            if let Err(e) = cache.put(city, country, &resolved) {
                log::warn!("Could not write location cache {}: {}", cache.path().display(), e);
            }
        }
        self.memo.insert(key, resolved.clone());

        Ok(resolved)
    }
}
