//! Opt-in file cache of resolved locations at ~/.horoscope/locations.json.
//!
//! TTL: 30 days. Keys are normalised query text (trimmed, lower-cased,
//! whitespace collapsed) plus the country filter when one was given.
//! Only successful resolutions are stored. Used only when `--cache` is given.

use super::types::{GeoLocation, LocationSource, ResolvedLocation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const CACHE_TTL_MS: i64 = 30 * 24 * 3600 * 1000; // 30 days in ms

#[derive(Serialize, Deserialize, Clone)]
struct CacheEntry {
    lat: f64,
    lon: f64,
    tz: String,
    timestamp: i64,
    #[serde(default)]
    display_name: Option<String>,
}

/// The location cache.
pub struct LocationCache {
    path: PathBuf,
    entries: HashMap<String, CacheEntry>,
}

impl LocationCache {
    /// Load cache from the default location (~/.horoscope/locations.json).
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    /// Load cache from a specific path. Missing or corrupt files give an empty cache.
    pub fn load_from(path: PathBuf) -> Self {
        let entries = Self::read_file(&path).unwrap_or_default();
        Self { path, entries }
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".horoscope")
            .join("locations.json")
    }

    fn read_file(path: &Path) -> Option<HashMap<String, CacheEntry>> {
        let data = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&data) {
            Ok(entries) => Some(entries),
            Err(e) => {
                log::warn!("Ignoring unreadable location cache {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Look up a query in the cache. Returns None if missing or expired.
    pub fn get(&self, query: &str, country: Option<&str>) -> Option<ResolvedLocation> {
        self.get_at(query, country, chrono::Utc::now().timestamp_millis())
    }

    fn get_at(&self, query: &str, country: Option<&str>, now_ms: i64) -> Option<ResolvedLocation> {
        let entry = self.entries.get(&cache_key(query, country))?;

        if now_ms - entry.timestamp > CACHE_TTL_MS {
            return None; // expired
        }

        Some(ResolvedLocation {
            name: query.to_string(),
            location: GeoLocation::new(entry.lat, entry.lon),
            tz: entry.tz.clone(),
            source: LocationSource::Cache,
            display_name: entry.display_name.clone(),
        })
    }

    /// Store a resolved location under its query key and persist to disk.
    pub fn put(&mut self, query: &str, country: Option<&str>, resolved: &ResolvedLocation) -> io::Result<()> {
        self.put_at(query, country, resolved, chrono::Utc::now().timestamp_millis())
    }

    fn put_at(
        &mut self,
        query: &str,
        country: Option<&str>,
        resolved: &ResolvedLocation,
        now_ms: i64,
    ) -> io::Result<()> {
        let entry = CacheEntry {
            lat: resolved.location.lat,
            lon: resolved.location.lon,
            tz: resolved.tz.clone(),
            timestamp: now_ms,
            display_name: resolved.display_name.clone(),
        };
        self.entries.insert(cache_key(query, country), entry);
        self.persist()
    }

    fn persist(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// "  New   York " → "new york"; a country filter becomes a "|cc" suffix.
pub(crate) fn cache_key(query: &str, country: Option<&str>) -> String {
    let normalized = query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    match country {
        Some(cc) => format!("{}|{}", normalized, cc.trim().to_lowercase()),
        None => normalized,
    }
}
