//! Local key-value persistence and the recent-city list built on it.

use crate::error::StorageError;
use std::{collections::HashMap, fmt::Debug, fs, path::PathBuf};

/// Key under which the recent-city list is persisted.
pub const RECENT_CITIES_KEY: &str = "recentCities";

/// Upper bound on the number of remembered cities.
pub const MAX_RECENT_CITIES: usize = 8;

/// Minimal string-to-string store, the local equivalent of browser storage.
pub trait KeyValueStore: Send + Debug {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| StorageError::Io { path, source })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)
            .map_err(|source| StorageError::Io { path: self.dir.clone(), source })?;

        let path = self.path_for(key);
        fs::write(&path, value).map_err(|source| StorageError::Io { path, source })
    }
}

/// In-process store; contents vanish with the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// How to pick an entry out of the recent-city list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitySelector<'a> {
    /// Zero-based position, most recent first.
    Index(usize),
    /// Case-insensitive name match.
    Name(&'a str),
}

/// Upper-case the first letter of each whitespace-separated word and lower-case the rest.
///
/// Separators are kept as they are.
pub fn format_city_name(city: &str) -> String {
    let mut formatted = String::with_capacity(city.len());
    let mut word_start = true;

    for c in city.chars() {
        if c.is_whitespace() {
            formatted.push(c);
            word_start = true;
        } else if word_start {
            formatted.extend(c.to_uppercase());
            word_start = false;
        } else {
            formatted.extend(c.to_lowercase());
        }
    }
    formatted
}

fn same_city(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Most-recent-first, case-insensitively unique list of searched cities.
///
/// The in-memory list is authoritative; persistence failures are logged and
/// otherwise ignored.
#[derive(Debug)]
pub struct RecentCityStore {
    store: Box<dyn KeyValueStore>,
    cities: Vec<String>,
}

impl RecentCityStore {
    /// Wrap `store` and load whatever list it currently holds.
    pub fn open(store: Box<dyn KeyValueStore>) -> Self {
        let mut recent = Self { store, cities: Vec::new() };
        recent.load();
        recent
    }

    /// Re-read the persisted list. Absent or corrupt data yields an empty list.
    pub fn load(&mut self) -> &[String] {
        self.cities = match self.store.get(RECENT_CITIES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(cities) => normalize(cities),
                Err(err) => {
                    tracing::warn!(error = %err, "discarding corrupt recent-city list");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read recent-city list");
                Vec::new()
            }
        };

        &self.cities
    }

    /// Move `city` (formatted) to the front, dropping any case-insensitive duplicate.
    pub fn record(&mut self, city: &str) -> &[String] {
        let formatted = format_city_name(city);

        self.cities.retain(|c| !same_city(c, &formatted));
        self.cities.insert(0, formatted);
        self.cities.truncate(MAX_RECENT_CITIES);

        self.persist();
        &self.cities
    }

    /// Forget every remembered city.
    pub fn clear(&mut self) {
        self.cities.clear();
        self.persist();
    }

    pub fn select(&self, selector: CitySelector<'_>) -> Option<&str> {
        let found = match selector {
            CitySelector::Index(idx) => self.cities.get(idx),
            CitySelector::Name(name) => self.cities.iter().find(|c| same_city(c, name.trim())),
        };
        found.map(String::as_str)
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// Give back the underlying store, e.g. to reopen it later.
    pub fn into_store(self) -> Box<dyn KeyValueStore> {
        self.store
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.cities)
            .map_err(StorageError::from)
            .and_then(|json| self.store.set(RECENT_CITIES_KEY, &json));

        if let Err(err) = result {
            tracing::warn!(error = %err, "failed to persist recent-city list; keeping it in memory");
        }
    }
}

fn normalize(cities: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(MAX_RECENT_CITIES);
    for city in cities {
        if out.len() == MAX_RECENT_CITIES {
            break;
        }
        if !city.trim().is_empty() && !out.iter().any(|c| same_city(c, &city)) {
            out.push(city);
        }
    }
    out
}
