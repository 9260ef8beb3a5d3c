use {
    serde_json::{Map, Value},
    std::{collections::HashMap, fs, path::PathBuf},
};

/// Read-only string key-value store holding the session boundaries.
pub trait BoundaryCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// A JSON object file of string values, e.g. `{"kTimeInfo": "{...}"}`.
pub struct JsonFileCache {
    path: PathBuf,
}

impl JsonFileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BoundaryCache for JsonFileCache {
    fn get(&self, key: &str) -> Option<String> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                log::debug!("Boundary cache {:?} unreadable: {}", self.path, e);
                return None;
            }
        };
        let entries: Map<String, Value> = match serde_json::from_str(&text) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Boundary cache {:?} is not a JSON object: {}", self.path, e);
                return None;
            }
        };
        match entries.get(key)? {
            Value::String(s) => Some(s.clone()),
            // Tolerate the pair stored as a nested object instead of a string.
            other => Some(other.to_string()),
        }
    }
}

/// Cache with no entries.
pub struct NoCache;

impl BoundaryCache for NoCache {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }
}

impl BoundaryCache for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}
