use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::cache_context;

/// File-based cache for API payloads.
///
/// Raw responses live under `raw/`, so reclassifying a match never refetches
/// it. Typed snapshots (standings, players) live under `parsed/`.
pub struct Cache {
    cache_dir: PathBuf,
    raw_dir: PathBuf,
    parsed_dir: PathBuf,
}

impl Cache {
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();
        let raw_dir = cache_dir.join("raw");
        let parsed_dir = cache_dir.join("parsed");

        fs::create_dir_all(&raw_dir).context("Failed to create raw cache directory")?;
        fs::create_dir_all(&parsed_dir).context("Failed to create parsed cache directory")?;

        Ok(Self {
            cache_dir,
            raw_dir,
            parsed_dir,
        })
    }

    /// Drops every cached payload
    pub fn clear(&self) -> Result<()> {
        fs::remove_dir_all(&self.cache_dir).context("Failed to clear cache")?;

        fs::create_dir_all(&self.raw_dir).context("Failed to recreate raw cache directory")?;
        fs::create_dir_all(&self.parsed_dir)
            .context("Failed to recreate parsed cache directory")?;

        debug!("Cleared cache directory {}", self.cache_dir.display());
        Ok(())
    }

    // --- Two-Tier Cache Methods ---

    pub fn save_raw(&self, key: &str, data: &Value) -> Result<()> {
        let file_path = self.build_raw_path(key);
        self.write_json(&file_path, data)
            .with_context(|| cache_context("write", key))?;
        debug!("Saved raw data to cache: {}", file_path.display());
        Ok(())
    }

    pub fn load_raw(&self, key: &str) -> Result<Option<Value>> {
        let file_path = self.build_raw_path(key);
        self.read_json_opt(&file_path)
            .with_context(|| cache_context("read", key))
    }

    /// Snapshot of a typed payload, overwritten on every save
    pub fn save_parsed<T: Serialize>(&self, key: &str, data: &T) -> Result<()> {
        let file_path = self.build_parsed_path(key);
        self.write_json(&file_path, data)
            .with_context(|| cache_context("write", key))?;
        debug!("Saved parsed data to cache: {}", file_path.display());
        Ok(())
    }

    pub fn has_raw(&self, key: &str) -> bool {
        self.build_raw_path(key).exists()
    }

    // --- Helper Methods ---

    fn build_raw_path(&self, key: &str) -> PathBuf {
        self.raw_dir.join(format!("{}.json", key))
    }

    fn build_parsed_path(&self, key: &str) -> PathBuf {
        self.parsed_dir.join(format!("{}.json", key))
    }

    fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        fs::write(path, json).context("Failed to write cache file")?;
        Ok(())
    }

    fn read_json_opt(&self, path: &Path) -> Result<Option<Value>> {
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(path)?;
        let data = serde_json::from_str(&json).with_context(|| {
            format!(
                "Failed to parse JSON from {:?}. First 200 chars: {}",
                path,
                json.chars().take(200).collect::<String>()
            )
        })?;
        Ok(Some(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_payload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(dir.path()).unwrap();
        let payload = json!({ "id": 42, "players": [], "rounds": [] });

        assert!(cache.load_raw("match-42").unwrap().is_none());
        cache.save_raw("match-42", &payload).unwrap();

        assert!(cache.has_raw("match-42"));
        assert_eq!(cache.load_raw("match-42").unwrap(), Some(payload));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(dir.path()).unwrap();
        fs::write(dir.path().join("raw").join("match-1.json"), "{ not json").unwrap();

        let err = cache.load_raw("match-1").unwrap_err();

        assert_eq!(err.to_string(), "Failed to read cache for key: match-1");
    }

    #[test]
    fn test_clear_keeps_directories() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(dir.path().join("cache")).unwrap();
        cache.save_raw("match-7", &json!({ "id": 7 })).unwrap();
        cache.save_parsed("standings", &vec![1, 2, 3]).unwrap();

        cache.clear().unwrap();

        assert!(!cache.has_raw("match-7"));
        assert!(dir.path().join("cache").join("raw").is_dir());
        cache.save_raw("match-7", &json!({ "id": 7 })).unwrap();
    }
}
