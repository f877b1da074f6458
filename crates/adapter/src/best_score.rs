//! Best-score persistence
//!
//! One best score per profile, kept in a small JSON file:
//!
//! ```text
//! {"version":1,"profiles":{"default":1840}}
//! ```
//!
//! A missing, unreadable or corrupt file loads as empty; the next successful
//! `record` rewrites it.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const FILE_VERSION: u8 = 1;

/// File used when no path is configured
pub const DEFAULT_BEST_SCORE_PATH: &str = "heatfall-best.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BestScoreFile {
    version: u8,
    #[serde(default)]
    profiles: BTreeMap<String, u32>,
}

#[derive(Debug, Clone)]
pub struct BestScoreStore {
    path: PathBuf,
    profiles: BTreeMap<String, u32>,
}

impl BestScoreStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let profiles = load_profiles(&path);
        Self { path, profiles }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Best score of `profile`, zero when none was recorded
    pub fn best(&self, profile: &str) -> u32 {
        self.profiles.get(profile).copied().unwrap_or(0)
    }

    /// Persist `score` if it beats the profile's best. Returns whether it did.
    pub fn record(&mut self, profile: &str, score: u32) -> Result<bool> {
        if score <= self.best(profile) {
            return Ok(false);
        }
        self.profiles.insert(profile.to_string(), score);
        self.save()?;
        log::info!("[best-score] new best for {}: {}", profile, score);
        Ok(true)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let payload = BestScoreFile {
            version: FILE_VERSION,
            profiles: self.profiles.clone(),
        };
        let text = serde_json::to_string_pretty(&payload)
            .with_context(|| format!("Failed to serialize {}", self.path.display()))?;
        fs::write(&self.path, text)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

fn load_profiles(path: &Path) -> BTreeMap<String, u32> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            if e.kind() != ErrorKind::NotFound {
                log::warn!("[best-score] failed to read {}: {}", path.display(), e);
            }
            return BTreeMap::new();
        }
    };

    match serde_json::from_str::<BestScoreFile>(&text) {
        Ok(file) if file.version == FILE_VERSION => file.profiles,
        Ok(file) => {
            log::warn!(
                "[best-score] unsupported version {} at {}",
                file.version,
                path.display()
            );
            BTreeMap::new()
        }
        Err(e) => {
            log::warn!("[best-score] failed to parse {}: {}", path.display(), e);
            BTreeMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "heatfall-best-{}-{}.json",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let store = BestScoreStore::open(temp_path("missing"));
        assert_eq!(store.best("default"), 0);
    }

    #[test]
    fn test_record_only_when_exceeded() {
        let path = temp_path("record");
        let _ = fs::remove_file(&path);

        let mut store = BestScoreStore::open(&path);
        assert!(store.record("default", 500).unwrap());
        assert!(!store.record("default", 500).unwrap());
        assert!(!store.record("default", 120).unwrap());
        assert!(store.record("other", 10).unwrap());

        let reopened = BestScoreStore::open(&path);
        assert_eq!(reopened.best("default"), 500);
        assert_eq!(reopened.best("other"), 10);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_loads_empty_and_is_rewritten() {
        let path = temp_path("corrupt");
        fs::write(&path, "{ not json").unwrap();

        let mut store = BestScoreStore::open(&path);
        assert_eq!(store.best("default"), 0);
        assert!(store.record("default", 42).unwrap());

        let text = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["profiles"]["default"], 42);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_unknown_version_is_ignored() {
        let path = temp_path("version");
        fs::write(&path, r#"{"version":7,"profiles":{"default":900}}"#).unwrap();

        assert_eq!(BestScoreStore::open(&path).best("default"), 0);

        let _ = fs::remove_file(&path);
    }
}
