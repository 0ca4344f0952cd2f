//! JSON file storage implementation.
//!
//! Stores the progress map as a single `progress.json` file and keeps a small
//! meta marker (version + updated_at) next to it under `meta/`.

use std::path::{Path, PathBuf};

use studytrack_core::ProgressMap;
use super::{Storage, Result};
use tokio::fs;
use tracing::debug;

const PROGRESS_FILE: &str = "progress.json";

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the directory and its
    /// `meta/` subdirectory if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("meta")).await?;

        Ok(Self { root })
    }

    fn progress_path(&self) -> PathBuf {
        self.root.join(PROGRESS_FILE)
    }

    fn meta_path(&self, name: &str) -> PathBuf {
        self.root.join("meta").join(format!("{}.meta.json", name))
    }

    /// Current save counter, 0 if never saved.
    pub async fn version(&self) -> u64 {
        match fs::read_to_string(self.meta_path("progress")).await {
            Ok(s) => serde_json::from_str::<serde_json::Value>(&s)
                .ok()
                .and_then(|json| json.get("version").and_then(|v| v.as_u64()))
                .unwrap_or(0),
            Err(_) => 0,
        }
    }

    /// Read and increment the save counter, return the new version.
    async fn bump_version(&self, name: &str) -> Result<u64> {
        let version = self.version().await + 1;
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        fs::write(self.meta_path(name), serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(version)
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn load_progress(&self) -> Result<Option<ProgressMap>> {
        let loaded: Option<ProgressMap> = read_json(&self.progress_path()).await?;
        if let Some(progress) = &loaded {
            debug!("Loaded {} chapter states from {}", progress.len(), self.root.display());
        }
        Ok(loaded)
    }

    async fn save_progress(&mut self, progress: &ProgressMap) -> Result<()> {
        let json = serde_json::to_string_pretty(progress)?;

        // Write to a sibling file and rename over the old copy.
        let tmp = self.root.join(format!("{}.tmp", PROGRESS_FILE));
        fs::write(&tmp, json.as_bytes()).await?;
        fs::rename(&tmp, self.progress_path()).await?;

        let version = self.bump_version("progress").await?;
        debug!("Saved progress (version {})", version);
        Ok(())
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageError;
    use chrono::{TimeZone, Utc};
    use studytrack_core::{ChapterKey, ScheduleConfig, TaskType};

    #[tokio::test]
    async fn test_load_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();

        assert!(storage.load_progress().await.unwrap().is_none());
        assert_eq!(storage.version().await, 0);
    }

    #[tokio::test]
    async fn test_save_and_load_progress() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let config = ScheduleConfig::builtin();
        let mut progress = ProgressMap::blank(&config);
        let key = ChapterKey::new("Physics", 4);
        let at = Utc.with_ymd_and_hms(2025, 4, 23, 20, 15, 0).unwrap();
        progress.toggle(&key, TaskType::Review, at).unwrap();

        storage.save_progress(&progress).await.unwrap();
        let loaded = storage.load_progress().await.unwrap().unwrap();

        assert_eq!(loaded, progress);
        assert_eq!(storage.version().await, 1);

        storage.save_progress(&progress).await.unwrap();
        assert_eq!(storage.version().await, 2);
    }

    #[tokio::test]
    async fn test_malformed_file_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        tokio::fs::write(dir.path().join(PROGRESS_FILE), b"{not json").await.unwrap();

        let err = storage.load_progress().await.unwrap_err();
        assert!(matches!(err, StorageError::Json(_)));
    }

    #[tokio::test]
    async fn test_saving_blank_map_replaces_progress() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        let blank = ProgressMap::blank(&ScheduleConfig::builtin());
        let mut progress = blank.clone();
        let at = Utc.with_ymd_and_hms(2025, 4, 22, 9, 0, 0).unwrap();
        progress.toggle(&ChapterKey::new("Mathematics", 1), TaskType::Reading, at).unwrap();

        storage.save_progress(&progress).await.unwrap();
        storage.save_progress(&blank).await.unwrap();

        assert_eq!(storage.load_progress().await.unwrap(), Some(blank));
        assert!(!dir.path().join(format!("{}.tmp", PROGRESS_FILE)).exists());
    }
}
