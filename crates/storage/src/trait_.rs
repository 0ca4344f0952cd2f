//! Storage trait abstraction.

use async_trait::async_trait;
use studytrack_core::ProgressMap;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Storage abstraction for the persisted progress map.
///
/// The tracker loads once at startup and saves after every mutation,
/// including a reset, which saves the blank map.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Load the saved progress map, `None` if nothing was saved yet.
    async fn load_progress(&self) -> Result<Option<ProgressMap>>;

    /// Save the progress map, replacing any previous copy.
    async fn save_progress(&mut self, progress: &ProgressMap) -> Result<()>;
}
