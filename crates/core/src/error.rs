//! Errors for operations on the progress model.

use crate::subject::ChapterKey;

/// Errors that can occur when working with the progress model.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The chapter is not part of the configured curriculum
    #[error("unknown chapter: {0}")]
    UnknownChapter(ChapterKey),
}
