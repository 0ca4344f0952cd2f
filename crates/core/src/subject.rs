//! Subjects and chapter identities.

use serde::{Deserialize, Serialize};

/// A subject of the curriculum with a fixed number of chapters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    /// Display name, also the lookup key in the progress map
    pub name: String,

    /// Number of chapters, numbered from 1
    pub chapters: u32,
}

impl Subject {
    /// Create a subject.
    pub fn new(name: impl Into<String>, chapters: u32) -> Self {
        Self {
            name: name.into(),
            chapters,
        }
    }

    /// Iterate over the keys of every chapter of this subject.
    pub fn chapter_keys(&self) -> impl Iterator<Item = ChapterKey> + '_ {
        (1..=self.chapters).map(move |chapter| ChapterKey::new(self.name.clone(), chapter))
    }
}

/// Identity of a single unit of work: a chapter of a subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChapterKey {
    /// Subject name
    pub subject: String,

    /// Chapter number (1-based)
    pub chapter: u32,
}

impl ChapterKey {
    /// Create a chapter key.
    pub fn new(subject: impl Into<String>, chapter: u32) -> Self {
        Self {
            subject: subject.into(),
            chapter,
        }
    }

    /// Human-readable label, e.g. `Physics 3`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for ChapterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.subject, self.chapter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_key_label() {
        let key = ChapterKey::new("Fluid Mechanics", 12);
        assert_eq!(key.label(), "Fluid Mechanics 12");
    }

    #[test]
    fn test_chapter_keys_are_one_based() {
        let subject = Subject::new("Physics", 3);
        let keys: Vec<_> = subject.chapter_keys().map(|k| k.chapter).collect();
        assert_eq!(keys, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_subject_has_no_keys() {
        let subject = Subject::new("Physics", 0);
        assert_eq!(subject.chapter_keys().count(), 0);
    }
}
