//! Storage collaborators for competition documents.
//!
//! The history service talks to an injected [`HistoryStorage`] rather than
//! the filesystem directly, so everything above this trait is testable
//! without touching disk. [`FileStorage`] is the production implementation;
//! [`MemoryStorage`] backs tests.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Named-document storage.
#[async_trait]
pub trait HistoryStorage: Send + Sync {
    /// Read a document. `Ok(None)` means "no data yet", which is not an
    /// error.
    async fn read(&self, name: &str) -> anyhow::Result<Option<String>>;

    /// Replace a document wholesale.
    async fn write(&self, name: &str, contents: &str) -> anyhow::Result<()>;
}

/// Documents as files in one directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader never observes a half-written document. A crash between the two
/// steps loses at most the write in flight.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create file storage rooted at `dir`. The directory is created on
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

#[async_trait]
impl HistoryStorage for FileStorage {
    async fn read(&self, name: &str) -> anyhow::Result<Option<String>> {
        let path = self.path(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
        }
    }

    async fn write(&self, name: &str, contents: &str) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating {}", self.dir.display()))?;

        let path = self.path(name);
        let staging = self.path(&format!("{name}.tmp"));
        tokio::fs::write(&staging, contents)
            .await
            .with_context(|| format!("writing {}", staging.display()))?;
        tokio::fs::rename(&staging, &path)
            .await
            .with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }
}

/// In-memory storage for tests.
#[derive(Default)]
pub struct MemoryStorage {
    documents: Mutex<HashMap<String, String>>,
    reads: Mutex<HashMap<String, usize>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-load a document.
    pub async fn insert(&self, name: &str, contents: &str) {
        self.documents
            .lock()
            .await
            .insert(name.to_string(), contents.to_string());
    }

    /// Current contents of a document, if any.
    pub async fn document(&self, name: &str) -> Option<String> {
        self.documents.lock().await.get(name).cloned()
    }

    /// How many times a document has been read. Lets tests assert that the
    /// history file is loaded exactly once.
    pub async fn read_count(&self, name: &str) -> usize {
        self.reads.lock().await.get(name).copied().unwrap_or(0)
    }
}

#[async_trait]
impl HistoryStorage for MemoryStorage {
    async fn read(&self, name: &str) -> anyhow::Result<Option<String>> {
        *self.reads.lock().await.entry(name.to_string()).or_insert(0) += 1;
        Ok(self.documents.lock().await.get(name).cloned())
    }

    async fn write(&self, name: &str, contents: &str) -> anyhow::Result<()> {
        self.documents
            .lock()
            .await
            .insert(name.to_string(), contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_round_trips() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read("missing.json").await.unwrap(), None);

        storage.write("doc.json", "{}").await.unwrap();
        assert_eq!(storage.read("doc.json").await.unwrap().as_deref(), Some("{}"));
        assert_eq!(storage.read_count("doc.json").await, 1);
        assert_eq!(storage.read_count("missing.json").await, 1);
    }

    #[tokio::test]
    async fn test_file_storage_missing_file_is_no_data() {
        let storage = FileStorage::new(std::env::temp_dir().join("mahjong-competition-none"));
        assert_eq!(storage.read("absent.json").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_storage_replaces_wholesale() {
        let dir = std::env::temp_dir().join(format!(
            "mahjong-competition-{}-{}",
            std::process::id(),
            chrono::Utc::now().timestamp_micros()
        ));
        let storage = FileStorage::new(&dir);

        storage.write("doc.json", "first").await.unwrap();
        storage.write("doc.json", "second").await.unwrap();
        assert_eq!(
            storage.read("doc.json").await.unwrap().as_deref(),
            Some("second")
        );

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
