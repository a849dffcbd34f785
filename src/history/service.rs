//! History service: owned cache over the persisted competition documents.
//!
//! Replaces a module-level global with an explicit service object. The
//! history list is loaded from storage at most once per service lifetime;
//! the mutex both serializes concurrent first accesses and makes the cache
//! population atomic for callers. All I/O goes through the injected
//! [`HistoryStorage`], so callers never block on the filesystem themselves.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::{codec, config::HistoryConfig, storage::HistoryStorage};
use crate::competition::Competition;

/// Competition history and current-competition persistence.
pub struct HistoryService {
    storage: Arc<dyn HistoryStorage>,
    config: HistoryConfig,
    /// `None` until the first access; populated exactly once.
    cache: Mutex<Option<Vec<Competition>>>,
}

impl HistoryService {
    /// Create a service over the given storage collaborator.
    pub fn new(storage: Arc<dyn HistoryStorage>, config: HistoryConfig) -> Self {
        Self {
            storage,
            config,
            cache: Mutex::new(None),
        }
    }

    /// The competition history, newest first.
    ///
    /// The backing document is read on the first call only; later calls are
    /// served from the cache.
    pub async fn history(&self) -> Vec<Competition> {
        let mut cache = self.cache.lock().await;
        self.ensure_loaded(&mut cache).await;
        cache.as_ref().map(Vec::clone).unwrap_or_default()
    }

    /// Insert or replace a competition in the history (keyed by its start
    /// time) and rewrite the history document.
    ///
    /// The cache is updated even if the write fails, so the in-memory view
    /// stays consistent with what the caller recorded; the error reports
    /// the durability gap.
    pub async fn record(&self, competition: Competition) -> anyhow::Result<()> {
        let mut cache = self.cache.lock().await;
        self.ensure_loaded(&mut cache).await;
        let history = cache.get_or_insert_with(Vec::new);
        codec::upsert(history, competition);

        let document = codec::encode_history(history)?;
        self.storage
            .write(&self.config.history_file, &document)
            .await?;
        log::debug!("Recorded competition history ({} entries)", history.len());
        Ok(())
    }

    /// Load the persisted current competition, if a usable document exists.
    pub async fn load_current(&self) -> Option<Competition> {
        match self.storage.read(&self.config.competition_file).await {
            Ok(Some(document)) => codec::decode_competition(&document),
            Ok(None) => None,
            Err(err) => {
                log::warn!("Failed to read current competition: {err:#}");
                None
            }
        }
    }

    /// Persist the current competition document.
    pub async fn save_current(&self, competition: &Competition) -> anyhow::Result<()> {
        let document = codec::encode_competition(competition)?;
        self.storage
            .write(&self.config.competition_file, &document)
            .await
    }

    async fn ensure_loaded(&self, cache: &mut Option<Vec<Competition>>) {
        if cache.is_some() {
            return;
        }
        let history = match self.storage.read(&self.config.history_file).await {
            Ok(Some(document)) => codec::decode_history(&document),
            Ok(None) => Vec::new(),
            Err(err) => {
                // Treated as "no data": the cache still populates so the
                // file is not re-read on every access.
                log::warn!("Failed to read competition history: {err:#}");
                Vec::new()
            }
        };
        log::info!("Loaded competition history ({} entries)", history.len());
        *cache = Some(history);
    }
}
