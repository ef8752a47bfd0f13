use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use parley_types::CacheEntry;

use crate::error::StorageError;
use crate::preprocess::cache_key;
use crate::storage::Storage;

pub const CACHE_STORAGE_KEY: &str = "translation_cache";

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// Bumped by every invalidation
    epoch: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub negative: usize,
}

/// Write-through store of translation outcomes, negative ones included.
///
/// Every mutation rewrites the whole map under [`CACHE_STORAGE_KEY`].
/// Invalidation is all-or-nothing; entries never expire on their own.
pub struct TranslationCache {
    state: RwLock<CacheState>,
    storage: Arc<dyn Storage>,
}

impl TranslationCache {
    /// Rehydrate from `storage`. Unreadable data starts an empty cache.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let entries = match storage.get(CACHE_STORAGE_KEY) {
            Ok(Some(data)) => match serde_json::from_str::<HashMap<String, CacheEntry>>(&data) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Discarding unreadable translation cache: {e}");
                    HashMap::new()
                }
            },
            Ok(None) => HashMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read translation cache: {e}");
                HashMap::new()
            }
        };

        tracing::debug!("Translation cache loaded with {} entries", entries.len());

        Self {
            state: RwLock::new(CacheState { entries, epoch: 0 }),
            storage,
        }
    }

    pub fn get(&self, text: &str, target_language: &str) -> Option<CacheEntry> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.entries.get(&cache_key(text, target_language)).cloned()
    }

    /// Insert or replace the entry for its text and target language
    pub fn put(&self, entry: CacheEntry) -> Result<(), StorageError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        self.insert_locked(&mut state, entry)
    }

    /// Like [`put`](Self::put), but drops the write when an invalidation
    /// happened after `epoch` was read. Returns whether the entry was stored.
    pub fn put_if_current(&self, entry: CacheEntry, epoch: u64) -> Result<bool, StorageError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.epoch != epoch {
            tracing::debug!(
                "Dropping stale cache write for {:?} -> {}",
                entry.original_text,
                entry.target_language
            );
            return Ok(false);
        }

        self.insert_locked(&mut state, entry)?;
        Ok(true)
    }

    pub fn epoch(&self) -> u64 {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .epoch
    }

    /// Clear memory and durable state
    pub fn invalidate_all(&self) -> Result<(), StorageError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let dropped = state.entries.len();
        state.entries.clear();
        state.epoch += 1;

        tracing::info!("Translation cache invalidated ({dropped} entries)");
        self.storage.remove(CACHE_STORAGE_KEY)
    }

    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        CacheStats {
            entries: state.entries.len(),
            negative: state.entries.values().filter(|e| e.is_negative()).count(),
        }
    }

    fn insert_locked(&self, state: &mut CacheState, entry: CacheEntry) -> Result<(), StorageError> {
        let key = cache_key(&entry.original_text, &entry.target_language);
        state.entries.insert(key, entry);

        let data = serde_json::to_string(&state.entries)?;
        self.storage.set(CACHE_STORAGE_KEY, &data)
    }
}

/// Milliseconds since the unix epoch
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
