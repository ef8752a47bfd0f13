use std::sync::{Arc, Mutex, PoisonError, RwLock};

use kanal::{AsyncReceiver, AsyncSender};
use parley_config::{SettingsPatch, TranslationSettings};

use crate::cache::TranslationCache;
use crate::error::{SettingsError, StorageError};
use crate::storage::Storage;

pub const SETTINGS_STORAGE_KEY: &str = "translation_settings";

/// Broadcast to subscribers after a settings update
#[derive(Debug, Clone)]
pub struct SettingsChange {
    pub previous: TranslationSettings,
    pub current: TranslationSettings,
}

impl SettingsChange {
    pub fn language_changed(&self) -> bool {
        self.previous.target_language != self.current.target_language
    }

    /// Visible messages need another pass through the orchestrator
    pub fn requires_retranslation(&self) -> bool {
        self.language_changed() || (!self.previous.enabled && self.current.enabled)
    }
}

/// Process-wide translation settings.
///
/// All writes go through [`set`](Self::set), which persists the new value and,
/// when the target language moves, clears the translation cache before the
/// write lock is released.
pub struct SettingsStore {
    settings: RwLock<TranslationSettings>,
    storage: Arc<dyn Storage>,
    cache: Arc<TranslationCache>,
    subscribers: Mutex<Vec<AsyncSender<SettingsChange>>>,
}

impl SettingsStore {
    /// Read persisted settings, falling back to defaults
    pub fn load(storage: Arc<dyn Storage>, cache: Arc<TranslationCache>) -> Self {
        let settings = match storage.get(SETTINGS_STORAGE_KEY) {
            Ok(Some(data)) => serde_json::from_str(&data).unwrap_or_else(|e| {
                tracing::warn!("Unreadable translation settings, using defaults: {e}");
                TranslationSettings::default()
            }),
            Ok(None) => TranslationSettings::default(),
            Err(e) => {
                tracing::warn!("Failed to read translation settings: {e}");
                TranslationSettings::default()
            }
        };

        Self {
            settings: RwLock::new(settings),
            storage,
            cache,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn get(&self) -> TranslationSettings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply `patch`. Returns the change, or `None` if nothing differed.
    pub fn set(&self, patch: SettingsPatch) -> Result<Option<SettingsChange>, SettingsError> {
        if let Some(target) = &patch.target_language {
            if !is_language_code(target) {
                return Err(SettingsError::InvalidLanguage(target.clone()));
            }
        }

        let change = {
            let mut settings = self.settings.write().unwrap_or_else(PoisonError::into_inner);

            let mut next = settings.clone();
            if !next.apply(&patch) {
                return Ok(None);
            }

            let data = serde_json::to_string(&next).map_err(StorageError::from)?;
            self.storage.set(SETTINGS_STORAGE_KEY, &data)?;

            let change = SettingsChange {
                previous: std::mem::replace(&mut *settings, next),
                current: settings.clone(),
            };

            if change.language_changed() {
                if let Err(e) = self.cache.invalidate_all() {
                    tracing::warn!("Failed to clear persisted translation cache: {e}");
                }
            }

            change
        };

        tracing::info!(
            "Translation settings updated (target: {} -> {}, enabled: {})",
            change.previous.target_language,
            change.current.target_language,
            change.current.enabled
        );

        self.notify(&change);
        Ok(Some(change))
    }

    /// Receive every future [`SettingsChange`]
    pub fn subscribe(&self) -> AsyncReceiver<SettingsChange> {
        let (tx, rx) = kanal::unbounded_async();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    fn notify(&self, change: &SettingsChange) {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        // dropped receivers are pruned here
        subscribers.retain(|tx| tx.try_send(change.clone()).is_ok_and(|sent| sent));
    }
}

fn is_language_code(code: &str) -> bool {
    let code = code.trim();
    (2..=8).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphabetic() || c == '-')
}
