use std::sync::Arc;

use futures_util::future::join_all;
use parley_config::{SettingsPatch, TranslationSettings};
use parley_core::cache::now_millis;
use parley_core::{
    CacheStats, ConcurrencyGuard, LanguageDetector, SettingsChange, SettingsError, SettingsStore,
    StorageError, TranslationCache,
};
use parley_translator::ProviderChain;
use parley_types::{CacheEntry, LanguageCode, Message, MessageId, UNKNOWN_LANGUAGE};

use crate::policy::eligible_text;

/// Result of one guarded translation pass
enum Attempt {
    Settled(Option<String>),
    /// The cache was invalidated mid-pass; nothing was stored
    Stale,
}

/// Decides whether a message needs translating and produces the text to
/// display under it.
///
/// Owns the in-flight set and drives the cache; callers only see
/// `Option<String>`, with `None` meaning "show the original only".
pub struct TranslationOrchestrator {
    settings: Arc<SettingsStore>,
    cache: Arc<TranslationCache>,
    guard: ConcurrencyGuard,
    detector: LanguageDetector,
    chain: ProviderChain,
    /// Assumed when the detector comes back with "unknown"
    default_source: LanguageCode,
}

impl TranslationOrchestrator {
    pub fn new(
        settings: Arc<SettingsStore>,
        cache: Arc<TranslationCache>,
        chain: ProviderChain,
    ) -> Self {
        Self {
            settings,
            cache,
            guard: ConcurrencyGuard::new(),
            detector: LanguageDetector::new(),
            chain,
            default_source: "en".to_string(),
        }
    }

    pub fn with_default_source(mut self, language: impl Into<LanguageCode>) -> Self {
        self.default_source = language.into();
        self
    }

    /// Translation to display for `message`, if any
    pub async fn translate(&self, message: &Message) -> Option<String> {
        self.translate_with(&message.id, |settings| {
            eligible_text(message, settings)
                .inspect_err(|reason| {
                    tracing::trace!("message {} skipped: {:?}", message.id, reason)
                })
                .ok()
        })
        .await
    }

    /// Translate bare text under the current settings, keyed by `id` for
    /// in-flight deduplication. Only the enabled flag applies.
    pub async fn translate_text(&self, id: &MessageId, text: &str) -> Option<String> {
        self.translate_with(id, |settings| {
            (settings.enabled && !text.trim().is_empty()).then_some(text)
        })
        .await
    }

    /// Translate several messages concurrently, preserving input order
    pub async fn translate_all(&self, messages: &[Message]) -> Vec<(MessageId, Option<String>)> {
        join_all(messages.iter().map(|message| async move {
            (message.id.clone(), self.translate(message).await)
        }))
        .await
    }

    /// Shared path for messages and bare text. `eligible` picks the text to
    /// translate under the given settings.
    ///
    /// The in-flight mark is held until an outcome is stored under settings
    /// that are still current, so a result computed for a target that was
    /// switched away from is never handed back.
    async fn translate_with<'a, F>(&self, id: &MessageId, eligible: F) -> Option<String>
    where
        F: Fn(&TranslationSettings) -> Option<&'a str>,
    {
        // read before settings so an invalidation in between is noticed
        let mut epoch = self.cache.epoch();
        let mut settings = self.settings.get();
        let mut text = eligible(&settings)?;

        if let Some(entry) = self.lookup(id, text, &settings) {
            return entry.translated_text;
        }

        let Some(_in_flight) = self.guard.acquire(id) else {
            tracing::debug!("message {id} already in flight");
            return None;
        };

        loop {
            match self.attempt(id, text, &settings, epoch).await {
                Attempt::Settled(translated) => return translated,
                Attempt::Stale => {
                    tracing::debug!("settings changed while translating {id}, retrying");
                    epoch = self.cache.epoch();
                    settings = self.settings.get();
                    text = eligible(&settings)?;
                }
            }
        }
    }

    fn lookup(
        &self,
        id: &MessageId,
        text: &str,
        settings: &TranslationSettings,
    ) -> Option<CacheEntry> {
        let target = settings.target_language.as_str();
        let entry = self.cache.get(text, target)?;
        tracing::debug!("cache hit for message {id} ({target})");
        Some(entry)
    }

    /// One pass under `settings`. Must run with `id` held.
    async fn attempt(
        &self,
        id: &MessageId,
        text: &str,
        settings: &TranslationSettings,
        epoch: u64,
    ) -> Attempt {
        // another holder may have finished between the first lookup and acquire
        if let Some(entry) = self.lookup(id, text, settings) {
            return Attempt::Settled(entry.translated_text);
        }

        let target = settings.target_language.as_str();
        let detected = self.detector.detect(text);

        if detected == target {
            tracing::debug!("message {id} already in {target}");
            return self.store(text, None, detected, target, epoch);
        }

        let source = if detected == UNKNOWN_LANGUAGE {
            self.default_source.as_str()
        } else {
            detected.as_str()
        };

        let outcome = self.chain.run(text, source, target).await;
        let translated = outcome.translation.map(|t| t.text);

        if translated.is_none() {
            tracing::info!(
                "no translation for message {id} after {} providers",
                outcome.attempts.len()
            );
        }

        self.store(text, translated, detected, target, epoch)
    }

    fn store(
        &self,
        text: &str,
        translated: Option<String>,
        detected: LanguageCode,
        target: &str,
        epoch: u64,
    ) -> Attempt {
        let entry = CacheEntry {
            original_text: text.to_string(),
            translated_text: translated.clone(),
            detected_language: detected,
            target_language: target.to_string(),
            timestamp: now_millis(),
        };

        match self.cache.put_if_current(entry, epoch) {
            Ok(true) => Attempt::Settled(translated),
            Ok(false) => Attempt::Stale,
            Err(e) => {
                // the in-memory entry is in place; only persistence failed
                tracing::warn!("Failed to persist translation cache: {e}");
                Attempt::Settled(translated)
            }
        }
    }

    /// Text the UI shows for `message` given its translation
    pub fn render(&self, message: &Message, translation: Option<&str>) -> String {
        let original = message.body().unwrap_or_default();
        self.settings.get().display_mode().render(original, translation)
    }

    pub fn settings(&self) -> TranslationSettings {
        self.settings.get()
    }

    pub fn update_settings(
        &self,
        patch: SettingsPatch,
    ) -> Result<Option<SettingsChange>, SettingsError> {
        self.settings.set(patch)
    }

    pub fn subscribe(&self) -> kanal::AsyncReceiver<SettingsChange> {
        self.settings.subscribe()
    }

    /// Forget every outcome, negative ones included
    pub fn clear_cache(&self) -> Result<(), StorageError> {
        self.cache.invalidate_all()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn in_flight(&self) -> usize {
        self.guard.len()
    }

    pub fn detect_language(&self, text: &str) -> LanguageCode {
        self.detector.detect(text)
    }
}
