use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use parley_config::SettingsPatch;
use parley_core::{MemoryStorage, SettingsStore, Storage, TranslationCache};
use parley_translator::{
    ProviderChain, ProviderMetadata, TranslateError, Translation, Translator,
};
use tokio::sync::Notify;

use crate::TranslationOrchestrator;

/// Provider with a fixed reply that records how it was called
pub struct Scripted {
    name: &'static str,
    reply: Option<&'static str>,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
    last_from: Mutex<Option<String>>,
    last_to: Mutex<Option<String>>,
}

impl Scripted {
    pub fn replying(name: &'static str, reply: &'static str) -> Arc<Self> {
        Self::build(name, Some(reply), None)
    }

    pub fn failing(name: &'static str) -> Arc<Self> {
        Self::build(name, None, None)
    }

    /// Holds its first reply until `gate` is notified; later calls answer
    /// straight away
    pub fn gated(name: &'static str, reply: &'static str, gate: Arc<Notify>) -> Arc<Self> {
        Self::build(name, Some(reply), Some(gate))
    }

    fn build(
        name: &'static str,
        reply: Option<&'static str>,
        gate: Option<Arc<Notify>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            name,
            reply,
            gate,
            calls: AtomicUsize::new(0),
            last_from: Mutex::new(None),
            last_to: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_from(&self) -> Option<String> {
        self.last_from.lock().unwrap().clone()
    }

    pub fn last_to(&self) -> Option<String> {
        self.last_to.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for Scripted {
    async fn translate(
        &self,
        _text: &str,
        from: &str,
        to: &str,
    ) -> Result<Translation, TranslateError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_from.lock().unwrap() = Some(from.to_string());
        *self.last_to.lock().unwrap() = Some(to.to_string());

        if let Some(gate) = self.gate.as_ref().filter(|_| call == 0) {
            gate.notified().await;
        }

        let text = self
            .reply
            .ok_or_else(|| TranslateError::ApiError("HTTP 502".to_string()))?;

        Ok(Translation {
            text: text.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            provider: self.name.to_string(),
            detected_source: None,
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: self.name.to_string(),
            requires_network: false,
            requires_api_key: false,
        }
    }
}

pub struct Harness {
    pub orchestrator: Arc<TranslationOrchestrator>,
    pub cache: Arc<TranslationCache>,
    pub settings: Arc<SettingsStore>,
    pub storage: Arc<dyn Storage>,
}

pub fn harness(providers: &[Arc<Scripted>], target: &str) -> Harness {
    harness_with_storage(providers, target, Arc::new(MemoryStorage::new()))
}

pub fn harness_with_storage(
    providers: &[Arc<Scripted>],
    target: &str,
    storage: Arc<dyn Storage>,
) -> Harness {
    let cache = Arc::new(TranslationCache::load(storage.clone()));
    let settings = Arc::new(SettingsStore::load(storage.clone(), cache.clone()));
    settings
        .set(SettingsPatch::target_language(target))
        .unwrap();

    let mut chain = ProviderChain::new();
    for provider in providers {
        chain.push(provider.clone());
    }

    let orchestrator = Arc::new(
        TranslationOrchestrator::new(settings.clone(), cache.clone(), chain)
            .with_default_source("en"),
    );

    Harness {
        orchestrator,
        cache,
        settings,
        storage,
    }
}
