use std::collections::VecDeque;
use std::sync::Arc;

use parley_config::Config;
use parley_core::{JsonFileStorage, MemoryStorage, SettingsStore, Storage, TranslationCache};
use parley_engine::{TranslationOrchestrator, provider_chain};
use parley_types::Message;
use tokio::sync::RwLock;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub orchestrator: Arc<TranslationOrchestrator>,
    /// Most recent incoming messages, re-submitted after a language change
    pub visible: RwLock<VecDeque<Message>>,
}

impl AppState {
    pub fn new(config: Config, in_memory: bool) -> anyhow::Result<Self> {
        let storage: Arc<dyn Storage> = if in_memory {
            Arc::new(MemoryStorage::new())
        } else {
            tracing::info!("Using data dir {}", config.storage.data_dir.display());
            Arc::new(JsonFileStorage::new(config.storage.data_dir.clone()))
        };

        let cache = Arc::new(TranslationCache::load(storage.clone()));
        let settings = Arc::new(SettingsStore::load(storage, cache.clone()));
        let chain = provider_chain(&config.providers)?;

        let orchestrator = TranslationOrchestrator::new(settings, cache, chain)
            .with_default_source(config.default_source_language.clone());

        Ok(Self::with_orchestrator(config, Arc::new(orchestrator)))
    }

    pub fn with_orchestrator(config: Config, orchestrator: Arc<TranslationOrchestrator>) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            orchestrator,
            visible: RwLock::new(VecDeque::new()),
        }
    }

    /// Remember `message`, evicting the oldest beyond `window`
    pub async fn remember(&self, message: Message, window: usize) {
        let mut visible = self.visible.write().await;
        visible.retain(|m| m.id != message.id);
        visible.push_back(message);
        while visible.len() > window {
            visible.pop_front();
        }
    }

    pub async fn visible_snapshot(&self) -> Vec<Message> {
        self.visible.read().await.iter().cloned().collect()
    }
}
