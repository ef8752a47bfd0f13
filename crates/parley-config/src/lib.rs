use std::env;

use serde::{Deserialize, Serialize};

use self::network::ProviderConfig;
use self::storage::StorageConfig;

pub mod network;
pub mod storage;
pub mod translator;

pub use translator::{DisplayMode, SettingsPatch, TranslationSettings};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub providers: ProviderConfig,
    pub storage: StorageConfig,

    /// Source language assumed when detection is inconclusive
    pub default_source_language: String,
    /// How many recent messages the host re-submits after a language change
    pub visible_window: usize,
}

impl Config {
    pub fn new() -> Self {
        let default_source_language = env::var("PARLEY_DEFAULT_SOURCE_LANG")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "en".to_string());

        let visible_window = env::var("PARLEY_VISIBLE_WINDOW")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(50);

        Config {
            providers: ProviderConfig::new(),
            storage: StorageConfig::new(),

            default_source_language,
            visible_window,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
