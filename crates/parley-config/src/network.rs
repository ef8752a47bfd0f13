use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

const GOOGLE_URL: &str = "https://translate.googleapis.com/translate_a/single";
const LIBRE_URL: &str = "https://libretranslate.com/translate";
const MYMEMORY_URL: &str = "https://api.mymemory.translated.net/get";

/// Endpoints and limits for the remote translation providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Per-request timeout applied to every adapter
    pub timeout_ms: u64,

    pub google_enabled: bool,
    pub google_url: String,

    pub libre_enabled: bool,
    pub libre_url: String,
    pub libre_api_key: Option<String>,

    pub mymemory_enabled: bool,
    pub mymemory_url: String,
    /// Raises the MyMemory anonymous daily quota when set
    pub mymemory_email: Option<String>,

    /// Optional JSON glossary consulted before any remote provider
    pub glossary_path: Option<String>,
}

impl ProviderConfig {
    pub fn new() -> Self {
        let timeout_ms = env::var("PARLEY_PROVIDER_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8000); // 8 seconds default

        Self {
            timeout_ms,

            google_enabled: flag("PARLEY_GOOGLE_ENABLED"),
            google_url: env::var("PARLEY_GOOGLE_URL").unwrap_or_else(|_| GOOGLE_URL.to_string()),

            libre_enabled: flag("PARLEY_LIBRE_ENABLED"),
            libre_url: env::var("PARLEY_LIBRE_URL").unwrap_or_else(|_| LIBRE_URL.to_string()),
            libre_api_key: non_empty("PARLEY_LIBRE_API_KEY"),

            mymemory_enabled: flag("PARLEY_MYMEMORY_ENABLED"),
            mymemory_url: env::var("PARLEY_MYMEMORY_URL")
                .unwrap_or_else(|_| MYMEMORY_URL.to_string()),
            mymemory_email: non_empty("PARLEY_MYMEMORY_EMAIL"),

            glossary_path: non_empty("PARLEY_GLOSSARY_PATH"),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Providers are on unless explicitly switched off
fn flag(name: &str) -> bool {
    env::var(name)
        .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "off" | "no"))
        .unwrap_or(true)
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
