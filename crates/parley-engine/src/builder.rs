use std::sync::Arc;

use parley_config::network::ProviderConfig;
use parley_translator::{
    GlossaryTranslator, GoogleTranslator, LibreTranslator, MyMemoryTranslator,
    PhraseBookTranslator, ProviderChain, TranslateError, http_client,
};

/// Glossary (when configured), Google, LibreTranslate, MyMemory, then the
/// offline phrase book. Disabled remote providers are left out.
pub fn provider_chain(config: &ProviderConfig) -> Result<ProviderChain, TranslateError> {
    let client = http_client(config.timeout())?;
    let mut chain = ProviderChain::new();

    if let Some(path) = &config.glossary_path {
        match GlossaryTranslator::load(path) {
            Ok(glossary) => chain.push(Arc::new(glossary)),
            Err(e) => tracing::warn!("Glossary disabled: {e}"),
        }
    }

    if config.google_enabled {
        chain.push(Arc::new(GoogleTranslator::new(
            client.clone(),
            config.google_url.clone(),
        )));
    }

    if config.libre_enabled {
        chain.push(Arc::new(LibreTranslator::new(
            client.clone(),
            config.libre_url.clone(),
            config.libre_api_key.clone(),
        )));
    }

    if config.mymemory_enabled {
        chain.push(Arc::new(MyMemoryTranslator::new(
            client,
            config.mymemory_url.clone(),
            config.mymemory_email.clone(),
        )));
    }

    chain.push(Arc::new(PhraseBookTranslator::default()));

    tracing::info!("Provider chain: {}", chain.names().join(" -> "));
    Ok(chain)
}
