use std::sync::Arc;

use async_trait::async_trait;
use parley_core::PhraseBook;

use crate::{ProviderMetadata, TranslateError, Translation, Translator};

/// Offline [`PhraseBook`] exposed through the provider interface
#[derive(Clone)]
pub struct PhraseBookTranslator {
    book: Arc<PhraseBook>,
}

impl PhraseBookTranslator {
    pub fn new(book: Arc<PhraseBook>) -> Self {
        Self { book }
    }
}

impl Default for PhraseBookTranslator {
    fn default() -> Self {
        Self::new(Arc::new(PhraseBook::with_defaults()))
    }
}

#[async_trait]
impl Translator for PhraseBookTranslator {
    async fn translate(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<Translation, TranslateError> {
        if !self.book.supports(from, to) {
            return Err(TranslateError::UnsupportedLanguagePair {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let translated = self
            .book
            .lookup(text, from, to)
            .ok_or(TranslateError::Declined)?;

        Ok(Translation {
            text: translated,
            from: from.to_string(),
            to: to.to_string(),
            provider: "phrasebook".to_string(),
            detected_source: None,
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "phrasebook".to_string(),
            requires_network: false,
            requires_api_key: false,
        }
    }
}
