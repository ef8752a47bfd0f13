use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use parley_core::preprocess::{DefaultPreprocessor, Preprocessor};

use crate::{ProviderMetadata, TranslateError, Translation, Translator};

/// Room or deployment specific translations, consulted before any remote
/// provider.
///
/// File format: `{"<target>": {"<source text>": "<translation>"}}`. Source
/// text matches case-insensitively, whatever the source language.
#[derive(Clone, Default)]
pub struct GlossaryTranslator {
    entries: HashMap<String, HashMap<String, String>>,
}

impl GlossaryTranslator {
    pub fn new(entries: HashMap<String, HashMap<String, String>>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(target, terms)| {
                let terms = terms
                    .into_iter()
                    .map(|(source, translation)| (DefaultPreprocessor.fold(&source), translation))
                    .collect();
                (target.to_ascii_lowercase(), terms)
            })
            .collect();

        Self { entries }
    }

    pub fn from_json(data: &str) -> Result<Self, TranslateError> {
        let entries: HashMap<String, HashMap<String, String>> = serde_json::from_str(data)
            .map_err(|e| TranslateError::InvalidGlossary(e.to_string()))?;

        Ok(Self::new(entries))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TranslateError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .map_err(|e| TranslateError::InvalidGlossary(format!("{}: {e}", path.display())))?;

        let glossary = Self::from_json(&data)?;
        tracing::info!(
            "Loaded glossary from {} ({} target languages)",
            path.display(),
            glossary.entries.len()
        );

        Ok(glossary)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(HashMap::is_empty)
    }
}

#[async_trait]
impl Translator for GlossaryTranslator {
    async fn translate(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<Translation, TranslateError> {
        let translated = self
            .entries
            .get(to)
            .and_then(|terms| terms.get(&DefaultPreprocessor.fold(text)))
            .ok_or(TranslateError::Declined)?;

        Ok(Translation {
            text: translated.clone(),
            from: from.to_string(),
            to: to.to_string(),
            provider: "glossary".to_string(),
            detected_source: None,
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "glossary".to_string(),
            requires_network: false,
            requires_api_key: false,
        }
    }
}
