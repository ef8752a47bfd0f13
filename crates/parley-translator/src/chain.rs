use std::sync::Arc;

use parley_core::preprocess::{DefaultPreprocessor, Preprocessor};

use crate::{TranslateError, Translation, Translator};

/// What happened when one provider was asked
#[derive(Debug)]
pub struct ProviderAttempt {
    pub provider: String,
    /// `None` when this provider produced the accepted translation
    pub error: Option<TranslateError>,
}

#[derive(Debug, Default)]
pub struct ChainOutcome {
    pub translation: Option<Translation>,
    /// One record per provider asked, in order
    pub attempts: Vec<ProviderAttempt>,
}

impl ChainOutcome {
    pub fn text(&self) -> Option<&str> {
        self.translation.as_ref().map(|t| t.text.as_str())
    }

    pub fn is_exhausted(&self) -> bool {
        self.translation.is_none()
    }
}

/// Providers tried in priority order until one yields a usable translation
#[derive(Clone, Default)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn Translator>>,
}

impl ProviderChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: Arc<dyn Translator>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn push(&mut self, provider: Arc<dyn Translator>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.metadata().name).collect()
    }

    /// Walk the chain. Failures are recorded and absorbed; the walk stops at
    /// the first non-empty result that differs from `text`.
    pub async fn run(&self, text: &str, from: &str, to: &str) -> ChainOutcome {
        let mut outcome = ChainOutcome::default();

        for provider in &self.providers {
            let name = provider.metadata().name;

            let result = provider
                .translate(text, from, to)
                .await
                .and_then(|translation| accept(text, translation));

            match result {
                Ok(translation) => {
                    tracing::info!("{name} translated {from} -> {to}");
                    outcome.attempts.push(ProviderAttempt {
                        provider: name,
                        error: None,
                    });
                    outcome.translation = Some(translation);
                    return outcome;
                }
                Err(e) => {
                    if e.is_decline() {
                        tracing::debug!("{name} declined: {e}");
                    } else {
                        tracing::warn!("{name} failed: {e}");
                    }
                    outcome.attempts.push(ProviderAttempt {
                        provider: name,
                        error: Some(e),
                    });
                }
            }
        }

        tracing::debug!("All {} providers declined {from} -> {to}", self.providers.len());
        outcome
    }
}

/// Reject blank output, echoes of the input and bracket-tagged fallbacks
/// such as `[ERROR] ...` or `[EN] ...`
fn accept(original: &str, mut translation: Translation) -> Result<Translation, TranslateError> {
    let text = translation.text.trim();

    if text.is_empty() {
        return Err(TranslateError::EmptyResponse);
    }

    if DefaultPreprocessor.fold(text) == DefaultPreprocessor.fold(original) {
        return Err(TranslateError::Rejected("same as original".to_string()));
    }

    if is_tagged_fallback(text) {
        return Err(TranslateError::Rejected(format!("tagged fallback {text:?}")));
    }

    translation.text = text.to_string();
    Ok(translation)
}

fn is_tagged_fallback(text: &str) -> bool {
    let Some(rest) = text.strip_prefix('[') else {
        return false;
    };

    rest.split_once(']').is_some_and(|(tag, _)| {
        !tag.is_empty() && tag.chars().all(|c| c.is_ascii_uppercase() || c == '_' || c == '-')
    })
}
