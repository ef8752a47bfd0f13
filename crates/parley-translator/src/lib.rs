use std::time::Duration;

pub use parley_types::LanguageCode;

mod chain;
mod glossary;
mod google;
mod libre;
mod mymemory;
mod phrasebook;

pub use chain::{ChainOutcome, ProviderAttempt, ProviderChain};
pub use glossary::GlossaryTranslator;
pub use google::GoogleTranslator;
pub use libre::LibreTranslator;
pub use mymemory::MyMemoryTranslator;
pub use phrasebook::PhraseBookTranslator;

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate text from source to target language
    async fn translate(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<Translation, TranslateError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub from: LanguageCode,
    pub to: LanguageCode,
    pub provider: String,
    /// Source language as reported by the provider, when it reports one
    pub detected_source: Option<LanguageCode>,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub requires_network: bool,
    pub requires_api_key: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Empty translation")]
    EmptyResponse,

    #[error("Unusable translation: {0}")]
    Rejected(String),

    #[error("No entry for this text")]
    Declined,

    #[error("Unsupported language pair: {from} -> {to}")]
    UnsupportedLanguagePair { from: String, to: String },

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,

    #[error("Invalid glossary: {0}")]
    InvalidGlossary(String),
}

impl TranslateError {
    /// Provider had nothing to offer, as opposed to failing
    pub fn is_decline(&self) -> bool {
        matches!(
            self,
            TranslateError::Declined
                | TranslateError::EmptyResponse
                | TranslateError::Rejected(_)
                | TranslateError::UnsupportedLanguagePair { .. }
        )
    }
}

/// Shared HTTP client for the remote adapters
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, TranslateError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("parley/", env!("CARGO_PKG_VERSION")))
        .build()?;

    Ok(client)
}

/// Map HTTP failure statuses onto [`TranslateError`]
pub(crate) fn check_status(response: reqwest::Response) -> Result<reqwest::Response, TranslateError> {
    let status = response.status();

    if status == 429 {
        return Err(TranslateError::RateLimitExceeded);
    }

    if status == 401 || status == 403 {
        return Err(TranslateError::AuthenticationError);
    }

    if !status.is_success() {
        return Err(TranslateError::ApiError(format!("HTTP {status}")));
    }

    Ok(response)
}
