use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{ProviderMetadata, TranslateError, Translation, Translator, check_status};

/// LibreTranslate `/translate` endpoint
#[derive(Clone)]
pub struct LibreTranslator {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl LibreTranslator {
    pub fn new(client: reqwest::Client, api_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            api_url,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct LibreRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LibreResponse {
    translated_text: Option<String>,
    detected_language: Option<DetectedLanguage>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct DetectedLanguage {
    language: String,
}

#[async_trait]
impl Translator for LibreTranslator {
    async fn translate(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<Translation, TranslateError> {
        let request = LibreRequest {
            q: text,
            source: "auto",
            target: to,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self.client.post(&self.api_url).json(&request).send().await?;
        let response = check_status(response)?;

        let body: LibreResponse = response.json().await.map_err(|e| {
            TranslateError::MalformedResponse(format!("Failed to parse response: {}", e))
        })?;

        let (translated, detected_source) = into_translation(body)?;

        Ok(Translation {
            text: translated,
            from: from.to_string(),
            to: to.to_string(),
            provider: "libretranslate".to_string(),
            detected_source,
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "libretranslate".to_string(),
            requires_network: true,
            requires_api_key: self.api_key.is_some(),
        }
    }
}

fn into_translation(body: LibreResponse) -> Result<(String, Option<String>), TranslateError> {
    if let Some(error) = body.error {
        return Err(TranslateError::ApiError(error));
    }

    let translated = body
        .translated_text
        .filter(|t| !t.trim().is_empty())
        .ok_or(TranslateError::EmptyResponse)?;

    Ok((translated, body.detected_language.map(|d| d.language)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<(String, Option<String>), TranslateError> {
        into_translation(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_request_shape() {
        let request = LibreRequest {
            q: "hola",
            source: "auto",
            target: "en",
            format: "text",
            api_key: None,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"q": "hola", "source": "auto", "target": "en", "format": "text"})
        );
    }

    #[test]
    fn test_extracts_translated_text() {
        let (text, detected) =
            parse(r#"{"translatedText":"hello","detectedLanguage":{"confidence":90,"language":"es"}}"#)
                .unwrap();

        assert_eq!(text, "hello");
        assert_eq!(detected.as_deref(), Some("es"));
    }

    #[test]
    fn test_error_body() {
        assert!(matches!(
            parse(r#"{"error":"Invalid API key"}"#),
            Err(TranslateError::ApiError(msg)) if msg == "Invalid API key"
        ));
    }

    #[test]
    fn test_blank_translation_is_empty() {
        assert!(matches!(
            parse(r#"{"translatedText":"  "}"#),
            Err(TranslateError::EmptyResponse)
        ));
    }
}
