use async_trait::async_trait;
use serde_json::Value;

use crate::{ProviderMetadata, TranslateError, Translation, Translator, check_status};

/// Google's keyless `translate_a/single` endpoint (`client=gtx`)
#[derive(Clone)]
pub struct GoogleTranslator {
    client: reqwest::Client,
    api_url: String,
}

impl GoogleTranslator {
    pub fn new(client: reqwest::Client, api_url: String) -> Self {
        Self { client, api_url }
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<Translation, TranslateError> {
        let params = [
            ("client", "gtx"),
            ("sl", "auto"),
            ("tl", to),
            ("dt", "t"),
            ("q", text),
        ];

        let response = self.client.get(&self.api_url).query(&params).send().await?;
        let response = check_status(response)?;

        let json: Value = response.json().await.map_err(|e| {
            TranslateError::MalformedResponse(format!("Failed to parse response: {}", e))
        })?;

        let translated = parse_segments(&json)?;
        let detected_source = json.get(2).and_then(Value::as_str).map(str::to_string);

        Ok(Translation {
            text: translated,
            from: from.to_string(),
            to: to.to_string(),
            provider: "google".to_string(),
            detected_source,
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "google".to_string(),
            requires_network: true,
            requires_api_key: false,
        }
    }
}

/// `[[["Hello ", "Hola ", ...], ["world", "mundo", ...]], null, "es", ...]`
///
/// Concatenates the first element of every segment in the first array.
fn parse_segments(json: &Value) -> Result<String, TranslateError> {
    let segments = json
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::MalformedResponse("expected nested segment array".into()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.trim().is_empty() {
        return Err(TranslateError::EmptyResponse);
    }

    Ok(translated)
}
