use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::{ProviderMetadata, TranslateError, Translation, Translator, check_status};

/// MyMemory `/get` endpoint, keyed by a `source|target` pair
#[derive(Clone)]
pub struct MyMemoryTranslator {
    client: reqwest::Client,
    api_url: String,
    email: Option<String>,
}

impl MyMemoryTranslator {
    pub fn new(client: reqwest::Client, api_url: String, email: Option<String>) -> Self {
        Self {
            client,
            api_url,
            email,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    response_data: Option<ResponseData>,
    /// Sent as a number on success and sometimes as a string on failure
    #[serde(default)]
    response_status: Value,
    response_details: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    translated_text: Option<String>,
}

#[async_trait]
impl Translator for MyMemoryTranslator {
    async fn translate(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<Translation, TranslateError> {
        if from == to {
            return Err(TranslateError::UnsupportedLanguagePair {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let langpair = format!("{from}|{to}");
        let mut params = vec![("q", text), ("langpair", langpair.as_str())];
        if let Some(email) = &self.email {
            params.push(("de", email.as_str()));
        }

        let response = self.client.get(&self.api_url).query(&params).send().await?;
        let response = check_status(response)?;

        let body: MyMemoryResponse = response.json().await.map_err(|e| {
            TranslateError::MalformedResponse(format!("Failed to parse response: {}", e))
        })?;

        Ok(Translation {
            text: into_text(body)?,
            from: from.to_string(),
            to: to.to_string(),
            provider: "mymemory".to_string(),
            detected_source: None,
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "mymemory".to_string(),
            requires_network: true,
            requires_api_key: false,
        }
    }
}

fn status_code(status: &Value) -> Option<u64> {
    match status {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn into_text(body: MyMemoryResponse) -> Result<String, TranslateError> {
    match status_code(&body.response_status) {
        Some(200) => {}
        Some(429) => return Err(TranslateError::RateLimitExceeded),
        code => {
            return Err(TranslateError::ApiError(format!(
                "status {}: {}",
                code.map_or_else(|| body.response_status.to_string(), |c| c.to_string()),
                body.response_details.unwrap_or_default()
            )));
        }
    }

    let translated = body
        .response_data
        .and_then(|data| data.translated_text)
        .filter(|t| !t.trim().is_empty())
        .ok_or(TranslateError::EmptyResponse)?;

    // quota notices arrive as a 200 with the warning in place of the text
    if translated.starts_with("MYMEMORY WARNING") {
        return Err(TranslateError::RateLimitExceeded);
    }

    Ok(translated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<String, TranslateError> {
        into_text(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_success_body() {
        let text = parse(
            r#"{"responseData":{"translatedText":"bonjour","match":1},"responseStatus":200,"responseDetails":""}"#,
        )
        .unwrap();

        assert_eq!(text, "bonjour");
    }

    #[test]
    fn test_string_status_failure() {
        let result = parse(
            r#"{"responseData":{"translatedText":"INVALID LANGUAGE PAIR"},"responseStatus":"403","responseDetails":"INVALID LANGUAGE PAIR"}"#,
        );

        assert!(matches!(result, Err(TranslateError::ApiError(msg)) if msg.contains("403")));
    }

    #[test]
    fn test_quota_warning() {
        let result = parse(
            r#"{"responseData":{"translatedText":"MYMEMORY WARNING: YOU USED ALL AVAILABLE FREE TRANSLATIONS FOR TODAY"},"responseStatus":200}"#,
        );

        assert!(matches!(result, Err(TranslateError::RateLimitExceeded)));
    }

    #[test]
    fn test_missing_data_is_empty() {
        assert!(matches!(
            parse(r#"{"responseData":null,"responseStatus":200}"#),
            Err(TranslateError::EmptyResponse)
        ));
    }
}
