use std::fmt;

use serde::{Deserialize, Serialize};

/// ISO 639-1 style language code ("en", "es", ...)
pub type LanguageCode = String;

/// Detector result when no supported language scored
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Stable chat message identifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MessageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Chat message as delivered by the chat layer.
///
/// Different surfaces put the body under `text`, `content` or `message`;
/// [`Message::body`] picks the first non-blank one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "senderRole", default, skip_serializing_if = "Option::is_none")]
    pub sender_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    /// Sent by the local user
    #[serde(default)]
    pub outgoing: bool,
}

impl Message {
    /// Plain chat message with a `text` body
    pub fn chat(id: impl Into<MessageId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn outgoing(mut self) -> Self {
        self.outgoing = true;
        self
    }

    /// First non-blank text-bearing field
    pub fn body(&self) -> Option<&str> {
        [&self.text, &self.content, &self.message]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|body| !body.trim().is_empty())
    }

    pub fn is_system(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|kind| kind.eq_ignore_ascii_case("system"))
    }

    /// `gift`, `gift_sent`, `gift-combo`, ...
    pub fn is_gift_event(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|kind| kind.to_ascii_lowercase().starts_with("gift"))
    }
}

/// Stored outcome of one translation attempt.
///
/// `translated_text == None` records a confirmed negative result, which is
/// different from the entry being absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub original_text: String,
    pub translated_text: Option<String>,
    pub detected_language: LanguageCode,
    pub target_language: LanguageCode,
    /// Milliseconds since the unix epoch
    pub timestamp: u64,
}

impl CacheEntry {
    pub fn is_negative(&self) -> bool {
        self.translated_text.is_none()
    }
}
