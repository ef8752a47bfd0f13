use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_show_original() -> bool {
    true
}

/// User-facing translation preferences, persisted as a flat JSON object
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct TranslationSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_target_language")]
    pub target_language: String,
    #[serde(default = "default_show_original")]
    pub show_original: bool,
    #[serde(default)]
    pub show_only_translation: bool,
    #[serde(default)]
    pub translate_outgoing: bool,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            target_language: default_target_language(),
            show_original: default_show_original(),
            show_only_translation: false,
            translate_outgoing: false,
        }
    }
}

impl TranslationSettings {
    pub fn display_mode(&self) -> DisplayMode {
        if self.show_only_translation {
            DisplayMode::TranslationOnly
        } else if self.show_original {
            DisplayMode::Both
        } else {
            DisplayMode::TranslationOnly
        }
    }

    /// Apply a patch, returning whether anything changed
    pub fn apply(&mut self, patch: &SettingsPatch) -> bool {
        let before = self.clone();

        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(target) = &patch.target_language {
            self.target_language = target.trim().to_ascii_lowercase();
        }
        if let Some(show_original) = patch.show_original {
            self.show_original = show_original;
        }
        if let Some(show_only) = patch.show_only_translation {
            self.show_only_translation = show_only;
        }
        if let Some(outgoing) = patch.translate_outgoing {
            self.translate_outgoing = outgoing;
        }

        *self != before
    }
}

/// Partial update for [`TranslationSettings`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub enabled: Option<bool>,
    pub target_language: Option<String>,
    pub show_original: Option<bool>,
    pub show_only_translation: Option<bool>,
    pub translate_outgoing: Option<bool>,
}

impl SettingsPatch {
    pub fn target_language(lang: impl Into<String>) -> Self {
        Self {
            target_language: Some(lang.into()),
            ..Default::default()
        }
    }
}

/// How a translated message is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Original text with the translation underneath
    Both,
    TranslationOnly,
}

impl DisplayMode {
    /// Text to show for a message given its (optional) translation
    pub fn render(&self, original: &str, translation: Option<&str>) -> String {
        match (self, translation) {
            (_, None) => original.to_string(),
            (DisplayMode::TranslationOnly, Some(translated)) => translated.to_string(),
            (DisplayMode::Both, Some(translated)) => format!("{original}\n{translated}"),
        }
    }
}
