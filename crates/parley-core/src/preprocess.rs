use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    /// Display form: NFKC, trimmed, inner whitespace collapsed. Casing is kept.
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        let text: String = text.nfkc().collect();

        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Lookup form used for cache keys and dictionary hits
    fn fold(&self, text: &str) -> String {
        self.process(text).to_lowercase()
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}

/// `normalized(text) + "_" + target`
pub fn cache_key(text: &str, target_language: &str) -> String {
    format!(
        "{}_{}",
        DefaultPreprocessor.fold(text),
        target_language.trim().to_ascii_lowercase()
    )
}
