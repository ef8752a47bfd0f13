use std::collections::HashMap;

use crate::preprocess::{DefaultPreprocessor, Preprocessor};

const EN_ES: &[(&str, &str)] = &[
    ("hello", "hola"),
    ("hi", "hola"),
    ("thank you", "gracias"),
    ("thanks", "gracias"),
    ("good morning", "buenos días"),
    ("good afternoon", "buenas tardes"),
    ("good night", "buenas noches"),
    ("how are you", "cómo estás"),
    ("i love you", "te quiero"),
    ("please", "por favor"),
    ("yes", "sí"),
    ("goodbye", "adiós"),
    ("bye", "adiós"),
    ("friend", "amigo"),
    ("beautiful", "hermosa"),
    ("love", "amor"),
    ("welcome", "bienvenido"),
    ("sorry", "lo siento"),
    ("good", "bueno"),
    ("very", "muy"),
    ("you", "tú"),
    ("and", "y"),
    ("gift", "regalo"),
];

const EN_FR: &[(&str, &str)] = &[
    ("hello", "bonjour"),
    ("hi", "salut"),
    ("thank you", "merci"),
    ("thanks", "merci"),
    ("good evening", "bonsoir"),
    ("good night", "bonne nuit"),
    ("how are you", "comment ça va"),
    ("i love you", "je t'aime"),
    ("please", "s'il vous plaît"),
    ("yes", "oui"),
    ("no", "non"),
    ("goodbye", "au revoir"),
    ("friend", "ami"),
    ("beautiful", "belle"),
    ("love", "amour"),
    ("welcome", "bienvenue"),
    ("sorry", "désolé"),
    ("very", "très"),
    ("and", "et"),
    ("gift", "cadeau"),
];

const EN_DE: &[(&str, &str)] = &[
    ("hello", "hallo"),
    ("thank you", "danke"),
    ("thanks", "danke"),
    ("good morning", "guten morgen"),
    ("good night", "gute nacht"),
    ("how are you", "wie geht's"),
    ("i love you", "ich liebe dich"),
    ("please", "bitte"),
    ("yes", "ja"),
    ("no", "nein"),
    ("goodbye", "tschüss"),
    ("friend", "freund"),
    ("beautiful", "schön"),
    ("love", "liebe"),
    ("welcome", "willkommen"),
    ("very", "sehr"),
    ("and", "und"),
    ("gift", "geschenk"),
];

const EN_PT: &[(&str, &str)] = &[
    ("hello", "olá"),
    ("thank you", "obrigado"),
    ("thanks", "obrigado"),
    ("good morning", "bom dia"),
    ("good night", "boa noite"),
    ("how are you", "como você está"),
    ("i love you", "eu te amo"),
    ("please", "por favor"),
    ("yes", "sim"),
    ("no", "não"),
    ("goodbye", "tchau"),
    ("friend", "amigo"),
    ("beautiful", "linda"),
    ("love", "amor"),
    ("welcome", "bem-vindo"),
    ("very", "muito"),
    ("gift", "presente"),
];

const EN_IT: &[(&str, &str)] = &[
    ("hello", "ciao"),
    ("thank you", "grazie"),
    ("thanks", "grazie"),
    ("good morning", "buongiorno"),
    ("good evening", "buonasera"),
    ("i love you", "ti amo"),
    ("please", "per favore"),
    ("yes", "sì"),
    ("goodbye", "arrivederci"),
    ("friend", "amico"),
    ("beautiful", "bella"),
    ("love", "amore"),
    ("welcome", "benvenuto"),
    ("very", "molto"),
    ("gift", "regalo"),
];

/// Offline bilingual phrase tables, the provider of last resort.
///
/// Tables are keyed `"{source}-{target}"`; every English pair table is
/// registered in both directions.
pub struct PhraseBook {
    tables: HashMap<String, HashMap<String, String>>,
}

impl PhraseBook {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    /// Built-in tables for English against es, fr, de, pt and it
    pub fn with_defaults() -> Self {
        let mut book = Self::new();

        for (lang, pairs) in [
            ("es", EN_ES),
            ("fr", EN_FR),
            ("de", EN_DE),
            ("pt", EN_PT),
            ("it", EN_IT),
        ] {
            book.insert_pairs("en", lang, pairs.iter().copied());
        }

        book
    }

    /// Register `pairs` for `a -> b` and, where not already present, `b -> a`
    pub fn insert_pairs<'a>(
        &mut self,
        a: &str,
        b: &str,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) {
        for (left, right) in pairs {
            let left = DefaultPreprocessor.fold(left);
            let right = DefaultPreprocessor.fold(right);

            self.tables
                .entry(format!("{a}-{b}"))
                .or_default()
                .insert(left.clone(), right.clone());
            // several phrases may share one translation; keep the first reverse mapping
            self.tables
                .entry(format!("{b}-{a}"))
                .or_default()
                .entry(right)
                .or_insert(left);
        }
    }

    pub fn supports(&self, source: &str, target: &str) -> bool {
        self.tables.contains_key(&format!("{source}-{target}"))
    }

    /// Whole-phrase lookup, then token-wise substitution.
    ///
    /// The token pass keeps untranslated tokens as-is and only returns a
    /// result when at least one token changed.
    pub fn lookup(&self, text: &str, source: &str, target: &str) -> Option<String> {
        if source == target {
            return None;
        }

        let table = self.tables.get(&format!("{source}-{target}"))?;

        let folded = DefaultPreprocessor.fold(text);
        let phrase = folded.trim_end_matches(['!', '?', '.', ',']);
        if phrase.is_empty() {
            return None;
        }

        if let Some(translation) = table.get(phrase) {
            return Some(match_case(text.trim(), translation));
        }

        let mut changed = 0usize;
        let tokens: Vec<String> = DefaultPreprocessor
            .process(text)
            .split_whitespace()
            .map(|token| match translate_token(table, token) {
                Some(translated) => {
                    changed += 1;
                    translated
                }
                None => token.to_string(),
            })
            .collect();

        (changed > 0).then(|| tokens.join(" "))
    }
}

impl Default for PhraseBook {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Translate one token, keeping any surrounding punctuation
fn translate_token(table: &HashMap<String, String>, token: &str) -> Option<String> {
    let start = token.find(|c: char| c.is_alphanumeric())?;
    let end = token
        .rfind(|c: char| c.is_alphanumeric())
        .map(|i| i + token[i..].chars().next().map_or(1, char::len_utf8))?;

    let core = &token[start..end];
    let translated = table.get(&core.to_lowercase())?;

    Some(format!(
        "{}{}{}",
        &token[..start],
        match_case(core, translated),
        &token[end..]
    ))
}

/// Capitalize the translation when the source starts with an uppercase letter
fn match_case(source: &str, translation: &str) -> String {
    let starts_upper = source.chars().next().is_some_and(char::is_uppercase);
    if !starts_upper {
        return translation.to_string();
    }

    let mut chars = translation.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_phrase_lookup() {
        let book = PhraseBook::with_defaults();

        assert_eq!(book.lookup("good morning", "en", "es").as_deref(), Some("buenos días"));
        assert_eq!(book.lookup("Thank you!", "en", "fr").as_deref(), Some("Merci"));
    }

    #[test]
    fn test_reverse_direction() {
        let book = PhraseBook::with_defaults();

        assert_eq!(book.lookup("hola", "es", "en").as_deref(), Some("hello"));
        assert_eq!(book.lookup("Danke", "de", "en").as_deref(), Some("Thank you"));
    }

    #[test]
    fn test_token_fallback() {
        let book = PhraseBook::with_defaults();

        assert_eq!(
            book.lookup("hello my friend!", "en", "es").as_deref(),
            Some("hola my amigo!")
        );
    }

    #[test]
    fn test_no_token_changed_is_none() {
        let book = PhraseBook::with_defaults();

        assert_eq!(book.lookup("xyz qwerty", "en", "es"), None);
    }

    #[test]
    fn test_unknown_pair_is_none() {
        let book = PhraseBook::with_defaults();

        assert!(!book.supports("es", "fr"));
        assert_eq!(book.lookup("hola", "es", "fr"), None);
        assert_eq!(book.lookup("hello", "en", "en"), None);
    }
}
