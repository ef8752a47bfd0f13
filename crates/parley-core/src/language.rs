use std::collections::HashSet;

use parley_types::{LanguageCode, UNKNOWN_LANGUAGE};
use regex::{Regex, RegexBuilder};

/// Tie-break order for languages scored from Latin-script words
const PRIORITY: [&str; 6] = ["en", "es", "fr", "de", "it", "pt"];

/// Whole-message words: greetings and chat staples
fn common_words(code: &str) -> &'static [&'static str] {
    match code {
        "en" => &[
            "hello", "hi", "hey", "thanks", "thank", "yes", "bye", "goodbye", "please", "sorry",
            "ok", "okay", "good", "love", "wow", "cool", "nice", "welcome", "friend", "beautiful",
            "morning", "night", "great", "awesome", "lol", "what", "why", "where", "who", "the",
        ],
        "es" => &[
            "hola", "gracias", "adios", "adiós", "buenos", "buenas", "sí", "porfa", "amigo",
            "amiga", "hermosa", "hermoso", "bonita", "qué", "cómo", "bien", "noche", "día",
            "quiero", "amor", "besos", "saludos", "perdón", "vale", "claro", "genial", "guapa",
        ],
        "fr" => &[
            "bonjour", "salut", "merci", "oui", "bonsoir", "revoir", "ami", "amie", "belle",
            "beau", "comment", "pourquoi", "très", "coucou", "bisous", "mignon", "magnifique",
            "bienvenue", "désolé", "génial",
        ],
        "de" => &[
            "hallo", "danke", "ja", "nein", "tschüss", "bitte", "guten", "morgen", "nacht",
            "schön", "freund", "warum", "gut", "liebe", "servus", "willkommen", "toll",
        ],
        "it" => &[
            "ciao", "grazie", "buongiorno", "buonasera", "prego", "bella", "bello", "amico",
            "perché", "bene", "amore", "allora", "ragazzi", "benvenuto", "bellissima",
        ],
        "pt" => &[
            "olá", "obrigado", "obrigada", "tchau", "sim", "não", "nao", "bom", "boa", "noite",
            "tudo", "bem", "linda", "beijos", "você", "voce", "saudade", "valeu",
        ],
        _ => &[],
    }
}

/// Function words that dominate running text
fn frequent_words(code: &str) -> &'static [&'static str] {
    match code {
        "en" => &[
            "the", "and", "is", "are", "you", "to", "of", "in", "it", "that", "this", "with",
            "for", "have", "my", "your", "me", "be", "was", "not", "do", "how",
        ],
        "es" => &[
            "el", "la", "los", "las", "de", "que", "y", "en", "es", "un", "una", "por", "para",
            "con", "muy", "pero", "está", "como", "yo", "tú", "mi", "te", "eres",
        ],
        "fr" => &[
            "le", "la", "les", "des", "et", "est", "une", "je", "tu", "vous", "nous", "pas",
            "pour", "avec", "dans", "c'est", "mais", "ce", "il", "elle", "suis",
        ],
        "de" => &[
            "der", "die", "das", "und", "ist", "nicht", "ich", "du", "wir", "ein", "eine", "zu",
            "mit", "auf", "für", "wie", "was", "sehr", "aber", "auch", "bist",
        ],
        "it" => &[
            "il", "lo", "gli", "di", "che", "è", "non", "per", "sono", "sei", "molto", "ma",
            "come", "mi", "ti", "questo", "della",
        ],
        "pt" => &[
            "o", "os", "as", "é", "um", "uma", "com", "eu", "muito", "mas", "do", "da", "em",
            "está", "você", "isso",
        ],
        _ => &[],
    }
}

struct LanguageProfile {
    code: &'static str,
    common: HashSet<&'static str>,
    pattern: Option<Regex>,
}

/// Heuristic language guesser.
///
/// Non-Latin scripts are identified by character ranges. Latin text is
/// matched against small per-language word lists: exact lookup for a single
/// word, word-boundary hit counting for longer text. Meant as a cheap gate
/// in front of network providers, not as a classifier.
pub struct LanguageDetector {
    profiles: Vec<LanguageProfile>,
}

impl LanguageDetector {
    pub fn new() -> Self {
        let profiles = PRIORITY
            .iter()
            .map(|&code| {
                let common: HashSet<&'static str> = common_words(code).iter().copied().collect();

                let alternation = common_words(code)
                    .iter()
                    .chain(frequent_words(code))
                    .map(|word| regex::escape(word))
                    .collect::<Vec<_>>()
                    .join("|");

                let pattern = RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| tracing::error!("word pattern for {code} failed to build: {e}"))
                    .ok();

                LanguageProfile {
                    code,
                    common,
                    pattern,
                }
            })
            .collect();

        Self { profiles }
    }

    /// Detect the language of `text`, or [`UNKNOWN_LANGUAGE`]
    pub fn detect(&self, text: &str) -> LanguageCode {
        let text = text.trim();
        if text.is_empty() {
            return UNKNOWN_LANGUAGE.to_string();
        }

        if let Some(code) = detect_script(text) {
            return code.to_string();
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        let detected = if words.len() == 1 {
            self.detect_word(words[0])
        } else {
            self.detect_sentence(text)
        };

        detected.unwrap_or(UNKNOWN_LANGUAGE).to_string()
    }

    fn detect_word(&self, word: &str) -> Option<&'static str> {
        let word = word
            .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
            .to_lowercase();

        self.profiles
            .iter()
            .find(|profile| profile.common.contains(word.as_str()))
            .map(|profile| profile.code)
    }

    fn detect_sentence(&self, text: &str) -> Option<&'static str> {
        let mut best: Option<(&'static str, usize)> = None;

        for profile in &self.profiles {
            let Some(pattern) = &profile.pattern else {
                continue;
            };

            let score = pattern.find_iter(text).count();
            tracing::trace!("language score {}: {}", profile.code, score);

            // strict comparison keeps the earlier language on ties
            if score > 0 && best.is_none_or(|(_, top)| score > top) {
                best = Some((profile.code, score));
            }
        }

        best.map(|(code, _)| code)
    }
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Majority non-Latin script, if it outweighs Latin letters
fn detect_script(text: &str) -> Option<&'static str> {
    let mut latin = 0usize;
    let mut kana = 0usize;
    let mut counts: [(&'static str, usize); 7] = [
        ("ja", 0),
        ("ko", 0),
        ("zh", 0),
        ("ru", 0),
        ("ar", 0),
        ("hi", 0),
        ("th", 0),
    ];

    for c in text.chars() {
        match c {
            '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}' => kana += 1,
            '\u{AC00}'..='\u{D7AF}' | '\u{1100}'..='\u{11FF}' => counts[1].1 += 1,
            '\u{4E00}'..='\u{9FFF}' => counts[2].1 += 1,
            '\u{0400}'..='\u{04FF}' => counts[3].1 += 1,
            '\u{0600}'..='\u{06FF}' => counts[4].1 += 1,
            '\u{0900}'..='\u{097F}' => counts[5].1 += 1,
            '\u{0E00}'..='\u{0E7F}' => counts[6].1 += 1,
            c if c.is_ascii_alphabetic() || ('\u{00C0}'..='\u{024F}').contains(&c) => latin += 1,
            _ => {}
        }
    }

    // Kanji alongside kana is Japanese
    if kana > 0 {
        counts[0].1 = kana + counts[2].1;
        counts[2].1 = 0;
    }

    counts
        .into_iter()
        .filter(|&(_, count)| count > 0 && count >= latin)
        .max_by_key(|&(_, count)| count)
        .map(|(code, _)| code)
}
