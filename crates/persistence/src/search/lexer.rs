//! Spanish lexer for in-process full-text matching.
//!
//! Approximates `to_tsvector('spanish', ...) @@ plainto_tsquery('spanish', ...)`
//! closely enough for development and tests: words are split on
//! non-alphanumerics, lower-cased, stripped of accents and filtered against
//! the common stopwords. There is no stemming.

use std::collections::HashSet;

use super::normalize::{fold_accents, sanitize};

/// Accent-folded Spanish stopwords.
const STOPWORDS: &[&str] = &[
    "a", "al", "algo", "algunas", "algunos", "ante", "antes", "como", "con", "contra", "cual",
    "cuando", "de", "del", "desde", "donde", "durante", "e", "el", "ella", "ellos", "en", "entre",
    "era", "es", "esa", "ese", "eso", "esta", "estas", "este", "esto", "estos", "fue", "ha",
    "hasta", "hay", "la", "las", "le", "les", "lo", "los", "mas", "me", "mi", "mucho", "muchos",
    "muy", "nada", "ni", "no", "nos", "nosotros", "o", "otra", "otras", "otro", "otros", "para",
    "pero", "poco", "por", "porque", "que", "quien", "quienes", "se", "si", "sin", "sobre", "su",
    "sus", "tambien", "tanto", "te", "todo", "todos", "tu", "un", "una", "uno", "unos", "y", "ya",
    "yo",
];

/// Splits `text` into normalized lexemes, dropping stopwords.
pub fn lexemes(text: &str) -> Vec<String> {
    fold_accents(&sanitize(text))
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty() && !STOPWORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Returns true if every lexeme of `query` occurs in `document`.
///
/// A query without lexemes matches nothing.
pub fn matches(document: &str, query: &str) -> bool {
    let wanted = lexemes(query);
    if wanted.is_empty() {
        return false;
    }
    let present: HashSet<String> = lexemes(document).into_iter().collect();
    wanted.iter().all(|w| present.contains(w))
}
