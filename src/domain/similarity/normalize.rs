//! Query text normalization

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize free text for similarity lookups
///
/// Lowercases, composes to NFC, turns punctuation into word breaks and
/// collapses whitespace. Word characters are Unicode alphanumerics and `_`;
/// a combining mark stays with the word it follows. Precomposed and
/// decomposed spellings of the same text give the same output, and applying
/// the function twice gives the same result as applying it once.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;
    let mut in_word = false;

    for c in input.to_lowercase().nfc() {
        if is_word_char(c) || (in_word && is_combining_mark(c)) {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            in_word = true;
            out.push(c);
        } else {
            pending_space = true;
            in_word = false;
        }
    }

    out
}

/// Split normalized text into its terms
pub fn terms(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split(' ').filter(|t| !t.is_empty())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
