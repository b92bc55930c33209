//! Lexical classification for the pacing model.
//!
//! Two closed word sets drive the timing heuristics: function words (the
//! brain glides over them) and phrase-boundary words (clause openers where
//! silent reading naturally pauses). Classification is a total function:
//! words are cleaned to `[a-z'-]` first, and anything outside both sets is
//! ordinary content.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Closed-class words: articles, auxiliaries, pronouns, prepositions,
/// conjunctions. These carry little lexical load and read near-instantly.
static FUNCTION_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "the", "a", "an", "is", "are", "was", "were", "be", "been", "being",
        "have", "has", "had", "do", "does", "did",
        "of", "to", "in", "at", "by", "for", "with", "on", "from", "into",
        "it", "its", "he", "she", "we", "they", "me", "him", "us", "them",
        "my", "his", "her", "our", "your", "their",
        "this", "that", "these", "those",
        "as", "if", "than", "then", "not", "no",
        "up", "out", "about", "just", "also", "very", "too", "so",
        "can", "could", "will", "would", "shall", "should", "may", "might", "must",
        "am", "get", "got", "much", "many", "some", "any",
        "all", "each", "every", "both", "few", "more", "most", "other",
        "own", "same", "such",
    ])
});

/// Subordinators and coordinators that typically open a clause.
static PHRASE_BOUNDARY_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "which", "who", "whom", "whose", "where", "when", "while",
        "because", "although", "though", "since", "unless", "until",
        "however", "therefore", "moreover", "furthermore", "nevertheless",
        "meanwhile", "otherwise", "consequently", "accordingly",
        "but", "yet", "and", "or", "nor",
        "after", "before", "during", "between", "through", "against",
        "whether", "whereas", "whereby",
    ])
});

/// Lowercase a raw token and strip everything outside `[a-z'-]`.
///
/// Idempotent, so predicates accept either raw or already-cleaned input.
pub fn clean_word(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|ch| matches!(ch, 'a'..='z' | '\'' | '-'))
        .collect()
}

/// Whether the token (raw or cleaned) is a closed-class function word.
pub fn is_function_word(word: &str) -> bool {
    FUNCTION_WORDS.contains(clean_word(word).as_str())
}

/// Whether the token (raw or cleaned) typically opens a clause.
pub fn is_phrase_boundary_word(word: &str) -> bool {
    PHRASE_BOUNDARY_WORDS.contains(clean_word(word).as_str())
}

/// Token ends a sentence (`.`, `!` or `?`).
pub fn ends_sentence(word: &str) -> bool {
    matches!(word.chars().last(), Some('.' | '!' | '?'))
}

/// Token ends a clause pause (`,`, `;` or `:`).
pub fn ends_clause(word: &str) -> bool {
    matches!(word.chars().last(), Some(',' | ';' | ':'))
}

/// Token ends in an em dash, en dash or hyphen.
pub fn ends_dash(word: &str) -> bool {
    matches!(word.chars().last(), Some('\u{2014}' | '\u{2013}' | '-'))
}

/// Token starts with an ASCII uppercase letter.
pub fn starts_uppercase(word: &str) -> bool {
    word.chars().next().is_some_and(|ch| ch.is_ascii_uppercase())
}

/// Token opens with a quote mark or parenthesis (a voice shift in dialogue).
pub fn starts_opening_quote(word: &str) -> bool {
    matches!(
        word.chars().next(),
        Some('"' | '\'' | '\u{201C}' | '\u{2018}' | '(')
    )
}

/// Token contains at least one ASCII digit.
pub fn contains_digit(word: &str) -> bool {
    word.chars().any(|ch| ch.is_ascii_digit())
}

/// Token is one or more ASCII digits and nothing else.
pub fn is_all_digits(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|ch| ch.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleaning_strips_punctuation_and_case() {
        assert_eq!(clean_word("The,"), "the");
        assert_eq!(clean_word("don't"), "don't");
        assert_eq!(clean_word("self-made."), "self-made");
        assert_eq!(clean_word("42"), "");
    }

    #[test]
    fn classifies_function_and_boundary_words() {
        assert!(is_function_word("the"));
        assert!(is_function_word("Would,"));
        assert!(is_phrase_boundary_word("however"));
        assert!(is_phrase_boundary_word("Because"));
        assert!(!is_function_word("elephant"));
        assert!(!is_phrase_boundary_word("elephant"));
    }

    #[test]
    fn unknown_words_classify_as_neither() {
        assert!(!is_function_word("xylophone"));
        assert!(!is_phrase_boundary_word("xylophone"));
        assert!(!is_function_word(""));
    }

    #[test]
    fn shape_predicates() {
        assert!(ends_sentence("times."));
        assert!(ends_clause("however,"));
        assert!(ends_dash("thought\u{2014}"));
        assert!(starts_uppercase("Storm"));
        assert!(starts_opening_quote("\u{201C}Hello"));
        assert!(contains_digit("42nd"));
        assert!(is_all_digits("1984"));
        assert!(!is_all_digits("42."));
        assert!(!is_all_digits(""));
    }
}
