//! Raw text to displayable word tokens.
//!
//! Book text that has been through an extraction step often arrives with
//! missing whitespace (glued case transitions, punctuation jammed against
//! the next word) and littered with page numbers and footnote markers. This
//! module repairs word boundaries with an ordered rule fold, splits the text
//! into paragraphs, re-splits run-on tokens, filters page artifacts, and
//! records which token index starts each paragraph.
//!
//! Tokenization never fails: malformed input degrades to imperfect tokens,
//! and a document with no readable text at all yields a fixed placeholder
//! sequence so downstream display code can rely on a non-empty list.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};
use ts_rs::TS;

/// Tokens longer than this are assumed to be several words glued together.
const MAX_PLAIN_TOKEN_LEN: usize = 15;

/// Trailing-dot integers below this are treated as page numbers.
const MAX_PAGE_NUMBER: u64 = 500;

/// Shown when a document tokenizes to nothing.
const PLACEHOLDER_TOKENS: [&str; 9] = [
    "No", "text", "found", "in", "file.", "Try", "a", "different", "file.",
];

/// Ordered boundary-insertion rules. Each rule is idempotent on its own
/// output; the order is a contract because later rules act on text produced
/// by earlier ones.
static BOUNDARY_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"([a-z])([A-Z])").unwrap(), "$1 $2"),
        (Regex::new(r"([.!?])([A-Z])").unwrap(), "$1 $2"),
        (Regex::new(r"(\d)([A-Z])").unwrap(), "$1 $2"),
        (Regex::new(r"([a-z])(\d)").unwrap(), "$1 $2"),
        (Regex::new(r"([.!?,;:])([a-zA-Z])").unwrap(), "$1 $2"),
        (Regex::new(r"([a-z]{2,})([A-Z][a-z])").unwrap(), "$1 $2"),
        (Regex::new(r"([a-z])([A-Z])").unwrap(), "$1 $2"),
        (Regex::new(r"([\u{2018}\u{2019}])([a-zA-Z])").unwrap(), "$1 $2"),
        (Regex::new(r"([a-zA-Z])([\u{2018}\u{2019}])").unwrap(), "$1 $2"),
    ]
});

/// Extremely common short words that extraction tends to glue to their
/// neighbors. Used only when re-splitting over-long tokens.
const GLUE_WORDS: [&str; 14] = [
    "the", "and", "of", "to", "in", "was", "that", "with", "for", "by", "be",
    "had", "his", "not",
];

/// Rules for re-splitting a run-on token: the general boundary transitions
/// plus glued-before and glued-after variants of every common short word.
static RUNON_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    let mut rules = vec![
        (Regex::new(r"([a-z])([A-Z])").unwrap(), "$1 $2"),
        (Regex::new(r"([.!?,;:])([a-zA-Z])").unwrap(), "$1 $2"),
        (Regex::new(r"([a-z]{3,})([A-Z])").unwrap(), "$1 $2"),
        (Regex::new(r"(\.)(\d)").unwrap(), "$1 $2"),
        (Regex::new(r"(\d)([a-zA-Z])").unwrap(), "$1 $2"),
    ];
    for word in GLUE_WORDS {
        rules.push((
            Regex::new(&format!(r"(?i)({word})([a-z])")).unwrap(),
            "$1 $2",
        ));
        rules.push((
            Regex::new(&format!(r"(?i)([a-z])({word})")).unwrap(),
            "$1 $2",
        ));
    }
    rules
});

static RE_PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

static RE_BARE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.?\d{1,3}$").unwrap());
static RE_BRACKETED_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[\d+\]$").unwrap());
static RE_PAREN_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(\d+\)$").unwrap());
static RE_TRAILING_DOT_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\.$").unwrap());

/// Tokenizer output: the displayable word sequence and the set of token
/// indices that begin a paragraph.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TokenizedText {
    pub tokens: Vec<String>,
    pub paragraph_starts: BTreeSet<usize>,
}

/// Apply an ordered rule list as a fold over the text.
fn apply_rules(text: &str, rules: &[(Regex, &'static str)]) -> String {
    rules.iter().fold(text.to_string(), |acc, (re, replacement)| {
        re.replace_all(&acc, *replacement).into_owned()
    })
}

/// Insert missing spaces at case, digit, punctuation and quote transitions.
pub fn repair_boundaries(text: &str) -> String {
    apply_rules(text, &BOUNDARY_RULES)
}

/// Re-split a token that is too long to be a single word. Returns the
/// original token unchanged when no boundary can be found.
fn split_run_on(token: &str) -> Vec<String> {
    if token.chars().count() <= MAX_PLAIN_TOKEN_LEN {
        return vec![token.to_string()];
    }
    let repaired = apply_rules(token, &RUNON_RULES);
    let pieces: Vec<String> = repaired.split_whitespace().map(str::to_string).collect();
    if pieces.len() > 1 {
        pieces
    } else {
        vec![token.to_string()]
    }
}

/// Heuristic filter for page numbers and footnote markers.
fn is_page_artifact(token: &str) -> bool {
    if RE_BARE_NUMBER.is_match(token)
        || RE_BRACKETED_NUMBER.is_match(token)
        || RE_PAREN_NUMBER.is_match(token)
    {
        return true;
    }
    if let Some(caps) = RE_TRAILING_DOT_NUMBER.captures(token) {
        if let Ok(value) = caps[1].parse::<u64>() {
            return value < MAX_PAGE_NUMBER;
        }
    }
    false
}

/// Convert raw text into an ordered token sequence with paragraph starts.
///
/// Deterministic, total over all input strings; the token list is never
/// empty (see [`PLACEHOLDER_TOKENS`]).
pub fn tokenize(raw_text: &str) -> TokenizedText {
    let cleaned = repair_boundaries(raw_text);

    let mut tokens: Vec<String> = Vec::new();
    let mut paragraph_starts = BTreeSet::new();

    for paragraph in RE_PARAGRAPH_BREAK.split(&cleaned) {
        let words: Vec<String> = paragraph
            .split_whitespace()
            .flat_map(|word| split_run_on(word))
            .filter(|word| !is_page_artifact(word))
            .collect();

        if !words.is_empty() {
            paragraph_starts.insert(tokens.len());
            tokens.extend(words);
        }
    }

    if tokens.is_empty() {
        warn!("Document tokenized to nothing; substituting placeholder tokens");
        tokens = PLACEHOLDER_TOKENS.iter().map(|s| s.to_string()).collect();
    }

    debug!(
        tokens = tokens.len(),
        paragraphs = paragraph_starts.len(),
        "Tokenized document"
    );

    TokenizedText {
        tokens,
        paragraph_starts,
    }
}
