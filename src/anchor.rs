//! Re-anchoring chapter positions into token space.
//!
//! Raw word offsets from heading detection (or from a supplied outline) do
//! not line up with token indices: boundary repair inserts words, run-on
//! splitting multiplies them, and artifact filtering removes them, all
//! non-uniformly. A single global ratio gives a close estimate; a bounded
//! fuzzy search around that estimate finds the exact heading tokens. The
//! search window is asymmetric (more lookahead than lookback) because
//! front matter and page-number drift push headings past their estimate
//! far more often than before it.

use crate::structure::{ChapterRecord, ChapterSource};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

/// Roman-numeral heading shape: numeral, optional separator, title text.
static RE_ROMAN_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([IVXLC]+)\s*[:\-\u{2013}\u{2014}.]?\s*(.+)$").unwrap());

/// How many tokens after a numeral match may hold the title's first word.
const ROMAN_TITLE_LOOKAHEAD: usize = 10;
/// Fraction of compared title words that must match a window position.
const MATCH_THRESHOLD: f64 = 0.6;

/// Search bounds and matching strictness, chosen per record provenance.
#[derive(Debug, Clone, Copy)]
struct SearchProfile {
    lookback: usize,
    lookahead: usize,
    max_title_words: usize,
    allow_substring: bool,
}

impl SearchProfile {
    fn for_source(source: ChapterSource) -> Self {
        match source {
            ChapterSource::Detected => SearchProfile {
                lookback: 500,
                lookahead: 1500,
                max_title_words: 4,
                allow_substring: false,
            },
            // Outline positions carry no lookback drift but can trail the
            // estimate by whole front-matter sections, and outline titles
            // are wordier, so compare more of them and accept substrings.
            ChapterSource::Outline => SearchProfile {
                lookback: 0,
                lookahead: 3000,
                max_title_words: 5,
                allow_substring: true,
            },
        }
    }
}

fn strip_to_letters(word: &str) -> String {
    word.chars().filter(|ch| ch.is_ascii_alphabetic()).collect()
}

fn lower_letters(word: &str) -> String {
    word.to_lowercase()
        .chars()
        .filter(|ch| ch.is_ascii_lowercase())
        .collect()
}

fn lower_alphanumeric(word: &str) -> String {
    word.to_lowercase()
        .chars()
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit())
        .collect()
}

/// Significant title words: whitespace-split, single characters dropped.
fn significant_words(title: &str) -> Vec<&str> {
    title
        .split_whitespace()
        .filter(|word| word.chars().count() > 1)
        .collect()
}

/// Roman-numeral fast path: find the numeral token, then look a few tokens
/// ahead for the first significant word of the remaining title.
fn find_roman_heading(
    title: &str,
    tokens: &[String],
    start: usize,
    end: usize,
) -> Option<usize> {
    let caps = RE_ROMAN_TITLE.captures(title)?;
    let numeral = caps.get(1)?.as_str();
    let first_title_word = significant_words(caps.get(2)?.as_str())
        .first()
        .map(|word| lower_letters(word))
        .filter(|cleaned| !cleaned.is_empty())?;

    for i in start..end {
        let token = strip_to_letters(&tokens[i]);
        if !token.eq_ignore_ascii_case(numeral) {
            continue;
        }
        for k in 1..=ROMAN_TITLE_LOOKAHEAD {
            if let Some(next) = tokens.get(i + k) {
                if lower_letters(next) == first_title_word {
                    return Some(i);
                }
            }
        }
    }
    None
}

/// Sliding-window partial match over the leading significant title words.
fn find_by_window(
    title: &str,
    tokens: &[String],
    start: usize,
    end: usize,
    profile: SearchProfile,
) -> Option<usize> {
    let title_words: Vec<String> = significant_words(title)
        .into_iter()
        .map(lower_alphanumeric)
        .collect();
    let compared = title_words.len().min(profile.max_title_words);
    if compared == 0 {
        return None;
    }

    for i in start..end {
        let mut matches = 0usize;
        for (j, title_word) in title_words.iter().take(compared).enumerate() {
            let Some(token) = tokens.get(i + j) else {
                continue;
            };
            let token_word = lower_alphanumeric(token);
            if *title_word == token_word
                || (profile.allow_substring
                    && title_word.len() > 3
                    && token_word.contains(title_word.as_str()))
            {
                matches += 1;
            }
        }
        if matches as f64 >= compared as f64 * MATCH_THRESHOLD {
            return Some(i);
        }
    }
    None
}

fn locate_title(
    title: &str,
    estimated: usize,
    tokens: &[String],
    profile: SearchProfile,
) -> Option<usize> {
    let start = estimated.saturating_sub(profile.lookback);
    let end = (estimated + profile.lookahead).min(tokens.len());

    find_roman_heading(title, tokens, start, end)
        .or_else(|| find_by_window(title, tokens, start, end, profile))
}

/// Rewrite every record's raw offset to an exact token index.
///
/// Titles that cannot be fuzzy-matched keep their ratio estimate rather
/// than being dropped; this never fails and never blocks tokenization. The
/// result is re-sorted because overlapping fuzzy windows can reorder
/// neighboring records.
pub fn resolve_chapters(
    mut chapters: Vec<ChapterRecord>,
    tokens: &[String],
    raw_word_count: usize,
) -> Vec<ChapterRecord> {
    let ratio = tokens.len() as f64 / raw_word_count.max(1) as f64;
    trace!(ratio, raw_word_count, tokens = tokens.len(), "Anchoring chapters");

    for chapter in &mut chapters {
        let estimated = ((chapter.word_index as f64) * ratio).floor() as usize;
        let profile = SearchProfile::for_source(chapter.source);
        match locate_title(&chapter.title, estimated, tokens, profile) {
            Some(found) => {
                debug!(title = %chapter.title, estimated, found, "Anchored chapter");
                chapter.word_index = found;
            }
            None => {
                debug!(title = %chapter.title, estimated, "No match; keeping estimate");
                chapter.word_index = estimated.min(tokens.len());
            }
        }
    }

    chapters.sort_by_key(|chapter| chapter.word_index);
    chapters
}
