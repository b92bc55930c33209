//! Heading detection over raw text.
//!
//! Scans line by line for chapter-like headings and records each one with a
//! provisional position expressed in raw word offsets (whitespace words
//! counted from the start of the document). Those offsets are later
//! re-anchored into token space by the resolver, since tokenization shifts
//! word counts.
//!
//! When the caller already has an outline from the source container (for
//! example a PDF table of contents) it is trusted as higher quality than
//! pattern detection and returned as-is.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};
use ts_rs::TS;

/// Heading candidates must be this long (in chars) to be considered.
const MIN_HEADING_CHARS: usize = 5;
/// ...and no longer than this, rejecting full sentences.
const MAX_HEADING_CHARS: usize = 80;
/// Candidates with more whitespace words than this are prose, not headings.
const MAX_HEADING_WORDS: usize = 12;
/// Lower-cased prefix length used to deduplicate repeated running headers.
const DEDUP_PREFIX_CHARS: usize = 25;
/// Titles are truncated to this many chars for display.
const TITLE_DISPLAY_CHARS: usize = 50;

/// Recognizer patterns in priority order; the first match wins. The paired
/// number is the heading level (0 = part/book, 1 = chapter/section).
static HEADING_PATTERNS: Lazy<Vec<(Regex, u8)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"(?i)^Chapter\s+(\d+|[IVXLC]+)\s*[:.\-\u{2013}\u{2014}]\s*.+").unwrap(),
            1,
        ),
        (
            Regex::new(r"(?i)^Part\s+(\d+|[IVXLC]+)\s*[:.\-\u{2013}\u{2014}]\s*.+").unwrap(),
            0,
        ),
        (
            Regex::new(r"(?i)^Book\s+(\d+|[IVXLC]+)\s*[:.\-\u{2013}\u{2014}]?\s*").unwrap(),
            0,
        ),
        (
            Regex::new(r"(?i)^Appendix\s+[A-Z]\s*[:.\-\u{2013}\u{2014}]").unwrap(),
            1,
        ),
        (
            Regex::new(r"(?i)^(Introduction|Conclusion|Preface|Foreword|Prologue|Epilogue)$")
                .unwrap(),
            1,
        ),
    ]
});

static RE_LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").unwrap());

/// Where a chapter record came from; drives the resolver's search profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChapterSource {
    #[default]
    Detected,
    Outline,
}

/// A structural heading. `word_index` is a raw word offset when produced
/// here, and is rewritten to a token index by the resolver.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChapterRecord {
    pub title: String,
    pub word_index: usize,
    pub level: u8,
    #[serde(skip)]
    #[ts(skip)]
    pub source: ChapterSource,
}

/// An externally supplied outline entry. `raw_position` is measured in the
/// same whitespace-word coordinate space as the raw text.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OutlineEntry {
    pub title: String,
    pub raw_position: usize,
    pub level: u8,
}

fn truncate_title(line: &str) -> String {
    let mut title: String = line.chars().take(TITLE_DISPLAY_CHARS).collect();
    if line.chars().count() > TITLE_DISPLAY_CHARS {
        title.push_str("...");
    }
    title
}

/// Scan raw text for chapter headings, or pass a non-empty external outline
/// through untouched. Positions in the result are raw word offsets, sorted
/// ascending.
pub fn detect_chapters(raw_text: &str, outline: &[OutlineEntry]) -> Vec<ChapterRecord> {
    if !outline.is_empty() {
        info!(entries = outline.len(), "Using supplied outline; skipping heading scan");
        return outline
            .iter()
            .map(|entry| ChapterRecord {
                title: entry.title.clone(),
                word_index: entry.raw_position,
                level: entry.level.min(2),
                source: ChapterSource::Outline,
            })
            .collect();
    }

    let mut chapters = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut word_index = 0usize;

    for line in RE_LINE_BREAKS.split(raw_text) {
        let trimmed = line.trim();
        let words_in_line = trimmed.split_whitespace().count();
        let chars = trimmed.chars().count();

        if (MIN_HEADING_CHARS..=MAX_HEADING_CHARS).contains(&chars)
            && words_in_line <= MAX_HEADING_WORDS
        {
            if let Some(&(_, level)) = HEADING_PATTERNS
                .iter()
                .find(|(pattern, _)| pattern.is_match(trimmed))
            {
                let key: String = trimmed.to_lowercase().chars().take(DEDUP_PREFIX_CHARS).collect();
                if seen.insert(key) {
                    debug!(line = trimmed, word_index, "Detected heading");
                    chapters.push(ChapterRecord {
                        title: truncate_title(trimmed),
                        word_index,
                        level,
                        source: ChapterSource::Detected,
                    });
                }
            }
        }

        word_index += words_in_line;
    }

    chapters.sort_by_key(|chapter| chapter.word_index);
    info!(chapters = chapters.len(), "Finished heading scan");
    chapters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_numbered_and_roman_chapters() {
        let text = "Chapter 1: The Beginning\nsome prose follows here\nChapter II - The Middle\n";
        let chapters = detect_chapters(text, &[]);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "Chapter 1: The Beginning");
        assert_eq!(chapters[0].word_index, 0);
        assert_eq!(chapters[0].level, 1);
        // Offset advances over every line, matched or not.
        assert_eq!(chapters[1].word_index, 8);
    }

    #[test]
    fn parts_rank_above_chapters() {
        let text = "Part I: Origins\n\nChapter 1: Dust\n";
        let chapters = detect_chapters(text, &[]);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].level, 0);
        assert_eq!(chapters[1].level, 1);
    }

    #[test]
    fn standalone_section_names_match_exactly() {
        let text = "Introduction\n\nThis introduction is not a heading line.\n\nEpilogue\n";
        let chapters = detect_chapters(text, &[]);
        let titles: Vec<&str> = chapters.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Introduction", "Epilogue"]);
    }

    #[test]
    fn repeated_running_headers_record_once() {
        let text = "Chapter 3: The Storm\nprose prose prose\nChapter 3: The Storm\nmore prose\n";
        let chapters = detect_chapters(text, &[]);
        assert_eq!(chapters.len(), 1);
    }

    #[test]
    fn rejects_fragments_and_full_sentences() {
        let long_line = format!("Chapter 1: {}", "very ".repeat(20));
        let text = format!("Ch 1\n{long_line}\n");
        let chapters = detect_chapters(&text, &[]);
        assert!(chapters.is_empty());
    }

    #[test]
    fn truncates_long_titles_for_display() {
        let title = "Chapter 9: An Extremely Long And Winding Heading Title Here";
        let chapters = detect_chapters(title, &[]);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title.chars().count(), 53);
        assert!(chapters[0].title.ends_with("..."));
    }

    #[test]
    fn supplied_outline_is_trusted_verbatim() {
        let outline = vec![
            OutlineEntry {
                title: "Foreword".into(),
                raw_position: 10,
                level: 0,
            },
            OutlineEntry {
                title: "The Deep".into(),
                raw_position: 900,
                level: 5,
            },
        ];
        let chapters = detect_chapters("Chapter 1: Ignored entirely\n", &outline);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "Foreword");
        assert_eq!(chapters[1].word_index, 900);
        // Deep nesting is capped to display-friendly levels.
        assert_eq!(chapters[1].level, 2);
        assert!(chapters.iter().all(|c| c.source == ChapterSource::Outline));
    }
}
