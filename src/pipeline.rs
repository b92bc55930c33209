//! Document assembly: the one call a display layer makes at load time.
//!
//! Runs the full normalization pass over a raw text string (NFC, then
//! tokenization, then heading detection and chapter anchoring) and
//! returns everything playback needs. All stages are synchronous pure
//! computation; the whole pass runs once per document load, before any
//! playback starts.

use crate::anchor::resolve_chapters;
use crate::pacing::{word_delay_ms, Jitter, PaceInput, PaceOptions};
use crate::structure::{detect_chapters, ChapterRecord, OutlineEntry};
use crate::tokenizer::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::info;
use ts_rs::TS;
use unicode_normalization::UnicodeNormalization;

/// Extra pause factor applied by drivers when a token opens a paragraph.
const PARAGRAPH_PAUSE: f64 = 1.2;

/// The processed document consumed by the playback and display layer.
/// `tokens` is never empty; `chapters` is sorted ascending by `word_index`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Document {
    pub tokens: Vec<String>,
    pub paragraph_starts: BTreeSet<usize>,
    pub chapters: Vec<ChapterRecord>,
}

impl Document {
    /// Display duration for the token at `index`, with the paragraph-start
    /// pause a playback driver is expected to apply on top of the engine.
    pub fn delay_at(
        &self,
        index: usize,
        wpm: u32,
        options: &PaceOptions,
        jitter: &mut dyn Jitter,
    ) -> f64 {
        let word = self.tokens.get(index).map(String::as_str).unwrap_or("");
        let mut input = PaceInput::at(&self.tokens, index);
        input.context_mode = options.context_mode;
        input.speed_multiplier = options.speed_multiplier;
        input.chunk_size = options.chunk_size;

        let mut delay = word_delay_ms(word, wpm, &input, jitter);
        if index > 0 && self.paragraph_starts.contains(&index) {
            delay *= PARAGRAPH_PAUSE;
        }
        delay
    }
}

/// Process raw book text (plus an optional externally supplied outline)
/// into a displayable document. Total over all inputs; a document with no
/// readable text yields the tokenizer's placeholder sequence.
pub fn process_text(raw_text: &str, outline: &[OutlineEntry]) -> Document {
    let started = Instant::now();
    let normalized: String = raw_text.nfc().collect();

    let tokenized = tokenize(&normalized);
    let candidates = detect_chapters(&normalized, outline);
    let raw_word_count = normalized.split_whitespace().count();
    let chapters = resolve_chapters(candidates, &tokenized.tokens, raw_word_count);

    info!(
        tokens = tokenized.tokens.len(),
        paragraphs = tokenized.paragraph_starts.len(),
        chapters = chapters.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Processed document"
    );

    Document {
        tokens: tokenized.tokens,
        paragraph_starts: tokenized.paragraph_starts,
        chapters,
    }
}
