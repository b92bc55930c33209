//! Book text in, paced word stream out.
//!
//! `cadence` prepares free-form book text for a reading-speed display: it
//! repairs word boundaries, tokenizes into displayable words with
//! paragraph markers, anchors chapter headings onto exact token indices,
//! and computes per-word display durations that follow the rhythm of the
//! silent reading voice.
//!
//! The two entry points a display layer needs are [`process_text`] at
//! document load and [`word_delay_ms`] (or [`Document::delay_at`]) on every
//! token advance. Everything is synchronous pure computation with no shared
//! state; see the module docs for the individual stages.

pub mod anchor;
pub mod config;
pub mod display;
pub mod lexicon;
pub mod loader;
pub mod pacing;
pub mod pipeline;
pub mod sample;
pub mod structure;
pub mod tokenizer;

pub use config::{load_config, ReaderConfig};
pub use display::optimal_recognition_point;
pub use pacing::{
    word_delay_ms, FixedJitter, Jitter, PaceInput, PaceOptions, UniformJitter,
};
pub use pipeline::{process_text, Document};
pub use structure::{ChapterRecord, OutlineEntry};
pub use tokenizer::{tokenize, TokenizedText};
