//! Per-word display durations.
//!
//! Models the rhythm of the silent reading voice: function words glide,
//! long content words dwell, clause openers and punctuation pause, and a
//! slow sine "breath" plus a few percent of jitter keep the cadence from
//! feeling mechanical. The engine is a pure function of its inputs (the
//! caller owns the sentence-position counters and the playback clock) and
//! it never clamps: outer layers apply their own bounds.

use crate::lexicon::{
    clean_word, contains_digit, ends_clause, ends_dash, ends_sentence, is_all_digits,
    is_function_word, is_phrase_boundary_word, starts_opening_quote, starts_uppercase,
};
use std::time::{SystemTime, UNIX_EPOCH};

/// Uniform random source for the micro-variation term. Swappable so tests
/// and deterministic replays can pin the jitter.
pub trait Jitter {
    /// A sample uniformly distributed in `[0, 1)`.
    fn sample(&mut self) -> f64;
}

/// Default xorshift-based uniform source.
#[derive(Debug, Clone)]
pub struct UniformJitter {
    state: u64,
}

impl UniformJitter {
    /// Seed from the wall clock.
    pub fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9E37_79B9_7F4A_7C15);
        Self::seeded(nanos)
    }

    /// Fixed seed; identical sequences for identical seeds.
    pub fn seeded(seed: u64) -> Self {
        UniformJitter {
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }
}

impl Default for UniformJitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Jitter for UniformJitter {
    fn sample(&mut self) -> f64 {
        // xorshift64*; the high bits feed a 53-bit mantissa.
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        let scrambled = x.wrapping_mul(0x2545_F491_4F6C_DD1D);
        (scrambled >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Constant source: every sample is the same value. `FixedJitter(0.5)`
/// zeroes the micro-variation term entirely.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl Jitter for FixedJitter {
    fn sample(&mut self) -> f64 {
        self.0
    }
}

/// Pacing knobs that stay fixed across a reading session, as opposed to
/// the per-token counters in [`PaceInput`].
#[derive(Debug, Clone, Copy)]
pub struct PaceOptions {
    pub context_mode: bool,
    pub speed_multiplier: f64,
    pub chunk_size: usize,
}

impl Default for PaceOptions {
    fn default() -> Self {
        PaceOptions {
            context_mode: false,
            speed_multiplier: 1.0,
            chunk_size: 1,
        }
    }
}

/// Everything the engine needs besides the word itself. The sentence
/// counters are derived per call from the token sequence (see
/// [`PaceInput::at`]); the engine holds no memory between calls.
#[derive(Debug, Clone)]
pub struct PaceInput<'a> {
    /// Simplified timing for multi-word context display.
    pub context_mode: bool,
    /// Extra speed divisor applied in context mode.
    pub speed_multiplier: f64,
    /// Number of tokens advanced together.
    pub chunk_size: usize,
    /// Token position in the sequence; drives the breath wave.
    pub position: usize,
    /// Token opens a sentence.
    pub first_of_sentence: bool,
    /// Previous token ended a clause pause (comma, semicolon, colon).
    pub after_clause: bool,
    /// Tokens since the last sentence terminator.
    pub words_into_sentence: usize,
    /// Upcoming token, for anticipatory slowing.
    pub next_word: Option<&'a str>,
}

impl Default for PaceInput<'_> {
    fn default() -> Self {
        PaceInput {
            context_mode: false,
            speed_multiplier: 1.0,
            chunk_size: 1,
            position: 0,
            first_of_sentence: false,
            after_clause: false,
            words_into_sentence: 0,
            next_word: None,
        }
    }
}

impl<'a> PaceInput<'a> {
    /// Derive the sentence-position counters for `tokens[index]` the way a
    /// playback driver does on every advance, scanning back to the previous
    /// sentence terminator and peeking one token ahead.
    pub fn at(tokens: &'a [String], index: usize) -> Self {
        let prev = index
            .checked_sub(1)
            .and_then(|i| tokens.get(i))
            .map(String::as_str)
            .unwrap_or("");

        let mut words_into_sentence = 0usize;
        for token in tokens[..index.min(tokens.len())].iter().rev() {
            if ends_sentence(token) {
                break;
            }
            words_into_sentence += 1;
        }

        PaceInput {
            position: index,
            first_of_sentence: index == 0 || ends_sentence(prev),
            after_clause: ends_clause(prev),
            words_into_sentence,
            next_word: tokens.get(index + 1).map(String::as_str),
            ..PaceInput::default()
        }
    }
}

/// Milliseconds per token before any multiplier, at 1x chunk.
fn base_delay_ms(wpm: u32) -> f64 {
    60_000.0 / f64::from(wpm)
}

fn chunk_scale(chunk_size: usize) -> f64 {
    1.0 + (chunk_size.saturating_sub(1)) as f64 * 0.3
}

/// Display duration in milliseconds for one token.
///
/// Total over its inputs: an empty word or missing neighbor simply
/// contributes nothing to the multiplier.
pub fn word_delay_ms(word: &str, wpm: u32, input: &PaceInput, jitter: &mut dyn Jitter) -> f64 {
    let base = base_delay_ms(wpm);

    if input.context_mode {
        let mut delay = base / input.speed_multiplier;
        if input.chunk_size > 1 {
            delay *= chunk_scale(input.chunk_size);
        }
        if ends_sentence(word) {
            delay *= 1.8;
        } else if ends_clause(word) {
            delay *= 1.3;
        }
        return delay;
    }

    let cleaned = clean_word(word);
    let cleaned_len = cleaned.chars().count();
    let function_word = is_function_word(&cleaned);
    let phrase_boundary = is_phrase_boundary_word(&cleaned);

    let mut multiplier = 1.0_f64;

    // Word class: function words fly, long content words dwell.
    if function_word && cleaned_len <= 3 {
        multiplier = 0.6;
    } else if function_word {
        multiplier = 0.75;
    } else if cleaned_len >= 8 {
        multiplier = 1.15 + (cleaned_len - 8) as f64 * 0.04;
    }

    // The pause lands on the clause opener itself, not before it.
    if phrase_boundary && !input.first_of_sentence {
        multiplier *= 1.25;
    }

    // Lookahead: pre-emptive slowing before predicted difficulty.
    if let Some(next) = input.next_word.filter(|next| !next.is_empty()) {
        let next_cleaned = clean_word(next);
        if is_phrase_boundary_word(&next_cleaned) {
            multiplier *= 1.1;
        }
        if next_cleaned.chars().count() >= 10 {
            multiplier *= 1.08;
        }
    }

    // Sentence position: orient, cruise, fatigue.
    if input.first_of_sentence {
        multiplier *= 1.2;
    } else if input.after_clause {
        multiplier *= 1.12;
    }
    if (2..=5).contains(&input.words_into_sentence) && !function_word {
        multiplier *= 0.95;
    }
    if input.words_into_sentence > 12 {
        multiplier *= 1.0 + (input.words_into_sentence - 12) as f64 * 0.01;
    }

    // Punctuation stacks additively onto the multiplier.
    if ends_sentence(word) {
        multiplier += 0.85;
    } else if ends_clause(word) {
        multiplier += 0.3;
    } else if ends_dash(word) {
        multiplier += 0.4;
    }

    // Emphasis markers.
    if !input.first_of_sentence && starts_uppercase(word) {
        multiplier *= 1.15;
    }
    if contains_digit(word) {
        multiplier += 0.35;
    }
    if is_all_digits(word) {
        multiplier += 0.15;
    }
    if starts_opening_quote(word) {
        multiplier *= 1.1;
    }

    // Slow breath wave plus bounded micro-texture.
    let breath_wave = (input.position as f64 * 0.4).sin() * 0.05;
    let micro_variation = (jitter.sample() - 0.5) * 0.06;
    multiplier *= 1.0 + breath_wave + micro_variation;

    let mut delay = base * multiplier;
    if input.chunk_size > 1 {
        delay *= chunk_scale(input.chunk_size);
    }
    delay
}

#[cfg(test)]
mod tests {
    use super::*;

    // Position 0 keeps the breath wave at zero; 0.5 zeroes the jitter.
    fn neutral() -> PaceInput<'static> {
        PaceInput::default()
    }

    fn delay(word: &str, wpm: u32, input: &PaceInput) -> f64 {
        word_delay_ms(word, wpm, input, &mut FixedJitter(0.5))
    }

    #[test]
    fn higher_wpm_means_shorter_delay() {
        let fast = delay("reading", 600, &neutral());
        let slow = delay("reading", 300, &neutral());
        assert!(fast < slow);
        assert!((slow / fast - 2.0).abs() < 1e-9);
    }

    #[test]
    fn punctuation_pauses_are_ordered() {
        let plain = delay("storm", 300, &neutral());
        let comma = delay("storm,", 300, &neutral());
        let period = delay("storm.", 300, &neutral());
        assert!(period > comma);
        assert!(comma > plain);
    }

    #[test]
    fn short_function_words_glide() {
        let the = delay("the", 300, &neutral());
        let elephant = delay("elephant", 300, &neutral());
        assert!(the < elephant);
        // 0.6 multiplier against a 200ms base.
        assert!((the - 120.0).abs() < 1e-9);
    }

    #[test]
    fn long_words_dwell_proportionally() {
        let eight = delay("solitude", 300, &neutral());
        let twelve = delay("acceleration", 300, &neutral());
        assert!((eight - 200.0 * 1.15).abs() < 1e-9);
        assert!((twelve - 200.0 * (1.15 + 4.0 * 0.04)).abs() < 1e-9);
    }

    #[test]
    fn phrase_boundaries_pause_unless_opening_a_sentence() {
        let mid = delay("because", 300, &neutral());
        let opening = delay(
            "because",
            300,
            &PaceInput {
                first_of_sentence: true,
                ..neutral()
            },
        );
        // Mid-sentence the boundary pause applies; sentence-first only the
        // orientation multiplier does.
        assert!((mid - 200.0 * 1.25).abs() < 1e-9);
        assert!((opening - 200.0 * 1.2).abs() < 1e-9);
    }

    #[test]
    fn lookahead_slows_before_difficulty() {
        let before_boundary = delay(
            "storm",
            300,
            &PaceInput {
                next_word: Some("however"),
                ..neutral()
            },
        );
        let before_long = delay(
            "storm",
            300,
            &PaceInput {
                next_word: Some("infrastructure"),
                ..neutral()
            },
        );
        let plain = delay("storm", 300, &neutral());
        assert!(before_boundary > plain);
        assert!(before_long > plain);
    }

    #[test]
    fn capitalized_mid_sentence_words_emphasize() {
        let proper = delay("Ahab", 300, &neutral());
        let first = delay(
            "Ahab",
            300,
            &PaceInput {
                first_of_sentence: true,
                ..neutral()
            },
        );
        assert!((proper - 200.0 * 1.15).abs() < 1e-9);
        assert!((first - 200.0 * 1.2).abs() < 1e-9);
    }

    #[test]
    fn digits_need_decoding() {
        let number = delay("1984", 300, &neutral());
        // Pure digits: 1.0 + 0.35 + 0.15.
        assert!((number - 200.0 * 1.5).abs() < 1e-9);
        let mixed = delay("42nd", 300, &neutral());
        assert!((mixed - 200.0 * 1.35).abs() < 1e-9);
    }

    #[test]
    fn context_mode_uses_the_simplified_path() {
        let input = PaceInput {
            context_mode: true,
            speed_multiplier: 2.0,
            ..neutral()
        };
        assert!((delay("storm", 300, &input) - 100.0).abs() < 1e-9);
        assert!((delay("storm.", 300, &input) - 180.0).abs() < 1e-9);
        assert!((delay("storm,", 300, &input) - 130.0).abs() < 1e-9);
    }

    #[test]
    fn chunks_scale_both_paths() {
        let chunked = PaceInput {
            chunk_size: 3,
            ..neutral()
        };
        assert!((delay("storm", 300, &chunked) - 200.0 * 1.6).abs() < 1e-9);

        let context_chunked = PaceInput {
            context_mode: true,
            chunk_size: 3,
            ..neutral()
        };
        assert!((delay("storm", 300, &context_chunked) - 200.0 * 1.6).abs() < 1e-9);
    }

    #[test]
    fn seeded_jitter_is_deterministic() {
        let input = neutral();
        let mut a = UniformJitter::seeded(42);
        let mut b = UniformJitter::seeded(42);
        let first = word_delay_ms("storm", 300, &input, &mut a);
        let second = word_delay_ms("storm", 300, &input, &mut b);
        assert_eq!(first, second);

        for _ in 0..1000 {
            let sample = a.sample();
            assert!((0.0..1.0).contains(&sample));
        }
    }

    #[test]
    fn derives_sentence_counters_from_the_token_sequence() {
        let tokens: Vec<String> = "It was dark. Then, slowly, light came"
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let opener = PaceInput::at(&tokens, 3); // "Then,"
        assert!(opener.first_of_sentence);
        assert!(!opener.after_clause);
        assert_eq!(opener.words_into_sentence, 0);
        assert_eq!(opener.next_word, Some("slowly,"));

        let after_comma = PaceInput::at(&tokens, 4); // "slowly,"
        assert!(!after_comma.first_of_sentence);
        assert!(after_comma.after_clause);
        assert_eq!(after_comma.words_into_sentence, 1);

        let start = PaceInput::at(&tokens, 0);
        assert!(start.first_of_sentence);
        assert_eq!(start.words_into_sentence, 0);

        let last = PaceInput::at(&tokens, tokens.len() - 1);
        assert_eq!(last.next_word, None);
        assert_eq!(last.words_into_sentence, 3);
    }
}
