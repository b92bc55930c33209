//! Word-centering support for single-word displays.

/// Index of the character a reader's eye should land on when a word is
/// flashed in place. Slightly left of center, drifting further left as the
/// word grows.
pub fn optimal_recognition_point(word: &str) -> usize {
    let cleaned: String = word
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '\'' | '-'))
        .collect();
    let len = cleaned.chars().count();

    if len <= 1 {
        0
    } else if len <= 5 {
        len / 2
    } else if len <= 13 {
        len / 2 - 1
    } else {
        len / 2 - 2
    }
}
