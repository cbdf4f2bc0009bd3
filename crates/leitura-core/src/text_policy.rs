//! Tokenization and label formatting shared by the session and the screen.

use alloc::{string::String, vec::Vec};
use core::fmt::Write;

use heapless::String as HeaplessString;

use crate::session::Speed;

pub const SPEED_LABEL_BYTES: usize = 24;
pub const PROGRESS_LABEL_BYTES: usize = 24;

/// True when the text has nothing but whitespace.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Splits on single spaces, keeping empty tokens so that joining the result
/// with `" "` reproduces the input exactly.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(' ').map(String::from).collect()
}

/// Text shown after `count` words have been revealed.
pub fn revealed_prefix(words: &[String], count: usize) -> String {
    words[..count.min(words.len())].join(" ")
}

pub fn speed_label(speed: Speed) -> HeaplessString<SPEED_LABEL_BYTES> {
    let mut out = HeaplessString::new();
    // Longest output is "Velocidade: 3.0x", well under capacity.
    let _ = write!(out, "Velocidade: {speed}x");
    out
}

pub fn progress_label(revealed: usize, total: usize) -> HeaplessString<PROGRESS_LABEL_BYTES> {
    let mut out = HeaplessString::new();
    if total == 0 {
        return out;
    }
    if write!(out, "{revealed}/{total}").is_err() {
        out.clear();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn tokenize_keeps_empty_tokens_between_double_spaces() {
        let words = tokenize("a  b");
        assert_eq!(words, vec!["a", "", "b"]);
        assert_eq!(words.join(" "), "a  b");
    }

    #[test]
    fn tokenize_does_not_split_on_newlines() {
        let words = tokenize("line one\nline two");
        assert_eq!(words, vec!["line", "one\nline", "two"]);
    }

    #[test]
    fn revealed_prefix_clamps_to_word_count() {
        let words = tokenize("one two three");
        assert_eq!(revealed_prefix(&words, 0), "");
        assert_eq!(revealed_prefix(&words, 2), "one two");
        assert_eq!(revealed_prefix(&words, 9), "one two three");
    }

    #[test]
    fn blank_detection_trims_all_whitespace() {
        assert!(is_blank(""));
        assert!(is_blank(" \n\t "));
        assert!(!is_blank("  x "));
    }

    #[test]
    fn labels_format_speed_and_progress() {
        assert_eq!(speed_label(Speed::from_tenths(15)).as_str(), "Velocidade: 1.5x");
        assert_eq!(speed_label(Speed::MAX).as_str(), "Velocidade: 3.0x");
        assert_eq!(progress_label(3, 10).as_str(), "3/10");
        assert_eq!(progress_label(0, 0).as_str(), "");
    }
}
