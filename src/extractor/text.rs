//! Tokenization, syllable estimation and Flesch reading ease.

use regex::Regex;
use std::sync::OnceLock;

pub const READING_EASE_MIN: f64 = -50.0;
pub const READING_EASE_MAX: f64 = 120.0;

fn vowel_cluster() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[aeiouy]{1,2}").unwrap())
}

fn sentence_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+\s+").unwrap())
}

pub fn tokenize(text: &str) -> Vec<&str> {
    // split_whitespace already treats newlines as separators
    text.split_whitespace().collect()
}

pub fn estimate_syllables(word: &str) -> usize {
    let letters: String = word
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect();

    let mut count = vowel_cluster().find_iter(&letters).count();
    if letters.ends_with('e') {
        count = count.saturating_sub(1);
    }
    count.max(1)
}

pub fn flesch_reading_ease(text: &str) -> f64 {
    let sentences = sentence_break()
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .count()
        .max(1) as f64;

    let words = tokenize(text);
    let syllables: usize = words.iter().map(|w| estimate_syllables(w)).sum();
    let word_count = words.len().max(1) as f64;

    let score = 206.835 - 1.015 * (word_count / sentences) - 84.6 * (syllables as f64 / word_count);
    score.clamp(READING_EASE_MIN, READING_EASE_MAX)
}
