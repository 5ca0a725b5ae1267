//! The SLIP-0039 wordlist.
//!
//! 1024 words, embedded at compile time via `include_str!` and parsed once on
//! first access with `OnceLock`. The list is sorted, so lookups use binary
//! search. Every word is uniquely identified by its first four letters.

use std::sync::OnceLock;

/// Number of words in the wordlist (one word = 10 bits).
pub const WORDLIST_SIZE: usize = 1024;

/// Bits encoded by a single word.
pub const RADIX_BITS: u32 = 10;

const RAW: &str = include_str!("slip39.txt");

static WORDLIST: OnceLock<Box<[&'static str]>> = OnceLock::new();

fn parse_wordlist(raw: &'static str) -> Box<[&'static str]> {
    let words: Vec<&'static str> = raw.lines().map(str::trim).filter(|w| !w.is_empty()).collect();
    debug_assert!(
        words.len() == WORDLIST_SIZE,
        "SLIP-0039 wordlist must contain exactly {WORDLIST_SIZE} words, got {}",
        words.len()
    );
    words.into_boxed_slice()
}

/// Returns the parsed wordlist.
#[must_use]
pub fn get_wordlist() -> &'static [&'static str] {
    WORDLIST.get_or_init(|| parse_wordlist(RAW))
}

/// Returns the word for a 10-bit index, or `None` if out of range.
#[must_use]
pub fn word_at(index: u16) -> Option<&'static str> {
    get_wordlist().get(usize::from(index)).copied()
}

/// Returns the 0-based index of `word`, case-insensitively.
#[must_use]
pub fn word_index(word: &str) -> Option<u16> {
    let normalized = word.trim().to_ascii_lowercase();
    get_wordlist()
        .binary_search(&normalized.as_str())
        .ok()
        .and_then(|i| u16::try_from(i).ok())
}

/// Check whether `word` is in the wordlist.
#[must_use]
pub fn validate_word(word: &str) -> bool {
    word_index(word).is_some()
}

/// Returns up to `max` words starting with `prefix`.
#[must_use]
pub fn suggest_words(prefix: &str, max: usize) -> Vec<&'static str> {
    let wordlist = get_wordlist();
    let prefix = prefix.trim().to_ascii_lowercase();
    let start = wordlist.partition_point(|w| *w < prefix.as_str());
    wordlist[start..]
        .iter()
        .take_while(|w| w.starts_with(prefix.as_str()))
        .take(max)
        .copied()
        .collect()
}
