//! Word frequency extraction for word clouds.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Default number of words kept per word cloud.
pub const DEFAULT_TOP_N: usize = 30;

/// Commas, middle dots, slashes (ASCII and full-width) and whitespace.
static DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,、，・･/／\s]+").expect("delimiter pattern is valid"));

/// One entry of a word cloud.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    /// The token.
    pub text: String,
    /// How many times it occurred.
    pub value: usize,
}

/// Split a free-text value into trimmed, non-empty tokens.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    DELIMITERS
        .split(text)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Build a frequency-ranked word list from free-text values.
///
/// Absent values are skipped. Tokens are counted case-sensitively, ranked by
/// descending count with ties kept in first-encountered order, and the list
/// is cut to `top_n` entries.
#[must_use]
pub fn word_frequency<'a, I>(values: I, top_n: usize) -> Vec<WordCount>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for value in values.into_iter().flatten() {
        for token in tokenize(value) {
            *counts.entry(token).or_default() += 1;
        }
    }

    let mut words: Vec<WordCount> = counts
        .into_iter()
        .map(|(text, value)| WordCount {
            text: text.to_string(),
            value,
        })
        .collect();
    words.sort_by(|a, b| b.value.cmp(&a.value));
    words.truncate(top_n);
    words
}
