//! Normalization of noisy semi-structured fields.
//!
//! Hometowns and personality codes are typed in by students as free text.
//! These helpers reduce them to stable group labels on a best-effort basis.

use std::sync::LazyLock;

use regex::Regex;

/// Label used when a personality code is absent.
pub const NOT_SPECIFIED: &str = "Not specified";

/// First prefecture name: a two character stem before 都/道, or a two to
/// three character stem before 府/県.
///
/// 東京都府中市 yields 東京都, and 京都府 is not cut at its inner 都.
static PREFECTURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\S{2}[都道]|\S{2,3}?[府県]").expect("prefecture pattern is valid")
});

static PERSONALITY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[EI][NS][FT][JP]$").expect("personality pattern is valid"));

/// Extract the prefecture from a hometown address.
///
/// Returns the input unchanged when no prefecture suffix is found.
#[must_use]
pub fn extract_prefecture(address: &str) -> &str {
    PREFECTURE.find(address).map_or(address, |m| m.as_str())
}

/// Normalize a self-reported personality code.
///
/// Valid codes are uppercased with whitespace removed. Anything else is
/// returned trimmed but otherwise as entered. Absent or blank input maps to
/// [`NOT_SPECIFIED`].
#[must_use]
pub fn normalize_personality_code(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return NOT_SPECIFIED.to_string();
    };

    let cleaned: String = raw
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let first_four: String = cleaned.chars().take(4).collect();

    if PERSONALITY_CODE.is_match(&first_four) {
        first_four
    } else {
        raw.to_string()
    }
}
