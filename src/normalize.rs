//! Text folding and whole-word search over folded text.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w']+").unwrap());

/// Lowercase, strip diacritics, fold punctuation to single spaces.
///
/// Apostrophes survive so that elided forms ("aujourd'hui", "m'a") keep
/// their shape; every other non-word character becomes a separator.
pub fn normalize(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.nfd().filter(|c| !is_combining_mark(*c)) {
        match c {
            '\u{2019}' | '\u{2018}' | '\u{02BC}' | '`' | '\u{00B4}' => folded.push('\''),
            '\u{0153}' | '\u{0152}' => folded.push_str("oe"),
            '\u{00E6}' | '\u{00C6}' => folded.push_str("ae"),
            _ => folded.extend(c.to_lowercase()),
        }
    }
    NON_WORD_RE.replace_all(&folded, " ").trim().to_string()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte ranges of `term` in `haystack` where it stands as a whole word.
///
/// Boundaries are checked explicitly on the neighbouring characters; an
/// apostrophe counts as a boundary, so "l'ecole" contains "ecole".
pub fn term_matches<'a>(
    haystack: &'a str,
    term: &'a str,
) -> impl Iterator<Item = (usize, usize)> + 'a {
    haystack
        .match_indices(term)
        .filter(move |(start, _)| {
            let end = start + term.len();
            let before_ok = haystack[..*start]
                .chars()
                .next_back()
                .map_or(true, |c| !is_word_char(c));
            let after_ok = haystack[end..]
                .chars()
                .next()
                .map_or(true, |c| !is_word_char(c));
            before_ok && after_ok
        })
        .map(move |(start, _)| (start, start + term.len()))
}

pub fn contains_term(haystack: &str, term: &str) -> bool {
    term_matches(haystack, term).next().is_some()
}

pub fn contains_any(haystack: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| contains_term(haystack, t))
}

pub fn count_terms(haystack: &str, terms: &[&str]) -> usize {
    terms.iter().map(|t| term_matches(haystack, t).count()).sum()
}

/// Slice `text[start..end]`, widening each end to the nearest char boundary.
pub fn window(text: &str, start: usize, end: usize) -> &str {
    let start = snap_to_char_boundary(text, start, false);
    let end = snap_to_char_boundary(text, end, true);
    &text[start..end]
}

pub fn context_around(text: &str, start: usize, end: usize, width: usize) -> String {
    let mid = (start + end) / 2;
    let half = width / 2;
    let ctx_start = snap_to_char_boundary(text, mid.saturating_sub(half), false);
    let ctx_end = snap_to_char_boundary(text, std::cmp::min(text.len(), mid + half), true);

    let prefix = if ctx_start > 0 { "..." } else { "" };
    let suffix = if ctx_end < text.len() { "..." } else { "" };
    format!("{prefix}{}{suffix}", &text[ctx_start..ctx_end])
}

/// Snap a byte offset to a valid char boundary.
/// If `forward` is true, snap forward; otherwise snap backward.
fn snap_to_char_boundary(text: &str, pos: usize, forward: bool) -> usize {
    if pos >= text.len() {
        return text.len();
    }
    let mut p = pos;
    if forward {
        while p < text.len() && !text.is_char_boundary(p) {
            p += 1;
        }
    } else {
        while p > 0 && !text.is_char_boundary(p) {
            p -= 1;
        }
    }
    p
}
