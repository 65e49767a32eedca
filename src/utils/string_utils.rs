//! Text normalization for values read out of the page
//!
//! Listing names, addresses and ratings come back from the DOM with icon-font
//! glyphs (private-use code points), emoji, decorative punctuation and
//! irregular whitespace. [`clean_text`] reduces them to plain, single-spaced
//! text suitable for tabular output.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Punctuation kept alongside word characters and whitespace
const ALLOWED_PUNCTUATION: &[char] = &['.', ',', ':', '+', '-', '(', ')', '/'];

/// Private Use Area of the Basic Multilingual Plane (icon fonts live here)
#[inline]
fn is_private_use(c: char) -> bool {
    ('\u{E000}'..='\u{F8FF}').contains(&c)
}

/// Supplementary planes: emoji, pictographs and other symbols
#[inline]
fn is_supplementary(c: char) -> bool {
    c > '\u{FFFF}'
}

/// Unicode whitespace plus the information separators U+001C..=U+001F
#[inline]
fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1C}'..='\u{1F}').contains(&c)
}

/// Letters, digits and `_`. Combining marks (accents, Arabic harakat,
/// Indic vowel signs) are not word characters even where Unicode counts
/// them as alphabetic.
#[inline]
fn is_word(c: char) -> bool {
    (c.is_alphanumeric() && !is_combining_mark(c)) || c == '_'
}

#[inline]
fn is_kept(c: char) -> bool {
    is_word(c) || is_space(c) || ALLOWED_PUNCTUATION.contains(&c)
}

/// Clean a raw string extracted from the page.
///
/// Applies compatibility decomposition, drops private-use and
/// supplementary-plane code points, strips every character outside
/// `{word, whitespace, . , : + - ( ) /}`, collapses whitespace runs to one
/// space and trims the ends. Combining marks split off by the decomposition
/// are not word characters, so accented letters reduce to their base letter
/// and vowel marks are dropped from Arabic and Indic text.
///
/// Empty input yields an empty string. The function is idempotent:
/// `clean_text(&clean_text(x)) == clean_text(x)`.
///
/// # Examples
/// ```
/// # use leadscrape::utils::clean_text;
/// assert_eq!(clean_text("  Smile\u{E0C8} Dental\n\tClinic "), "Smile Dental Clinic");
/// assert_eq!(clean_text("4.8\u{2605}"), "4.8");
/// assert_eq!(clean_text("Café"), "Cafe");
/// assert_eq!(clean_text(""), "");
/// ```
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let kept: String = text
        .nfkd()
        .filter(|&c| !is_private_use(c) && !is_supplementary(c) && is_kept(c))
        .collect();

    kept.split(is_space)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
