//! Text normalization applied before every title match and body-name comparison.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static HORIZONTAL_WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\S\n]+").expect("valid whitespace regex"));
static SPACE_AROUND_NEWLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" ?\n ?").expect("valid newline regex"));
static EXCESS_NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("valid newline run regex"));

/// Collapse whitespace, unify line breaks and NFC-normalize `input`.
///
/// Casing is preserved. Leading and trailing whitespace is removed.
pub fn str_simplified(input: &str) -> String {
    let composed: String = input.nfc().collect();
    let unified = composed.replace("\r\n", "\n").replace('\r', "\n");
    let collapsed = HORIZONTAL_WHITESPACE.replace_all(&unified, " ");
    let tightened = SPACE_AROUND_NEWLINE.replace_all(&collapsed, "\n");
    let limited = EXCESS_NEWLINES.replace_all(&tightened, "\n\n");
    limited.trim().to_string()
}

/// Lower-cased [`str_simplified`], used as the identity of a body name.
pub fn simplified_key(input: &str) -> String {
    str_simplified(input).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_inner_whitespace_and_trims() {
        assert_eq!(str_simplified("  City \t  Council  "), "City Council");
    }

    #[test]
    fn test_non_breaking_space_is_whitespace() {
        assert_eq!(str_simplified("Council\u{00a0}\u{00a0}President"), "Council President");
    }

    #[test]
    fn test_line_breaks_are_unified() {
        assert_eq!(str_simplified("Vice\r\nChair"), "Vice\nChair");
        assert_eq!(str_simplified("a \r\n\r\n\r\n\n b"), "a\n\nb");
    }

    #[test]
    fn test_unicode_is_composed() {
        // "e" followed by a combining acute accent
        let decomposed = "Jose\u{0301} Council";
        assert_eq!(str_simplified(decomposed), "Jos\u{00e9} Council");
    }

    #[test]
    fn test_simplified_key_lowercases() {
        assert_eq!(simplified_key(" CITY   Council\n"), "city council");
    }
}
