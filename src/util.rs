//! Shared utility functions

use std::borrow::Cow;

/// Byte offset of the first ASCII-case-insensitive occurrence of `needle`.
///
/// Only ASCII letters are folded. Labels such as `Sender:` are fixed server
/// strings, unlike player names which go through [`eq_ignore_case`].
///
/// Offsets always fall on a UTF-8 character boundary of `haystack`, so the
/// result can be used to slice it directly.
///
/// # Examples
///
/// ```
/// use zarasprite::util::find_ignore_ascii_case;
///
/// assert_eq!(find_ignore_ascii_case("Hover: SENDER: Bob", "sender:"), Some(7));
/// assert_eq!(find_ignore_ascii_case("plain chat", "sender:"), None);
/// ```
pub fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .enumerate()
        .find(|(i, window)| haystack.is_char_boundary(*i) && window.eq_ignore_ascii_case(needle))
        .map(|(i, _)| i)
}

/// Case-insensitive equality for player names
///
/// Uses full Unicode lowercase mapping, so `"Élodie"` equals `"éLODIE"`.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Shorten `text` to at most `max_chars` characters for log output.
///
/// Appends `…` when something was cut.
pub fn preview(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        None => Cow::Borrowed(text),
        Some((end, _)) => Cow::Owned(format!("{}…", &text[..end])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_case_insensitive() {
        assert_eq!(find_ignore_ascii_case("Sender: Bob", "sender:"), Some(0));
        assert_eq!(find_ignore_ascii_case("xx SeNdEr:", "sender:"), Some(3));
    }

    #[test]
    fn test_find_missing() {
        assert_eq!(find_ignore_ascii_case("send", "sender:"), None);
        assert_eq!(find_ignore_ascii_case("", "sender:"), None);
    }

    #[test]
    fn test_find_skips_multibyte_prefix() {
        // "é" is two bytes; the match must land on a char boundary
        assert_eq!(find_ignore_ascii_case("é sender:", "SENDER:"), Some(3));
    }

    #[test]
    fn test_eq_ignore_case_folds_non_ascii() {
        assert!(eq_ignore_case("Élodie", "éLODIE"));
        assert!(eq_ignore_case("Zarathale", "ZARATHALE"));
        assert!(!eq_ignore_case("Zarathale", "Zarathal"));
    }

    #[test]
    fn test_preview_short_text_is_borrowed() {
        assert!(matches!(preview("hello", 10), Cow::Borrowed("hello")));
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("日本語です", 2), "日本…");
    }
}
