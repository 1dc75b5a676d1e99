//! Text sanitation applied before anything is typed into the CMS form.

/// Remove every character outside the Basic Multilingual Plane.
///
/// The CMS rich-text widget and the DevTools input path cannot handle
/// supplementary-plane characters (emoji and the like), so they are dropped.
/// Lossy, and idempotent.
pub fn strip_non_bmp(text: &str) -> String {
    text.chars().filter(|c| (*c as u32) <= 0xFFFF).collect()
}

/// Cut `text` to its first `max_chars` characters.
pub fn take_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_non_bmp_removes_emoji() {
        let input = "Oil prices 🚀 rise — Brent at $90 ✓";
        let cleaned = strip_non_bmp(input);
        assert_eq!(cleaned, "Oil prices  rise — Brent at $90 ✓");
    }

    #[test]
    fn test_strip_non_bmp_is_idempotent() {
        let input = "Zürich 👋🏽 café 𝔘 ok";
        let once = strip_non_bmp(input);
        assert_eq!(strip_non_bmp(&once), once);
        assert_eq!(once, "Zürich  café  ok");
    }

    #[test]
    fn test_take_chars() {
        assert_eq!(take_chars("abcdef", 3), "abc");
        assert_eq!(take_chars("ab", 3), "ab");
        assert_eq!(take_chars("ééé", 2), "éé");
        assert_eq!(take_chars("", 5), "");
    }
}
