//! Preview snippet shown in the university popup

/// Default number of description characters kept in a preview
pub const PREVIEW_CHARS: usize = 300;

/// Appended to every preview, truncated or not
pub const ELLIPSIS: &str = "...";

/// First `max_chars` characters of `description` followed by `"..."`.
///
/// The ellipsis is always appended, even when nothing was cut.
pub fn preview_text(description: &str, max_chars: usize) -> String {
    let cut = description
        .char_indices()
        .nth(max_chars)
        .map(|(byte, _)| byte)
        .unwrap_or(description.len());

    let mut preview = String::with_capacity(cut + ELLIPSIS.len());
    preview.push_str(&description[..cut]);
    preview.push_str(ELLIPSIS);
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_description_still_gets_ellipsis() {
        assert_eq!(preview_text("Short", PREVIEW_CHARS), "Short...");
        assert_eq!(preview_text("", PREVIEW_CHARS), "...");
    }

    #[test]
    fn test_long_description_is_cut() {
        let description = "x".repeat(310);
        let preview = preview_text(&description, PREVIEW_CHARS);

        assert_eq!(preview, format!("{}...", "x".repeat(300)));
    }

    #[test]
    fn test_exact_length_is_kept() {
        let description = "y".repeat(300);
        assert_eq!(preview_text(&description, PREVIEW_CHARS), format!("{}...", description));
    }

    #[test]
    fn test_cut_respects_char_boundaries() {
        let description = "é".repeat(5);
        assert_eq!(preview_text(&description, 3), "ééé...");
    }
}
