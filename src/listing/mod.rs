//! List screens over paginated GraphQL collections
//!
//! `list_screen` holds the generic controller; the other modules build the
//! concrete queries and row formatting for each collection.

pub mod list_screen;
pub mod invoices;
pub mod class_teachers;
pub mod classpasses;

pub use list_screen::{FetchError, ListQuery, ListScreen, ListState, LoadMore, DEFAULT_PAGE_SIZE};

use unicode_width::UnicodeWidthChar;

/// Cut `text` to at most `max_width` display columns, marking the cut with an ellipsis
pub fn truncate(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_string();
    }

    let mut width = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate("Yoga", 20), "Yoga");
        assert_eq!(truncate("", 5), "");
    }

    #[test]
    fn test_truncate_marks_cut() {
        assert_eq!(truncate("Monthly subscription fee", 10), "Monthly s…");
    }

    #[test]
    fn test_truncate_counts_wide_characters() {
        // each CJK character is two columns wide
        assert_eq!(truncate("ヨガクラス", 5), "ヨガ…");
    }
}
