//! Text Measurement
//!
//! Utilities for measuring text dimensions in terminal cells.
//!
//! Terminal text width depends on Unicode character widths:
//! - ASCII characters: 1 cell
//! - CJK characters: 2 cells (fullwidth)
//! - Emoji: 2 cells (most)
//! - Zero-width characters: 0 cells
//!
//! Widths come from `unicode-width`. Wrapping breaks at whitespace and only
//! splits a word when it is wider than the line.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of one character. Control characters have no width.
pub fn char_width(c: char) -> u16 {
    c.width().unwrap_or(0) as u16
}

/// Measure the display width of a string in terminal cells.
pub fn string_width(s: &str) -> u16 {
    u16::try_from(s.width()).unwrap_or(u16::MAX)
}

/// Measure the height of text when wrapped to a given width.
///
/// Returns the number of lines (0 for empty text).
pub fn measure_text_height(text: &str, available_width: u16) -> u16 {
    u16::try_from(wrap_text(text, available_width).len()).unwrap_or(u16::MAX)
}

/// Word-wrap text to a given width.
///
/// Explicit newlines are kept. Runs of whitespace collapse to one space.
/// A width of 0 returns each paragraph unwrapped.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    if text.is_empty() {
        return vec![];
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if width == 0 {
            lines.push(paragraph.to_string());
            continue;
        }
        wrap_paragraph(paragraph, width, &mut lines);
    }
    lines
}

fn wrap_paragraph(paragraph: &str, width: u16, lines: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_width = 0u16;

    for word in paragraph.split_whitespace() {
        let word_width = string_width(word);

        if current_width > 0 && current_width + 1 + word_width <= width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
            continue;
        }

        if current_width > 0 {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width <= width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        // Wider than the line: hard-break by character.
        for c in word.chars() {
            let w = char_width(c);
            if current_width + w > width && current_width > 0 {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(c);
            current_width += w;
        }
    }

    // Blank paragraphs still take a line.
    lines.push(current);
}

/// Truncate text to fit within a given width.
///
/// If text is longer than width, it's truncated and an ellipsis is added.
pub fn truncate_text(text: &str, width: u16) -> String {
    if width == 0 {
        return String::new();
    }

    if string_width(text) <= width {
        return text.to_string();
    }

    // Leave room for the ellipsis.
    let target_width = width.saturating_sub(1);
    let mut result = String::new();
    let mut current_width = 0u16;

    for c in text.chars() {
        let w = char_width(c);
        if current_width + w > target_width {
            break;
        }
        result.push(c);
        current_width += w;
    }

    result.push('…');
    result
}

/// Leftmost `width` cells of `text`, never splitting a wide character.
pub fn take_width(text: &str, width: u16) -> &str {
    let mut used = 0u16;
    for (i, c) in text.char_indices() {
        let w = char_width(c);
        if used + w > width {
            return &text[..i];
        }
        used += w;
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_width_ascii() {
        assert_eq!(string_width("hello"), 5);
        assert_eq!(string_width(""), 0);
        assert_eq!(string_width("a b c"), 5);
    }

    #[test]
    fn test_string_width_wide() {
        assert_eq!(string_width("日本"), 4);
        assert_eq!(char_width('\u{200B}'), 0);
    }

    #[test]
    fn test_measure_text_height_simple() {
        assert_eq!(measure_text_height("hello", 10), 1);
        assert_eq!(measure_text_height("hello world", 5), 2);
        assert_eq!(measure_text_height("", 10), 0);
    }

    #[test]
    fn test_measure_text_height_newlines() {
        assert_eq!(measure_text_height("a\nb\nc", 10), 3);
        assert_eq!(measure_text_height("hello\n\nworld", 10), 3);
    }

    #[test]
    fn test_wrap_text_at_words() {
        let lines = wrap_text("the quick brown fox", 10);
        assert_eq!(lines, vec!["the quick", "brown fox"]);
    }

    #[test]
    fn test_wrap_long_word() {
        let lines = wrap_text("abcdefghij xy", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij", "xy"]);
    }

    #[test]
    fn test_wrap_text_newlines() {
        let lines = wrap_text("a\nb", 10);
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello world", 6), "hello…");
        assert_eq!(truncate_text("", 5), "");
        assert_eq!(truncate_text("hello", 4), "hel…");
    }

    #[test]
    fn test_take_width() {
        assert_eq!(take_width("hello", 3), "hel");
        assert_eq!(take_width("日本", 3), "日");
        assert_eq!(take_width("hi", 10), "hi");
    }
}
