//! Text Measurement
//!
//! Approximate text metrics for intrinsic sizing of text-bearing nodes.
//!
//! Glyphs are measured on a fixed advance grid:
//! - ASCII printable: one advance
//! - CJK and emoji: two advances
//! - Control characters: zero
//!
//! Lines are [`LINE_HEIGHT`] tall.

/// Horizontal advance of one narrow glyph.
pub const CHAR_WIDTH: f32 = 7.0;

/// Height of one text line.
pub const LINE_HEIGHT: f32 = 16.0;

/// Advances taken by one character.
fn char_advances(c: char) -> u32 {
    if c.is_ascii() {
        return if c.is_ascii_control() { 0 } else { 1 };
    }
    let code = c as u32;
    if (0x1100..=0x115F).contains(&code)     // Hangul Jamo
        || (0x2E80..=0x9FFF).contains(&code)   // CJK
        || (0xAC00..=0xD7A3).contains(&code)   // Hangul Syllables
        || (0xF900..=0xFAFF).contains(&code)   // CJK Compatibility
        || (0xFF00..=0xFF60).contains(&code)   // Fullwidth Forms
        || (0x1F300..=0x1F9FF).contains(&code) // Emoji
        || (0x20000..=0x2FFFF).contains(&code) // CJK Extension B-F
    {
        2
    } else {
        1
    }
}

/// Width of the longest line of `text`.
pub fn text_width(text: &str) -> f32 {
    text.split('\n')
        .map(|line| line.chars().map(char_advances).sum::<u32>())
        .max()
        .unwrap_or(0) as f32
        * CHAR_WIDTH
}

/// Number of lines `text` occupies when wrapped at `available_width`.
///
/// Empty text takes no lines. Wrapping happens at glyph boundaries.
pub fn line_count(text: &str, available_width: f32) -> u32 {
    if text.is_empty() {
        return 0;
    }

    let max_advances = (available_width / CHAR_WIDTH).floor().max(1.0) as u32;
    let mut lines = 0u32;

    for line in text.split('\n') {
        let mut current = 0u32;
        lines += 1;
        for c in line.chars() {
            let advances = char_advances(c);
            if current + advances > max_advances && current > 0 {
                lines += 1;
                current = advances;
            } else {
                current += advances;
            }
        }
    }

    lines
}

/// Height of `text` when wrapped at `available_width`.
pub fn text_height(text: &str, available_width: f32) -> f32 {
    line_count(text, available_width) as f32 * LINE_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_width() {
        assert_eq!(text_width("hello"), 5.0 * CHAR_WIDTH);
        assert_eq!(text_width(""), 0.0);
    }

    #[test]
    fn test_wide_glyphs() {
        assert_eq!(text_width("日本"), 4.0 * CHAR_WIDTH);
    }

    #[test]
    fn test_longest_line_wins() {
        assert_eq!(text_width("ab\nabcd"), 4.0 * CHAR_WIDTH);
    }

    #[test]
    fn test_line_count_wraps() {
        assert_eq!(line_count("", 100.0), 0);
        assert_eq!(line_count("abcd", 100.0), 1);
        assert_eq!(line_count("abcd", 2.0 * CHAR_WIDTH), 2);
        assert_eq!(line_count("a\nb", 100.0), 2);
    }

    #[test]
    fn test_height() {
        assert_eq!(text_height("abc", 1000.0), LINE_HEIGHT);
    }
}
