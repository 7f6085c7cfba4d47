//! Text Measurement
//!
//! Display widths and word wrapping in terminal cells, via `unicode-width`.

use unicode_width::UnicodeWidthStr;

/// Display width of a string in terminal cells.
pub fn string_width(s: &str) -> u16 {
    s.width().min(u16::MAX as usize) as u16
}

/// Width of the longest whitespace-separated word.
pub fn longest_word(s: &str) -> u16 {
    s.split_whitespace().map(string_width).max().unwrap_or(0)
}

/// Wrap text at word boundaries so every line fits in `width` cells.
///
/// Words longer than `width` are broken by character. A zero width returns
/// the text unwrapped.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0u16;

    for word in text.split_whitespace() {
        let word_width = string_width(word);

        if line_width > 0 && line_width + 1 + word_width <= width {
            line.push(' ');
            line.push_str(word);
            line_width += 1 + word_width;
            continue;
        }
        if line_width > 0 {
            lines.push(std::mem::take(&mut line));
            line_width = 0;
        }
        if word_width <= width {
            line.push_str(word);
            line_width = word_width;
            continue;
        }

        for ch in word.chars() {
            let ch_width = string_width(ch.encode_utf8(&mut [0; 4]));
            if line_width + ch_width > width && line_width > 0 {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            line.push(ch);
            line_width += ch_width;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Number of lines `text` occupies at `width`.
pub fn measure_height(text: &str, width: u16) -> u16 {
    wrap_text(text, width).len().min(u16::MAX as usize) as u16
}
