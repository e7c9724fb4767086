//! Text Measurement
//!
//! Cell-based text metrics and a ready-made measurement function for text
//! leaves. One cell is one layout pixel.
//!
//! Character widths:
//! - ASCII printable: 1 cell
//! - CJK and most emoji: 2 cells (fullwidth)
//! - Control characters: 0 cells
//!
//! The wide ranges are an approximation, not a full East Asian Width table.

use std::sync::Arc;

use crate::layout::node::{MeasureFn, MeasuredSize, measure_fn};

fn char_width(c: char) -> u16 {
    if c.is_ascii() {
        return if c.is_ascii_control() { 0 } else { 1 };
    }
    let code = c as u32;
    if (0x1100..=0x115F).contains(&code)     // Hangul Jamo
        || (0x2E80..=0x9FFF).contains(&code)   // CJK
        || (0xAC00..=0xD7A3).contains(&code)   // Hangul Syllables
        || (0xF900..=0xFAFF).contains(&code)   // CJK Compatibility
        || (0xFE10..=0xFE1F).contains(&code)   // Vertical Forms
        || (0xFE30..=0xFE6F).contains(&code)   // CJK Compatibility Forms
        || (0xFF00..=0xFF60).contains(&code)   // Fullwidth Forms
        || (0xFFE0..=0xFFE6).contains(&code)   // Fullwidth Forms
        || (0x1F300..=0x1F9FF).contains(&code) // Emoji
        || (0x20000..=0x2FFFF).contains(&code) // CJK Extension B-F
    {
        2
    } else {
        1
    }
}

/// Display width of a string in cells.
pub fn string_width(s: &str) -> u16 {
    s.chars()
        .fold(0u16, |width, c| width.saturating_add(char_width(c)))
}

/// Hard-wrap text at `width` cells. Explicit newlines always break.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    if text.is_empty() {
        return vec![];
    }

    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0u16;

    for c in text.chars() {
        if c == '\n' {
            lines.push(std::mem::take(&mut current_line));
            current_width = 0;
            continue;
        }

        let w = char_width(c);
        if current_width + w > width && !current_line.is_empty() {
            lines.push(std::mem::take(&mut current_line));
            current_width = 0;
        }

        current_line.push(c);
        current_width += w;
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

/// Size of `text` wrapped to at most `max_width` cells.
///
/// An infinite `max_width` never wraps. Finite widths wrap at
/// `max(1, floor(max_width))`.
pub fn text_size(text: &str, max_width: f32) -> MeasuredSize {
    let wrap_at = if max_width.is_finite() {
        max_width.floor().clamp(1.0, u16::MAX as f32) as u16
    } else {
        u16::MAX
    };
    let lines = wrap_text(text, wrap_at);
    let width = lines.iter().map(|line| string_width(line)).max().unwrap_or(0);
    MeasuredSize::new(width as f32, lines.len() as f32)
}

/// Measurement function for a static text leaf.
pub fn text_measure_fn(text: impl Into<String>) -> MeasureFn {
    let text: Arc<str> = Arc::from(text.into());
    measure_fn(move |input| Ok(text_size(&text, input.max_width)))
}
