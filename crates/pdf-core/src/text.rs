//! Text rendering utilities

use crate::document::Color;
use crate::Align;

/// Context for rendering text
pub struct TextRenderContext {
    /// PDF font resource name (e.g., "F1")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Text width in points (for alignment)
    pub text_width: f64,
    /// Text color (RGB)
    pub color: Color,
}

/// Generate PDF operators for text insertion
///
/// Creates the PDF text operators (BT, rg, Tf, Td, Tj, ET) to render text
/// at a specific position with alignment support.
///
/// # Arguments
/// * `text_hex` - Hex-encoded WinAnsi text (e.g., "<48656C6C6F>")
/// * `x` - X coordinate in points (PDF coordinates, from left)
/// * `y` - Y coordinate in points (PDF coordinates, from bottom)
/// * `align` - Text alignment relative to `x`
/// * `ctx` - Text rendering context
pub fn generate_text_operators(
    text_hex: &str,
    x: f64,
    y: f64,
    align: Align,
    ctx: &TextRenderContext,
) -> Vec<u8> {
    let x = match align {
        Align::Left => x,
        Align::Center => x - ctx.text_width / 2.0,
        Align::Right => x - ctx.text_width,
    };
    let Color { r, g, b } = ctx.color;

    format!(
        "BT\n{r} {g} {b} rg\n/{font} {size} Tf\n{x} {y} Td\n{text_hex} Tj\nET\n",
        font = ctx.font_name,
        size = ctx.font_size,
    )
    .into_bytes()
}

/// Split text into lines based on maximum characters per line
///
/// Splits on whitespace; a single word longer than `max_chars` stays whole.
///
/// # Arguments
/// * `text` - Text to split
/// * `max_chars` - Maximum characters per line
pub fn simple_word_wrap(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        let current_len = current_line.chars().count();
        let word_len = word.chars().count();

        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_len + 1 + word_len <= max_chars {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(current_line);
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Cut text to at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
