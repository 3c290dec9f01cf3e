//! PDF Core - Low-level page drawing
//!
//! This crate provides functionality for:
//! - Creating blank A4 documents
//! - Drawing text at absolute coordinates with the standard Helvetica faces
//! - Drawing rectangles and lines
//! - Saving documents to disk or to bytes
//!
//! Coordinates are in points, measured from the top-left corner of the page.
//! Use [`mm`] to convert millimetre layouts.
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{mm, Align, PdfDocument, StandardFont};
//!
//! let mut doc = PdfDocument::new_a4();
//! doc.set_font(StandardFont::HelveticaBold, 16.0);
//! doc.insert_text("Sri Lanka Tea Board", 1, mm(105.0), mm(25.0), Align::Center)?;
//! doc.draw_rect(1, mm(15.0), mm(15.0), mm(25.0), mm(25.0))?;
//! doc.save("voucher.pdf")?;
//! ```

mod document;
mod font;
mod text;

pub use document::{Color, PdfDocument, A4_HEIGHT, A4_WIDTH};
pub use font::{encode_win_ansi, FontStyle, FontWeight, StandardFont};
pub use text::{generate_text_operators, simple_word_wrap, truncate_chars, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Compression error: {0}")]
    CompressionError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Points per millimetre
pub const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Convert millimetres to points
pub fn mm(value: f64) -> f64 {
    value * POINTS_PER_MM
}
