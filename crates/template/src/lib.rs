//! Template Engine - data-bound page layouts
//!
//! This crate provides:
//! - Template JSON schema types and a fluent builder
//! - Template parsing from JSON
//! - Block rendering (text, table, list, rect, line)
//! - Data binding via JSONPath-like expressions
//!
//! # Example
//!
//! ```ignore
//! use template::{Align, FontStyle, Template, TemplateRenderer};
//!
//! let mut template = Template::new_mm("Payment Voucher");
//! template
//!     .set_font(16, FontStyle::Bold)
//!     .insert_text("Sri Lanka Tea Board", 1, 105.0, 25.0, Align::Center)
//!     .insert_binding("$.fields.voucherNo", 1, 160.0, 23.0, Align::Left);
//!
//! let data: serde_json::Value = serde_json::from_str(view_json)?;
//! let pdf_bytes = TemplateRenderer::new(&template).render_to_bytes(&data)?;
//! ```

pub mod blocks;
pub mod parser;
mod renderer;
mod schema;

pub use parser::parse_template;
pub use renderer::TemplateRenderer;
pub use schema::*;

use thiserror::Error;

/// Errors that can occur during template processing
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to parse template: {0}")]
    ParseError(String),

    #[error("Invalid data binding: {0}")]
    BindingError(String),

    #[error("PDF error: {0}")]
    PdfError(#[from] pdf_core::PdfError),

    #[error("Text error: {0}")]
    TextError(#[from] rupee_text::TextError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;
