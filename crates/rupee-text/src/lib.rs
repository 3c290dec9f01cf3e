//! Rupee Text - amount and date formatting for vouchers
//!
//! This crate provides:
//! - Number formatting with `#,###.##` patterns
//! - Integers in English words (One Thousand Two Hundred...)
//! - Sri Lankan rupee amounts in words (Rupees, Cents)
//! - Long date formatting (19 October 2026)
//!
//! # Example
//!
//! ```ignore
//! use rupee_text::{format_rupees, format_rupees_words, render_float};
//!
//! let amount = render_float("#,###.##", 2210.0);   // "2,210.00"
//! let label = format_rupees(2210.0);               // "Rs. 2,210.00"
//! let words = format_rupees_words(2210.0);
//! // "Two Thousand Two Hundred Ten Rupees Only"
//! ```

mod formatter;

pub use formatter::{
    format_date_long, format_iso_date_long, format_number_words, format_rupees,
    format_rupees_words, render_float, split_rupees_cents,
};

use thiserror::Error;

/// Errors that can occur during text formatting
#[derive(Debug, Error)]
pub enum TextError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// Result type for text formatting operations
pub type Result<T> = std::result::Result<T, TextError>;
