//! SLTB Voucher - payment voucher forms for the Sri Lanka Tea Board
//!
//! This crate provides:
//! - The four voucher types and their data-driven form templates
//! - Default settings storage and the default-fill resolver
//! - Expenditure line and totals calculation
//! - Voucher number synthesis
//! - JSON persistence through a host gateway
//! - An application state container driving all of the above
//! - A4 PDF export of a filled voucher
//!
//! # Example
//!
//! ```ignore
//! use voucher::{AppConfig, FileGateway, MemoryStore, VoucherApp, VoucherType};
//!
//! let config = AppConfig::from_env();
//! let mut app = VoucherApp::new(
//!     config.clone(),
//!     Box::new(MemoryStore::default()),
//!     Box::new(FileGateway::new(config.voucher_dir.clone())),
//! );
//!
//! app.select_voucher(VoucherType::Payment);
//! app.set_row_field(1, "rate", "1000")?;
//! app.set_row_field(1, "units", "2")?;
//! app.set_field("ssclVat", "2.5")?;
//! app.generate_voucher_number()?;
//! let (file_name, bytes) = app.render_pdf()?;
//! ```

pub mod app;
pub mod autofill;
pub mod calc;
pub mod clock;
pub mod config;
pub mod defaults;
pub mod form_state;
pub mod forms;
pub mod host;
pub mod model;
pub mod numbering;
pub mod pdf;
pub mod persistence;

pub use app::{AppEvent, AppState, Notice, NoticeLevel, VoucherApp};
pub use autofill::{apply_defaults, FillMode, FillOptions, FillReport};
pub use calc::{ExpenditureRow, ExpenditureTable, RowField, Totals};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AppConfig;
pub use defaults::{DefaultSettings, DefaultsRepository, FileStore, KeyValueStore, MemoryStore};
pub use form_state::{Control, FormState};
pub use forms::{form_template, FieldDef, FieldKind, FormTemplate};
pub use host::HostChannel;
pub use model::{ExpenditureLine, Screen, VoucherRecord, VoucherType};
pub use numbering::voucher_number;
pub use pdf::{pdf_file_name, render_voucher_pdf, VoucherView};
pub use persistence::{FileGateway, LoadOutcome, PersistenceGateway, SaveOutcome};

use thiserror::Error;

/// Errors that can occur in voucher processing
#[derive(Debug, Error)]
pub enum VoucherError {
    #[error("Unknown voucher type: {0}")]
    UnknownVoucherType(String),

    #[error("Unknown screen: {0}")]
    UnknownScreen(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field is read-only: {0}")]
    ReadOnlyField(String),

    #[error("Expenditure row {0} not found")]
    RowNotFound(u32),

    #[error("No voucher form is open")]
    NoActiveForm,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Template error: {0}")]
    Template(#[from] template::TemplateError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for voucher operations
pub type Result<T> = std::result::Result<T, VoucherError>;
