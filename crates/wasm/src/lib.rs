//! WASM bindings for the SLTB voucher forms
//!
//! This crate provides a JavaScript-friendly API for:
//! - Driving the voucher screens and forms from a web page
//! - Keeping default settings in `localStorage`
//! - Saving and opening voucher JSON through host callbacks
//! - Exporting and printing the filled voucher
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { VoucherSession, RupeeFormatter } from 'voucher-wasm';
//!
//! await init();
//!
//! // Host callbacks return `{ success, path | data, error }`
//! const session = new VoucherSession(
//!     (record) => window.electronAPI.saveVoucherDataSync(record),
//!     () => window.electronAPI.loadVoucherDataSync(),
//! );
//!
//! session.subscribe((event) => render(event, session.state()));
//! session.selectVoucher('payment');
//! session.setRowField(1, 'rate', '1000');
//! session.setRowField(1, 'units', '2');
//!
//! const pdf = session.renderPdf();
//! download(pdf.fileName, pdf.bytes);
//! ```

use chrono::{DateTime, Utc};
use js_sys::Function;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use voucher::{
    AppConfig, Clock, KeyValueStore, LoadOutcome, MemoryStore, PersistenceGateway, SaveOutcome,
    VoucherApp, VoucherError, VoucherRecord, VoucherType,
};
use wasm_bindgen::prelude::*;

// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Plain JS objects instead of `Map` for JSON maps
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).map_err(js_error)
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(js_error)
}

/// Time from the JS `Date`; chrono's system clock is unavailable here
struct JsClock;

impl Clock for JsClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
    }
}

/// Default settings kept in the browser's `localStorage`
struct LocalStorageStore {
    storage: web_sys::Storage,
}

impl LocalStorageStore {
    fn open() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| js_error("No window available"))?;
        let storage = window
            .local_storage()?
            .ok_or_else(|| js_error("localStorage is not available"))?;
        Ok(Self { storage })
    }
}

fn storage_error(e: JsValue) -> VoucherError {
    VoucherError::Storage(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> voucher::Result<Option<String>> {
        self.storage.get_item(key).map_err(storage_error)
    }

    fn set(&mut self, key: &str, value: &str) -> voucher::Result<()> {
        self.storage.set_item(key, value).map_err(storage_error)
    }

    fn remove(&mut self, key: &str) -> voucher::Result<()> {
        self.storage.remove_item(key).map_err(storage_error)
    }
}

/// Persistence through synchronous host callbacks
struct JsGateway {
    save: Function,
    load: Function,
}

impl JsGateway {
    fn call_save(&self, record: &VoucherRecord) -> Result<SaveOutcome, JsValue> {
        let result = self.save.call1(&JsValue::NULL, &to_js(record)?)?;
        from_js(result)
    }

    fn call_load(&self) -> Result<LoadOutcome, JsValue> {
        let result = self.load.call0(&JsValue::NULL)?;
        from_js(result)
    }
}

fn describe(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

impl PersistenceGateway for JsGateway {
    fn save(&mut self, record: &VoucherRecord) -> SaveOutcome {
        self.call_save(record)
            .unwrap_or_else(|e| SaveOutcome::failed(describe(e)))
    }

    fn load(&mut self) -> LoadOutcome {
        self.call_load()
            .unwrap_or_else(|e| LoadOutcome::failed(describe(e)))
    }
}

/// A rendered voucher PDF
#[wasm_bindgen]
pub struct PdfExport {
    file_name: String,
    bytes: Vec<u8>,
}

#[wasm_bindgen]
impl PdfExport {
    /// Suggested download name, e.g. `SLTB_Payment_Voucher_PV-261019-0042_2026-10-19.pdf`
    #[wasm_bindgen(getter, js_name = fileName)]
    pub fn file_name(&self) -> String {
        self.file_name.clone()
    }

    /// PDF bytes (Uint8Array)
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

/// One running voucher application
#[wasm_bindgen]
pub struct VoucherSession {
    app: VoucherApp,
}

impl VoucherSession {
    fn build(store: Box<dyn KeyValueStore>, save: Function, load: Function) -> VoucherSession {
        let app = VoucherApp::new_with_clock(
            AppConfig::default(),
            store,
            Box::new(JsGateway { save, load }),
            Box::new(JsClock),
        );
        VoucherSession { app }
    }
}

#[wasm_bindgen]
impl VoucherSession {
    /// Create a session with defaults in `localStorage`
    ///
    /// @param save - `(record) => ({ success, path?, error? })`
    /// @param load - `() => ({ success, data?, error? })`
    #[wasm_bindgen(constructor)]
    pub fn new(save: Function, load: Function) -> Result<VoucherSession, JsValue> {
        let store = LocalStorageStore::open()?;
        Ok(Self::build(Box::new(store), save, load))
    }

    /// Create a session whose defaults live only as long as the session
    #[wasm_bindgen(js_name = inMemory)]
    pub fn in_memory(save: Function, load: Function) -> VoucherSession {
        Self::build(Box::new(MemoryStore::new()), save, load)
    }

    /// Register a listener for state changes
    ///
    /// @param listener - Called with `{ event, payload }`
    pub fn subscribe(&mut self, listener: Function) {
        self.app.subscribe(move |event| {
            if let Ok(value) = to_js(event) {
                let _ = listener.call1(&JsValue::NULL, &value);
            }
        });
    }

    /// Current screen, form, defaults and last notice
    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(self.app.state())
    }

    /// Switch screens by tag (`welcome`, `defaults`, `payment`, ...)
    pub fn show(&mut self, screen: &str) -> Result<(), JsValue> {
        self.app.show_tag(screen).map_err(js_error)
    }

    #[wasm_bindgen(js_name = selectVoucher)]
    pub fn select_voucher(&mut self, voucher_type: &str) -> Result<(), JsValue> {
        let voucher_type: VoucherType = voucher_type.parse().map_err(js_error)?;
        self.app.select_voucher(voucher_type);
        Ok(())
    }

    /// Set an input; returns the recomputed totals
    #[wasm_bindgen(js_name = setField)]
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<JsValue, JsValue> {
        let totals = self.app.set_field(name, value).map_err(js_error)?;
        to_js(&totals)
    }

    #[wasm_bindgen(js_name = setCheckbox)]
    pub fn set_checkbox(&mut self, name: &str, checked: bool) -> Result<(), JsValue> {
        self.app.set_checkbox(name, checked).map_err(js_error)
    }

    /// Append an expenditure row; returns its id
    #[wasm_bindgen(js_name = addRow)]
    pub fn add_row(&mut self) -> Result<u32, JsValue> {
        self.app.add_row().map_err(js_error)
    }

    #[wasm_bindgen(js_name = removeRow)]
    pub fn remove_row(&mut self, id: u32) -> Result<JsValue, JsValue> {
        let totals = self.app.remove_row(id).map_err(js_error)?;
        to_js(&totals)
    }

    /// Edit `desc`, `rate` or `units` of a row
    #[wasm_bindgen(js_name = setRowField)]
    pub fn set_row_field(&mut self, id: u32, field: &str, value: &str) -> Result<JsValue, JsValue> {
        let totals = self.app.set_row_field(id, field, value).map_err(js_error)?;
        to_js(&totals)
    }

    /// Store default settings from a `{ fieldName: value }` object
    ///
    /// @returns Number of non-blank values kept
    #[wasm_bindgen(js_name = saveDefaults)]
    pub fn save_defaults(&mut self, entries: JsValue) -> Result<usize, JsValue> {
        let entries: BTreeMap<String, String> = from_js(entries)?;
        self.app.save_defaults(entries).map_err(js_error)
    }

    #[wasm_bindgen(js_name = clearDefaults)]
    pub fn clear_defaults(&mut self) -> Result<(), JsValue> {
        self.app.clear_defaults().map_err(js_error)
    }

    /// Lines like "Prepared By: K. Perera"
    #[wasm_bindgen(js_name = defaultsPreview)]
    pub fn defaults_preview(&self) -> Vec<JsValue> {
        self.app
            .defaults_preview()
            .into_iter()
            .map(|s| JsValue::from_str(&s))
            .collect()
    }

    /// Apply stored defaults to the open form; returns the fill report
    #[wasm_bindgen(js_name = loadDefaultsIntoForm)]
    pub fn load_defaults_into_form(&mut self) -> Result<JsValue, JsValue> {
        let report = self.app.load_defaults_into_form().map_err(js_error)?;
        to_js(&report)
    }

    #[wasm_bindgen(js_name = generateVoucherNumber)]
    pub fn generate_voucher_number(&mut self) -> Result<String, JsValue> {
        self.app.generate_voucher_number().map_err(js_error)
    }

    #[wasm_bindgen(js_name = saveVoucher)]
    pub fn save_voucher(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.app.save_voucher())
    }

    #[wasm_bindgen(js_name = loadVoucher)]
    pub fn load_voucher(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.app.load_voucher())
    }

    #[wasm_bindgen(js_name = renderPdf)]
    pub fn render_pdf(&mut self) -> Result<PdfExport, JsValue> {
        let (file_name, bytes) = self.app.render_pdf().map_err(js_error)?;
        Ok(PdfExport { file_name, bytes })
    }

    /// Open the browser print dialog for the current page
    pub fn print(&self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| js_error("No window available"))?;
        window.print()
    }
}

/// Rupee amount formatting utilities
#[wasm_bindgen]
pub struct RupeeFormatter;

#[wasm_bindgen]
impl RupeeFormatter {
    /// @returns e.g. "Two Thousand Two Hundred Ten Rupees Only"
    #[wasm_bindgen(js_name = formatWords)]
    pub fn format_words(amount: f64) -> String {
        rupee_text::format_rupees_words(amount)
    }

    /// @returns e.g. "Rs. 2,210.00"
    #[wasm_bindgen(js_name = formatRupees)]
    pub fn format_rupees(amount: f64) -> String {
        rupee_text::format_rupees(amount)
    }

    /// Render a float with formatting pattern
    ///
    /// @param format - Format pattern (e.g., "#,###.##")
    /// @param n - Number to format
    #[wasm_bindgen(js_name = renderFloat)]
    pub fn render_float(format: &str, n: f64) -> String {
        rupee_text::render_float(format, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    fn session() -> VoucherSession {
        let save = Function::new_with_args("record", "return { success: true, path: 'memory.json' };");
        let load = Function::new_no_args("return { success: false, error: 'No file selected' };");
        VoucherSession::in_memory(save, load)
    }

    #[wasm_bindgen_test]
    fn test_rupee_formatter() {
        assert_eq!(
            RupeeFormatter::format_words(2210.0),
            "Two Thousand Two Hundred Ten Rupees Only"
        );
        assert_eq!(RupeeFormatter::render_float("#,###.##", 1234.56), "1,234.56");
    }

    #[wasm_bindgen_test]
    fn test_payment_session_totals() {
        let mut session = session();
        session.select_voucher("payment").unwrap();
        session.set_row_field(1, "rate", "1000").unwrap();
        session.set_row_field(1, "units", "2").unwrap();
        session.set_field("ssclVat", "2.5").unwrap();
        session.set_field("vat", "8").unwrap();

        let form = session.app.form().unwrap();
        assert_eq!(form.totals().total, 2210.0);
    }

    #[wasm_bindgen_test]
    fn test_unknown_voucher_type_is_rejected() {
        let mut session = session();
        assert!(session.select_voucher("invoice").is_err());
    }

    #[wasm_bindgen_test]
    fn test_save_and_failed_load_through_callbacks() {
        let mut session = session();
        session.select_voucher("petty-cash").unwrap();

        let saved = session.app.save_voucher();
        assert!(saved.success);
        assert_eq!(saved.path.as_deref(), Some("memory.json"));

        let loaded = session.app.load_voucher();
        assert!(!loaded.success);
        assert_eq!(loaded.error.as_deref(), Some("No file selected"));
    }

    #[wasm_bindgen_test]
    fn test_render_pdf_export() {
        let mut session = session();
        session.select_voucher("advance-settlement").unwrap();
        let pdf = session.render_pdf().unwrap();
        assert!(pdf.bytes().starts_with(b"%PDF"));
        assert!(pdf.file_name().ends_with(".pdf"));
    }
}
