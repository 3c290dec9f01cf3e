//! Application state and the operations a UI drives it with
//!
//! [`VoucherApp`] owns everything the form layer needs: the visible screen,
//! the open form, the cached defaults and the last notice. UI layers call the
//! operations below and redraw from the [`AppEvent`]s they receive.

use crate::autofill::{apply_defaults, FillReport};
use crate::calc::{RowField, Totals};
use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::defaults::{DefaultSettings, DefaultsRepository, KeyValueStore};
use crate::form_state::FormState;
use crate::host::HostChannel;
use crate::model::{Screen, VoucherRecord, VoucherType};
use crate::numbering::voucher_number;
use crate::pdf::{pdf_file_name, render_voucher_pdf};
use crate::persistence::{LoadOutcome, PersistenceGateway, SaveOutcome};
use crate::{Result, VoucherError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Transient banner message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// State change pushed to subscribers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum AppEvent {
    ScreenChanged(Screen),
    FormChanged,
    TotalsChanged(Totals),
    Notice(Notice),
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub screen: Screen,
    pub form: Option<FormState>,
    /// Highest expenditure row id handed out so far
    pub row_counter: u32,
    pub defaults: DefaultSettings,
    pub last_fill: Option<FillReport>,
    pub notice: Option<Notice>,
    /// Top-level keys of the last loaded file, written back on save
    #[serde(skip)]
    pub carried_keys: BTreeMap<String, Value>,
}

type Subscriber = Box<dyn FnMut(&AppEvent)>;

pub struct VoucherApp {
    config: AppConfig,
    state: AppState,
    defaults: DefaultsRepository,
    host: HostChannel,
    clock: Box<dyn Clock>,
    rng: StdRng,
    subscribers: Vec<Subscriber>,
}

impl VoucherApp {
    /// Create the app on the welcome screen with defaults loaded
    pub fn new(
        config: AppConfig,
        store: Box<dyn KeyValueStore>,
        gateway: Box<dyn PersistenceGateway>,
    ) -> Self {
        Self::new_with_clock(config, store, gateway, Box::new(SystemClock))
    }

    /// Like [`VoucherApp::new`] with an explicit time source
    pub fn new_with_clock(
        config: AppConfig,
        store: Box<dyn KeyValueStore>,
        gateway: Box<dyn PersistenceGateway>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let defaults = DefaultsRepository::new(store, config.defaults_key.clone());
        let rng = StdRng::seed_from_u64(clock.epoch_millis() as u64);

        let state = AppState {
            defaults: defaults.load(),
            ..AppState::default()
        };

        if config.dev_mode {
            log::info!("development mode, vouchers in {}", config.voucher_dir.display());
        }

        Self {
            config,
            state,
            defaults,
            host: HostChannel::new(gateway),
            clock,
            rng,
            subscribers: Vec::new(),
        }
    }

    /// Replace the time source; also reseeds the voucher number generator
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.rng = StdRng::seed_from_u64(clock.epoch_millis() as u64);
        self.clock = Box::new(clock);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        self.state.screen
    }

    pub fn form(&self) -> Option<&FormState> {
        self.state.form.as_ref()
    }

    pub fn host(&mut self) -> &mut HostChannel {
        &mut self.host
    }

    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&AppEvent) + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    fn emit(&mut self, event: AppEvent) {
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
    }

    fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        let notice = Notice {
            level,
            text: text.into(),
        };
        self.state.notice = Some(notice.clone());
        self.emit(AppEvent::Notice(notice));
    }

    fn form_mut(&mut self) -> Result<&mut FormState> {
        self.state.form.as_mut().ok_or(VoucherError::NoActiveForm)
    }

    fn sync_row_counter(&mut self) {
        if let Some(table) = self.state.form.as_ref().and_then(FormState::table) {
            self.state.row_counter = self.state.row_counter.max(table.last_id());
        }
    }

    fn form_changed(&mut self, totals: Totals) {
        self.sync_row_counter();
        self.emit(AppEvent::FormChanged);
        self.emit(AppEvent::TotalsChanged(totals));
    }

    /// Switch screens; voucher screens open a fresh, auto-filled form
    pub fn show(&mut self, screen: Screen) {
        match screen {
            Screen::Voucher(voucher_type) => self.select_voucher(voucher_type),
            Screen::Defaults => {
                self.load_defaults();
                self.state.form = None;
                self.set_screen(screen);
            }
            Screen::Welcome => {
                self.state.form = None;
                self.set_screen(screen);
            }
        }
    }

    /// [`VoucherApp::show`] by menu tag
    pub fn show_tag(&mut self, tag: &str) -> Result<()> {
        let screen = tag.parse()?;
        self.show(screen);
        Ok(())
    }

    fn set_screen(&mut self, screen: Screen) {
        log::debug!("screen -> {}", screen);
        self.state.screen = screen;
        self.emit(AppEvent::ScreenChanged(screen));
    }

    pub fn select_voucher(&mut self, voucher_type: VoucherType) {
        self.load_defaults();

        let mut form = FormState::new(voucher_type);
        form.continue_rows_from(self.state.row_counter);
        let report = apply_defaults(
            &mut form,
            &self.state.defaults,
            self.config.fill_options(),
            self.clock.today(),
        );
        if let Ok(table) = form.table_mut() {
            table.add_row();
        }
        let totals = form.recompute();

        self.state.form = Some(form);
        self.state.last_fill = Some(report);
        self.state.carried_keys.clear();
        self.set_screen(Screen::Voucher(voucher_type));
        self.form_changed(totals);
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> Result<Totals> {
        let totals = self.form_mut()?.set_value(name, value)?;
        self.form_changed(totals);
        Ok(totals)
    }

    pub fn set_checkbox(&mut self, name: &str, checked: bool) -> Result<()> {
        self.form_mut()?.set_checked(name, checked)?;
        self.emit(AppEvent::FormChanged);
        Ok(())
    }

    pub fn add_row(&mut self) -> Result<u32> {
        let form = self.form_mut()?;
        let id = form.table_mut()?.add_row();
        let totals = form.recompute();
        self.form_changed(totals);
        Ok(id)
    }

    pub fn remove_row(&mut self, id: u32) -> Result<Totals> {
        let form = self.form_mut()?;
        form.table_mut()?.remove_row(id)?;
        let totals = form.recompute();
        self.form_changed(totals);
        Ok(totals)
    }

    /// Edit one expenditure cell (`desc`, `rate` or `units`)
    pub fn set_row_field(&mut self, id: u32, field: &str, value: &str) -> Result<Totals> {
        let field: RowField = field.parse()?;
        let form = self.form_mut()?;
        form.table_mut()?.set_field(id, field, value)?;
        let totals = form.recompute();
        self.form_changed(totals);
        Ok(totals)
    }

    /// Reload defaults from the store into the cache
    pub fn load_defaults(&mut self) -> &DefaultSettings {
        self.state.defaults = self.defaults.load();
        &self.state.defaults
    }

    /// Save the defaults form; returns how many values were kept
    pub fn save_defaults<I, K, V>(&mut self, entries: I) -> Result<usize>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let settings = DefaultSettings::from_entries(entries);
        if let Err(e) = self.defaults.save(&settings) {
            self.notify(NoticeLevel::Error, format!("Error saving default settings: {e}"));
            return Err(e);
        }

        let count = settings.len();
        self.state.defaults = settings;
        self.notify(
            NoticeLevel::Success,
            format!("Default settings saved! {count} values will auto-fill in forms."),
        );
        Ok(count)
    }

    pub fn clear_defaults(&mut self) -> Result<()> {
        if let Err(e) = self.defaults.clear() {
            self.notify(NoticeLevel::Error, format!("Error clearing default settings: {e}"));
            return Err(e);
        }
        self.state.defaults = DefaultSettings::default();
        self.notify(NoticeLevel::Info, "Default settings cleared!");
        Ok(())
    }

    pub fn defaults_preview(&self) -> Vec<String> {
        self.state.defaults.preview()
    }

    /// Apply stored defaults to the open form on request
    pub fn load_defaults_into_form(&mut self) -> Result<FillReport> {
        if self.state.form.is_none() {
            return Err(VoucherError::NoActiveForm);
        }

        self.load_defaults();
        if self.state.defaults.is_empty() {
            self.notify(
                NoticeLevel::Warning,
                "No default settings found. Please save defaults first in Default Settings page.",
            );
            return Ok(FillReport::default());
        }

        let options = self.config.fill_options();
        let today = self.clock.today();
        let defaults = self.state.defaults.clone();
        let form = self.form_mut()?;
        let report = apply_defaults(form, &defaults, options, today);
        let totals = form.totals();

        self.state.last_fill = Some(report.clone());
        self.form_changed(totals);
        self.notify(
            NoticeLevel::Success,
            format!("Successfully loaded {} default values into form!", defaults.len()),
        );
        Ok(report)
    }

    pub fn generate_voucher_number(&mut self) -> Result<String> {
        let today = self.clock.today();
        let voucher_type = self
            .state
            .form
            .as_ref()
            .map(FormState::voucher_type)
            .ok_or(VoucherError::NoActiveForm)?;
        let number = voucher_number(voucher_type, today, &mut self.rng);

        self.form_mut()?.write_value("voucherNo", &number);
        self.emit(AppEvent::FormChanged);
        self.notify(NoticeLevel::Success, "Voucher number generated successfully!");
        Ok(number)
    }

    /// Snapshot the open form as a voucher file record
    pub fn collect_record(&self) -> Result<VoucherRecord> {
        let form = self.form().ok_or(VoucherError::NoActiveForm)?;
        Ok(VoucherRecord {
            voucher_type: form.voucher_type(),
            timestamp: self.clock.timestamp(),
            form_data: form.form_data(),
            expenditures: form.expenditure_lines(),
            documents: form.documents(),
            totals: Some(form.totals()),
            extra: self.state.carried_keys.clone(),
        })
    }

    pub fn save_voucher(&mut self) -> SaveOutcome {
        let outcome = match self.collect_record() {
            Ok(record) => self.host.save(&record),
            Err(e) => SaveOutcome::failed(e.to_string()),
        };

        if outcome.success {
            let path = outcome.path.clone().unwrap_or_default();
            self.notify(
                NoticeLevel::Success,
                format!("Voucher saved successfully! Saved to: {path}"),
            );
        } else {
            let error = outcome.error.clone().unwrap_or_default();
            self.notify(NoticeLevel::Error, format!("Error saving voucher: {error}"));
        }
        outcome
    }

    /// Open a voucher file and fill the form of its type
    pub fn load_voucher(&mut self) -> LoadOutcome {
        let outcome = self.host.load();

        let loaded = if outcome.success {
            outcome
                .data
                .clone()
                .ok_or_else(|| "empty response".to_string())
                .and_then(|data| VoucherRecord::from_value(data).map_err(|e| e.to_string()))
        } else {
            Err(outcome.error.clone().unwrap_or_default())
        };

        match loaded {
            Ok(record) => {
                self.apply_record(record);
                self.notify(NoticeLevel::Success, "Voucher loaded successfully!");
                outcome
            }
            Err(error) => {
                self.notify(NoticeLevel::Error, format!("Error loading voucher: {error}"));
                LoadOutcome::failed(error)
            }
        }
    }

    fn apply_record(&mut self, record: VoucherRecord) {
        let same_form = self
            .state
            .form
            .as_ref()
            .is_some_and(|f| f.voucher_type() == record.voucher_type);
        if !same_form {
            self.select_voucher(record.voucher_type);
        }

        let totals = match self.state.form.as_mut() {
            Some(form) => {
                form.populate(&record);
                form.totals()
            }
            None => return,
        };

        self.state.carried_keys = record.extra;
        self.form_changed(totals);
    }

    /// Render the open form; returns the file name and the PDF bytes
    pub fn render_pdf(&mut self) -> Result<(String, Vec<u8>)> {
        let form = self.form().ok_or(VoucherError::NoActiveForm)?;
        let file_name = pdf_file_name(
            form.voucher_type(),
            form.value("voucherNo").unwrap_or(""),
            self.clock.today(),
        );

        match render_voucher_pdf(form) {
            Ok(bytes) => {
                self.notify(
                    NoticeLevel::Success,
                    "PDF generated successfully in SLTB official format!",
                );
                Ok((file_name, bytes))
            }
            Err(e) => {
                self.notify(NoticeLevel::Error, format!("Error generating PDF: {e}"));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::defaults::MemoryStore;
    use crate::persistence::FileGateway;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn app() -> VoucherApp {
        VoucherApp::new(
            AppConfig::with_dir(std::env::temp_dir()),
            Box::new(MemoryStore::new()),
            Box::new(FileGateway::new(std::env::temp_dir())),
        )
        .with_clock(FixedClock::at_date(2026, 10, 19).unwrap())
    }

    #[test]
    fn test_starts_on_welcome() {
        let app = app();
        assert_eq!(app.screen(), Screen::Welcome);
        assert!(app.form().is_none());
    }

    #[test]
    fn test_payment_form_starts_with_one_row_and_today() {
        let mut app = app();
        app.show_tag("payment").unwrap();

        let form = app.form().unwrap();
        assert_eq!(form.table().unwrap().len(), 1);
        assert_eq!(form.value("voucherDate"), Some("2026-10-19"));
        assert_eq!(app.state().row_counter, 1);
    }

    #[test]
    fn test_row_ids_keep_counting_across_forms() {
        let mut app = app();
        app.select_voucher(VoucherType::Payment);
        app.add_row().unwrap();
        app.select_voucher(VoucherType::PettyCash);
        app.select_voucher(VoucherType::Payment);

        let ids: Vec<u32> = app.form().unwrap().table().unwrap().rows().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_operations_need_open_form() {
        let mut app = app();
        assert!(matches!(app.set_field("vat", "8"), Err(VoucherError::NoActiveForm)));
        assert!(matches!(app.add_row(), Err(VoucherError::NoActiveForm)));
        assert!(matches!(app.generate_voucher_number(), Err(VoucherError::NoActiveForm)));
        assert!(matches!(app.render_pdf(), Err(VoucherError::NoActiveForm)));
        assert!(app.show_tag("about").is_err());
    }

    #[test]
    fn test_events_reach_subscribers() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);

        let mut app = app();
        app.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        app.select_voucher(VoucherType::AdvanceSettlement);
        app.set_field("amountAdvance", "5000").unwrap();

        let events = events.borrow();
        assert!(events.contains(&AppEvent::ScreenChanged(Screen::Voucher(
            VoucherType::AdvanceSettlement
        ))));
        assert!(matches!(events.last(), Some(AppEvent::TotalsChanged(t)) if t.total == 5000.0));
    }

    #[test]
    fn test_voucher_number_written_to_form() {
        let mut app = app().with_seed(1);
        app.select_voucher(VoucherType::AdvancePayment);
        let number = app.generate_voucher_number().unwrap();

        assert!(number.starts_with("APV-261019-"));
        assert_eq!(app.form().unwrap().value("voucherNo"), Some(number.as_str()));
        assert_eq!(
            app.state().notice.as_ref().unwrap().text,
            "Voucher number generated successfully!"
        );
    }

    #[test]
    fn test_manual_defaults_load_warns_when_empty() {
        let mut app = app();
        app.select_voucher(VoucherType::PettyCash);
        let report = app.load_defaults_into_form().unwrap();

        assert_eq!(report, FillReport::default());
        let notice = app.state().notice.clone().unwrap();
        assert_eq!(notice.level, NoticeLevel::Warning);
    }

    #[test]
    fn test_event_json_shape() {
        let value = serde_json::to_value(AppEvent::ScreenChanged(Screen::Defaults)).unwrap();
        assert_eq!(value, serde_json::json!({ "event": "screen-changed", "payload": "defaults" }));

        let value = serde_json::to_value(AppEvent::FormChanged).unwrap();
        assert_eq!(value, serde_json::json!({ "event": "form-changed" }));
    }
}
