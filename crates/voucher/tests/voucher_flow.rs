//! End-to-end voucher flows through `VoucherApp`

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;
use voucher::calc::format_amount;
use voucher::{
    AppConfig, FillMode, FixedClock, LoadOutcome, MemoryStore, NoticeLevel, PersistenceGateway,
    SaveOutcome, Screen, VoucherApp, VoucherRecord, VoucherType,
};

/// Gateway keeping saved files in memory; `load` returns the last one saved
/// unless a file was queued with `queue`
#[derive(Clone, Default)]
struct MemoryGateway {
    saved: Rc<RefCell<Vec<Value>>>,
    queued: Rc<RefCell<Option<Value>>>,
}

impl MemoryGateway {
    fn queue(&self, data: Value) {
        *self.queued.borrow_mut() = Some(data);
    }

    fn last_saved(&self) -> Value {
        self.saved.borrow().last().cloned().unwrap()
    }
}

impl PersistenceGateway for MemoryGateway {
    fn save(&mut self, record: &VoucherRecord) -> SaveOutcome {
        self.saved
            .borrow_mut()
            .push(serde_json::to_value(record).unwrap());
        SaveOutcome::saved(format!("memory/voucher_{}.json", record.voucher_type))
    }

    fn load(&mut self) -> LoadOutcome {
        if let Some(data) = self.queued.borrow_mut().take() {
            return LoadOutcome::loaded(data);
        }
        match self.saved.borrow().last() {
            Some(data) => LoadOutcome::loaded(data.clone()),
            None => LoadOutcome::failed("No file selected"),
        }
    }
}

fn app_with(config: AppConfig, gateway: &MemoryGateway) -> VoucherApp {
    VoucherApp::new(config, Box::new(MemoryStore::new()), Box::new(gateway.clone()))
        .with_clock(FixedClock::at_date(2026, 10, 19).unwrap())
        .with_seed(2026)
}

fn app(gateway: &MemoryGateway) -> VoucherApp {
    app_with(AppConfig::with_dir("memory"), gateway)
}

#[test]
fn test_payment_totals_example() {
    let gateway = MemoryGateway::default();
    let mut app = app(&gateway);
    app.select_voucher(VoucherType::Payment);

    app.set_row_field(1, "desc", "Printer toner").unwrap();
    app.set_row_field(1, "rate", "1000").unwrap();
    app.set_row_field(1, "units", "2").unwrap();
    app.set_field("ssclVat", "2.5").unwrap();
    let totals = app.set_field("vat", "8").unwrap();

    assert_eq!(format_amount(totals.subtotal), "2000.00");
    assert_eq!(format_amount(totals.sscl_amount), "50.00");
    assert_eq!(format_amount(totals.vat_amount), "160.00");
    assert_eq!(format_amount(totals.total), "2210.00");
}

#[test]
fn test_subtotal_tracks_row_edits_and_removal() {
    let gateway = MemoryGateway::default();
    let mut app = app(&gateway);
    app.select_voucher(VoucherType::Payment);

    let second = app.add_row().unwrap();
    let third = app.add_row().unwrap();
    for (id, rate, units) in [(1, "100", "1"), (second, "250", "2"), (third, "0", "9")] {
        app.set_row_field(id, "rate", rate).unwrap();
        app.set_row_field(id, "units", units).unwrap();
    }

    let form = app.form().unwrap();
    assert_eq!(form.table().unwrap().row(third).unwrap().amount, "0.00");
    assert_eq!(form.totals().subtotal, 600.0);

    let totals = app.remove_row(second).unwrap();
    assert_eq!(totals.subtotal, 100.0);
    assert!(app.remove_row(second).is_err());

    let fourth = app.add_row().unwrap();
    assert_eq!(fourth, 4);
}

#[test]
fn test_settlement_refund() {
    let gateway = MemoryGateway::default();
    let mut app = app(&gateway);
    app.show_tag("advance-settlement").unwrap();

    app.set_field("amountAdvance", "5000").unwrap();
    app.set_field("amountSpent", "6000").unwrap();

    assert_eq!(app.form().unwrap().value("balanceDue"), Some("-1000.00"));
}

#[test]
fn test_saved_defaults_drop_blank_values_and_fill_new_forms() {
    let gateway = MemoryGateway::default();
    let mut app = app(&gateway);
    app.show(Screen::Defaults);

    let count = app
        .save_defaults([
            ("sltbSection", "IT Section"),
            ("preparedBy", "  K. Perera "),
            ("checkedBy", "   "),
            ("vat", "8"),
        ])
        .unwrap();
    assert_eq!(count, 3);
    assert_eq!(
        app.defaults_preview(),
        vec!["Prepared By: K. Perera", "SLTB Section: IT Section", "VAT (%): 8"]
    );

    app.select_voucher(VoucherType::Payment);
    let form = app.form().unwrap();
    assert_eq!(form.value("sltbSection"), Some("IT Section"));
    assert_eq!(form.value("preparedBy"), Some("K. Perera"));
    assert_eq!(form.control("preparedBy").unwrap().value, "");
    assert_eq!(form.value("checkedBy"), Some(""));

    app.clear_defaults().unwrap();
    assert_eq!(app.defaults_preview(), vec!["No default values set"]);
    assert_eq!(app.state().notice.as_ref().unwrap().text, "Default settings cleared!");
}

#[test]
fn test_autofill_never_overwrites_manual_value() {
    let gateway = MemoryGateway::default();
    let mut config = AppConfig::with_dir("memory");
    config.fill_mode = FillMode::Value;
    let mut app = app_with(config, &gateway);

    app.save_defaults([("payableTo", "Default Payee"), ("fileReference", "SLTB/IT/01")])
        .unwrap();
    app.select_voucher(VoucherType::PettyCash);
    app.set_field("payableTo", "Manual Payee").unwrap();

    let report = app.load_defaults_into_form().unwrap();
    assert!(report.preserved.contains(&"payableTo".to_string()));

    let form = app.form().unwrap();
    assert_eq!(form.value("payableTo"), Some("Manual Payee"));
    assert_eq!(form.value("fileReference"), Some("SLTB/IT/01"));
    assert_eq!(
        app.state().notice.as_ref().unwrap().text,
        "Successfully loaded 2 default values into form!"
    );
}

#[test]
fn test_save_writes_record_shape() {
    let gateway = MemoryGateway::default();
    let mut app = app(&gateway);
    app.select_voucher(VoucherType::Payment);
    app.set_field("payableTo", "Ceylon Stationers").unwrap();
    app.set_row_field(1, "desc", "A4 paper").unwrap();
    app.set_row_field(1, "rate", "1500").unwrap();
    app.set_row_field(1, "units", "3").unwrap();
    app.add_row().unwrap();
    app.set_checkbox("doc-grn", true).unwrap();

    let outcome = app.save_voucher();
    assert!(outcome.success);
    assert_eq!(
        app.state().notice.as_ref().unwrap().text,
        "Voucher saved successfully! Saved to: memory/voucher_payment.json"
    );

    let saved = gateway.last_saved();
    assert_eq!(saved["type"], "payment");
    assert_eq!(saved["timestamp"], "2026-10-19T00:00:00.000Z");
    assert_eq!(saved["formData"]["payableTo"], "Ceylon Stationers");
    assert_eq!(saved["formData"]["voucherDate"], "2026-10-19");
    assert_eq!(
        saved["expenditures"],
        json!([{ "desc": "A4 paper", "rate": "1500", "units": "3", "amount": "4500.00" }])
    );
    assert_eq!(saved["documents"]["doc-grn"], true);
    assert_eq!(saved["documents"]["doc-invoice"], false);
    assert_eq!(saved["totals"]["total"], 4500.0);
}

#[test]
fn test_load_then_resave_preserves_data() {
    let gateway = MemoryGateway::default();
    gateway.queue(json!({
        "type": "payment",
        "timestamp": "2025-12-01T09:30:00.000Z",
        "formData": {
            "voucherNo": "PV-251201-0042",
            "voucherDate": "2025-12-01",
            "payableTo": "Lanka Couriers",
            "preparedBy": "",
            "ssclVat": "2.5",
            "expenditure-desc-1": "Courier",
            "legacyNote": "migrated"
        },
        "expenditures": [
            { "desc": "Courier", "rate": "300", "units": "2", "amount": "600.00" },
            { "desc": "Packing", "rate": "50", "units": "1", "amount": "50.00" }
        ],
        "documents": { "doc-invoice": true },
        "appVersion": "1.0.0"
    }));

    let mut app = app(&gateway);
    app.save_defaults([("preparedBy", "K. Perera")]).unwrap();
    app.select_voucher(VoucherType::AdvancePayment);
    let outcome = app.load_voucher();
    assert!(outcome.success);
    assert_eq!(app.screen(), Screen::Voucher(VoucherType::Payment));
    assert_eq!(app.state().notice.as_ref().unwrap().text, "Voucher loaded successfully!");

    let form = app.form().unwrap();
    assert_eq!(form.value("voucherNo"), Some("PV-251201-0042"));
    assert_eq!(format_amount(form.totals().total), "666.25");

    app.save_voucher();
    let saved = gateway.last_saved();
    for key in [
        "voucherNo",
        "voucherDate",
        "payableTo",
        "ssclVat",
        "expenditure-desc-1",
        "legacyNote",
    ] {
        assert!(saved["formData"].get(key).is_some(), "missing {key}");
    }
    assert_eq!(saved["formData"]["legacyNote"], "migrated");
    assert_eq!(saved["formData"]["preparedBy"], "");
    assert_eq!(saved["expenditures"].as_array().unwrap().len(), 2);
    assert_eq!(saved["expenditures"][1]["desc"], "Packing");
    assert_eq!(saved["documents"]["doc-invoice"], true);
    assert_eq!(saved["appVersion"], "1.0.0");
}

#[test]
fn test_load_failures_become_error_notices() {
    let gateway = MemoryGateway::default();
    let mut app = app(&gateway);

    let outcome = app.load_voucher();
    assert!(!outcome.success);
    let notice = app.state().notice.clone().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.text, "Error loading voucher: No file selected");

    gateway.queue(json!({ "type": "receipt", "formData": {} }));
    let outcome = app.load_voucher();
    assert!(!outcome.success);
    assert!(app
        .state()
        .notice
        .as_ref()
        .unwrap()
        .text
        .starts_with("Error loading voucher: "));
    assert_eq!(app.screen(), Screen::Welcome);
}

#[test]
fn test_save_without_form_reports_error() {
    let gateway = MemoryGateway::default();
    let mut app = app(&gateway);

    let outcome = app.save_voucher();
    assert!(!outcome.success);
    assert_eq!(
        app.state().notice.as_ref().unwrap().text,
        "Error saving voucher: No voucher form is open"
    );
}

#[test]
fn test_render_pdf_names_file_and_fills_layout() {
    let gateway = MemoryGateway::default();
    let mut app = app(&gateway);
    app.select_voucher(VoucherType::AdvanceSettlement);
    app.set_field("payableTo", "N. Silva").unwrap();
    app.set_field("amountAdvance", "5000").unwrap();
    app.set_field("amountSpent", "4200.75").unwrap();

    let (draft_name, _) = app.render_pdf().unwrap();
    assert_eq!(
        draft_name,
        "SLTB_Advance_Payment_Settlement_Voucher_draft_2026-10-19.pdf"
    );

    let number = app.generate_voucher_number().unwrap();
    let (name, bytes) = app.render_pdf().unwrap();
    assert_eq!(
        name,
        format!("SLTB_Advance_Payment_Settlement_Voucher_{number}_2026-10-19.pdf")
    );
    assert_eq!(
        app.state().notice.as_ref().unwrap().text,
        "PDF generated successfully in SLTB official format!"
    );

    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
    let page_id = *doc.get_pages().get(&1).unwrap();
    let content = String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).to_string();
    let hex = |text: &str| text.bytes().map(|b| format!("{b:02X}")).collect::<String>();

    assert!(content.contains(&hex("Sri Lanka Tea Board")));
    assert!(content.contains(&hex("N. Silva")));
    assert!(content.contains(&hex("799.25")));
    assert!(content.contains(&hex(&number)));
}
