//! A4 voucher page in the Board's printed layout
//!
//! The open form is flattened into a [`VoucherView`] (plain JSON with
//! effective values and formatted amounts) and bound into a per-type page
//! template. All layout coordinates are millimetres from the top-left corner.

use crate::calc::format_amount;
use crate::form_state::FormState;
use crate::model::{ExpenditureLine, VoucherType};
use crate::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use template::{
    Align, Block, Font, FontStyle, ListBlock, Position, TableBlock, TableColumn, Template,
    TemplateRenderer, TextBlock, WordWrap,
};

const PAGE_WIDTH: f64 = 210.0;
const MARGIN: f64 = 15.0;
const CONTENT_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;
const HALF_WIDTH: f64 = CONTENT_WIDTH / 2.0;
const HEADER_RIGHT: f64 = PAGE_WIDTH - MARGIN - 60.0;

const TABLE_HEIGHT: f64 = 60.0;
const DESC_COL: f64 = CONTENT_WIDTH * 0.5;
const RATE_COL: f64 = CONTENT_WIDTH * 0.15;
const UNITS_COL: f64 = CONTENT_WIDTH * 0.15;
/// Rows that fit between the header band and the tax line
const TABLE_ROWS: usize = 6;

const DOCUMENT_TITLES: &[(&str, &str)] = &[
    ("doc-invoice", "Invoice"),
    ("doc-board-approval", "Board Approval"),
    ("doc-fr136", "FR 136 Approval"),
    ("doc-procurement", "DG/Adm/Procurement Approval"),
    ("doc-grn", "Good Received Note (GRN)"),
    ("doc-acceptance", "Good Acceptance Committee Report"),
    ("doc-service", "Service Completed Report"),
];

/// Checklist line in the documents box
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentEntry {
    pub text: String,
    pub marker: String,
}

/// Flattened voucher data bound into the page template
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherView {
    pub title: String,
    pub voucher_type: VoucherType,
    /// Effective value of every form field
    pub fields: BTreeMap<String, String>,
    pub expenditures: Vec<ExpenditureLine>,
    pub subtotal: String,
    pub sscl_vat: String,
    pub vat: String,
    pub sscl_amount: String,
    pub vat_amount: String,
    pub total: String,
    pub amount_words: String,
    pub certification: String,
    pub documents: Vec<DocumentEntry>,
    pub other_documents: Vec<String>,
    pub show_taxes: bool,
}

impl VoucherView {
    pub fn from_form(form: &FormState) -> Self {
        let voucher_type = form.voucher_type();
        let fields = form.form_data();
        let totals = form.totals();
        let field = |name: &str| fields.get(name).cloned().unwrap_or_default();

        let expenditures = match voucher_type {
            VoucherType::Payment => form.expenditure_lines().unwrap_or_default(),
            VoucherType::AdvancePayment | VoucherType::PettyCash => vec![ExpenditureLine {
                desc: field("serviceDescription"),
                rate: field("rate"),
                units: field("units"),
                amount: field("amount"),
            }],
            VoucherType::AdvanceSettlement => Vec::new(),
        };

        let (rupees, cents) = rupee_text::split_rupees_cents(totals.total.abs());
        let certification = format!(
            "I certify from personal knowledge*/ from the certificates in the relevant files*/ \
             that the above supplies*/ services*/ works* were duly authorised and performed and \
             that the payment of Rupees {} and cents {:02} is in accordance with regulations*/ \
             contract*/ fair and reasonable.",
            rupee_text::format_number_words(rupees),
            cents
        );

        let checked = form.documents();
        let documents = DOCUMENT_TITLES
            .iter()
            .map(|(name, text)| DocumentEntry {
                text: text.to_string(),
                marker: if checked.get(*name).copied().unwrap_or(false) {
                    "[X]".to_string()
                } else {
                    "[  ]".to_string()
                },
            })
            .collect();

        let mut other_documents: Vec<String> = field("otherDocuments")
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        if other_documents.is_empty() {
            other_documents.push("Other related documents".to_string());
        }

        Self {
            title: voucher_type.title().to_string(),
            voucher_type,
            sscl_vat: field("ssclVat"),
            vat: field("vat"),
            fields,
            expenditures,
            subtotal: format_amount(totals.subtotal),
            sscl_amount: format_amount(totals.sscl_amount),
            vat_amount: format_amount(totals.vat_amount),
            total: format_amount(totals.total),
            amount_words: rupee_text::format_rupees_words(totals.total),
            certification,
            documents,
            other_documents,
            show_taxes: voucher_type == VoucherType::Payment,
        }
    }

    /// Lines with a description, the ones the table prints
    pub fn printed_lines(&self) -> usize {
        self.expenditures
            .iter()
            .filter(|line| !line.desc.trim().is_empty())
            .count()
    }
}

/// `SLTB_<Title_with_underscores>_<voucherNo|draft>_<YYYY-MM-DD>.pdf`
pub fn pdf_file_name(voucher_type: VoucherType, voucher_no: &str, date: NaiveDate) -> String {
    let number = voucher_no.trim();
    format!(
        "SLTB_{}_{}_{}.pdf",
        voucher_type.title().split_whitespace().collect::<Vec<_>>().join("_"),
        if number.is_empty() { "draft" } else { number },
        date.format("%Y-%m-%d")
    )
}

/// Render the open form to PDF bytes
pub fn render_voucher_pdf(form: &FormState) -> Result<Vec<u8>> {
    let view = VoucherView::from_form(form);
    let layout = voucher_layout(view.voucher_type);
    let printed = view.printed_lines();
    if printed > TABLE_ROWS {
        log::warn!(
            "{} has {printed} expenditure lines, only {TABLE_ROWS} fit on the page",
            view.title
        );
    }
    let data = serde_json::to_value(&view)?;
    let bytes = TemplateRenderer::new(&layout).render_to_bytes(&data)?;
    log::info!("rendered {} ({} bytes)", view.title, bytes.len());
    Ok(bytes)
}

fn wrapped_text(bind: &str, x: f64, y: f64, size: u8, max_chars: usize, line_height: f64) -> Block {
    Block::Text(TextBlock {
        bind: Some(bind.to_string()),
        position: Position { x, y },
        font: Some(Font {
            size,
            style: FontStyle::Regular,
            color: None,
        }),
        word_wrap: Some(WordWrap {
            max_chars,
            line_height,
        }),
        pages: Some(vec![1]),
        ..TextBlock::default()
    })
}

/// Page template for one voucher type
pub fn voucher_layout(voucher_type: VoucherType) -> Template {
    let mut t = Template::new_mm(voucher_type.title());
    t.set_line_width(0.5);

    header(&mut t);

    let mut y = MARGIN + 35.0;
    detail_rows(&mut t, y);
    y += 23.0;

    y = match voucher_type {
        VoucherType::AdvanceSettlement => settlement_rows(&mut t, y),
        _ => expenditure_table(&mut t, y),
    };

    y = approvals(&mut t, y);

    t.blocks.push(wrapped_text("$.certification", MARGIN, y, 8, 125, 4.0));
    y += 15.0;

    y = final_approvals(&mut t, y);
    documents(&mut t, y);
    t
}

fn header(t: &mut Template) {
    t.draw_rect(1, MARGIN, MARGIN, 25.0, 25.0)
        .set_font(8, FontStyle::Regular)
        .insert_text("SLTB", 1, MARGIN + 12.5, MARGIN + 12.5, Align::Center)
        .insert_text("LOGO", 1, MARGIN + 12.5, MARGIN + 15.0, Align::Center)
        .set_font(16, FontStyle::Bold)
        .insert_text("Sri Lanka Tea Board", 1, PAGE_WIDTH / 2.0, MARGIN + 10.0, Align::Center)
        .set_font(14, FontStyle::Bold)
        .insert_binding("$.title", 1, PAGE_WIDTH / 2.0, MARGIN + 20.0, Align::Center);

    t.draw_rect(1, HEADER_RIGHT, MARGIN, 60.0, 12.0)
        .draw_rect(1, HEADER_RIGHT, MARGIN + 12.0, 60.0, 12.0)
        .set_font(10, FontStyle::Bold)
        .insert_text("Voucher No", 1, HEADER_RIGHT + 2.0, MARGIN + 8.0, Align::Left)
        .insert_text("Date", 1, HEADER_RIGHT + 2.0, MARGIN + 20.0, Align::Left)
        .set_font_style(FontStyle::Regular)
        .insert_binding("$.fields.voucherNo", 1, HEADER_RIGHT + 25.0, MARGIN + 8.0, Align::Left)
        .insert_binding("$.fields.voucherDate", 1, HEADER_RIGHT + 25.0, MARGIN + 20.0, Align::Left);
}

fn detail_rows(t: &mut Template, y: f64) {
    let rows = [
        ("SLTB Section", "$.fields.sltbSection", "File Reference", "$.fields.fileReference"),
        ("Payable To", "$.fields.payableTo", "Expenditure", "$.fields.expenditureCode"),
    ];

    for (i, (left, left_bind, right, right_bind)) in rows.into_iter().enumerate() {
        let row_y = y + 8.0 * i as f64;
        t.draw_rect(1, MARGIN, row_y, CONTENT_WIDTH, 8.0)
            .draw_line(1, MARGIN + 60.0, row_y, MARGIN + 60.0, row_y + 8.0)
            .draw_line(1, PAGE_WIDTH / 2.0, row_y, PAGE_WIDTH / 2.0, row_y + 8.0)
            .set_font(10, FontStyle::Bold)
            .insert_text(left, 1, MARGIN + 2.0, row_y + 5.0, Align::Left)
            .insert_text(right, 1, PAGE_WIDTH / 2.0 + 2.0, row_y + 5.0, Align::Left)
            .set_font_style(FontStyle::Regular)
            .insert_binding(left_bind, 1, MARGIN + 62.0, row_y + 5.0, Align::Left)
            .insert_binding(right_bind, 1, PAGE_WIDTH / 2.0 + 52.0, row_y + 5.0, Align::Left);
    }
}

fn settlement_rows(t: &mut Template, y: f64) -> f64 {
    let rows = [
        ("Amount of Advance", "$.fields.amountAdvance"),
        ("Amount spent as per attached Documents", "$.fields.amountSpent"),
        ("Balance due / refund", "$.fields.balanceDue"),
    ];

    for (i, (label, bind)) in rows.into_iter().enumerate() {
        let row_y = y + 10.0 * i as f64;
        t.draw_rect(1, MARGIN, row_y, HALF_WIDTH, 10.0)
            .draw_rect(1, MARGIN + HALF_WIDTH, row_y, HALF_WIDTH, 10.0)
            .set_font(10, FontStyle::Bold)
            .insert_text(label, 1, MARGIN + 2.0, row_y + 6.0, Align::Left)
            .insert_text("Rs.", 1, MARGIN + HALF_WIDTH + 2.0, row_y + 6.0, Align::Left)
            .set_font_style(FontStyle::Regular)
            .insert_binding(bind, 1, PAGE_WIDTH - MARGIN - 2.0, row_y + 6.0, Align::Right);
    }

    y + 50.0
}

fn expenditure_table(t: &mut Template, y: f64) -> f64 {
    let rate_x = MARGIN + DESC_COL;
    let units_x = rate_x + RATE_COL;
    let amount_x = units_x + UNITS_COL;

    t.draw_rect(1, MARGIN, y, CONTENT_WIDTH, TABLE_HEIGHT)
        .draw_line(1, rate_x, y, rate_x, y + TABLE_HEIGHT)
        .draw_line(1, units_x, y, units_x, y + TABLE_HEIGHT)
        .draw_line(1, amount_x, y, amount_x, y + TABLE_HEIGHT)
        .draw_line(1, MARGIN, y + 15.0, MARGIN + CONTENT_WIDTH, y + 15.0)
        .set_font(9, FontStyle::Bold)
        .insert_text("Detailed description of service rendered,", 1, MARGIN + 2.0, y + 5.0, Align::Left)
        .insert_text("work executed or goods supplied and", 1, MARGIN + 2.0, y + 8.0, Align::Left)
        .insert_text("Certificate of Approving officer, where", 1, MARGIN + 2.0, y + 11.0, Align::Left)
        .insert_text("Rate Rs.", 1, rate_x + 5.0, y + 8.0, Align::Left)
        .insert_text("Units or", 1, units_x + 5.0, y + 6.0, Align::Left)
        .insert_text("Months", 1, units_x + 5.0, y + 9.0, Align::Left)
        .insert_text("Amount Rs", 1, amount_x + 5.0, y + 8.0, Align::Left);

    let column = |field: &str, x: f64, max_chars: Option<usize>, fallback: Option<&str>| {
        let mut col = TableColumn::new(field, x - (MARGIN + 2.0));
        col.max_chars = max_chars;
        col.fallback = fallback.map(str::to_string);
        col
    };
    let mut table = TableBlock::new(
        "$.expenditures",
        1,
        MARGIN + 2.0,
        y + 18.0,
        vec![
            column("desc", MARGIN + 2.0, Some(80), None),
            column("rate", rate_x + 5.0, None, Some("0")),
            column("units", units_x + 5.0, None, Some("0")),
            column("amount", amount_x + 5.0, None, Some("0")),
        ],
    );
    table.row_height = 5.0;
    table.require_field = Some("desc".to_string());
    table.max_rows = Some(TABLE_ROWS);
    t.set_font(8, FontStyle::Regular).insert_table(table);

    let tax_y = y + TABLE_HEIGHT - 12.0;
    t.insert_text("SSCL VAT (%)", 1, MARGIN + 2.0, tax_y, Align::Left)
        .only_if("$.showTaxes")
        .insert_binding("$.ssclVat", 1, MARGIN + 24.0, tax_y, Align::Left)
        .only_if("$.showTaxes")
        .insert_binding("$.ssclAmount", 1, rate_x + 5.0, tax_y, Align::Left)
        .only_if("$.showTaxes")
        .insert_text("VAT (%)", 1, units_x + 2.0, tax_y, Align::Left)
        .only_if("$.showTaxes")
        .insert_binding("$.vat", 1, units_x + 15.0, tax_y, Align::Left)
        .only_if("$.showTaxes")
        .insert_binding("$.vatAmount", 1, amount_x + 5.0, tax_y, Align::Left)
        .only_if("$.showTaxes");

    t.draw_line(1, MARGIN, y + TABLE_HEIGHT - 10.0, MARGIN + CONTENT_WIDTH, y + TABLE_HEIGHT - 10.0)
        .set_font(10, FontStyle::Bold)
        .insert_text("Total Payment Rs.", 1, units_x - 30.0, y + TABLE_HEIGHT - 5.0, Align::Left)
        .insert_binding("$.total", 1, amount_x + 5.0, y + TABLE_HEIGHT - 5.0, Align::Left);

    y + TABLE_HEIGHT + 10.0
}

fn approvals(t: &mut Template, y: f64) -> f64 {
    let boxes = [
        ("Prepared by", "$.fields.preparedBy", 0.0, 0.0),
        ("Checked By", "$.fields.checkedBy", HALF_WIDTH, 0.0),
        ("Recommended by (First)", "$.fields.recommendedByFirst", 0.0, 20.0),
        ("Recommended by (Second)", "$.fields.recommendedBySecond", HALF_WIDTH, 20.0),
    ];

    for (label, bind, dx, dy) in boxes {
        let x = MARGIN + dx;
        t.draw_rect(1, x, y + dy, HALF_WIDTH, 20.0)
            .set_font(10, FontStyle::Bold)
            .insert_text(label, 1, x + 2.0, y + dy + 5.0, Align::Left)
            .set_font_style(FontStyle::Regular)
            .insert_binding(bind, 1, x + 2.0, y + dy + 15.0, Align::Left);
    }

    y + 45.0
}

fn final_approvals(t: &mut Template, y: f64) -> f64 {
    let boxes = [
        ("Payment Approved By", "(FR 137 Approval)", "$.fields.paymentApprovedBy", 0.0),
        (
            "Voucher Certified By",
            "(FR 138 Voucher Certification)",
            "$.fields.voucherCertifiedBy",
            HALF_WIDTH,
        ),
    ];

    for (label, note, bind, dx) in boxes {
        let x = MARGIN + dx;
        t.draw_rect(1, x, y, HALF_WIDTH, 20.0)
            .set_font(10, FontStyle::Bold)
            .insert_text(label, 1, x + 2.0, y + 5.0, Align::Left)
            .insert_text(note, 1, x + 2.0, y + 8.0, Align::Left)
            .set_font_style(FontStyle::Regular)
            .insert_binding(bind, 1, x + 2.0, y + 15.0, Align::Left);
    }

    y + 25.0
}

fn documents(t: &mut Template, y: f64) {
    let right = MARGIN + HALF_WIDTH;

    t.draw_rect(1, MARGIN, y, HALF_WIDTH, 50.0)
        .draw_rect(1, right, y, HALF_WIDTH, 50.0)
        .set_font(9, FontStyle::Bold)
        .insert_text("Attached the Copies of following Documents", 1, MARGIN + 2.0, y + 5.0, Align::Left)
        .insert_text("Other Documents Attached", 1, right + 2.0, y + 5.0, Align::Left)
        .set_font(8, FontStyle::Regular)
        .insert_list(ListBlock::bound("$.documents", 1, MARGIN + 5.0, y + 10.0))
        .insert_list(ListBlock::bound("$.otherDocuments", 1, right + 5.0, y + 10.0));
}
