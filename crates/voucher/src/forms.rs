//! Form templates for the four voucher types
//!
//! Every form is assembled from shared sections (header, approvals, documents)
//! plus one section specific to the voucher type. Templates are plain data and
//! serialize to JSON so a UI layer can draw them.

use crate::model::VoucherType;
use serde::Serialize;

/// Input kind of a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Textarea,
    Date,
    Number,
    Select,
    Checkbox,
}

/// Section a field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormSection {
    Header,
    Expenditure,
    Service,
    Settlement,
    Approvals,
    Documents,
}

/// Static description of one form control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    pub name: &'static str,
    pub control_id: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub read_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "no_options")]
    pub options: &'static [&'static str],
    pub section: FormSection,
}

impl FieldDef {
    const fn new(
        name: &'static str,
        control_id: &'static str,
        label: &'static str,
        kind: FieldKind,
        section: FormSection,
    ) -> Self {
        Self {
            name,
            control_id,
            label,
            kind,
            read_only: false,
            placeholder: None,
            options: &[],
            section,
        }
    }

    const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    const fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    const fn options(mut self, options: &'static [&'static str]) -> Self {
        self.options = options;
        self
    }

    /// Fields whose value is computed from other fields
    pub fn is_derived(&self) -> bool {
        self.read_only && self.name != "voucherNo"
    }
}

fn no_options(options: &&'static [&'static str]) -> bool {
    options.is_empty()
}

pub const SECTION_OPTIONS: &[&str] = &[
    "Admin",
    "IT Section",
    "Export",
    "TC",
    "Promotion",
    "Finance",
    "Tea Testing Unit",
    "Audit",
];

use FieldKind::*;
use FormSection::*;

const HEADER_FIELDS: &[FieldDef] = &[
    FieldDef::new("voucherNo", "voucher-no", "Voucher No", Text, Header).read_only(),
    FieldDef::new("voucherDate", "voucher-date", "Date", Date, Header),
    FieldDef::new("sltbSection", "sltb-section", "SLTB Section", Select, Header)
        .placeholder("Select Section")
        .options(SECTION_OPTIONS),
    FieldDef::new("fileReference", "file-reference", "File Reference", Text, Header),
    FieldDef::new("payableTo", "payable-to", "Payable To", Text, Header),
    FieldDef::new("expenditureCode", "expenditure-code", "Expenditure Code", Text, Header),
];

const EXPENDITURE_FIELDS: &[FieldDef] = &[
    FieldDef::new("ssclVat", "sscl-vat", "SSCL VAT (%)", Number, Expenditure),
    FieldDef::new("vat", "vat", "VAT (%)", Number, Expenditure),
];

const SERVICE_FIELDS: &[FieldDef] = &[
    FieldDef::new(
        "serviceDescription",
        "service-description",
        "Detailed description of service rendered, work executed or goods supplied and Certificate of Approving officer, where",
        Textarea,
        Service,
    ),
    FieldDef::new("rate", "rate", "Rate Rs.", Number, Service),
    FieldDef::new("units", "units", "Units or Months", Text, Service),
    FieldDef::new("amount", "amount", "Amount Rs", Number, Service).read_only(),
    FieldDef::new("totalPayment", "total-payment", "Total Payment Rs.", Number, Service).read_only(),
];

const SETTLEMENT_FIELDS: &[FieldDef] = &[
    FieldDef::new("amountAdvance", "amount-advance", "Amount of Advance Rs.", Number, Settlement),
    FieldDef::new(
        "amountSpent",
        "amount-spent",
        "Amount spent as per attached Documents Rs.",
        Number,
        Settlement,
    ),
    FieldDef::new("balanceDue", "balance-due", "Balance due / refund Rs.", Number, Settlement)
        .read_only(),
];

const APPROVAL_FIELDS: &[FieldDef] = &[
    FieldDef::new("preparedBy", "prepared-by", "Prepared by", Text, Approvals).placeholder("Name"),
    FieldDef::new("checkedBy", "checked-by", "Checked By", Text, Approvals).placeholder("Name"),
    FieldDef::new(
        "recommendedByFirst",
        "recommended-by-first",
        "Recommended by (First)",
        Text,
        Approvals,
    )
    .placeholder("Name"),
    FieldDef::new(
        "recommendedBySecond",
        "recommended-by-second",
        "Recommended by (Second)",
        Text,
        Approvals,
    )
    .placeholder("Name"),
    FieldDef::new(
        "paymentApprovedBy",
        "payment-approved-by",
        "Payment Approved By (FR 137 Approval)",
        Text,
        Approvals,
    )
    .placeholder("Name"),
    FieldDef::new(
        "voucherCertifiedBy",
        "voucher-certified-by",
        "Voucher Certified By (FR 138 Voucher Certification)",
        Text,
        Approvals,
    )
    .placeholder("Name"),
];

const DOCUMENT_FIELDS: &[FieldDef] = &[
    FieldDef::new("doc-invoice", "doc-invoice", "Invoice", Checkbox, Documents),
    FieldDef::new("doc-board-approval", "doc-board-approval", "Board Approval", Checkbox, Documents),
    FieldDef::new("doc-fr136", "doc-fr136", "FR 136 Approval", Checkbox, Documents),
    FieldDef::new(
        "doc-procurement",
        "doc-procurement",
        "DG/Adm/Procurement Approval",
        Checkbox,
        Documents,
    ),
    FieldDef::new("doc-grn", "doc-grn", "Good Received Note (GRN)", Checkbox, Documents),
    FieldDef::new(
        "doc-acceptance",
        "doc-acceptance",
        "Good Acceptance Committee Report",
        Checkbox,
        Documents,
    ),
    FieldDef::new("doc-service", "doc-service", "Service Completed Report", Checkbox, Documents),
    FieldDef::new("otherDocuments", "other-documents", "Other Documents Attached", Textarea, Documents)
        .placeholder("List other related documents..."),
];

/// Field name to control id, including legacy spellings found in old
/// defaults records
const ALIASES: &[(&str, &str)] = &[
    ("sltbSection", "sltb-section"),
    ("fileReference", "file-reference"),
    ("ssclVat", "sscl-vat"),
    ("vat", "vat"),
    ("preparedBy", "prepared-by"),
    ("checkedBy", "checked-by"),
    ("approvedBy", "payment-approved-by"),
    ("authorizedBy", "voucher-certified-by"),
    ("recommendedByFirst", "recommended-by-first"),
    ("recommendedBySecond", "recommended-by-second"),
    ("paymentApprovedBy", "payment-approved-by"),
    ("voucherCertifiedBy", "voucher-certified-by"),
    ("prepared-by", "prepared-by"),
    ("checked-by", "checked-by"),
    ("approved-by", "payment-approved-by"),
    ("authorized-by", "voucher-certified-by"),
];

/// Control id an alias maps to
pub fn alias_control_id(key: &str) -> Option<&'static str> {
    ALIASES.iter().find(|(k, _)| *k == key).map(|(_, id)| *id)
}

/// Display name used when previewing defaults
pub fn friendly_name(key: &str) -> &str {
    match key {
        "sltbSection" => "SLTB Section",
        "fileReference" => "File Reference",
        "payableTo" => "Payable To",
        "expenditureCode" => "Expenditure Code",
        "preparedBy" => "Prepared By",
        "checkedBy" => "Checked By",
        "recommendedByFirst" => "Recommended By (First)",
        "recommendedBySecond" => "Recommended By (Second)",
        "paymentApprovedBy" => "Payment Approved By",
        "voucherCertifiedBy" => "Voucher Certified By",
        "ssclVat" => "SSCL VAT (%)",
        "vat" => "VAT (%)",
        other => other,
    }
}

/// The form of one voucher type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormTemplate {
    pub voucher_type: VoucherType,
    pub title: &'static str,
    pub has_expenditure_table: bool,
    fields: Vec<FieldDef>,
}

impl FormTemplate {
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Field by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field by control id
    pub fn field_by_id(&self, control_id: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.control_id == control_id)
    }

    pub fn checkboxes(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.kind == FieldKind::Checkbox)
    }

    /// Non-checkbox fields, in form order
    pub fn inputs(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.kind != FieldKind::Checkbox)
    }
}

/// Build the form of a voucher type
pub fn form_template(voucher_type: VoucherType) -> FormTemplate {
    let body: &[FieldDef] = match voucher_type {
        VoucherType::Payment => EXPENDITURE_FIELDS,
        VoucherType::AdvancePayment | VoucherType::PettyCash => SERVICE_FIELDS,
        VoucherType::AdvanceSettlement => SETTLEMENT_FIELDS,
    };

    let fields = [HEADER_FIELDS, body, APPROVAL_FIELDS, DOCUMENT_FIELDS].concat();

    FormTemplate {
        voucher_type,
        title: voucher_type.title(),
        has_expenditure_table: voucher_type.has_expenditure_table(),
        fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn test_payment_form_sections() {
        let form = form_template(VoucherType::Payment);
        assert!(form.has_expenditure_table);
        assert_eq!(form.field("ssclVat").unwrap().control_id, "sscl-vat");
        assert!(form.field("serviceDescription").is_none());
        assert!(form.field("amountAdvance").is_none());
        assert_eq!(form.checkboxes().count(), 7);
    }

    #[test]
    fn test_single_line_forms_share_service_section() {
        for vt in [VoucherType::AdvancePayment, VoucherType::PettyCash] {
            let form = form_template(vt);
            assert!(!form.has_expenditure_table);
            assert!(form.field("amount").unwrap().read_only);
            assert!(form.field("totalPayment").unwrap().is_derived());
            assert!(form.field("ssclVat").is_none());
        }
    }

    #[test]
    fn test_settlement_form() {
        let form = form_template(VoucherType::AdvanceSettlement);
        let balance = form.field_by_id("balance-due").unwrap();
        assert_eq!(balance.name, "balanceDue");
        assert!(balance.is_derived());
        assert!(!form.field("voucherNo").unwrap().is_derived());
    }

    #[test]
    fn test_names_and_ids_are_unique() {
        for vt in VoucherType::ALL {
            let form = form_template(vt);
            let names: HashSet<_> = form.fields().iter().map(|f| f.name).collect();
            let ids: HashSet<_> = form.fields().iter().map(|f| f.control_id).collect();
            assert_eq!(names.len(), form.fields().len());
            assert_eq!(ids.len(), form.fields().len());
        }
    }

    #[test]
    fn test_aliases_point_at_real_controls() {
        let form = form_template(VoucherType::Payment);
        for (key, id) in ALIASES {
            assert!(form.field_by_id(id).is_some(), "alias {key} -> {id}");
        }
        assert_eq!(alias_control_id("approvedBy"), Some("payment-approved-by"));
        assert_eq!(alias_control_id("nothing"), None);
    }

    #[test]
    fn test_friendly_names() {
        assert_eq!(friendly_name("sltbSection"), "SLTB Section");
        assert_eq!(friendly_name("ssclVat"), "SSCL VAT (%)");
        assert_eq!(friendly_name("customKey"), "customKey");
    }

    #[test]
    fn test_template_serializes_for_ui() {
        let value = serde_json::to_value(form_template(VoucherType::AdvanceSettlement)).unwrap();
        assert_eq!(value["voucherType"], "advance-settlement");
        assert_eq!(value["title"], "Advance Payment Settlement Voucher");

        let section = value["fields"]
            .as_array()
            .unwrap()
            .iter()
            .find(|f| f["name"] == "sltbSection")
            .unwrap();
        assert_eq!(section["controlId"], "sltb-section");
        assert_eq!(section["kind"], "select");
        assert_eq!(section["options"].as_array().unwrap().len(), 8);
    }
}
