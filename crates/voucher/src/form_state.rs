//! Live state of an open voucher form

use crate::calc::{
    format_amount, parse_amount, settlement_balance, single_line_amount, ExpenditureTable, Totals,
};
use crate::forms::{form_template, FieldDef, FieldKind, FormTemplate};
use crate::model::{ExpenditureLine, VoucherRecord, VoucherType};
use crate::{Result, VoucherError};
use serde::Serialize;
use std::collections::BTreeMap;

/// Value held by one control
///
/// `value` is what the user typed (or what was loaded). `fallback` is a
/// default shown as placeholder text; it is used whenever `value` is blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    pub checked: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_options: Vec<String>,
}

impl Control {
    pub fn has_user_value(&self) -> bool {
        !self.value.trim().is_empty()
    }

    /// Value used for saving, totals and PDF output
    pub fn effective(&self) -> &str {
        if self.has_user_value() {
            &self.value
        } else {
            self.fallback.as_deref().unwrap_or("")
        }
    }
}

/// An open voucher form: controls, extra keys carried from a loaded file,
/// the expenditure table (payment only) and the last computed totals
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    template: FormTemplate,
    controls: BTreeMap<&'static str, Control>,
    extra: BTreeMap<String, String>,
    extra_documents: BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expenditures: Option<ExpenditureTable>,
    totals: Totals,
}

impl FormState {
    pub fn new(voucher_type: VoucherType) -> Self {
        let template = form_template(voucher_type);
        let controls = template
            .fields()
            .iter()
            .map(|f| (f.name, Control::default()))
            .collect();

        Self {
            expenditures: template.has_expenditure_table.then(ExpenditureTable::new),
            template,
            controls,
            extra: BTreeMap::new(),
            extra_documents: BTreeMap::new(),
            totals: Totals::default(),
        }
    }

    pub fn voucher_type(&self) -> VoucherType {
        self.template.voucher_type
    }

    pub fn template(&self) -> &FormTemplate {
        &self.template
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.get(name)
    }

    pub(crate) fn control_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.controls.get_mut(name)
    }

    /// Effective value of a field
    pub fn value(&self, name: &str) -> Option<&str> {
        self.controls.get(name).map(Control::effective)
    }

    pub fn is_checked(&self, name: &str) -> bool {
        self.controls.get(name).is_some_and(|c| c.checked)
    }

    /// Options of a select: the fixed list followed by any added ones
    pub fn options(&self, name: &str) -> Vec<&str> {
        let Some(field) = self.template.field(name) else {
            return Vec::new();
        };
        let mut options: Vec<&str> = field.options.to_vec();
        if let Some(control) = self.controls.get(name) {
            options.extend(control.extra_options.iter().map(String::as_str));
        }
        options
    }

    pub fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }

    pub fn table(&self) -> Option<&ExpenditureTable> {
        self.expenditures.as_ref()
    }

    pub fn table_mut(&mut self) -> Result<&mut ExpenditureTable> {
        self.expenditures
            .as_mut()
            .ok_or_else(|| VoucherError::UnknownField("expenditures".to_string()))
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    /// Make new row ids continue after `last_id`
    pub(crate) fn continue_rows_from(&mut self, last_id: u32) {
        if let Some(table) = self.expenditures.as_mut() {
            if table.is_empty() && table.last_id() < last_id {
                *table = ExpenditureTable::continuing_from(last_id);
            }
        }
    }

    fn editable_field(&self, name: &str) -> Result<&FieldDef> {
        let field = self
            .template
            .field(name)
            .ok_or_else(|| VoucherError::UnknownField(name.to_string()))?;
        if field.read_only {
            return Err(VoucherError::ReadOnlyField(name.to_string()));
        }
        Ok(field)
    }

    /// User edit of an input field; recomputes derived values
    pub fn set_value(&mut self, name: &str, value: &str) -> Result<Totals> {
        let field = self.editable_field(name)?;
        if field.kind == FieldKind::Checkbox {
            return Err(VoucherError::UnknownField(name.to_string()));
        }
        if let Some(control) = self.controls.get_mut(name) {
            control.value = value.to_string();
        }
        Ok(self.recompute())
    }

    pub fn set_checked(&mut self, name: &str, checked: bool) -> Result<()> {
        let field = self.editable_field(name)?;
        if field.kind != FieldKind::Checkbox {
            return Err(VoucherError::UnknownField(name.to_string()));
        }
        if let Some(control) = self.controls.get_mut(name) {
            control.checked = checked;
        }
        Ok(())
    }

    /// Write a value without the read-only check (voucher number, loaded data)
    pub(crate) fn write_value(&mut self, name: &str, value: &str) -> bool {
        match self.controls.get_mut(name) {
            Some(control) => {
                control.value = value.to_string();
                true
            }
            None => false,
        }
    }

    /// Recompute row-independent derived fields and the totals
    pub fn recompute(&mut self) -> Totals {
        let effective = |name: &str| self.value(name).unwrap_or("").to_string();

        let totals = match self.voucher_type() {
            VoucherType::Payment => {
                let subtotal = self.expenditures.as_ref().map_or(0.0, ExpenditureTable::subtotal);
                Totals::compute(
                    subtotal,
                    parse_amount(&effective("ssclVat")),
                    parse_amount(&effective("vat")),
                )
            }
            VoucherType::AdvancePayment | VoucherType::PettyCash => {
                let amount = single_line_amount(&effective("rate"), &effective("units"));
                let text = format_amount(amount);
                self.write_value("amount", &text);
                self.write_value("totalPayment", &text);
                Totals::flat(amount)
            }
            VoucherType::AdvanceSettlement => {
                let balance = settlement_balance(&effective("amountAdvance"), &effective("amountSpent"));
                self.write_value("balanceDue", &format_amount(balance));
                Totals::flat(balance)
            }
        };

        log::debug!(
            "recomputed {} totals: subtotal={} total={}",
            self.voucher_type(),
            format_amount(totals.subtotal),
            format_amount(totals.total)
        );
        self.totals = totals;
        totals
    }

    /// `formData` of a saved record: carried extra keys, then every input
    /// field's effective value
    pub fn form_data(&self) -> BTreeMap<String, String> {
        let mut data = self.extra.clone();
        for field in self.template.inputs() {
            data.insert(
                field.name.to_string(),
                self.value(field.name).unwrap_or("").to_string(),
            );
        }
        data
    }

    pub fn documents(&self) -> BTreeMap<String, bool> {
        let mut documents = self.extra_documents.clone();
        for field in self.template.checkboxes() {
            documents.insert(field.name.to_string(), self.is_checked(field.name));
        }
        documents
    }

    pub fn expenditure_lines(&self) -> Option<Vec<ExpenditureLine>> {
        self.expenditures.as_ref().map(ExpenditureTable::lines)
    }

    /// Fill the form from a saved record
    ///
    /// Known fields take the stored value as a user value, unknown keys are
    /// carried for the next save. Expenditure rows replace the current rows
    /// and keep their stored amounts.
    pub(crate) fn populate(&mut self, record: &VoucherRecord) {
        for (key, value) in &record.form_data {
            let is_input = self
                .template
                .field(key)
                .is_some_and(|f| f.kind != FieldKind::Checkbox);
            if is_input {
                self.write_value(key, value);
                // A loaded value is authoritative even when blank
                if let Some(control) = self.controls.get_mut(key.as_str()) {
                    control.fallback = None;
                }
            } else {
                self.extra.insert(key.clone(), value.clone());
            }
        }

        if let (Some(table), Some(lines)) = (self.expenditures.as_mut(), &record.expenditures) {
            table.clear();
            for line in lines {
                table.push_line(line);
            }
        }

        for (key, checked) in &record.documents {
            let is_checkbox = self
                .template
                .field(key)
                .is_some_and(|f| f.kind == FieldKind::Checkbox);
            match self.controls.get_mut(key.as_str()) {
                Some(control) if is_checkbox => control.checked = *checked,
                _ => {
                    self.extra_documents.insert(key.clone(), *checked);
                }
            }
        }

        self.recompute();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::RowField;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_effective_value_prefers_user_value() {
        let mut control = Control {
            fallback: Some("Admin".to_string()),
            ..Control::default()
        };
        assert_eq!(control.effective(), "Admin");

        control.value = "  ".to_string();
        assert_eq!(control.effective(), "Admin");

        control.value = "Finance".to_string();
        assert_eq!(control.effective(), "Finance");
    }

    #[test]
    fn test_payment_totals_follow_rows_and_taxes() {
        let mut form = FormState::new(VoucherType::Payment);
        let table = form.table_mut().unwrap();
        let id = table.add_row();
        table.set_field(id, RowField::Rate, "1000").unwrap();
        table.set_field(id, RowField::Units, "2").unwrap();

        form.set_value("ssclVat", "2.5").unwrap();
        let totals = form.set_value("vat", "8").unwrap();

        assert_eq!(format_amount(totals.subtotal), "2000.00");
        assert_eq!(format_amount(totals.sscl_amount), "50.00");
        assert_eq!(format_amount(totals.vat_amount), "160.00");
        assert_eq!(format_amount(totals.total), "2210.00");
    }

    #[test]
    fn test_tax_fallback_counts_in_totals() {
        let mut form = FormState::new(VoucherType::Payment);
        form.control_mut("vat").unwrap().fallback = Some("10".to_string());
        let table = form.table_mut().unwrap();
        let id = table.add_row();
        table.set_field(id, RowField::Rate, "100").unwrap();
        table.set_field(id, RowField::Units, "1").unwrap();

        assert_eq!(format_amount(form.recompute().total), "110.00");
    }

    #[test]
    fn test_single_line_derived_fields() {
        let mut form = FormState::new(VoucherType::PettyCash);
        form.set_value("rate", "750").unwrap();
        assert_eq!(form.value("amount"), Some("750.00"));

        form.set_value("units", "3").unwrap();
        assert_eq!(form.value("amount"), Some("2250.00"));
        assert_eq!(form.value("totalPayment"), Some("2250.00"));
        assert_eq!(form.totals().total, 2250.0);
    }

    #[test]
    fn test_settlement_refund() {
        let mut form = FormState::new(VoucherType::AdvanceSettlement);
        form.set_value("amountAdvance", "5000").unwrap();
        form.set_value("amountSpent", "6000").unwrap();
        assert_eq!(form.value("balanceDue"), Some("-1000.00"));
    }

    #[test]
    fn test_rejects_read_only_and_unknown_fields() {
        let mut form = FormState::new(VoucherType::AdvancePayment);
        assert!(matches!(
            form.set_value("amount", "1"),
            Err(VoucherError::ReadOnlyField(_))
        ));
        assert!(matches!(
            form.set_value("voucherNo", "X"),
            Err(VoucherError::ReadOnlyField(_))
        ));
        assert!(matches!(
            form.set_value("ssclVat", "1"),
            Err(VoucherError::UnknownField(_))
        ));
        assert!(matches!(
            form.set_value("doc-grn", "on"),
            Err(VoucherError::UnknownField(_))
        ));
        assert!(matches!(
            form.set_checked("payableTo", true),
            Err(VoucherError::UnknownField(_))
        ));
        assert!(form.table_mut().is_err());
    }

    #[test]
    fn test_form_data_and_documents() {
        let mut form = FormState::new(VoucherType::AdvancePayment);
        form.set_value("payableTo", "Lanka Couriers").unwrap();
        form.control_mut("preparedBy").unwrap().fallback = Some("K. Perera".to_string());
        form.set_checked("doc-invoice", true).unwrap();

        let data = form.form_data();
        assert_eq!(data["payableTo"], "Lanka Couriers");
        assert_eq!(data["preparedBy"], "K. Perera");
        assert_eq!(data["voucherNo"], "");
        assert!(!data.contains_key("doc-invoice"));

        let documents = form.documents();
        assert_eq!(documents.len(), 7);
        assert!(documents["doc-invoice"]);
        assert!(!documents["doc-grn"]);
        assert_eq!(form.expenditure_lines(), None);
    }

    #[test]
    fn test_populate_keeps_unknown_keys() {
        let record = VoucherRecord::from_json(
            r#"{
                "type": "payment",
                "formData": { "payableTo": "Ceylon Stationers", "ssclVat": "2.5", "legacyRef": "A-9" },
                "expenditures": [{ "desc": "Toner", "rate": "1000", "units": "2", "amount": "2000.00" }],
                "documents": { "doc-grn": true, "doc-legacy": true }
            }"#,
        )
        .unwrap();

        let mut form = FormState::new(VoucherType::Payment);
        form.populate(&record);

        assert_eq!(form.value("payableTo"), Some("Ceylon Stationers"));
        assert_eq!(form.extra()["legacyRef"], "A-9");
        assert_eq!(form.form_data()["legacyRef"], "A-9");
        assert!(form.documents()["doc-legacy"]);
        assert_eq!(format_amount(form.totals().total), "2050.00");
        assert_eq!(form.expenditure_lines().unwrap().len(), 1);
    }

    #[test]
    fn test_loaded_blank_value_overrides_default() {
        let record = VoucherRecord::from_json(
            r#"{
                "type": "petty-cash",
                "formData": { "preparedBy": "", "rate": "250", "units": "2" }
            }"#,
        )
        .unwrap();

        let mut form = FormState::new(VoucherType::PettyCash);
        form.control_mut("preparedBy").unwrap().fallback = Some("K. Perera".to_string());
        form.control_mut("checkedBy").unwrap().fallback = Some("S. Fernando".to_string());
        form.populate(&record);

        assert_eq!(form.value("preparedBy"), Some(""));
        assert_eq!(form.form_data()["preparedBy"], "");
        assert_eq!(form.value("checkedBy"), Some("S. Fernando"));
        assert_eq!(form.value("amount"), Some("500.00"));
    }
}
