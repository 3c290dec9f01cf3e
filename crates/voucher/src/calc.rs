//! Expenditure lines and totals
//!
//! Amounts are kept as the strings the form shows (`"2000.00"`); all arithmetic
//! goes through [`parse_amount`], which reads a leading number the way a
//! browser number field does and treats anything else as zero.

use crate::model::ExpenditureLine;
use crate::{Result, VoucherError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Parse the leading decimal number of `text`
///
/// Leading whitespace is skipped; parsing stops at the first character that
/// cannot extend the number (`"12abc"` is 12, `"1.5.2"` is 1.5).
/// Returns `None` when no digits are found.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }

    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        let mut frac_digits = 0;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
            frac_digits += 1;
        }
        if digits > 0 || frac_digits > 0 {
            end = frac_end;
            digits += frac_digits;
        }
    }

    if digits == 0 {
        return None;
    }

    // exponent only counts when followed by at least one digit
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse an amount field; blank or unparsable is 0
pub fn parse_amount(text: &str) -> f64 {
    parse_leading_number(text).unwrap_or(0.0)
}

/// Format an amount with two decimals (`-0.00` prints as `0.00`)
pub fn format_amount(value: f64) -> String {
    let text = format!("{value:.2}");
    if text == "-0.00" {
        "0.00".to_string()
    } else {
        text
    }
}

/// Computed totals of a payment voucher
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub sscl_amount: f64,
    #[serde(default)]
    pub vat_amount: f64,
    #[serde(default)]
    pub total: f64,
}

impl Totals {
    /// Apply SSCL VAT and VAT percentages to a subtotal
    pub fn compute(subtotal: f64, sscl_percent: f64, vat_percent: f64) -> Self {
        let sscl_amount = subtotal * sscl_percent / 100.0;
        let vat_amount = subtotal * vat_percent / 100.0;
        Self {
            subtotal,
            sscl_amount,
            vat_amount,
            total: subtotal + sscl_amount + vat_amount,
        }
    }

    /// Totals of a single-amount voucher (no taxes)
    pub fn flat(amount: f64) -> Self {
        Self::compute(amount, 0.0, 0.0)
    }
}

/// Amount of a single-line voucher
///
/// Blank or unparsable units count as one unit.
pub fn single_line_amount(rate: &str, units: &str) -> f64 {
    let units = parse_leading_number(units).unwrap_or(1.0);
    parse_amount(rate) * units
}

/// Settlement balance: positive is due, negative is a refund
pub fn settlement_balance(advance: &str, spent: &str) -> f64 {
    parse_amount(advance) - parse_amount(spent)
}

/// Editable column of an expenditure row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    Description,
    Rate,
    Units,
}

impl FromStr for RowField {
    type Err = VoucherError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "desc" | "description" => Ok(RowField::Description),
            "rate" => Ok(RowField::Rate),
            "units" => Ok(RowField::Units),
            other => Err(VoucherError::UnknownField(other.to_string())),
        }
    }
}

/// One line of the expenditure table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpenditureRow {
    pub id: u32,
    pub description: String,
    pub rate: String,
    pub units: String,
    /// Derived: rate x units, two decimals
    pub amount: String,
}

impl ExpenditureRow {
    fn is_blank(&self) -> bool {
        [&self.description, &self.rate, &self.units, &self.amount]
            .iter()
            .all(|s| s.is_empty())
    }

    /// Recompute the amount from rate and units
    pub fn recompute(&mut self) {
        self.amount = format_amount(parse_amount(&self.rate) * parse_amount(&self.units));
    }

    pub fn to_line(&self) -> ExpenditureLine {
        ExpenditureLine {
            desc: self.description.clone(),
            rate: self.rate.clone(),
            units: self.units.clone(),
            amount: self.amount.clone(),
        }
    }
}

/// Expenditure table of a payment voucher
///
/// Row ids come from a counter that only grows; removing a row never frees
/// its id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpenditureTable {
    rows: Vec<ExpenditureRow>,
    last_id: u32,
}

impl ExpenditureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty table whose first row gets `last_id + 1`
    pub fn continuing_from(last_id: u32) -> Self {
        Self {
            rows: Vec::new(),
            last_id,
        }
    }

    /// Append an empty row and return its id
    pub fn add_row(&mut self) -> u32 {
        self.last_id += 1;
        self.rows.push(ExpenditureRow {
            id: self.last_id,
            ..ExpenditureRow::default()
        });
        self.last_id
    }

    /// Append a row from a saved line, keeping its stored amount
    pub fn push_line(&mut self, line: &ExpenditureLine) -> u32 {
        let id = self.add_row();
        if let Some(row) = self.rows.last_mut() {
            row.description = line.desc.clone();
            row.rate = line.rate.clone();
            row.units = line.units.clone();
            row.amount = line.amount.clone();
        }
        id
    }

    pub fn remove_row(&mut self, id: u32) -> Result<ExpenditureRow> {
        let index = self
            .rows
            .iter()
            .position(|r| r.id == id)
            .ok_or(VoucherError::RowNotFound(id))?;
        Ok(self.rows.remove(index))
    }

    /// Remove every row; the id counter keeps counting
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn row(&self, id: u32) -> Option<&ExpenditureRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn rows(&self) -> &[ExpenditureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Highest id handed out so far
    pub fn last_id(&self) -> u32 {
        self.last_id
    }

    /// Edit one cell; editing rate or units recomputes the row amount
    pub fn set_field(&mut self, id: u32, field: RowField, value: &str) -> Result<()> {
        let row = self
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(VoucherError::RowNotFound(id))?;

        match field {
            RowField::Description => row.description = value.to_string(),
            RowField::Rate => {
                row.rate = value.to_string();
                row.recompute();
            }
            RowField::Units => {
                row.units = value.to_string();
                row.recompute();
            }
        }

        Ok(())
    }

    pub fn recompute_row(&mut self, id: u32) -> Result<()> {
        self.rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(VoucherError::RowNotFound(id))?
            .recompute();
        Ok(())
    }

    /// Sum of the amounts of the rows currently present
    pub fn subtotal(&self) -> f64 {
        self.rows.iter().map(|r| parse_amount(&r.amount)).sum()
    }

    /// Lines to save: rows with at least one non-empty cell
    pub fn lines(&self) -> Vec<ExpenditureLine> {
        self.rows
            .iter()
            .filter(|r| !r.is_blank())
            .map(ExpenditureRow::to_line)
            .collect()
    }
}
