//! Default-fill resolver
//!
//! Applies saved defaults to an open form. Each default key is matched to a
//! control by, in order: field name, control id, the alias table, and finally
//! a case-insensitive substring match over names, ids and placeholders. A
//! control that already holds a user value is never touched.

use crate::defaults::DefaultSettings;
use crate::form_state::FormState;
use crate::forms::{alias_control_id, FieldDef, FieldKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How a default reaches the control
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    /// Shown as placeholder text and used only while the control is blank
    #[default]
    Placeholder,
    /// Written into the control as if typed
    Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillOptions {
    pub mode: FillMode,
    /// Add a select option for a default that matches none
    pub synthesize_options: bool,
}

/// What a fill pass did, by default key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillReport {
    pub applied: Vec<String>,
    pub skipped_blank: Vec<String>,
    pub unmatched: Vec<String>,
    pub missing_option: Vec<String>,
    /// Matched but left alone (user value present, or unchecked checkbox value)
    pub preserved: Vec<String>,
    pub date_set: bool,
}

fn find_field<'a>(form: &'a FormState, key: &str) -> Option<&'a FieldDef> {
    let template = form.template();
    let writable = |f: &&FieldDef| !f.read_only;

    if let Some(field) = template.field(key).filter(writable) {
        return Some(field);
    }
    if let Some(field) = template.field_by_id(key).filter(writable) {
        return Some(field);
    }
    if let Some(field) = alias_control_id(key)
        .and_then(|id| template.field_by_id(id))
        .filter(writable)
    {
        return Some(field);
    }

    let needle = key.to_lowercase();
    let found = template.fields().iter().filter(writable).find(|f| {
        f.name.to_lowercase().contains(&needle)
            || f.control_id.to_lowercase().contains(&needle)
            || f.placeholder
                .is_some_and(|p| p.to_lowercase().contains(&needle))
    });
    if let Some(field) = found {
        log::debug!("default '{}' fuzzy-matched field '{}'", key, field.name);
    }
    found
}

fn is_checked_value(value: &str) -> bool {
    matches!(value.trim(), "true" | "1")
}

/// Apply `defaults` to `form`, then set the voucher date to `today` if empty
pub fn apply_defaults(
    form: &mut FormState,
    defaults: &DefaultSettings,
    options: FillOptions,
    today: NaiveDate,
) -> FillReport {
    let mut report = FillReport::default();

    for (key, value) in defaults.iter() {
        let value = value.trim();
        if value.is_empty() {
            report.skipped_blank.push(key.to_string());
            continue;
        }

        let Some(field) = find_field(form, key).copied() else {
            log::warn!("no control found for default '{}'", key);
            report.unmatched.push(key.to_string());
            continue;
        };

        if field.kind == FieldKind::Select
            && !form.options(field.name).iter().any(|o| *o == value)
        {
            if !options.synthesize_options {
                log::warn!("option '{}' not found for '{}'", value, field.name);
                report.missing_option.push(key.to_string());
                continue;
            }
            if let Some(control) = form.control_mut(field.name) {
                control.extra_options.push(value.to_string());
            }
        }

        let Some(control) = form.control_mut(field.name) else {
            report.unmatched.push(key.to_string());
            continue;
        };

        if field.kind == FieldKind::Checkbox {
            if is_checked_value(value) {
                control.checked = true;
                report.applied.push(key.to_string());
            } else {
                report.preserved.push(key.to_string());
            }
            continue;
        }

        if control.has_user_value() {
            log::debug!("keeping user value of '{}'", field.name);
            report.preserved.push(key.to_string());
            continue;
        }

        match options.mode {
            FillMode::Placeholder => control.fallback = Some(value.to_string()),
            FillMode::Value => control.value = value.to_string(),
        }
        log::debug!("default '{}' -> '{}' ({:?})", key, field.name, options.mode);
        report.applied.push(key.to_string());
    }

    let date_blank = form
        .control("voucherDate")
        .is_some_and(|c| !c.has_user_value());
    if date_blank {
        report.date_set = form.write_value("voucherDate", &today.format("%Y-%m-%d").to_string());
    }

    form.recompute();
    report
}
