//! Voucher types, screens and the saved voucher record

use crate::calc::Totals;
use crate::{Result, VoucherError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The four voucher forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VoucherType {
    Payment,
    AdvancePayment,
    AdvanceSettlement,
    PettyCash,
}

impl VoucherType {
    pub const ALL: [VoucherType; 4] = [
        VoucherType::Payment,
        VoucherType::AdvancePayment,
        VoucherType::AdvanceSettlement,
        VoucherType::PettyCash,
    ];

    /// Menu / file tag (`payment`, `advance-payment`, ...)
    pub fn tag(&self) -> &'static str {
        match self {
            VoucherType::Payment => "payment",
            VoucherType::AdvancePayment => "advance-payment",
            VoucherType::AdvanceSettlement => "advance-settlement",
            VoucherType::PettyCash => "petty-cash",
        }
    }

    /// Printed title
    pub fn title(&self) -> &'static str {
        match self {
            VoucherType::Payment => "Payment Voucher",
            VoucherType::AdvancePayment => "Advance Payment Voucher",
            VoucherType::AdvanceSettlement => "Advance Payment Settlement Voucher",
            VoucherType::PettyCash => "Petty Cash Voucher",
        }
    }

    /// Short code used in voucher numbers
    pub fn code(&self) -> &'static str {
        match self {
            VoucherType::Payment => "PV",
            VoucherType::AdvancePayment => "APV",
            VoucherType::AdvanceSettlement => "ASV",
            VoucherType::PettyCash => "PCV",
        }
    }

    /// Only payment vouchers carry a multi-row expenditure table
    pub fn has_expenditure_table(&self) -> bool {
        matches!(self, VoucherType::Payment)
    }
}

impl fmt::Display for VoucherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for VoucherType {
    type Err = VoucherError;

    fn from_str(s: &str) -> Result<Self> {
        VoucherType::ALL
            .into_iter()
            .find(|vt| vt.tag() == s)
            .ok_or_else(|| VoucherError::UnknownVoucherType(s.to_string()))
    }
}

/// Visible screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Welcome,
    Defaults,
    Voucher(VoucherType),
}

impl Screen {
    /// Menu tag for this screen
    pub fn tag(&self) -> &'static str {
        match self {
            Screen::Welcome => "welcome",
            Screen::Defaults => "defaults",
            Screen::Voucher(vt) => vt.tag(),
        }
    }

    pub fn voucher_type(&self) -> Option<VoucherType> {
        match self {
            Screen::Voucher(vt) => Some(*vt),
            _ => None,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for Screen {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl FromStr for Screen {
    type Err = VoucherError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "welcome" => Ok(Screen::Welcome),
            "defaults" => Ok(Screen::Defaults),
            other => other
                .parse::<VoucherType>()
                .map(Screen::Voucher)
                .map_err(|_| VoucherError::UnknownScreen(other.to_string())),
        }
    }
}

/// One expenditure line as written to a voucher file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenditureLine {
    #[serde(default, deserialize_with = "lenient_string")]
    pub desc: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rate: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub units: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub amount: String,
}

/// A saved voucher file
///
/// Unknown top-level keys are kept in `extra` and written back on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherRecord {
    #[serde(rename = "type")]
    pub voucher_type: VoucherType,

    /// RFC 3339 creation time
    #[serde(default)]
    pub timestamp: String,

    #[serde(default, deserialize_with = "lenient_string_map")]
    pub form_data: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expenditures: Option<Vec<ExpenditureLine>>,

    #[serde(default, deserialize_with = "lenient_bool_map")]
    pub documents: BTreeMap<String, bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totals: Option<Totals>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl VoucherRecord {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Display string for a loosely typed JSON value (`null` becomes "")
pub fn value_as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_as_string(&Value::deserialize(deserializer)?))
}

fn lenient_string_map<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(map
        .into_iter()
        .map(|(k, v)| (k, value_as_string(&v)))
        .collect())
}

fn lenient_bool_map<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(map
        .into_iter()
        .map(|(k, v)| {
            let checked = match v {
                Value::Bool(b) => b,
                Value::String(s) => s == "true" || s == "1" || s == "on",
                Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
                _ => false,
            };
            (k, checked)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_voucher_type_tags_and_codes() {
        assert_eq!(VoucherType::AdvanceSettlement.tag(), "advance-settlement");
        assert_eq!(VoucherType::PettyCash.code(), "PCV");
        assert_eq!(
            VoucherType::AdvanceSettlement.title(),
            "Advance Payment Settlement Voucher"
        );
        assert_eq!("petty-cash".parse::<VoucherType>().unwrap(), VoucherType::PettyCash);
        assert!(matches!(
            "receipt".parse::<VoucherType>(),
            Err(VoucherError::UnknownVoucherType(_))
        ));
    }

    #[test]
    fn test_screen_from_menu_tag() {
        assert_eq!("welcome".parse::<Screen>().unwrap(), Screen::Welcome);
        assert_eq!("defaults".parse::<Screen>().unwrap(), Screen::Defaults);
        assert_eq!(
            "advance-payment".parse::<Screen>().unwrap(),
            Screen::Voucher(VoucherType::AdvancePayment)
        );
        assert!(matches!("about".parse::<Screen>(), Err(VoucherError::UnknownScreen(_))));
        assert_eq!(Screen::Voucher(VoucherType::Payment).to_string(), "payment");
    }

    #[test]
    fn test_record_json_shape() {
        let mut form_data = BTreeMap::new();
        form_data.insert("payableTo".to_string(), "Ceylon Stationers".to_string());

        let record = VoucherRecord {
            voucher_type: VoucherType::Payment,
            timestamp: "2026-10-19T08:00:00.000Z".to_string(),
            form_data,
            expenditures: Some(vec![ExpenditureLine {
                desc: "Toner".to_string(),
                rate: "1000".to_string(),
                units: "2".to_string(),
                amount: "2000.00".to_string(),
            }]),
            documents: BTreeMap::from([("doc-invoice".to_string(), true)]),
            totals: None,
            extra: BTreeMap::new(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "payment");
        assert_eq!(value["formData"]["payableTo"], "Ceylon Stationers");
        assert_eq!(value["expenditures"][0]["amount"], "2000.00");
        assert_eq!(value["documents"]["doc-invoice"], true);
        assert!(value.get("totals").is_none());
    }

    #[test]
    fn test_record_tolerates_loose_values_and_unknown_keys() {
        let value = json!({
            "type": "advance-settlement",
            "timestamp": "2026-10-19T08:00:00.000Z",
            "formData": { "amountAdvance": 5000, "note": null, "flag": true },
            "documents": { "doc-grn": "true", "doc-invoice": 0 },
            "appVersion": "1.0.0"
        });

        let record = VoucherRecord::from_value(value).unwrap();
        assert_eq!(record.form_data["amountAdvance"], "5000");
        assert_eq!(record.form_data["note"], "");
        assert_eq!(record.form_data["flag"], "true");
        assert_eq!(record.documents["doc-grn"], true);
        assert_eq!(record.documents["doc-invoice"], false);
        assert_eq!(record.extra["appVersion"], json!("1.0.0"));

        let saved = serde_json::to_value(&record).unwrap();
        assert_eq!(saved["appVersion"], "1.0.0");
    }

    #[test]
    fn test_record_requires_known_type() {
        let result = VoucherRecord::from_json(r#"{ "type": "receipt", "formData": {} }"#);
        assert!(matches!(result, Err(VoucherError::Json(_))));
    }
}
