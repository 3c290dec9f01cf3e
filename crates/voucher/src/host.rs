//! Request/response channel between the form layer and the host shell

use crate::model::VoucherRecord;
use crate::persistence::{LoadOutcome, PersistenceGateway, SaveOutcome};
use serde_json::{json, Value};

pub const SAVE_VOUCHER_DATA: &str = "save-voucher-data";
pub const LOAD_VOUCHER_DATA: &str = "load-voucher-data";

/// Dispatches named host operations to a persistence gateway
///
/// Payloads and replies are JSON; a failing request always answers
/// `{ "success": false, "error": ... }`.
pub struct HostChannel {
    gateway: Box<dyn PersistenceGateway>,
}

impl HostChannel {
    pub fn new(gateway: Box<dyn PersistenceGateway>) -> Self {
        Self { gateway }
    }

    pub fn invoke(&mut self, operation: &str, payload: Value) -> Value {
        log::debug!("host request '{}'", operation);
        let reply = match operation {
            SAVE_VOUCHER_DATA => match VoucherRecord::from_value(payload) {
                Ok(record) => serde_json::to_value(self.gateway.save(&record)),
                Err(e) => serde_json::to_value(SaveOutcome::failed(e.to_string())),
            },
            LOAD_VOUCHER_DATA => serde_json::to_value(self.gateway.load()),
            other => Ok(json!({
                "success": false,
                "error": format!("Unknown operation: {other}"),
            })),
        };

        reply.unwrap_or_else(|e| json!({ "success": false, "error": e.to_string() }))
    }

    /// String form of [`HostChannel::invoke`] for hosts that pass raw JSON
    pub fn invoke_json(&mut self, operation: &str, payload: &str) -> String {
        let payload = if payload.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(payload) {
                Ok(value) => value,
                Err(e) => return json!({ "success": false, "error": e.to_string() }).to_string(),
            }
        };
        self.invoke(operation, payload).to_string()
    }

    pub fn save(&mut self, record: &VoucherRecord) -> SaveOutcome {
        let payload = match serde_json::to_value(record) {
            Ok(payload) => payload,
            Err(e) => return SaveOutcome::failed(e.to_string()),
        };
        serde_json::from_value(self.invoke(SAVE_VOUCHER_DATA, payload))
            .unwrap_or_else(|e| SaveOutcome::failed(e.to_string()))
    }

    pub fn load(&mut self) -> LoadOutcome {
        serde_json::from_value(self.invoke(LOAD_VOUCHER_DATA, Value::Null))
            .unwrap_or_else(|e| LoadOutcome::failed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Keeps the last saved record in memory and serves it back on load
    #[derive(Default)]
    struct SharedGateway(Rc<RefCell<Option<VoucherRecord>>>);

    impl PersistenceGateway for SharedGateway {
        fn save(&mut self, record: &VoucherRecord) -> SaveOutcome {
            *self.0.borrow_mut() = Some(record.clone());
            SaveOutcome::saved("memory://voucher.json")
        }

        fn load(&mut self) -> LoadOutcome {
            match self.0.borrow().as_ref() {
                Some(record) => LoadOutcome::loaded(serde_json::to_value(record).unwrap()),
                None => LoadOutcome::failed("No file selected"),
            }
        }
    }

    #[test]
    fn test_save_and_load_operations() {
        let mut channel = HostChannel::new(Box::new(SharedGateway::default()));

        let empty = channel.invoke(LOAD_VOUCHER_DATA, Value::Null);
        assert_eq!(empty, json!({ "success": false, "error": "No file selected" }));

        let reply = channel.invoke(
            SAVE_VOUCHER_DATA,
            json!({ "type": "payment", "formData": { "vat": "8" }, "documents": {} }),
        );
        assert_eq!(reply, json!({ "success": true, "path": "memory://voucher.json" }));

        let loaded = channel.load();
        assert!(loaded.success);
        assert_eq!(loaded.data.unwrap()["formData"]["vat"], "8");
    }

    #[test]
    fn test_bad_requests() {
        let mut channel = HostChannel::new(Box::new(SharedGateway::default()));

        let unknown = channel.invoke("delete-voucher-data", Value::Null);
        assert_eq!(unknown["success"], false);
        assert_eq!(unknown["error"], "Unknown operation: delete-voucher-data");

        let invalid = channel.invoke(SAVE_VOUCHER_DATA, json!({ "formData": {} }));
        assert_eq!(invalid["success"], false);

        let raw: Value =
            serde_json::from_str(&channel.invoke_json(SAVE_VOUCHER_DATA, "{oops")).unwrap();
        assert_eq!(raw["success"], false);
    }
}
