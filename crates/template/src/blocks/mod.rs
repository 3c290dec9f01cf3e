//! Block content helpers
//!
//! Resolution of the text a block prints, shared by the renderer.

pub use crate::schema::{Block, LineBlock, ListBlock, RectBlock, TableBlock, TableColumn, TextBlock};

use crate::parser::{resolve_binding, resolve_text, value_to_string};
use serde_json::Value;

/// Trait for blocks that can provide their text content
pub trait TextContent {
    /// Get the text content (either static or bound)
    fn get_text(&self, data: &Value) -> Option<String>;
}

impl TextContent for TextBlock {
    fn get_text(&self, data: &Value) -> Option<String> {
        if let Some(bind) = &self.bind {
            resolve_binding(bind, data).map(value_to_string)
        } else {
            self.text.clone()
        }
    }
}

impl TableColumn {
    /// Cell text for a row, with blank fallback and character limit applied
    pub fn cell_text(&self, row: &Value) -> String {
        let mut text = row.get(&self.field).map(value_to_string).unwrap_or_default();

        if text.trim().is_empty() {
            text = self.fallback.clone().unwrap_or_default();
        }

        match self.max_chars {
            Some(max) => pdf_core::truncate_chars(&text, max),
            None => text,
        }
    }
}

/// One printed list entry
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub marker: String,
    pub text: String,
}

impl ListBlock {
    /// Entries to print: bound array if present, else the static items
    pub fn entries(&self, data: &Value) -> Vec<ListEntry> {
        let bound = self
            .bind
            .as_deref()
            .and_then(|bind| resolve_binding(bind, data))
            .and_then(Value::as_array);

        match bound {
            Some(items) => items
                .iter()
                .filter_map(|item| self.entry(item))
                .collect(),
            None => self
                .items
                .iter()
                .map(|text| ListEntry {
                    marker: self.bullet.clone(),
                    text: text.clone(),
                })
                .collect(),
        }
    }

    fn entry(&self, item: &Value) -> Option<ListEntry> {
        let (text, marker) = match item {
            Value::Object(_) => (
                resolve_text("$.text", item),
                item.get("marker").map(value_to_string),
            ),
            other => (value_to_string(other), None),
        };

        if text.is_empty() {
            return None;
        }

        Some(ListEntry {
            marker: marker.unwrap_or_else(|| self.bullet.clone()),
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Position;
    use serde_json::json;

    #[test]
    fn test_text_content_with_bind() {
        let block = TextBlock {
            bind: Some("$.fields.sltbSection".to_string()),
            position: Position { x: 0.0, y: 0.0 },
            ..TextBlock::default()
        };

        let data = json!({ "fields": { "sltbSection": "Finance" } });
        assert_eq!(block.get_text(&data), Some("Finance".to_string()));
        assert_eq!(block.get_text(&json!({})), None);
    }

    #[test]
    fn test_text_content_static() {
        let block = TextBlock {
            text: Some("Payable To".to_string()),
            ..TextBlock::default()
        };

        assert_eq!(block.get_text(&json!({})), Some("Payable To".to_string()));
    }

    #[test]
    fn test_cell_text_fallback_and_truncation() {
        let mut column = TableColumn::new("rate", 0.0);
        column.fallback = Some("0".to_string());
        assert_eq!(column.cell_text(&json!({ "rate": "" })), "0");
        assert_eq!(column.cell_text(&json!({})), "0");

        let mut desc = TableColumn::new("desc", 0.0);
        desc.max_chars = Some(5);
        assert_eq!(desc.cell_text(&json!({ "desc": "Stationery" })), "Stati");
    }

    #[test]
    fn test_list_entries_bound_with_markers() {
        let list = ListBlock::bound("$.documents", 1, 0.0, 0.0);
        let data = json!({
            "documents": [
                { "text": "Invoice", "marker": "[X]" },
                { "text": "Board Approval" },
                "Service Completed Report",
                { "text": "" }
            ]
        });

        assert_eq!(
            list.entries(&data),
            vec![
                ListEntry { marker: "[X]".to_string(), text: "Invoice".to_string() },
                ListEntry { marker: "\u{2022}".to_string(), text: "Board Approval".to_string() },
                ListEntry {
                    marker: "\u{2022}".to_string(),
                    text: "Service Completed Report".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_list_entries_static() {
        let list = ListBlock::fixed(vec!["Other related documents".to_string()], 1, 0.0, 0.0);
        let entries = list.entries(&json!({}));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].marker, "\u{2022}");
    }
}
