//! Default settings and the key-value stores they live in

use crate::forms::friendly_name;
use crate::model::value_as_string;
use crate::{Result, VoucherError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// String key-value storage (browser `localStorage`, a JSON file, memory)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by one JSON object file; a missing file is an empty store
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let text = fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&text).map_err(|e| {
            VoucherError::Storage(format!("{}: {}", self.path.display(), e))
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Saved default values, field name to value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefaultSettings(BTreeMap<String, String>);

impl DefaultSettings {
    /// Build from form entries: values are trimmed and blank ones dropped
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        Self(
            entries
                .into_iter()
                .filter_map(|(k, v)| {
                    let value = v.as_ref().trim();
                    (!value.is_empty()).then(|| (k.into(), value.to_string()))
                })
                .collect(),
        )
    }

    /// Parse the stored JSON object; scalar values are read as strings,
    /// nested values are ignored
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, Value> = serde_json::from_str(json)?;
        Ok(Self(
            raw.into_iter()
                .filter(|(_, v)| matches!(v, Value::String(_) | Value::Bool(_) | Value::Number(_)))
                .map(|(k, v)| (k, value_as_string(&v)))
                .collect(),
        ))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// One `Friendly Name: value` line per entry
    pub fn preview(&self) -> Vec<String> {
        if self.is_empty() {
            return vec!["No default values set".to_string()];
        }
        self.iter()
            .map(|(k, v)| format!("{}: {}", friendly_name(k), v))
            .collect()
    }
}

/// Defaults stored as one JSON object under a fixed key
pub struct DefaultsRepository {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl DefaultsRepository {
    pub fn new(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the stored defaults
    ///
    /// Unreadable or malformed data is logged and treated as no defaults.
    pub fn load(&self) -> DefaultSettings {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return DefaultSettings::default(),
            Err(e) => {
                log::warn!("could not read defaults '{}': {}", self.key, e);
                return DefaultSettings::default();
            }
        };

        match DefaultSettings::from_json(&raw) {
            Ok(settings) => {
                log::debug!("loaded {} default values", settings.len());
                settings
            }
            Err(e) => {
                log::warn!("malformed defaults under '{}', ignoring: {}", self.key, e);
                DefaultSettings::default()
            }
        }
    }

    pub fn save(&mut self, settings: &DefaultSettings) -> Result<()> {
        self.store.set(&self.key, &settings.to_json()?)?;
        log::info!("saved {} default values", settings.len());
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(&self.key)?;
        log::info!("cleared default values");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_entries_trims_and_drops_blank() {
        let settings = DefaultSettings::from_entries([
            ("sltbSection", " Admin "),
            ("preparedBy", "   "),
            ("vat", "8"),
            ("checkedBy", ""),
        ]);

        assert_eq!(settings.len(), 2);
        assert_eq!(settings.get("sltbSection"), Some("Admin"));
        assert_eq!(settings.get("preparedBy"), None);
    }

    #[test]
    fn test_from_json_coerces_scalars() {
        let settings =
            DefaultSettings::from_json(r#"{"vat": 8, "doc-grn": true, "x": null, "y": [1], "z": "a"}"#)
                .unwrap();
        assert_eq!(settings.get("vat"), Some("8"));
        assert_eq!(settings.get("doc-grn"), Some("true"));
        assert_eq!(settings.get("x"), None);
        assert_eq!(settings.get("y"), None);
        assert_eq!(settings.get("z"), Some("a"));
    }

    #[test]
    fn test_preview_uses_friendly_names() {
        let settings = DefaultSettings::from_entries([("sltbSection", "Admin"), ("vat", "8")]);
        assert_eq!(settings.preview(), vec!["SLTB Section: Admin", "VAT (%): 8"]);
        assert_eq!(DefaultSettings::default().preview(), vec!["No default values set"]);
    }

    #[test]
    fn test_repository_roundtrip_and_clear() {
        let mut repo = DefaultsRepository::new(Box::new(MemoryStore::new()), "sltb-defaults");
        assert!(repo.load().is_empty());

        let settings = DefaultSettings::from_entries([("payableTo", "Lanka Couriers")]);
        repo.save(&settings).unwrap();
        assert_eq!(repo.load(), settings);

        repo.clear().unwrap();
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_malformed_defaults_read_as_empty() {
        let store = MemoryStore::with_entry("sltb-defaults", "{not json");
        let repo = DefaultsRepository::new(Box::new(store), "sltb-defaults");
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_file_store() {
        let path = std::env::temp_dir()
            .join(format!("sltb-voucher-store-{}", std::process::id()))
            .join("defaults.json");
        let mut store = FileStore::new(&path);

        assert_eq!(store.get("sltb-defaults").unwrap(), None);
        store.set("sltb-defaults", r#"{"vat":"8"}"#).unwrap();
        assert_eq!(store.get("sltb-defaults").unwrap().as_deref(), Some(r#"{"vat":"8"}"#));

        store.remove("sltb-defaults").unwrap();
        assert_eq!(store.get("sltb-defaults").unwrap(), None);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
