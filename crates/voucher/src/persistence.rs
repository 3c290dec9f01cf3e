//! Saving and opening voucher files

use crate::clock::{Clock, SystemClock};
use crate::model::VoucherRecord;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of a save request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveOutcome {
    pub fn saved(path: impl Into<String>) -> Self {
        Self {
            success: true,
            path: Some(path.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            path: None,
            error: Some(error.into()),
        }
    }
}

/// Result of a load request; `data` is the raw voucher JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoadOutcome {
    pub fn loaded(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Where voucher files are written to and read from
pub trait PersistenceGateway {
    fn save(&mut self, record: &VoucherRecord) -> SaveOutcome;
    fn load(&mut self) -> LoadOutcome;
}

/// File type filter handed to a file picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

pub const JSON_FILTER: FileFilter = FileFilter {
    name: "JSON Files",
    extensions: &["json"],
};

type Picker = Box<dyn FnMut(&FileFilter) -> Option<PathBuf>>;

/// Gateway over the local file system
///
/// Saves go to `<dir>/voucher_<type>_<epoch-ms>.json`. Loading asks the
/// picker for a file; without a picker every load reports "No file selected".
pub struct FileGateway {
    dir: PathBuf,
    picker: Option<Picker>,
    clock: Box<dyn Clock>,
}

impl FileGateway {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            picker: None,
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_picker<F>(mut self, picker: F) -> Self
    where
        F: FnMut(&FileFilter) -> Option<PathBuf> + 'static,
    {
        self.picker = Some(Box::new(picker));
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_record(&self, record: &VoucherRecord) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!(
            "voucher_{}_{}.json",
            record.voucher_type,
            self.clock.epoch_millis()
        ));
        fs::write(&path, record.to_json_pretty()?)?;
        Ok(path)
    }

    fn read_file(path: &Path) -> Result<Value> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl PersistenceGateway for FileGateway {
    fn save(&mut self, record: &VoucherRecord) -> SaveOutcome {
        match self.write_record(record) {
            Ok(path) => {
                log::info!("voucher saved to {}", path.display());
                SaveOutcome::saved(path.display().to_string())
            }
            Err(e) => {
                log::error!("saving voucher failed: {}", e);
                SaveOutcome::failed(e.to_string())
            }
        }
    }

    fn load(&mut self) -> LoadOutcome {
        let picked = self.picker.as_mut().and_then(|pick| pick(&JSON_FILTER));
        let Some(path) = picked else {
            return LoadOutcome::failed("No file selected");
        };

        match Self::read_file(&path) {
            Ok(data) => {
                log::info!("voucher loaded from {}", path.display());
                LoadOutcome::loaded(data)
            }
            Err(e) => {
                log::error!("loading {} failed: {}", path.display(), e);
                LoadOutcome::failed(e.to_string())
            }
        }
    }
}
