//! Application configuration

use crate::autofill::{FillMode, FillOptions};
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULTS_KEY: &str = "sltb-defaults";
const VOUCHER_DIR_NAME: &str = "SLTB_Vouchers";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Where saved voucher files go
    pub voucher_dir: PathBuf,
    /// Key-value store key holding the defaults record
    pub defaults_key: String,
    pub dev_mode: bool,
    pub fill_mode: FillMode,
    pub synthesize_options: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_dir(default_voucher_dir(|key| std::env::var(key).ok()))
    }
}

impl AppConfig {
    /// Read `SLTB_VOUCHER_ENV` and `SLTB_VOUCHER_DIR` from the environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let voucher_dir = lookup("SLTB_VOUCHER_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default_voucher_dir(&lookup));

        Self {
            voucher_dir,
            dev_mode: lookup("SLTB_VOUCHER_ENV").as_deref() == Some("development"),
            ..Self::with_dir(PathBuf::new())
        }
    }

    /// Default settings with an explicit voucher directory
    pub fn with_dir(voucher_dir: impl Into<PathBuf>) -> Self {
        Self {
            voucher_dir: voucher_dir.into(),
            defaults_key: DEFAULTS_KEY.to_string(),
            dev_mode: false,
            fill_mode: FillMode::default(),
            synthesize_options: false,
        }
    }

    pub fn fill_options(&self) -> FillOptions {
        FillOptions {
            mode: self.fill_mode,
            synthesize_options: self.synthesize_options,
        }
    }
}

/// `<home>/Documents/SLTB_Vouchers`, home from `USERPROFILE` then `HOME`
fn default_voucher_dir<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let home = lookup("USERPROFILE")
        .or_else(|| lookup("HOME"))
        .unwrap_or_else(|| ".".to_string());
    PathBuf::from(home).join("Documents").join(VOUCHER_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_dir_from_home() {
        let config = AppConfig::from_lookup(lookup(&[("HOME", "/home/clerk")]));
        assert_eq!(
            config.voucher_dir,
            PathBuf::from("/home/clerk/Documents/SLTB_Vouchers")
        );
        assert!(!config.dev_mode);
        assert_eq!(config.defaults_key, "sltb-defaults");
        assert_eq!(config.fill_mode, FillMode::Placeholder);
    }

    #[test]
    fn test_userprofile_wins() {
        let config = AppConfig::from_lookup(lookup(&[
            ("USERPROFILE", "C:\\Users\\clerk"),
            ("HOME", "/home/clerk"),
        ]));
        assert!(config.voucher_dir.starts_with("C:\\Users\\clerk"));
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("HOME", "/home/clerk"),
            ("SLTB_VOUCHER_DIR", "/srv/vouchers"),
            ("SLTB_VOUCHER_ENV", "development"),
        ]));
        assert_eq!(config.voucher_dir, PathBuf::from("/srv/vouchers"));
        assert!(config.dev_mode);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "voucherDir": "/tmp/v", "fillMode": "value" }"#).unwrap();
        assert_eq!(config.voucher_dir, PathBuf::from("/tmp/v"));
        assert_eq!(config.fill_mode, FillMode::Value);
        assert_eq!(config.defaults_key, "sltb-defaults");
        assert!(!config.fill_options().synthesize_options);
    }
}
