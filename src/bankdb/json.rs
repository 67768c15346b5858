//! JSON bank registry loader.
//!
//! # Feature
//!
//! Requires the `registry-json` feature.
//!
//! # Supported Formats
//!
//! ## Array of bank records
//!
//! ```json
//! [
//!   { "code": "603799", "name": "بانک ملی", "active": true },
//!   { "bin": "639599", "bank": "بانک قوامین", "active": false }
//! ]
//! ```
//!
//! ## Object keyed by BIN
//!
//! ```json
//! { "603799": "بانک ملی", "610433": { "name": "بانک ملت" } }
//! ```

use super::{Bank, BinTable};
use crate::error::RegistryError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;

/// JSON bank registry loader.
pub struct JsonBankLoader;

impl JsonBankLoader {
    /// Loads the active-bank table from a JSON file.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use iran_banks::bank::JsonBankLoader;
    ///
    /// let table = JsonBankLoader::from_file("banks.json")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<BinTable, RegistryError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Loads the active-bank table from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<BinTable, RegistryError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::parse(&content)
    }

    /// Loads the active-bank table from a JSON string.
    pub fn parse(json: &str) -> Result<BinTable, RegistryError> {
        let banks = Self::parse_banks(json)?;
        BinTable::from_banks(&banks)
    }

    /// Parses every bank record, active or not.
    pub fn parse_banks(json: &str) -> Result<Vec<Bank>, RegistryError> {
        let trimmed = json.trim();

        let entries: Vec<JsonBankEntry> = if trimmed.starts_with('[') {
            serde_json::from_str(trimmed).map_err(parse_error)?
        } else if trimmed.starts_with('{') {
            let map: HashMap<String, JsonObjectValue> =
                serde_json::from_str(trimmed).map_err(parse_error)?;
            map.into_iter()
                .map(|(code, value)| value.into_entry(code))
                .collect()
        } else {
            return Err(RegistryError::Parse(
                "Invalid JSON format: expected array or object".to_string(),
            ));
        };

        entries
            .into_iter()
            .map(|entry| {
                let bank = entry.into_bank();
                bank.validate()?;
                Ok(bank)
            })
            .collect()
    }

    /// Serializes bank records to the array format.
    pub fn to_json(banks: &[Bank]) -> Result<String, RegistryError> {
        serde_json::to_string_pretty(banks).map_err(parse_error)
    }
}

fn parse_error(e: serde_json::Error) -> RegistryError {
    RegistryError::Parse(format!("JSON parse error: {}", e))
}

/// Internal structure for deserializing JSON bank entries.
#[derive(Debug, Deserialize, Default)]
struct JsonBankEntry {
    #[serde(default, alias = "bin")]
    code: String,

    #[serde(default, alias = "bank", alias = "bank_name", alias = "issuer")]
    name: String,

    #[serde(default = "default_active", alias = "is_active")]
    active: bool,

    #[serde(default)]
    created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl JsonBankEntry {
    fn into_bank(self) -> Bank {
        let mut bank = Bank::new(self.code, self.name).active(self.active);
        if let Some(created_at) = self.created_at {
            bank.created_at = created_at;
        }
        bank.updated_at = self.updated_at.unwrap_or(bank.created_at);
        bank
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonObjectValue {
    Name(String),
    Entry(JsonBankEntry),
}

impl JsonObjectValue {
    fn into_entry(self, code: String) -> JsonBankEntry {
        match self {
            Self::Name(name) => JsonBankEntry {
                code,
                name,
                active: true,
                ..Default::default()
            },
            Self::Entry(mut entry) => {
                if entry.code.is_empty() {
                    entry.code = code;
                }
                entry
            }
        }
    }
}
