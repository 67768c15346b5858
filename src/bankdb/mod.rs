//! BIN table and bank registry integration.
//!
//! The validator only ever reads a [`BinTable`]: an immutable map from a
//! six-digit BIN to the bank's display name. Where that table comes from is
//! the job of a [`BankRegistry`]:
//!
//! - [`BinTable::builtin`] - the 21 Iranian banks compiled into the crate
//! - [`MemoryBankRegistry`] - an in-memory registry that publishes new
//!   snapshots copy-on-write
//! - `JsonBankLoader` / `CsvBankLoader` - file loaders (`registry-json`,
//!   `registry-csv` features)
//! - `SqliteBankRegistry` - SQLite-backed bank records (`registry-sqlite`)
//!
//! # Example
//!
//! ```
//! use iran_banks::bank::{BankRegistry, BinTable};
//!
//! let table = BinTable::builtin();
//! assert_eq!(table.get("603799"), Some("بانک ملی"));
//!
//! let active = table.list_active_banks().unwrap();
//! assert_eq!(active.len(), table.len());
//! ```

mod builtin;
mod memory;

#[cfg(feature = "registry-json")]
mod json;

#[cfg(feature = "registry-csv")]
mod csv;

#[cfg(feature = "registry-sqlite")]
mod sqlite;

pub use builtin::IRANIAN_BANKS;
pub use memory::MemoryBankRegistry;

#[cfg(feature = "registry-json")]
pub use json::JsonBankLoader;

#[cfg(feature = "registry-csv")]
pub use csv::CsvBankLoader;

#[cfg(feature = "registry-sqlite")]
pub use sqlite::SqliteBankRegistry;

use crate::card::is_valid_bin;
use crate::error::RegistryError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Source of the BIN table used for detection.
///
/// Implementations own uniqueness of bank codes and the activation
/// lifecycle; callers only see the resulting table of active banks.
pub trait BankRegistry: Send + Sync {
    /// Returns a table of all active banks, keyed by BIN.
    fn list_active_banks(&self) -> Result<BinTable, RegistryError>;
}

/// Immutable mapping from six-digit BIN to bank display name.
///
/// Every key is validated on insertion, so a table never holds a code that
/// is not exactly six digits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinTable {
    entries: HashMap<String, String>,
}

impl BinTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the built-in table of Iranian banks.
    pub fn builtin() -> &'static BinTable {
        static BUILTIN: OnceLock<BinTable> = OnceLock::new();
        BUILTIN.get_or_init(|| BinTable {
            entries: IRANIAN_BANKS
                .iter()
                .map(|&(code, name)| (code.to_string(), name.to_string()))
                .collect(),
        })
    }

    /// Builds a table from `(code, name)` pairs.
    ///
    /// Later pairs replace earlier ones with the same code.
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::new();
        for (code, name) in entries {
            table.insert(code, name)?;
        }
        Ok(table)
    }

    /// Builds a table from bank records, skipping inactive banks.
    pub fn from_banks<'a, I>(banks: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = &'a Bank>,
    {
        Self::from_entries(
            banks
                .into_iter()
                .filter(|bank| bank.is_active())
                .map(|bank| (bank.code.as_str(), bank.name.as_str())),
        )
    }

    /// Inserts or replaces an entry.
    ///
    /// Tables shared with a detector are never mutated; build a new table
    /// and publish it through [`MemoryBankRegistry::publish`] instead.
    pub fn insert(
        &mut self,
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let code = code.into();
        if !is_valid_bin(&code) {
            return Err(RegistryError::InvalidBin(code));
        }
        self.entries.insert(code, name.into());
        Ok(())
    }

    /// Removes an entry, returning the bank name if present.
    pub fn remove(&mut self, code: &str) -> Option<String> {
        self.entries.remove(code)
    }

    /// Looks up the bank name for a BIN.
    #[inline]
    pub fn get(&self, bin: &str) -> Option<&str> {
        self.entries.get(bin).map(String::as_str)
    }

    /// Returns true if the BIN is present.
    #[inline]
    pub fn contains(&self, bin: &str) -> bool {
        self.entries.contains_key(bin)
    }

    /// Returns the number of banks in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(code, name)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns an owned copy of the mapping.
    pub fn to_map(&self) -> HashMap<String, String> {
        self.entries.clone()
    }
}

impl BankRegistry for BinTable {
    fn list_active_banks(&self) -> Result<BinTable, RegistryError> {
        Ok(self.clone())
    }
}

/// A bank record as kept by an administrative store.
///
/// Only `code` and `name` of active records reach the BIN table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bank {
    /// Six-digit BIN used as the card number prefix.
    pub code: String,
    /// Display name of the bank, in Persian.
    pub name: String,
    /// Whether the bank is currently active in the banking system.
    pub active: bool,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Bank {
    /// Creates an active bank record timestamped now.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            code: code.into(),
            name: name.into(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder method to set the active flag.
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Returns the card number prefix for this bank.
    #[inline]
    pub fn card_prefix(&self) -> &str {
        &self.code
    }

    /// Returns whether this bank is currently active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Checks that the code is a six-digit BIN.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if is_valid_bin(&self.code) {
            Ok(())
        } else {
            Err(RegistryError::InvalidBin(self.code.clone()))
        }
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

/// Parses common spellings of a boolean flag.
#[cfg(feature = "registry-csv")]
pub(crate) fn parse_active_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "active" => Some(true),
        "0" | "false" | "no" | "n" | "inactive" => Some(false),
        _ => None,
    }
}
