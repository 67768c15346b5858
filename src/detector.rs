//! Bank detection: the validation pipeline for Iranian card numbers.
//!
//! This module combines cleaning, format checking, BIN lookup and the Luhn
//! checksum into a single operation. Checks run in a fixed order and stop at
//! the first failure:
//!
//! 1. Clean (strip every non-digit character)
//! 2. Format (exactly 16 digits)
//! 3. BIN lookup (first 6 digits must belong to a known bank)
//! 4. Luhn checksum
//!
//! [`BankDetector::check`] returns a typed `Result`; [`BankDetector::detect_bank`]
//! turns that into a localized [`ValidationResult`] and never fails.

use crate::bank::{BankRegistry, BinTable, MemoryBankRegistry};
use crate::card::{clean_card_number, is_valid_format, DetectedCard, BIN_LENGTH, CARD_DIGITS};
use crate::error::{RegistryError, ValidationError};
use crate::luhn;
use crate::messages::{MessageCatalog, MessageKey};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use zeroize::Zeroizing;

/// Outcome of a single detection call.
///
/// `valid == true` always comes with `bin_code`; `valid == false` always
/// comes with `error` and never with `bin_code`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationResult {
    /// Whether the card number passed every check.
    pub valid: bool,
    /// Localized, formatted message describing the outcome.
    pub message: String,
    /// The six-digit BIN, present only when the card is valid.
    pub bin_code: Option<String>,
    /// Why validation failed, present only when the card is invalid.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub error: Option<ValidationError>,
}

impl ValidationResult {
    fn success(message: String, bin_code: String) -> Self {
        Self {
            valid: true,
            message,
            bin_code: Some(bin_code),
            error: None,
        }
    }

    fn failure(message: String, error: ValidationError) -> Self {
        Self {
            valid: false,
            message,
            bin_code: None,
            error: Some(error),
        }
    }

    /// Returns the message key matching this outcome.
    pub fn message_key(&self) -> MessageKey {
        match &self.error {
            Some(error) => error.message_key(),
            None => MessageKey::DetectedBank,
        }
    }
}

/// Detects the issuing bank of a card number against a bank registry.
///
/// The detector holds the current BIN table as a copy-on-write snapshot, so
/// it can be shared across threads and refreshed from a registry without
/// blocking lookups in flight.
///
/// # Example
///
/// ```
/// use iran_banks::BankDetector;
///
/// let detector = BankDetector::new();
///
/// let result = detector.detect_bank("6037-9912-3456-7893", "en");
/// assert!(result.valid);
/// assert_eq!(result.bin_code.as_deref(), Some("603799"));
/// assert_eq!(result.message, "Detected Bank: بانک ملی");
///
/// let result = detector.detect_bank("1234", "fa");
/// assert!(!result.valid);
/// ```
#[derive(Debug)]
pub struct BankDetector {
    banks: MemoryBankRegistry,
    catalog: MessageCatalog,
}

impl BankDetector {
    /// Creates a detector with the built-in bank table and messages.
    pub fn new() -> Self {
        Self::with_table(BinTable::builtin().clone())
    }

    /// Creates a detector over a specific BIN table.
    pub fn with_table(table: BinTable) -> Self {
        Self {
            banks: MemoryBankRegistry::new(table),
            catalog: MessageCatalog::builtin().clone(),
        }
    }

    /// Creates a detector seeded with the active banks of `registry`.
    pub fn from_registry<R: BankRegistry + ?Sized>(registry: &R) -> Result<Self, RegistryError> {
        Ok(Self::with_table(registry.list_active_banks()?))
    }

    /// Builder method to replace the message catalog.
    pub fn with_catalog(mut self, catalog: MessageCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Returns the message catalog in use.
    #[inline]
    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    /// Returns the current BIN table snapshot.
    #[inline]
    pub fn table(&self) -> Arc<BinTable> {
        self.banks.snapshot()
    }

    /// Publishes a new BIN table. Calls already running keep their snapshot.
    pub fn publish(&self, table: BinTable) {
        self.banks.publish(table);
    }

    /// Reloads the BIN table from `registry`.
    pub fn refresh<R: BankRegistry + ?Sized>(&self, registry: &R) -> Result<(), RegistryError> {
        self.banks.reload_from(registry)
    }

    /// Validates a card number and identifies its bank.
    ///
    /// # Example
    ///
    /// ```
    /// use iran_banks::{BankDetector, ValidationError};
    ///
    /// let detector = BankDetector::new();
    ///
    /// let card = detector.check("6104 3312 3456 7890").unwrap();
    /// assert_eq!(card.bin(), "610433");
    /// assert_eq!(card.bank_name(), "بانک ملت");
    ///
    /// assert_eq!(
    ///     detector.check("6037991234567890").unwrap_err(),
    ///     ValidationError::ChecksumFailed
    /// );
    /// ```
    pub fn check(&self, raw_input: &str) -> Result<DetectedCard, ValidationError> {
        let table = self.table();
        check_with_table(&table, raw_input)
    }

    /// Validates a card number and returns a localized result.
    ///
    /// `language` is a language tag such as `"en"`, `"fa"` or `"fa-IR"`.
    /// Unsupported languages use the catalog's default language.
    pub fn detect_bank(&self, raw_input: &str, language: &str) -> ValidationResult {
        self.detect_in(&self.table(), raw_input, language)
    }

    pub(crate) fn detect_in(
        &self,
        table: &BinTable,
        raw_input: &str,
        language: &str,
    ) -> ValidationResult {
        let result = match check_with_table(table, raw_input) {
            Ok(card) => {
                let message =
                    self.catalog
                        .localize(language, MessageKey::DetectedBank, &[card.bank_name()]);
                ValidationResult::success(message, card.bin())
            }
            Err(error) => {
                let message = self.catalog.localize(language, error.message_key(), &[]);
                ValidationResult::failure(message, error)
            }
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            card = %crate::mask::mask_card_number(raw_input),
            valid = result.valid,
            outcome = %result.message_key(),
            "bank detection"
        );

        result
    }

    /// Returns a copy of every BIN and bank name in the current table.
    ///
    /// Changing the returned map has no effect on the detector.
    pub fn get_all_banks(&self) -> HashMap<String, String> {
        self.table().to_map()
    }
}

impl Default for BankDetector {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn check_with_table(table: &BinTable, raw_input: &str) -> Result<DetectedCard, ValidationError> {
    let cleaned = Zeroizing::new(clean_card_number(raw_input));

    if !is_valid_format(&cleaned) {
        return Err(ValidationError::InvalidFormat {
            length: cleaned.len(),
        });
    }

    let bin = &cleaned[..BIN_LENGTH];
    let bank_name = table
        .get(bin)
        .ok_or_else(|| ValidationError::UnknownBank {
            bin: bin.to_string(),
        })?;

    let mut digits = Zeroizing::new([0u8; CARD_DIGITS]);
    for (slot, byte) in digits.iter_mut().zip(cleaned.bytes()) {
        *slot = byte - b'0';
    }

    if !luhn::validate_16(&digits) {
        return Err(ValidationError::ChecksumFailed);
    }

    Ok(DetectedCard::new(*digits, bank_name))
}

fn default_detector() -> &'static BankDetector {
    static DEFAULT: OnceLock<BankDetector> = OnceLock::new();
    DEFAULT.get_or_init(BankDetector::new)
}

/// Validates a card number against the built-in banks and messages.
///
/// # Example
///
/// ```
/// use iran_banks::detect_bank;
///
/// let result = detect_bank("6037991234567893", "fa");
/// assert!(result.valid);
/// assert_eq!(result.message, "بانک شناسایی شده: بانک ملی");
///
/// let result = detect_bank("1234561234567896", "en");
/// assert!(!result.valid);
/// assert_eq!(result.message, "Unknown bank code.");
/// assert_eq!(result.bin_code, None);
/// ```
pub fn detect_bank(raw_input: &str, language: &str) -> ValidationResult {
    default_detector().detect_bank(raw_input, language)
}

/// Validates a card number against the built-in banks.
pub fn check(raw_input: &str) -> Result<DetectedCard, ValidationError> {
    check_with_table(BinTable::builtin(), raw_input)
}

/// Returns true if the card number passes every check.
pub fn is_valid(raw_input: &str) -> bool {
    check(raw_input).is_ok()
}

/// Returns a copy of the built-in BIN table.
pub fn get_all_banks() -> HashMap<String, String> {
    BinTable::builtin().to_map()
}
