//! Localized result messages.
//!
//! The catalog is a plain two-level map: language code, then
//! [`MessageKey`]. Lookups resolve the requested language first (falling
//! back to the default language when it is unsupported) and then the key
//! (falling back to the default language's entry when the resolved catalog
//! lacks it). If the default language is missing the key as well, the key
//! name itself is returned, so a lookup never yields an empty string.
//!
//! # Example
//!
//! ```
//! use iran_banks::messages::{localize, MessageKey};
//!
//! assert_eq!(localize("en", MessageKey::UnknownBank, &[]), "Unknown bank code.");
//! assert_eq!(
//!     localize("fa", MessageKey::DetectedBank, &["بانک ملی"]),
//!     "بانک شناسایی شده: بانک ملی"
//! );
//! // Unsupported languages use English.
//! assert_eq!(localize("xx", MessageKey::UnknownBank, &[]), "Unknown bank code.");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Default language of the built-in catalog.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Identifies a message template in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKey {
    /// The input is not 16 digits.
    InvalidFormat,
    /// The BIN is not in the bank table.
    UnknownBank,
    /// The Luhn checksum failed.
    ChecksumFailed,
    /// The card is valid; takes the bank name as its only argument.
    DetectedBank,
}

impl MessageKey {
    /// Every key, in catalog order.
    pub const ALL: [MessageKey; 4] = [
        Self::InvalidFormat,
        Self::UnknownBank,
        Self::ChecksumFailed,
        Self::DetectedBank,
    ];

    /// Returns the snake_case key name.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidFormat => "invalid_format",
            Self::UnknownBank => "unknown_bank",
            Self::ChecksumFailed => "checksum_failed",
            Self::DetectedBank => "detected_bank",
        }
    }

    /// Parses a snake_case key name.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == value)
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const CATALOG_EN: &[(MessageKey, &str)] = &[
    (
        MessageKey::InvalidFormat,
        "Invalid card number format. Please enter 16 digits.",
    ),
    (MessageKey::UnknownBank, "Unknown bank code."),
    (
        MessageKey::ChecksumFailed,
        "Invalid card number (checksum failed).",
    ),
    (MessageKey::DetectedBank, "Detected Bank: {}"),
];

const CATALOG_FA: &[(MessageKey, &str)] = &[
    (
        MessageKey::InvalidFormat,
        "فرمت شماره کارت نامعتبر است. لطفا ۱۶ رقم وارد کنید.",
    ),
    (MessageKey::UnknownBank, "کد بانک ناشناخته است."),
    (
        MessageKey::ChecksumFailed,
        "شماره کارت نامعتبر است (خطای checksum).",
    ),
    (MessageKey::DetectedBank, "بانک شناسایی شده: {}"),
];

/// Normalizes a language tag to its primary subtag.
///
/// Trims whitespace, lower-cases, and drops any region or script suffix, so
/// `"fa-IR"`, `"FA_ir"` and `" fa "` all become `"fa"`.
pub fn normalize_language(tag: &str) -> String {
    let lowered = tag.trim().to_ascii_lowercase();
    lowered
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_string()
}

/// A message catalog keyed by language, then by [`MessageKey`].
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    default_language: String,
    languages: HashMap<String, HashMap<MessageKey, String>>,
}

impl MessageCatalog {
    /// Creates an empty catalog with the given default language.
    pub fn new(default_language: &str) -> Self {
        Self {
            default_language: normalize_language(default_language),
            languages: HashMap::new(),
        }
    }

    /// Returns the built-in English/Persian catalog.
    pub fn builtin() -> &'static MessageCatalog {
        static BUILTIN: OnceLock<MessageCatalog> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            MessageCatalog::new(DEFAULT_LANGUAGE)
                .with_language("en", CATALOG_EN.iter().copied())
                .with_language("fa", CATALOG_FA.iter().copied())
        })
    }

    /// Builder method adding (or extending) a language.
    pub fn with_language<I, S>(mut self, language: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = (MessageKey, S)>,
        S: Into<String>,
    {
        for (key, template) in entries {
            self.insert(language, key, template);
        }
        self
    }

    /// Inserts or replaces a single template.
    pub fn insert(&mut self, language: &str, key: MessageKey, template: impl Into<String>) {
        self.languages
            .entry(normalize_language(language))
            .or_default()
            .insert(key, template.into());
    }

    /// Returns the default language code.
    #[inline]
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Returns the catalog's languages, sorted.
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.languages.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }

    /// Returns true if the catalog has any entries for `language`.
    pub fn supports(&self, language: &str) -> bool {
        self.languages.contains_key(&normalize_language(language))
    }

    /// Resolves a requested language tag to a catalog language.
    ///
    /// Unsupported tags resolve to the default language.
    pub fn resolve_language(&self, requested: &str) -> String {
        let normalized = normalize_language(requested);
        if self.languages.contains_key(&normalized) {
            normalized
        } else {
            self.default_language.clone()
        }
    }

    /// Returns the raw template for `key` in `language`, with fallbacks.
    pub fn template(&self, language: &str, key: MessageKey) -> &str {
        let resolved = self.resolve_language(language);

        self.lookup(&resolved, key)
            .or_else(|| self.lookup(&self.default_language, key))
            .unwrap_or(key.as_str())
    }

    fn lookup(&self, language: &str, key: MessageKey) -> Option<&str> {
        self.languages
            .get(language)
            .and_then(|entries| entries.get(&key))
            .map(String::as_str)
    }

    /// Returns the formatted message for `key` in `language`.
    ///
    /// Each `{}` in the template is replaced by the next argument, in order.
    pub fn localize(&self, language: &str, key: MessageKey, args: &[&str]) -> String {
        format_positional(self.template(language, key), args)
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

/// Localizes `key` using the built-in catalog.
pub fn localize(language: &str, key: MessageKey, args: &[&str]) -> String {
    MessageCatalog::builtin().localize(language, key, args)
}

/// Substitutes `{}` placeholders left to right.
///
/// Placeholders without a matching argument are kept verbatim.
fn format_positional(template: &str, args: &[&str]) -> String {
    let capacity = template.len() + args.iter().map(|a| a.len()).sum::<usize>();
    let mut result = String::with_capacity(capacity);
    let mut args = args.iter();
    let mut rest = template;

    while let Some(pos) = rest.find("{}") {
        result.push_str(&rest[..pos]);
        match args.next() {
            Some(arg) => result.push_str(arg),
            None => result.push_str("{}"),
        }
        rest = &rest[pos + 2..];
    }

    result.push_str(rest);
    result
}
