//! Error types for card validation and bank registry access.
//!
//! [`ValidationError`] is the reason a card number was rejected. It is also
//! the reason code carried by [`ValidationResult`](crate::ValidationResult).
//!
//! [`RegistryError`] covers failures while building a BIN table from an
//! external source (files, SQLite).

use crate::messages::MessageKey;
use std::fmt;

/// Reasons a card number fails validation.
///
/// Variants are listed in the order they are checked: format, then issuer,
/// then checksum. At most one is ever reported for a given input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "code", rename_all = "snake_case")
)]
pub enum ValidationError {
    /// The cleaned input is not exactly 16 decimal digits.
    InvalidFormat {
        /// Number of digits left after stripping non-digit characters.
        length: usize,
    },

    /// The first six digits do not belong to a known bank.
    UnknownBank {
        /// The six-digit BIN that was looked up.
        bin: String,
    },

    /// The Luhn checksum did not hold for the full card number.
    ChecksumFailed,
}

impl ValidationError {
    /// Returns the message catalog key used to localize this error.
    #[inline]
    pub const fn message_key(&self) -> MessageKey {
        match self {
            Self::InvalidFormat { .. } => MessageKey::InvalidFormat,
            Self::UnknownBank { .. } => MessageKey::UnknownBank,
            Self::ChecksumFailed => MessageKey::ChecksumFailed,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat { length } => {
                write!(
                    f,
                    "invalid card number format: got {} digits, expected 16",
                    length
                )
            }

            Self::UnknownBank { bin } => {
                write!(f, "unknown bank code {}", bin)
            }

            Self::ChecksumFailed => {
                write!(f, "invalid card number (Luhn checksum failed)")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while loading or querying a bank registry.
#[derive(Debug)]
pub enum RegistryError {
    /// Failed to read the registry source.
    Io(std::io::Error),
    /// Failed to parse the registry format.
    Parse(String),
    /// A bank code is not exactly six decimal digits.
    InvalidBin(String),
    /// The backing database rejected a query.
    Database(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Parse(s) => write!(f, "Parse error: {}", s),
            Self::InvalidBin(bin) => {
                write!(f, "Invalid bank code '{}': expected 6 digits", bin)
            }
            Self::Database(s) => write!(f, "Database error: {}", s),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RegistryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ValidationError::InvalidFormat { length: 4 }.to_string(),
            "invalid card number format: got 4 digits, expected 16"
        );
        assert_eq!(
            ValidationError::UnknownBank {
                bin: "123456".to_string()
            }
            .to_string(),
            "unknown bank code 123456"
        );
        assert_eq!(
            ValidationError::ChecksumFailed.to_string(),
            "invalid card number (Luhn checksum failed)"
        );
    }

    #[test]
    fn test_message_keys() {
        assert_eq!(
            ValidationError::InvalidFormat { length: 0 }.message_key(),
            MessageKey::InvalidFormat
        );
        assert_eq!(
            ValidationError::UnknownBank {
                bin: "000000".to_string()
            }
            .message_key(),
            MessageKey::UnknownBank
        );
        assert_eq!(
            ValidationError::ChecksumFailed.message_key(),
            MessageKey::ChecksumFailed
        );
    }

    #[test]
    fn test_registry_error_display() {
        assert_eq!(
            RegistryError::InvalidBin("60379".to_string()).to_string(),
            "Invalid bank code '60379': expected 6 digits"
        );
        assert_eq!(
            RegistryError::Parse("bad row".to_string()).to_string(),
            "Parse error: bad row"
        );
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error;

        let err = RegistryError::from(std::io::Error::other("boom"));
        assert!(err.source().is_some());
        assert!(RegistryError::Database("x".to_string()).source().is_none());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ValidationError>();
        assert_send_sync::<RegistryError>();
    }
}
