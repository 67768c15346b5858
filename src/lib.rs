//! # iran_banks
//!
//! Iranian bank card validation and issuer detection for Rust.
//!
//! ## Features
//!
//! - Issuing bank detection from the six-digit BIN (21 Iranian banks built in)
//! - Luhn checksum validation
//! - Localized result messages in English and Persian
//! - Pluggable bank registries: in-memory, JSON, CSV, SQLite
//! - Card number masking for display
//! - Multiple interfaces: library, CLI, REST API
//!
//! ## Quick Start
//!
//! ```rust
//! use iran_banks::detect_bank;
//!
//! let result = detect_bank("6037-9912-3456-7893", "en");
//! assert!(result.valid);
//! assert_eq!(result.bin_code.as_deref(), Some("603799"));
//! assert_eq!(result.message, "Detected Bank: بانک ملی");
//!
//! let result = detect_bank("6037991234567890", "fa");
//! assert!(!result.valid);
//! assert_eq!(result.message, "شماره کارت نامعتبر است (خطای checksum).");
//! ```
//!
//! ## Validation Order
//!
//! Input is cleaned of every non-digit character, then checked in order:
//!
//! 1. exactly 16 digits (`invalid_format`)
//! 2. first six digits belong to a known bank (`unknown_bank`)
//! 3. Luhn checksum (`checksum_failed`)
//!
//! The first failing check decides the message.
//!
//! ## Typed Results
//!
//! ```rust
//! use iran_banks::{check, ValidationError};
//!
//! let card = check("6104331234567890").unwrap();
//! assert_eq!(card.bank_name(), "بانک ملت");
//! assert_eq!(card.masked(), "610433******7890");
//!
//! assert_eq!(
//!     check("1234").unwrap_err(),
//!     ValidationError::InvalidFormat { length: 4 }
//! );
//! ```
//!
//! ## Custom Banks
//!
//! ```rust
//! use iran_banks::{bank::BinTable, BankDetector};
//!
//! let table = BinTable::from_entries([("123456", "بانک آزمایشی")]).unwrap();
//! let detector = BankDetector::with_table(table);
//!
//! let result = detector.detect_bank("1234561234567896", "en");
//! assert_eq!(result.message, "Detected Bank: بانک آزمایشی");
//! ```
//!
//! ## Batch Processing
//!
//! ```rust
//! use iran_banks::batch;
//!
//! let cards = ["6037991234567893", "invalid", "6221061111111110"];
//!
//! let results = batch::detect_batch(&cards, "en");
//! assert_eq!(results.len(), 3);
//!
//! let (valid_count, _) = batch::count_valid(&cards);
//! assert_eq!(valid_count, 2);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialize results and bank records |
//! | `tracing` | Debug events with masked card numbers |
//! | `generate` | Random test card generation |
//! | `parallel` | Rayon-based parallelism |
//! | `registry-json` | JSON bank registry loader |
//! | `registry-csv` | CSV bank registry loader |
//! | `registry-sqlite` | SQLite bank registry |
//! | `cli` | Command-line tool |
//! | `server` | REST API with Swagger UI |
//!
//! ## Security
//!
//! - Validated digits are stored in fixed-size arrays and zeroized on drop
//! - `Debug` and `Display` show masked numbers only
//! - Log events never carry the full card number
//! - No unsafe code (`#![deny(unsafe_code)]`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

#[path = "bankdb/mod.rs"]
pub mod bank;
pub mod batch;
pub mod card;
pub mod detector;
pub mod error;
pub mod generate;
pub mod luhn;
pub mod mask;
pub mod messages;

// Re-export main types at crate root
pub use bank::{Bank, BankRegistry, BinTable, MemoryBankRegistry};
pub use batch::BatchDetector;
pub use card::{clean_card_number, DetectedCard, BIN_LENGTH, CARD_DIGITS};
pub use detector::{check, detect_bank, get_all_banks, is_valid, BankDetector, ValidationResult};
pub use error::{RegistryError, ValidationError};
pub use mask::mask_card_number;
pub use messages::{localize, MessageCatalog, MessageKey};
