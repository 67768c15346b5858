//! Integration tests for iran_banks.
//!
//! These tests cover the public API end to end: detection, localization,
//! registries, batch processing and security considerations.

use iran_banks::{
    bank::{BankRegistry, BinTable, MemoryBankRegistry, IRANIAN_BANKS},
    batch::{count_valid, detect_batch},
    check, clean_card_number, detect_bank, get_all_banks, is_valid, luhn, mask_card_number,
    messages::{MessageCatalog, MessageKey},
    BankDetector, BatchDetector, RegistryError, ValidationError,
};
use std::sync::Arc;
use std::thread;

// =============================================================================
// TEST CARD NUMBERS
// =============================================================================
// Luhn-valid numbers with built-in bank codes. They are not real cards.

mod test_cards {
    pub const MELLI: &str = "6037991234567893";
    pub const MELLI_ZERO: &str = "6037990000000006";
    pub const MELLAT: &str = "6104331234567890";
    pub const PARSIAN: &str = "6221061111111110";
    pub const DEY: &str = "5029380000000002";
    pub const TEJARAT: &str = "6273539999999992";
    pub const SEPAH: &str = "5892101234567895";
    pub const SADERAT: &str = "6037700000000009";
    pub const PASARGAD: &str = "6393471234123417";

    // Passes Luhn, but 123456 is not a bank code
    pub const UNKNOWN_BIN: &str = "1234561234567896";
    // Known bank code, bad check digit
    pub const BAD_CHECKSUM: &str = "6037991234567890";
}

use test_cards::*;

// =============================================================================
// DETECTION - VALID CARDS
// =============================================================================

#[test]
fn test_all_test_cards_valid() {
    for card in [
        MELLI, MELLI_ZERO, MELLAT, PARSIAN, DEY, TEJARAT, SEPAH, SADERAT, PASARGAD,
    ] {
        let result = detect_bank(card, "en");
        assert!(result.valid, "{} should be valid: {}", card, result.message);
        assert_eq!(result.bin_code.as_deref(), Some(&card[..6]));
    }
}

#[test]
fn test_melli_in_both_languages() {
    let en = detect_bank(MELLI, "en");
    assert_eq!(en.message, "Detected Bank: بانک ملی");

    let fa = detect_bank(MELLI, "fa");
    assert_eq!(fa.message, "بانک شناسایی شده: بانک ملی");

    assert_eq!(en.bin_code, fa.bin_code);
}

#[test]
fn test_region_tags_are_normalized() {
    assert_eq!(detect_bank(MELLI, "fa-IR"), detect_bank(MELLI, "fa"));
    assert_eq!(detect_bank(MELLI, "EN_us"), detect_bank(MELLI, "en"));
}

// =============================================================================
// DETECTION - FAILURES
// =============================================================================

#[test]
fn test_invalid_format_messages() {
    for input in ["", "1234", "603799123456789", "60379912345678930", "no digits"] {
        let en = detect_bank(input, "en");
        assert!(!en.valid);
        assert_eq!(en.message, "Invalid card number format. Please enter 16 digits.");

        let fa = detect_bank(input, "fa");
        assert_eq!(fa.message, "فرمت شماره کارت نامعتبر است. لطفا ۱۶ رقم وارد کنید.");
    }
}

#[test]
fn test_unknown_bank() {
    assert!(luhn::validate_str(UNKNOWN_BIN));

    let result = detect_bank(UNKNOWN_BIN, "fa");
    assert!(!result.valid);
    assert_eq!(result.message, "کد بانک ناشناخته است.");
    assert_eq!(result.bin_code, None);
}

#[test]
fn test_checksum_failed() {
    let result = detect_bank(BAD_CHECKSUM, "fa");
    assert!(!result.valid);
    assert_eq!(result.message, "شماره کارت نامعتبر است (خطای checksum).");
    assert_eq!(result.error, Some(ValidationError::ChecksumFailed));
}

#[test]
fn test_separated_input_is_cleaned_first() {
    assert_eq!(clean_card_number("6037 9912-3456 7890"), "6037991234567890");
    assert_eq!(
        detect_bank("6037 9912-3456 7890", "en").error,
        Some(ValidationError::ChecksumFailed)
    );
    assert!(detect_bank("6037 9912-3456 7893", "en").valid);
}

#[test]
fn test_persian_keyboard_digits() {
    let result = detect_bank("۶۰۳۷-۹۹۱۲-۳۴۵۶-۷۸۹۳", "fa");
    assert!(result.valid);
    assert_eq!(result.bin_code.as_deref(), Some("603799"));
    assert_eq!(result.message, "بانک شناسایی شده: بانک ملی");

    assert_eq!(
        detect_bank("٦٠٣٧٩٩١٢٣٤٥٦٧٨٩٠", "en").error,
        Some(ValidationError::ChecksumFailed)
    );
}

#[test]
fn test_persian_digits_with_unknown_bin() {
    let result = detect_bank("۱۲۳۴۵۶۱۲۳۴۵۶۷۸۹۶", "en");
    assert_eq!(
        result.error,
        Some(ValidationError::UnknownBank {
            bin: "123456".to_string()
        })
    );
    assert_eq!(result.message, "Unknown bank code.");
}

#[test]
fn test_every_error_has_a_message_in_every_language() {
    let catalog = MessageCatalog::builtin();
    assert_eq!(catalog.languages(), vec!["en", "fa"]);

    for key in MessageKey::ALL {
        for lang in catalog.languages() {
            let template = catalog.template(lang, key);
            assert_ne!(template, key.as_str(), "{} missing for {}", key, lang);
        }
    }
}

#[test]
fn test_unknown_language_for_every_outcome() {
    for input in [MELLI, "1234", UNKNOWN_BIN, BAD_CHECKSUM] {
        assert_eq!(detect_bank(input, "xx"), detect_bank(input, "en"));
    }
}

// =============================================================================
// BANK TABLE
// =============================================================================

#[test]
fn test_every_builtin_bank_is_detectable() {
    for &(bin, name) in IRANIAN_BANKS {
        let card = iran_banks::generate::generate_card_deterministic(bin).unwrap();
        let result = detect_bank(&card, "en");
        assert!(result.valid, "{} ({}) not detected", name, bin);
        assert_eq!(result.message, format!("Detected Bank: {}", name));
    }
}

#[test]
fn test_get_all_banks_is_independent() {
    let mut banks = get_all_banks();
    banks.clear();
    assert_eq!(get_all_banks().len(), 21);
    assert!(is_valid(MELLI));
}

#[test]
fn test_memory_registry_feeds_detector() {
    let registry = MemoryBankRegistry::new(BinTable::new());
    registry
        .update(|table| table.insert("123456", "بانک آزمایشی"))
        .unwrap();

    let detector = BankDetector::from_registry(&registry).unwrap();
    assert!(detector.detect_bank(UNKNOWN_BIN, "en").valid);
    assert!(!detector.detect_bank(MELLI, "en").valid);

    registry.publish(BinTable::builtin().clone());
    detector.refresh(&registry).unwrap();
    assert!(detector.detect_bank(MELLI, "en").valid);
    assert!(!detector.detect_bank(UNKNOWN_BIN, "en").valid);
}

#[test]
fn test_failed_update_publishes_nothing() {
    let registry = MemoryBankRegistry::builtin();
    let result = registry.update(|table| {
        table.remove("603799");
        table.insert("bad", "x")
    });

    assert!(matches!(result, Err(RegistryError::InvalidBin(_))));
    assert!(registry.list_active_banks().unwrap().contains("603799"));
}

#[test]
fn test_concurrent_detection_during_refresh() {
    let detector = Arc::new(BankDetector::new());

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let detector = Arc::clone(&detector);
            thread::spawn(move || {
                for _ in 0..500 {
                    let result = detector.detect_bank(MELLAT, "en");
                    // Either table may be live, but results are never mixed.
                    if result.valid {
                        assert_eq!(result.message, "Detected Bank: بانک ملت");
                    } else {
                        assert_eq!(result.message, "Unknown bank code.");
                    }
                }
            })
        })
        .collect();

    for i in 0..50 {
        if i % 2 == 0 {
            detector.publish(BinTable::new());
        } else {
            detector.publish(BinTable::builtin().clone());
        }
    }

    for reader in readers {
        reader.join().unwrap();
    }
}

// =============================================================================
// BATCH PROCESSING
// =============================================================================

#[test]
fn test_batch_detection() {
    let cards = vec![MELLI, UNKNOWN_BIN, MELLAT, BAD_CHECKSUM, "12"];
    let results = detect_batch(&cards, "en");

    let valid: Vec<bool> = results.iter().map(|r| r.valid).collect();
    assert_eq!(valid, vec![true, false, true, false, false]);
    assert_eq!(count_valid(&cards), (2, 3));
}

#[test]
fn test_batch_with_owned_strings() {
    let cards: Vec<String> = vec![SEPAH.to_string(), format!("{} ", TEJARAT)];
    let detector = BankDetector::new();
    let found = BatchDetector::new(&detector).detect_valid_only(&cards);

    let names: Vec<&str> = found.iter().map(|c| c.bank_name()).collect();
    assert_eq!(names, vec!["بانک سپه", "بانک تجارت"]);
}

// =============================================================================
// SECURITY
// =============================================================================

#[test]
fn test_detected_card_never_prints_number() {
    let card = check(PASARGAD).unwrap();
    assert_eq!(card.number(), PASARGAD);
    assert_eq!(card.last_four(), "3417");

    for rendered in [format!("{}", card), format!("{:?}", card), card.masked()] {
        assert!(!rendered.contains(PASARGAD));
        assert!(!rendered.contains("123412"));
    }
}

#[test]
fn test_mask_card_number() {
    assert_eq!(mask_card_number("6037-9912-3456-7893"), "603799******7893");
    assert_eq!(mask_card_number("603799123"), "*********");
    assert_eq!(mask_card_number("60379912345"), "***********");
    assert_eq!(mask_card_number(""), "");
}

#[test]
fn test_error_display() {
    assert_eq!(
        ValidationError::UnknownBank {
            bin: "123456".to_string()
        }
        .to_string(),
        "unknown bank code 123456"
    );
    assert_eq!(
        ValidationError::ChecksumFailed.message_key(),
        MessageKey::ChecksumFailed
    );
}

// =============================================================================
// REGISTRY FILES
// =============================================================================

#[cfg(feature = "registry-json")]
#[test]
fn test_detector_from_json_file() {
    use iran_banks::bank::JsonBankLoader;
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{ "code": "603799", "name": "بانک ملی" }},
            {{ "code": "610433", "name": "بانک ملت", "active": false }}
        ]"#
    )
    .unwrap();

    let detector = BankDetector::with_table(JsonBankLoader::from_file(file.path()).unwrap());
    assert!(detector.detect_bank(MELLI, "en").valid);
    assert_eq!(
        detector.detect_bank(MELLAT, "en").message,
        "Unknown bank code."
    );
}

#[cfg(feature = "registry-sqlite")]
#[test]
fn test_detector_from_sqlite() {
    use iran_banks::bank::{Bank, SqliteBankRegistry};

    let registry = SqliteBankRegistry::open_in_memory().unwrap();
    registry.create_schema().unwrap();
    registry
        .insert_many(&[
            Bank::new("589210", "بانک سپه"),
            Bank::new("627353", "بانک تجارت").active(false),
        ])
        .unwrap();

    let detector = BankDetector::from_registry(&registry).unwrap();
    assert!(detector.detect_bank(SEPAH, "en").valid);
    assert!(!detector.detect_bank(TEJARAT, "en").valid);

    registry.set_active("627353", true).unwrap();
    detector.refresh(&registry).unwrap();
    assert!(detector.detect_bank(TEJARAT, "en").valid);
}

#[cfg(feature = "serde")]
#[test]
fn test_result_serializes() {
    let json = serde_json_value(&detect_bank(BAD_CHECKSUM, "en"));
    assert!(json.contains("\"valid\":false"));
    assert!(json.contains("checksum_failed"));
    assert!(json.contains("\"bin_code\":null"));
}

#[cfg(feature = "serde")]
fn serde_json_value<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap()
}
