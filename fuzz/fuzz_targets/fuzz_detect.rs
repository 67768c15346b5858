//! Fuzz target for bank detection.
//!
//! Tests that detect_bank() never panics on arbitrary input and that its
//! result fields stay consistent.

#![no_main]

use iran_banks::{check, clean_card_number, detect_bank, mask_card_number};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    for lang in ["en", "fa", data] {
        let result = detect_bank(data, lang);
        assert_eq!(result.valid, result.bin_code.is_some());
        assert_eq!(result.valid, result.error.is_none());
        assert_eq!(result.valid, check(data).is_ok());
    }

    let cleaned = clean_card_number(data);
    assert!(cleaned.bytes().all(|b| b.is_ascii_digit()));
    assert_eq!(clean_card_number(&cleaned), cleaned);

    // The masked form never carries the middle digits of a full number
    let masked = mask_card_number(data);
    assert_eq!(masked.len(), cleaned.len());
    if cleaned.len() == 16 {
        assert_eq!(&masked[6..12], "******");
    }
});
