//! Test card generation for a bank code.
//!
//! Generated numbers are 16 digits, start with the given BIN and end with a
//! valid Luhn check digit, so they pass every check of
//! [`detect_bank`](crate::detect_bank) when the BIN is registered. They are
//! not connected to real accounts and should only be used for testing.
//!
//! # Example
//!
//! ```
//! use iran_banks::generate::generate_card_deterministic;
//!
//! let card = generate_card_deterministic("603799").unwrap();
//! assert_eq!(card, "6037990000000006");
//! assert!(iran_banks::is_valid(&card));
//! ```

use crate::card::{clean_card_number, is_valid_bin, CARD_DIGITS};
use crate::error::RegistryError;
use crate::luhn;

#[cfg(feature = "generate")]
use rand::Rng;

fn bin_digits(bin: &str) -> Result<Vec<u8>, RegistryError> {
    if !is_valid_bin(bin) {
        return Err(RegistryError::InvalidBin(bin.to_string()));
    }
    Ok(bin.bytes().map(|b| b - b'0').collect())
}

fn finish(mut digits: Vec<u8>) -> String {
    let check_digit = luhn::generate_check_digit(&digits);
    digits.push(check_digit);
    digits.iter().map(|&d| (b'0' + d) as char).collect()
}

/// Generates a card number for `bin` with random account digits.
///
/// Requires the `generate` feature (which enables the `rand` dependency).
///
/// # Example
///
/// ```
/// use iran_banks::generate::generate_card;
///
/// let card = generate_card("610433").unwrap();
/// assert!(card.starts_with("610433"));
/// assert!(iran_banks::is_valid(&card));
///
/// assert!(generate_card("6104").is_err());
/// ```
#[cfg(feature = "generate")]
pub fn generate_card(bin: &str) -> Result<String, RegistryError> {
    let mut rng = rand::thread_rng();
    generate_card_with_rng(bin, &mut rng)
}

/// Generates a card number using a provided RNG.
///
/// Seeded RNGs give reproducible output.
#[cfg(feature = "generate")]
pub fn generate_card_with_rng<R: Rng>(bin: &str, rng: &mut R) -> Result<String, RegistryError> {
    let mut digits = bin_digits(bin)?;
    while digits.len() < CARD_DIGITS - 1 {
        digits.push(rng.gen_range(0..10));
    }
    Ok(finish(digits))
}

/// Generates several card numbers for `bin`.
#[cfg(feature = "generate")]
pub fn generate_cards(bin: &str, count: usize) -> Result<Vec<String>, RegistryError> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| generate_card_with_rng(bin, &mut rng))
        .collect()
}

/// Generates a card number for `bin` with zero account digits.
///
/// The same BIN always yields the same number.
pub fn generate_card_deterministic(bin: &str) -> Result<String, RegistryError> {
    let mut digits = bin_digits(bin)?;
    digits.resize(CARD_DIGITS - 1, 0);
    Ok(finish(digits))
}

/// Completes a 15-digit prefix with its check digit.
///
/// Non-digit characters in `partial` are ignored. Returns `None` unless
/// exactly 15 digits remain.
///
/// ```
/// use iran_banks::generate::complete_card;
///
/// assert_eq!(complete_card("6037-9912-3456-789").as_deref(), Some("6037991234567893"));
/// assert_eq!(complete_card("603799"), None);
/// ```
pub fn complete_card(partial: &str) -> Option<String> {
    let cleaned = clean_card_number(partial);
    if cleaned.len() != CARD_DIGITS - 1 {
        return None;
    }
    Some(finish(cleaned.bytes().map(|b| b - b'0').collect()))
}
