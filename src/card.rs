//! Card number normalization and the validated card type.
//!
//! Cleaning is permissive: ASCII, Arabic-Indic and Persian decimal digits are
//! kept (the latter two folded to ASCII) and every other character is dropped
//! without raising an error. Format checking then requires exactly
//! [`CARD_DIGITS`] digits.

use std::fmt;
use zeroize::Zeroize;

/// Number of digits in an Iranian bank card number.
pub const CARD_DIGITS: usize = 16;

/// Number of leading digits that form the Bank Identification Number.
pub const BIN_LENGTH: usize = 6;

/// Removes every character that is not a decimal digit.
///
/// Arabic-Indic (`٠`-`٩`) and Persian (`۰`-`۹`) digits are converted to their
/// ASCII equivalents, so the result is always plain ASCII. The relative order
/// of the digits is preserved, and cleaning an already-clean string returns
/// it unchanged.
///
/// # Example
///
/// ```
/// use iran_banks::card::clean_card_number;
///
/// assert_eq!(clean_card_number("6037 9912-3456 7890"), "6037991234567890");
/// assert_eq!(clean_card_number("۶۰۳۷-۹۹۱۲"), "60379912");
/// assert_eq!(clean_card_number("no digits"), "");
/// ```
pub fn clean_card_number(input: &str) -> String {
    input.chars().filter_map(ascii_digit).collect()
}

/// Maps a decimal digit from a supported script to its ASCII form.
#[inline]
fn ascii_digit(c: char) -> Option<char> {
    let zero = match c {
        '0'..='9' => return Some(c),
        '\u{0660}'..='\u{0669}' => 0x0660,
        '\u{06F0}'..='\u{06F9}' => 0x06F0,
        _ => return None,
    };
    char::from_digit(c as u32 - zero, 10)
}

/// Returns true if `card_number` is exactly 16 ASCII decimal digits.
///
/// # Example
///
/// ```
/// use iran_banks::card::is_valid_format;
///
/// assert!(is_valid_format("6037991234567893"));
/// assert!(!is_valid_format("1234"));
/// assert!(!is_valid_format("6037-9912-3456-7893"));
/// ```
#[inline]
pub fn is_valid_format(card_number: &str) -> bool {
    card_number.len() == CARD_DIGITS && card_number.bytes().all(|b| b.is_ascii_digit())
}

/// Returns true if `bin` is exactly six ASCII decimal digits.
#[inline]
pub fn is_valid_bin(bin: &str) -> bool {
    bin.len() == BIN_LENGTH && bin.bytes().all(|b| b.is_ascii_digit())
}

/// A card number that passed format, issuer and checksum validation.
///
/// The digits are zeroed when the value is dropped, and neither `Debug`
/// nor `Display` reveal more than the BIN and last four digits.
#[derive(Clone)]
pub struct DetectedCard {
    digits: [u8; CARD_DIGITS],
    bank_name: String,
}

impl DetectedCard {
    /// Creates a new DetectedCard from validated digits.
    #[inline]
    pub(crate) fn new(digits: [u8; CARD_DIGITS], bank_name: impl Into<String>) -> Self {
        Self {
            digits,
            bank_name: bank_name.into(),
        }
    }

    /// Returns the six-digit BIN.
    pub fn bin(&self) -> String {
        digits_to_string(&self.digits[..BIN_LENGTH])
    }

    /// Returns the issuing bank's display name.
    #[inline]
    pub fn bank_name(&self) -> &str {
        &self.bank_name
    }

    /// Returns the last four digits.
    pub fn last_four(&self) -> String {
        digits_to_string(&self.digits[CARD_DIGITS - 4..])
    }

    /// Returns the full card number.
    ///
    /// # Security Warning
    ///
    /// Never log the result. Use [`masked`](Self::masked) for display.
    pub fn number(&self) -> String {
        digits_to_string(&self.digits)
    }

    /// Returns the card number with only the BIN and last four visible.
    ///
    /// Format: `603799******7893`.
    pub fn masked(&self) -> String {
        crate::mask::mask_digits(&self.digits)
    }
}

fn digits_to_string(digits: &[u8]) -> String {
    digits.iter().map(|&d| (b'0' + d) as char).collect()
}

impl fmt::Debug for DetectedCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectedCard")
            .field("number", &self.masked())
            .field("bank_name", &self.bank_name)
            .finish()
    }
}

impl fmt::Display for DetectedCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.bank_name, self.masked())
    }
}

impl Drop for DetectedCard {
    fn drop(&mut self) {
        self.digits.zeroize();
    }
}
