//! Card number masking for display and logging.
//!
//! Masked output shows at most the BIN (first 6 digits) and the last 4
//! digits of a 16-digit number. The full card number must never be logged.

use crate::card::{clean_card_number, BIN_LENGTH, CARD_DIGITS};

/// Masks a digit slice, keeping the BIN and last four digits.
///
/// Anything other than exactly 16 digits is masked entirely.
pub fn mask_digits(digits: &[u8]) -> String {
    let len = digits.len();
    let mut result = String::with_capacity(len);

    if len != CARD_DIGITS {
        result.extend(std::iter::repeat('*').take(len));
        return result;
    }

    for (i, &d) in digits.iter().enumerate() {
        if i < BIN_LENGTH || i >= len - 4 {
            result.push((b'0' + d) as char);
        } else {
            result.push('*');
        }
    }

    result
}

/// Cleans and masks a raw card number string.
///
/// # Example
///
/// ```
/// use iran_banks::mask::mask_card_number;
///
/// assert_eq!(mask_card_number("6037-9912-3456-7893"), "603799******7893");
/// assert_eq!(mask_card_number("1234"), "****");
/// ```
pub fn mask_card_number(input: &str) -> String {
    let digits: Vec<u8> = clean_card_number(input)
        .bytes()
        .map(|b| b - b'0')
        .collect();
    mask_digits(&digits)
}
