//! Luhn checksum for Iranian bank card numbers.
//!
//! The Luhn algorithm (also known as the "modulus 10" algorithm) detects
//! every single-digit typo in a card number.
//!
//! # Parity rule
//!
//! Digits are visited by absolute index `i`, from `len - 1` down to `0`, and
//! the digit at `i` is doubled when `i % 2 == len % 2`. For a 16-digit card
//! this doubles indices 0, 2, 4, ..., 14. The same rule applies at every
//! length.

/// Lookup table for doubled digits: double the value, subtract 9 if > 9.
/// Index is the digit (0-9), value is the transformed result.
const DOUBLE_TABLE: [u8; 10] = [0, 2, 4, 6, 8, 1, 3, 5, 7, 9];

/// Returns true when the digit at absolute `index` is doubled in a number
/// of `len` digits.
#[inline]
const fn is_doubled(index: usize, len: usize) -> bool {
    index % 2 == len % 2
}

/// Validates a sequence of digits using the Luhn algorithm.
///
/// # Arguments
///
/// * `digits` - A slice of digits (0-9), not ASCII.
///
/// # Example
///
/// ```
/// use iran_banks::luhn::validate;
///
/// // Bank Melli test number
/// let digits = [6, 0, 3, 7, 9, 9, 1, 2, 3, 4, 5, 6, 7, 8, 9, 3];
/// assert!(validate(&digits));
///
/// let invalid = [6, 0, 3, 7, 9, 9, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0];
/// assert!(!validate(&invalid));
/// ```
#[inline]
pub fn validate(digits: &[u8]) -> bool {
    if digits.is_empty() {
        return false;
    }

    compute_checksum(digits) % 10 == 0
}

/// Validates an ASCII digit string using the Luhn algorithm.
///
/// Returns false when the string is empty or contains anything other than
/// ASCII digits.
///
/// # Example
///
/// ```
/// use iran_banks::luhn::validate_str;
///
/// assert!(validate_str("6037991234567893"));
/// assert!(!validate_str("6037991234567890"));
/// assert!(!validate_str("6037-9912-3456-7893"));
/// ```
pub fn validate_str(card_number: &str) -> bool {
    if card_number.is_empty() || !card_number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u8> = card_number.bytes().map(|b| b - b'0').collect();
    validate(&digits)
}

/// Computes the Luhn sum (not reduced modulo 10) for a sequence of digits.
#[inline]
pub fn compute_checksum(digits: &[u8]) -> u32 {
    let len = digits.len();
    let mut sum: u32 = 0;

    for i in (0..len).rev() {
        let digit = digits[i];
        if is_doubled(i, len) {
            sum += DOUBLE_TABLE[digit as usize] as u32;
        } else {
            sum += digit as u32;
        }
    }

    sum
}

/// Generates the check digit that completes a partial card number.
///
/// The partial number is treated as the leading `len` digits of a number of
/// `len + 1` digits, and the parity rule is evaluated against that final
/// length.
///
/// # Example
///
/// ```
/// use iran_banks::luhn::generate_check_digit;
///
/// let partial = [6, 0, 3, 7, 9, 9, 1, 2, 3, 4, 5, 6, 7, 8, 9];
/// assert_eq!(generate_check_digit(&partial), 3);
/// ```
#[inline]
pub fn generate_check_digit(digits: &[u8]) -> u8 {
    let final_len = digits.len() + 1;
    let mut sum: u32 = 0;

    for (i, &digit) in digits.iter().enumerate() {
        if is_doubled(i, final_len) {
            sum += DOUBLE_TABLE[digit as usize] as u32;
        } else {
            sum += digit as u32;
        }
    }

    // The check digit sits at index `final_len - 1`, which is never doubled.
    ((10 - (sum % 10)) % 10) as u8
}

/// Validates a 16-digit card using an unrolled sum.
///
/// Doubled indices for length 16: 0, 2, 4, 6, 8, 10, 12, 14.
#[inline]
pub fn validate_16(digits: &[u8; 16]) -> bool {
    let sum = DOUBLE_TABLE[digits[0] as usize] as u32
        + digits[1] as u32
        + DOUBLE_TABLE[digits[2] as usize] as u32
        + digits[3] as u32
        + DOUBLE_TABLE[digits[4] as usize] as u32
        + digits[5] as u32
        + DOUBLE_TABLE[digits[6] as usize] as u32
        + digits[7] as u32
        + DOUBLE_TABLE[digits[8] as usize] as u32
        + digits[9] as u32
        + DOUBLE_TABLE[digits[10] as usize] as u32
        + digits[11] as u32
        + DOUBLE_TABLE[digits[12] as usize] as u32
        + digits[13] as u32
        + DOUBLE_TABLE[digits[14] as usize] as u32
        + digits[15] as u32;

    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const MELLI: [u8; 16] = [6, 0, 3, 7, 9, 9, 1, 2, 3, 4, 5, 6, 7, 8, 9, 3];
    const MELLAT: [u8; 16] = [6, 1, 0, 4, 3, 3, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0];

    #[test]
    fn test_valid_cards() {
        assert!(validate(&MELLI));
        assert!(validate(&MELLAT));
        assert!(validate(&[6, 0, 3, 7, 9, 9, 0, 0, 0, 0, 0, 0, 0, 0, 0, 6]));
        assert!(validate(&[5, 0, 2, 9, 3, 8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2]));
        assert!(validate(&[6, 2, 2, 1, 0, 6, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0]));
    }

    #[test]
    fn test_invalid_cards() {
        // Changed last digit
        assert!(!validate(&[6, 0, 3, 7, 9, 9, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0]));
        // Changed first digit
        assert!(!validate(&[5, 0, 3, 7, 9, 9, 1, 2, 3, 4, 5, 6, 7, 8, 9, 3]));
        assert!(!validate(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1, 2, 3, 4, 5, 6]));
    }

    #[test]
    fn test_every_single_digit_change_fails() {
        for pos in 0..MELLI.len() {
            for replacement in 0..10u8 {
                if replacement == MELLI[pos] {
                    continue;
                }
                let mut digits = MELLI;
                digits[pos] = replacement;
                assert!(
                    !validate(&digits),
                    "changing index {} to {} should fail",
                    pos,
                    replacement
                );
            }
        }
    }

    #[test]
    fn test_parity_doubles_even_indices_for_16_digits() {
        for i in 0..16 {
            assert_eq!(is_doubled(i, 16), i % 2 == 0);
        }
        // Odd length: the rightmost digit is still never doubled.
        assert!(!is_doubled(14, 15));
        assert!(is_doubled(13, 15));
    }

    #[test]
    fn test_compute_checksum() {
        // 1 0 doubled at index 0 -> 2, index 1 kept -> 0
        assert_eq!(compute_checksum(&[1, 0]), 2);
        // 9 doubled -> 18 - 9 = 9
        assert_eq!(compute_checksum(&[9, 0]), 9);
        assert_eq!(compute_checksum(&MELLI) % 10, 0);
    }

    #[test]
    fn test_generate_check_digit() {
        assert_eq!(generate_check_digit(&MELLI[..15]), 3);
        assert_eq!(generate_check_digit(&MELLAT[..15]), 0);
        assert_eq!(
            generate_check_digit(&[6, 0, 3, 7, 7, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
            9
        );
    }

    #[test]
    fn test_generated_check_digit_validates() {
        let partial = [5, 8, 9, 2, 1, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        let mut full = partial.to_vec();
        full.push(generate_check_digit(&partial));
        assert!(validate(&full));
    }

    #[test]
    fn test_validate_16_matches_generic() {
        assert!(validate_16(&MELLI));
        let mut broken = MELLI;
        broken[15] = 0;
        assert!(!validate_16(&broken));
        assert_eq!(validate_16(&broken), validate(&broken));
    }

    #[test]
    fn test_validate_str() {
        assert!(validate_str("6037991234567893"));
        assert!(!validate_str("6037991234567890"));
        assert!(!validate_str(""));
        assert!(!validate_str("60379912345678ab"));
    }

    #[test]
    fn test_empty_input() {
        assert!(!validate(&[]));
    }

    #[test]
    fn test_double_table_values() {
        for i in 0..10 {
            let doubled = i * 2;
            let expected = if doubled > 9 { doubled - 9 } else { doubled };
            assert_eq!(DOUBLE_TABLE[i], expected as u8);
        }
    }
}
