//! Batch detection for many card numbers at once.
//!
//! Results always come back in input order. With the `parallel` feature the
//! work is spread over rayon's thread pool.

use crate::card::DetectedCard;
use crate::detector::{check_with_table, BankDetector, ValidationResult};
use crate::error::ValidationError;
use std::sync::OnceLock;

/// Batch detector borrowing a [`BankDetector`].
///
/// Every card in a batch is checked against the same BIN table snapshot,
/// even if the detector is refreshed while the batch runs.
///
/// # Example
///
/// ```
/// use iran_banks::{BankDetector, BatchDetector};
///
/// let detector = BankDetector::new();
/// let batch = BatchDetector::new(&detector);
///
/// let cards = ["6037991234567893", "1234", "6104331234567890"];
/// let results = batch.detect_all(&cards, "en");
///
/// assert!(results[0].valid);
/// assert!(!results[1].valid);
/// assert_eq!(results[2].bin_code.as_deref(), Some("610433"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BatchDetector<'a> {
    detector: &'a BankDetector,
}

impl<'a> BatchDetector<'a> {
    /// Creates a batch detector over `detector`.
    #[inline]
    pub fn new(detector: &'a BankDetector) -> Self {
        Self { detector }
    }

    /// Creates a batch detector over the built-in banks and messages.
    pub fn builtin() -> BatchDetector<'static> {
        BatchDetector::new(builtin_detector())
    }

    /// Detects every card and returns localized results in input order.
    pub fn detect_all<S: AsRef<str>>(&self, cards: &[S], language: &str) -> Vec<ValidationResult> {
        let table = self.detector.table();
        cards
            .iter()
            .map(|card| self.detector.detect_in(&table, card.as_ref(), language))
            .collect()
    }

    /// Checks every card and returns typed results in input order.
    pub fn check_all<S: AsRef<str>>(
        &self,
        cards: &[S],
    ) -> Vec<Result<DetectedCard, ValidationError>> {
        let table = self.detector.table();
        cards.iter().map(|card| check_with_table(&table, card.as_ref())).collect()
    }

    /// Returns only the cards that pass every check.
    pub fn detect_valid_only<S: AsRef<str>>(&self, cards: &[S]) -> Vec<DetectedCard> {
        let table = self.detector.table();
        cards
            .iter()
            .filter_map(|card| check_with_table(&table, card.as_ref()).ok())
            .collect()
    }

    /// Splits a batch into valid cards and `(index, error)` pairs.
    pub fn detect_partitioned<S: AsRef<str>>(
        &self,
        cards: &[S],
    ) -> (Vec<DetectedCard>, Vec<(usize, ValidationError)>) {
        let table = self.detector.table();
        let mut valid = Vec::new();
        let mut invalid = Vec::new();

        for (i, card) in cards.iter().enumerate() {
            match check_with_table(&table, card.as_ref()) {
                Ok(detected) => valid.push(detected),
                Err(e) => invalid.push((i, e)),
            }
        }

        (valid, invalid)
    }

    /// Detects cards in parallel using rayon.
    ///
    /// # Feature
    ///
    /// Requires the `parallel` feature to be enabled.
    #[cfg(feature = "parallel")]
    pub fn detect_parallel<S: AsRef<str> + Sync>(
        &self,
        cards: &[S],
        language: &str,
    ) -> Vec<ValidationResult> {
        use rayon::prelude::*;
        let table = self.detector.table();
        cards
            .par_iter()
            .map(|card| self.detector.detect_in(&table, card.as_ref(), language))
            .collect()
    }

    /// Checks cards in parallel, returning only valid ones.
    ///
    /// # Feature
    ///
    /// Requires the `parallel` feature to be enabled.
    #[cfg(feature = "parallel")]
    pub fn detect_parallel_valid_only<S: AsRef<str> + Sync>(
        &self,
        cards: &[S],
    ) -> Vec<DetectedCard> {
        use rayon::prelude::*;
        let table = self.detector.table();
        cards
            .par_iter()
            .filter_map(|card| check_with_table(&table, card.as_ref()).ok())
            .collect()
    }
}

fn builtin_detector() -> &'static BankDetector {
    static BUILTIN: OnceLock<BankDetector> = OnceLock::new();
    BUILTIN.get_or_init(BankDetector::new)
}

/// Detects a slice of cards against the built-in banks.
///
/// # Example
///
/// ```
/// use iran_banks::batch::detect_batch;
///
/// let results = detect_batch(&["6037991234567893", "6037991234567890"], "en");
/// assert!(results[0].valid);
/// assert_eq!(results[1].message, "Invalid card number (checksum failed).");
/// ```
pub fn detect_batch<S: AsRef<str>>(cards: &[S], language: &str) -> Vec<ValidationResult> {
    BatchDetector::builtin().detect_all(cards, language)
}

/// Counts valid and invalid cards against the built-in banks.
///
/// # Returns
///
/// Tuple of (valid_count, invalid_count)
///
/// # Example
///
/// ```
/// use iran_banks::batch::count_valid;
///
/// let cards = ["6037991234567893", "1234561234567896", "6104331234567890"];
/// assert_eq!(count_valid(&cards), (2, 1));
/// ```
pub fn count_valid<S: AsRef<str>>(cards: &[S]) -> (usize, usize) {
    let valid = cards
        .iter()
        .filter(|card| crate::detector::is_valid(card.as_ref()))
        .count();
    (valid, cards.len() - valid)
}

/// Counts valid and invalid cards in parallel.
///
/// # Feature
///
/// Requires the `parallel` feature to be enabled.
#[cfg(feature = "parallel")]
pub fn count_valid_parallel<S: AsRef<str> + Sync>(cards: &[S]) -> (usize, usize) {
    use rayon::prelude::*;

    let valid = cards
        .par_iter()
        .filter(|card| crate::detector::is_valid(card.as_ref()))
        .count();

    (valid, cards.len() - valid)
}
