//! CSV bank registry loader.
//!
//! # Feature
//!
//! Requires the `registry-csv` feature.
//!
//! # Supported Format
//!
//! ```csv
//! code,name,active
//! 603799,بانک ملی,true
//! 639599,بانک قوامین,false
//! ```
//!
//! Column order doesn't matter as long as headers are present. The `code`
//! (or `bin`) and `name` (or `bank`) columns are required; a missing
//! `active` column means every row is active.

use super::{parse_active_flag, Bank, BinTable};
use crate::error::RegistryError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// CSV bank registry loader.
pub struct CsvBankLoader;

impl CsvBankLoader {
    /// Loads the active-bank table from a CSV file.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use iran_banks::bank::CsvBankLoader;
    ///
    /// let table = CsvBankLoader::from_file("banks.csv")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<BinTable, RegistryError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Loads the active-bank table from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<BinTable, RegistryError> {
        let banks = Self::read_banks(reader, b',')?;
        BinTable::from_banks(&banks)
    }

    /// Loads the active-bank table from a CSV string.
    pub fn parse(csv: &str) -> Result<BinTable, RegistryError> {
        Self::from_reader(csv.as_bytes())
    }

    /// Loads the active-bank table with a custom delimiter.
    pub fn from_file_with_delimiter<P: AsRef<Path>>(
        path: P,
        delimiter: u8,
    ) -> Result<BinTable, RegistryError> {
        let file = File::open(path)?;
        let banks = Self::read_banks(file, delimiter)?;
        BinTable::from_banks(&banks)
    }

    /// Reads every bank record, active or not.
    pub fn read_banks<R: Read>(reader: R, delimiter: u8) -> Result<Vec<Bank>, RegistryError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| RegistryError::Parse(format!("Failed to read CSV headers: {}", e)))?
            .clone();

        let col_map = ColumnMap::from_headers(&headers)?;
        let mut banks = Vec::new();

        for (row, result) in csv_reader.records().enumerate() {
            let record =
                result.map_err(|e| RegistryError::Parse(format!("CSV parse error: {}", e)))?;

            if let Some(bank) = col_map.parse_record(&record, row + 2)? {
                banks.push(bank);
            }
        }

        Ok(banks)
    }
}

/// Maps CSV column names to indices.
struct ColumnMap {
    code: usize,
    name: usize,
    active: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, RegistryError> {
        let mut code_col = None;
        let mut name_col = None;
        let mut active_col = None;

        for (i, header) in headers.iter().enumerate() {
            match header.to_lowercase().trim() {
                "code" | "bin" | "bank_code" => code_col = Some(i),
                "name" | "bank" | "bank_name" => name_col = Some(i),
                "active" | "is_active" => active_col = Some(i),
                _ => {}
            }
        }

        let code = code_col
            .ok_or_else(|| RegistryError::Parse("Missing required 'code' column".to_string()))?;
        let name = name_col
            .ok_or_else(|| RegistryError::Parse("Missing required 'name' column".to_string()))?;

        Ok(Self {
            code,
            name,
            active: active_col,
        })
    }

    /// Parses one record; blank rows are skipped.
    fn parse_record(
        &self,
        record: &csv::StringRecord,
        line: usize,
    ) -> Result<Option<Bank>, RegistryError> {
        let code = record.get(self.code).unwrap_or("").trim();
        if code.is_empty() {
            return Ok(None);
        }

        let name = record.get(self.name).unwrap_or("").trim();

        let active = match self.active.and_then(|i| record.get(i)) {
            None => true,
            Some(value) if value.trim().is_empty() => true,
            Some(value) => parse_active_flag(value).ok_or_else(|| {
                RegistryError::Parse(format!("line {}: invalid active flag '{}'", line, value))
            })?,
        };

        let bank = Bank::new(code, name).active(active);
        bank.validate()?;
        Ok(Some(bank))
    }
}
