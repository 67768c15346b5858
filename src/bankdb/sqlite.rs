//! SQLite-backed bank registry.
//!
//! # Feature
//!
//! Requires the `registry-sqlite` feature.
//!
//! # Database Schema
//!
//! ```sql
//! CREATE TABLE iran_banks (
//!     code TEXT NOT NULL UNIQUE,
//!     name TEXT NOT NULL,
//!     active INTEGER NOT NULL DEFAULT 1,
//!     created_at TEXT NOT NULL,
//!     updated_at TEXT NOT NULL
//! );
//! CREATE INDEX bank_code_idx ON iran_banks (code);
//! CREATE INDEX bank_name_idx ON iran_banks (name);
//! CREATE INDEX bank_active_code_idx ON iran_banks (active, code);
//! ```
//!
//! Uniqueness of codes is enforced by the database. The validator reads
//! this registry only through [`BankRegistry::list_active_banks`], which
//! returns a snapshot table.

use super::{Bank, BankRegistry, BinTable};
use crate::error::RegistryError;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OpenFlags, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

const TABLE_NAME: &str = "iran_banks";

/// SQLite-backed bank registry.
///
/// The connection is wrapped in a Mutex to allow sharing across threads.
pub struct SqliteBankRegistry {
    conn: Mutex<Connection>,
}

impl SqliteBankRegistry {
    /// Opens an existing registry database read-only.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use iran_banks::bank::{BankRegistry, SqliteBankRegistry};
    ///
    /// let registry = SqliteBankRegistry::open("banks.db")?;
    /// let table = registry.list_active_banks()?;
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| RegistryError::Io(std::io::Error::other(e.to_string())))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens (creating if needed) a writable registry database.
    pub fn open_read_write<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let conn = Connection::open(path)
            .map_err(|e| RegistryError::Io(std::io::Error::other(e.to_string())))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens an in-memory SQLite database.
    ///
    /// Useful for testing or temporary databases.
    pub fn open_in_memory() -> Result<Self, RegistryError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| RegistryError::Io(std::io::Error::other(e.to_string())))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates the bank table and its indexes.
    pub fn create_schema(&self) -> Result<(), RegistryError> {
        self.conn()
            .execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {t} (
                    code TEXT NOT NULL UNIQUE,
                    name TEXT NOT NULL,
                    active INTEGER NOT NULL DEFAULT 1,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS bank_code_idx ON {t} (code);
                CREATE INDEX IF NOT EXISTS bank_name_idx ON {t} (name);
                CREATE INDEX IF NOT EXISTS bank_active_code_idx ON {t} (active, code);",
                t = TABLE_NAME
            ))
            .map_err(db_error)
    }

    /// Inserts a bank record. Fails if the code already exists.
    pub fn insert(&self, bank: &Bank) -> Result<(), RegistryError> {
        bank.validate()?;
        self.conn()
            .execute(
                &format!(
                    "INSERT INTO {} (code, name, active, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    TABLE_NAME
                ),
                rusqlite::params![
                    bank.code,
                    bank.name,
                    bank.active,
                    bank.created_at.to_rfc3339(),
                    bank.updated_at.to_rfc3339(),
                ],
            )
            .map_err(db_error)?;
        Ok(())
    }

    /// Bulk inserts bank records in a single transaction.
    pub fn insert_many(&self, banks: &[Bank]) -> Result<(), RegistryError> {
        for bank in banks {
            bank.validate()?;
        }

        let mut conn = self.conn();
        let tx = conn.transaction().map_err(db_error)?;
        {
            let mut stmt = tx
                .prepare(&format!(
                    "INSERT INTO {} (code, name, active, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    TABLE_NAME
                ))
                .map_err(db_error)?;

            for bank in banks {
                stmt.execute(rusqlite::params![
                    bank.code,
                    bank.name,
                    bank.active,
                    bank.created_at.to_rfc3339(),
                    bank.updated_at.to_rfc3339(),
                ])
                .map_err(db_error)?;
            }
        }
        tx.commit().map_err(db_error)
    }

    /// Activates or deactivates a bank. Returns false if the code is unknown.
    pub fn set_active(&self, code: &str, active: bool) -> Result<bool, RegistryError> {
        let changed = self
            .conn()
            .execute(
                &format!(
                    "UPDATE {} SET active = ?1, updated_at = ?2 WHERE code = ?3",
                    TABLE_NAME
                ),
                rusqlite::params![active, Utc::now().to_rfc3339(), code],
            )
            .map_err(db_error)?;
        Ok(changed > 0)
    }

    /// Returns every bank record, ordered by name.
    pub fn list_banks(&self) -> Result<Vec<Bank>, RegistryError> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT code, name, active, created_at, updated_at FROM {} ORDER BY name",
                TABLE_NAME
            ))
            .map_err(db_error)?;

        let rows = stmt.query_map([], read_row).map_err(db_error)?;

        let mut banks = Vec::new();
        for row in rows {
            let (code, name, active, created_at, updated_at) = row.map_err(db_error)?;
            banks.push(Bank {
                code,
                name,
                active,
                created_at: parse_timestamp(&created_at)?,
                updated_at: parse_timestamp(&updated_at)?,
            });
        }

        Ok(banks)
    }

    /// Returns the number of bank records, active or not.
    pub fn len(&self) -> Result<usize, RegistryError> {
        let count: i64 = self
            .conn()
            .query_row(&format!("SELECT COUNT(*) FROM {}", TABLE_NAME), [], |row| {
                row.get(0)
            })
            .map_err(db_error)?;
        Ok(count as usize)
    }

    /// Returns true if the registry holds no records.
    pub fn is_empty(&self) -> Result<bool, RegistryError> {
        Ok(self.len()? == 0)
    }
}

impl BankRegistry for SqliteBankRegistry {
    fn list_active_banks(&self) -> Result<BinTable, RegistryError> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare_cached(&format!(
                "SELECT code, name FROM {} WHERE active = 1",
                TABLE_NAME
            ))
            .map_err(db_error)?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .map_err(db_error)?;

        let mut table = BinTable::new();
        for row in rows {
            let (code, name) = row.map_err(db_error)?;
            table.insert(code, name)?;
        }

        Ok(table)
    }
}

type RawBankRow = (String, String, bool, String, String);

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawBankRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RegistryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RegistryError::Parse(format!("invalid timestamp '{}': {}", value, e)))
}

fn db_error(e: rusqlite::Error) -> RegistryError {
    RegistryError::Database(e.to_string())
}
