//! In-memory bank registry with copy-on-write snapshots.
//!
//! Readers take an `Arc<BinTable>` snapshot and release the lock before
//! doing any lookup. Writers build a complete new table and swap the `Arc`,
//! so a snapshot already handed out never changes underneath its holder.

use super::{BankRegistry, BinTable};
use crate::error::RegistryError;
use std::sync::{Arc, PoisonError, RwLock};

/// In-memory registry publishing immutable [`BinTable`] snapshots.
///
/// # Example
///
/// ```
/// use iran_banks::bank::{BinTable, MemoryBankRegistry};
///
/// let registry = MemoryBankRegistry::new(BinTable::builtin().clone());
/// let before = registry.snapshot();
///
/// registry.update(|table| table.insert("999999", "بانک آزمایشی")).unwrap();
///
/// assert!(!before.contains("999999"));
/// assert!(registry.snapshot().contains("999999"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryBankRegistry {
    current: RwLock<Arc<BinTable>>,
}

impl MemoryBankRegistry {
    /// Creates a registry publishing `table`.
    pub fn new(table: BinTable) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
        }
    }

    /// Creates a registry seeded with the built-in Iranian banks.
    pub fn builtin() -> Self {
        Self::new(BinTable::builtin().clone())
    }

    /// Returns the currently published table.
    pub fn snapshot(&self) -> Arc<BinTable> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Publishes a new table, replacing the current one atomically.
    pub fn publish(&self, table: BinTable) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(table);
    }

    /// Copies the current table, applies `edit`, and publishes the result.
    ///
    /// Nothing is published if `edit` fails. The write lock is held for the
    /// duration so concurrent updates are not lost.
    pub fn update<F>(&self, edit: F) -> Result<(), RegistryError>
    where
        F: FnOnce(&mut BinTable) -> Result<(), RegistryError>,
    {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = BinTable::clone(&guard);
        edit(&mut next)?;
        *guard = Arc::new(next);
        Ok(())
    }

    /// Replaces the current table with the active banks of `source`.
    pub fn reload_from<R: BankRegistry + ?Sized>(&self, source: &R) -> Result<(), RegistryError> {
        let table = source.list_active_banks()?;
        self.publish(table);
        Ok(())
    }
}

impl BankRegistry for MemoryBankRegistry {
    fn list_active_banks(&self) -> Result<BinTable, RegistryError> {
        Ok(BinTable::clone(&self.snapshot()))
    }
}
