//! [`StorageManager`]: an in-process, non-persistent registry mapping table
//! name to table handle.
//!
//! Supplemental to the core storage model — grounded in
//! `storage_manager.cpp` of the original source. Pure convenience glue for
//! loader/playground code; it holds no state beyond a `HashMap` behind a
//! lock and does not contradict the "no durable persistence" non-goal.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{store_bail, StoreResult};
use crate::storage::table::Table;

#[derive(Default)]
pub struct StorageManager {
    tables: RwLock<HashMap<String, Arc<Table>>>,
}

impl StorageManager {
    pub fn new() -> Self {
        StorageManager { tables: RwLock::new(HashMap::new()) }
    }

    pub fn add_table(&self, name: &str, table: Arc<Table>) {
        self.tables.write().insert(name.to_string(), table);
    }

    /// Reuses `UnknownColumnName` for "no such name" since the core error
    /// taxonomy has no table-level equivalent — this registry is supplemental
    /// to it, not part of the scanned-column error surface.
    pub fn drop_table(&self, name: &str) -> StoreResult<()> {
        match self.tables.write().remove(name) {
            Some(_) => Ok(()),
            None => store_bail!(UnknownColumnName: "no table named '{name}'"),
        }
    }

    pub fn get_table(&self, name: &str) -> StoreResult<Arc<Table>> {
        self.tables
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| crate::error::StoreError::UnknownColumnName(format!("no table named '{name}'")))
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.read().contains_key(name)
    }

    pub fn table_names(&self) -> Vec<String> {
        self.tables.read().keys().cloned().collect()
    }
}
