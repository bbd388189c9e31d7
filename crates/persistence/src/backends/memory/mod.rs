//! In-memory storage backend.
//!
//! Keeps every table in a `parking_lot::RwLock`-guarded map and evaluates
//! search plans with the same normaliser the SQL predicates use. Views read
//! the owning schema's table. Intended for development and tests.

mod storage;

use std::collections::HashMap;
use std::fmt::Debug;

use parking_lot::RwLock;

use crate::types::Record;

/// In-memory backend.
#[derive(Default)]
pub struct MemoryBackend {
    tables: RwLock<HashMap<&'static str, MemoryTable>>,
}

#[derive(Debug)]
struct MemoryTable {
    rows: Vec<Record>,
    next_id: i64,
}

impl Default for MemoryTable {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }
}

impl Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables = self.tables.read();
        f.debug_struct("MemoryBackend")
            .field("tables", &tables.len())
            .field("rows", &tables.values().map(|t| t.rows.len()).sum::<usize>())
            .finish()
    }
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently stored in `table`.
    pub fn row_count(&self, table: &str) -> usize {
        self.tables.read().get(table).map(|t| t.rows.len()).unwrap_or(0)
    }
}
