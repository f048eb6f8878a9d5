//! In-memory table registry

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::table::{Table, TableId};

/// Process-lifetime registry of ingested tables.
///
/// Tables are immutable once inserted, so the lock only guards the map
/// itself. Pass the store by reference into whatever serves questions;
/// it is deliberately not a global.
#[derive(Default)]
pub struct TableStore {
    tables: RwLock<AHashMap<TableId, Arc<Table>>>,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table, returning its id.
    pub fn insert(&self, table: Table) -> TableId {
        let id = table.id;
        self.tables.write().insert(id, Arc::new(table));
        tracing::debug!(%id, "table registered");
        id
    }

    pub fn get(&self, id: &TableId) -> Option<Arc<Table>> {
        self.tables.read().get(id).cloned()
    }

    /// Drop a table from the store. Outstanding `Arc` handles keep the
    /// data alive until their holders finish.
    pub fn evict(&self, id: &TableId) -> bool {
        self.tables.write().remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    fn empty_table(name: &str) -> Table {
        Table::new(
            name,
            Schema {
                columns: Vec::new(),
                row_count: 0,
            },
            Vec::new(),
        )
    }

    #[test]
    fn test_insert_get_evict() {
        let store = TableStore::new();
        let id = store.insert(empty_table("sales"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).unwrap().name, "sales");

        assert!(store.evict(&id));
        assert!(!store.evict(&id));
        assert!(store.get(&id).is_none());
        assert!(store.is_empty());
    }
}
