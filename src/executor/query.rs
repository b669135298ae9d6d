use std::path::Path;

use crate::{
    executor::sequential_scan::SequentialScanner,
    planner::ddl,
    storage::{
        btree::BTreeWalker,
        database::{Database, DatabaseInfo},
    },
    types::{
        PageId,
        error::{DatabaseError, Result},
    },
};

/// Read-only queries over one open database: metadata report, object
/// listing, row counting and column projection.
pub struct QueryEngine {
    database: Database,
}

impl QueryEngine {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            database: Database::open(path)?,
        })
    }

    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn database_info(&self) -> Result<DatabaseInfo> {
        self.database.info()
    }

    /// Every catalog entry's `tbl_name`, unfiltered, in catalog order.
    pub fn object_names(&self) -> Result<Vec<String>> {
        Ok(self
            .database
            .schema()?
            .into_iter()
            .map(|entry| entry.table_name)
            .collect())
    }

    pub fn count_rows(&self, table: &str) -> Result<u64> {
        let entry = self.database.find_table(table)?;
        let walker = BTreeWalker::new(self.database.pager(), self.database.page_size());
        Ok(walker.collect_table_cells(entry.root_page as PageId)?.row_count)
    }

    /// Resolve the requested column names against the table's declared
    /// columns, walk its b-tree once, and hand back a scanner that yields
    /// one row per cell in ascending row-id order. An unknown name is a
    /// hard error before any row is produced.
    pub fn select_columns(&self, table: &str, columns: &[String]) -> Result<SequentialScanner<'_>> {
        let entry = self.database.find_table(table)?;
        let declared = ddl::declared_columns(&entry.sql).map_err(DatabaseError::from)?;
        let mut resolved = Vec::with_capacity(columns.len());
        for name in columns {
            let index = declared
                .iter()
                .position(|declared_name| declared_name.eq_ignore_ascii_case(name))
                .ok_or_else(|| DatabaseError::ColumnNotFound {
                    name: name.clone(),
                    table: table.to_string(),
                })?;
            resolved.push(index);
        }
        let walker = BTreeWalker::new(self.database.pager(), self.database.page_size());
        let scan = walker.collect_table_cells(entry.root_page as PageId)?;
        Ok(SequentialScanner::new(
            self.database.pager(),
            scan.cell_locations,
            resolved,
        ))
    }
}
