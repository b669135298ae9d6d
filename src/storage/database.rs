use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    storage::{
        SQLITE_HEADER_SIZE,
        header::DatabaseHeader,
        pager::Pager,
        schema::{SchemaCatalog, SchemaEntry},
    },
    types::{
        PAGE_SIZE_OFFSET,
        error::{DatabaseError, Result},
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub page_size: u16,
    pub object_count: u16,
}

/// An open database file: the parsed header plus a positioned-read pager
/// the rest of the engine borrows.
pub struct Database {
    pub path: PathBuf,
    pub header: DatabaseHeader,
    pager: Pager,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let pager = Pager::open(&path)?;
        let header_bytes = pager.read_bytes(0, SQLITE_HEADER_SIZE)?;
        let header = DatabaseHeader::from_bytes(&header_bytes)?;
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            header,
            pager,
        })
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn page_size(&self) -> u32 {
        self.header.page_size as u32
    }

    /// The `.dbinfo` report: both fields are fixed-offset reads.
    pub fn info(&self) -> Result<DatabaseInfo> {
        Ok(DatabaseInfo {
            page_size: self.pager.read_u16(PAGE_SIZE_OFFSET)?,
            object_count: SchemaCatalog::new(&self.pager).object_count()?,
        })
    }

    pub fn schema(&self) -> Result<Vec<SchemaEntry>> {
        SchemaCatalog::new(&self.pager).load()
    }

    /// First catalog entry whose `tbl_name` matches.
    pub fn find_table(&self, name: &str) -> Result<SchemaEntry> {
        self.schema()?
            .into_iter()
            .find(|entry| entry.table_name == name)
            .ok_or_else(|| DatabaseError::TableNotFound {
                name: name.to_string(),
            })
    }
}
