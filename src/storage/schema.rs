use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{
    storage::{pager::Pager, record::RecordDecoder},
    types::{
        SCHEMA_CELL_COUNT_OFFSET, SCHEMA_CELL_POINTERS_OFFSET,
        error::Result,
        value::Value,
    },
};

/// One row of the schema catalog on page 1: `type`, `name`, `tbl_name`,
/// `rootpage`, `sql`. Auto-indexes store no creation SQL; that column
/// decodes to an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaEntry {
    pub object_type: String,
    pub name: String,
    pub table_name: String,
    pub root_page: i64,
    pub sql: String,
}

pub struct SchemaCatalog<'a> {
    pager: &'a Pager,
}

impl<'a> SchemaCatalog<'a> {
    pub fn new(pager: &'a Pager) -> Self {
        Self { pager }
    }

    /// Number of top-level objects, stored as page 1's cell count.
    pub fn object_count(&self) -> Result<u16> {
        self.pager.read_u16(SCHEMA_CELL_COUNT_OFFSET)
    }

    /// Materialize every catalog entry, in cell-pointer order, with no
    /// filtering. Entries are rebuilt on every call; nothing is cached.
    pub fn load(&self) -> Result<Vec<SchemaEntry>> {
        let decoder = RecordDecoder::new(self.pager);
        let wanted: HashSet<usize> = (0..5).collect();
        let count = self.object_count()?;
        let mut entries = Vec::with_capacity(count as usize);
        for i in 0..count {
            let pointer = self
                .pager
                .read_u16(SCHEMA_CELL_POINTERS_OFFSET + 2 * i as u64)?;
            // Page 1 starts at file offset 0, so its cell offsets are
            // already absolute.
            let mut offset = pointer as u64;
            let (_payload_size, len) = self.pager.read_varint(offset)?;
            offset += len as u64;
            let (_row_id, len) = self.pager.read_varint(offset)?;
            offset += len as u64;
            let mut columns = decoder.decode(offset, &wanted)?;
            entries.push(SchemaEntry {
                object_type: take_text(&mut columns, 0),
                name: take_text(&mut columns, 1),
                table_name: take_text(&mut columns, 2),
                root_page: take_integer(&mut columns, 3),
                sql: take_text(&mut columns, 4),
            });
        }
        Ok(entries)
    }
}

fn take_text(columns: &mut HashMap<usize, Value>, index: usize) -> String {
    match columns.remove(&index) {
        Some(Value::Text(text)) => text,
        _ => String::new(),
    }
}

fn take_integer(columns: &mut HashMap<usize, Value>, index: usize) -> i64 {
    match columns.remove(&index) {
        Some(Value::Integer(value)) => value,
        _ => 0,
    }
}
