use std::collections::HashSet;

use crate::{
    executor::scan::Scanner,
    storage::{pager::Pager, record::RecordDecoder},
    types::{error::Result, row::Row, value::Value},
};

/// Streaming projection over a table's cells. The cell locations were
/// collected by one b-tree walk, in ascending row-id order; each `scan`
/// call decodes one cell for exactly the resolved column indices and
/// reorders the values into the caller's requested order. The scan is not
/// restartable.
#[derive(Debug)]
pub struct SequentialScanner<'a> {
    pager: &'a Pager,
    locations: Vec<u64>,
    next: usize,
    // Resolved positional indices, in the caller's requested column order.
    resolved: Vec<usize>,
    wanted: HashSet<usize>,
}

impl<'a> SequentialScanner<'a> {
    pub(crate) fn new(pager: &'a Pager, locations: Vec<u64>, resolved: Vec<usize>) -> Self {
        let wanted = resolved.iter().copied().collect();
        Self {
            pager,
            locations,
            next: 0,
            resolved,
            wanted,
        }
    }

    pub fn remaining(&self) -> usize {
        self.locations.len() - self.next
    }
}

impl Scanner for SequentialScanner<'_> {
    fn scan(&mut self) -> Result<Option<Row>> {
        let Some(&location) = self.locations.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        let mut offset = location;
        let (_payload_size, len) = self.pager.read_varint(offset)?;
        offset += len as u64;
        let (row_id, len) = self.pager.read_varint(offset)?;
        offset += len as u64;
        let columns = RecordDecoder::new(self.pager).decode(offset, &self.wanted)?;
        // A record may hold fewer columns than the table declares (rows
        // written before an ALTER TABLE ADD COLUMN); those read as NULL.
        let values = self
            .resolved
            .iter()
            .map(|index| columns.get(index).cloned().unwrap_or(Value::Null))
            .collect();
        Ok(Some(Row::with_row_id(row_id, values)))
    }
}
