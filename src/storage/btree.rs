use crate::{
    storage::{SQLITE_HEADER_SIZE, pager::Pager},
    types::{
        PageId,
        error::{DatabaseError, Result},
        page::{BtreePageHeader, INTERIOR_HEADER_SIZE, PageType},
    },
};

/// Everything a query needs from one pass over a table's b-tree: the leaf
/// cell count and the absolute file offset of every cell, in ascending
/// row-id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableScanResult {
    pub row_count: u64,
    pub cell_locations: Vec<u64>,
}

pub struct BTreeWalker<'a> {
    pager: &'a Pager,
    page_size: u32,
}

impl<'a> BTreeWalker<'a> {
    pub fn new(pager: &'a Pager, page_size: u32) -> Self {
        Self { pager, page_size }
    }

    fn page_offset(&self, page_id: PageId) -> u64 {
        (page_id as u64 - 1) * self.page_size as u64
    }

    fn header_offset(&self, page_id: PageId) -> u64 {
        // Page 1 carries the 100-byte file header before its page header.
        let extra = if page_id == 1 {
            SQLITE_HEADER_SIZE as u64
        } else {
            0
        };
        self.page_offset(page_id) + extra
    }

    /// Walk the table b-tree rooted at `root_page`, depth-first and
    /// left-to-right. Uses an explicit work list rather than recursion, so
    /// stack depth does not grow with tree height. Page number 0 means the
    /// object has no data pages and yields an empty result.
    pub fn collect_table_cells(&self, root_page: PageId) -> Result<TableScanResult> {
        let mut result = TableScanResult::default();
        if root_page == 0 {
            return Ok(result);
        }
        // Children are pushed in reverse so pop order is left-to-right:
        // ordinary children in cell-pointer order, rightmost child last.
        let mut pending = vec![root_page];
        while let Some(page_id) = pending.pop() {
            let page_offset = self.page_offset(page_id);
            let header_offset = self.header_offset(page_id);
            let header_bytes = self.pager.read_bytes(header_offset, INTERIOR_HEADER_SIZE)?;
            let header = BtreePageHeader::from_bytes(&header_bytes, page_id)?;
            let pointers_at = header_offset + header.page_type.header_size() as u64;
            match header.page_type {
                PageType::LeafTable => {
                    result.row_count += header.cell_count as u64;
                    for i in 0..header.cell_count {
                        let cell = self.pager.read_u16(pointers_at + 2 * i as u64)?;
                        result.cell_locations.push(page_offset + cell as u64);
                    }
                }
                PageType::InteriorTable => {
                    let rightmost =
                        header
                            .rightmost_child
                            .ok_or_else(|| DatabaseError::CorruptedPage {
                                page_id,
                                reason: "interior page without rightmost child".to_string(),
                            })?;
                    pending.push(rightmost);
                    for i in (0..header.cell_count).rev() {
                        let cell = self.pager.read_u16(pointers_at + 2 * i as u64)?;
                        // An interior cell starts with its child page number.
                        let child = self.pager.read_u32(page_offset + cell as u64)?;
                        pending.push(child);
                    }
                }
                PageType::LeafIndex | PageType::InteriorIndex => {
                    return Err(DatabaseError::CorruptedPage {
                        page_id,
                        reason: "index page reached during a table scan".to_string(),
                    });
                }
            }
        }
        Ok(result)
    }
}
