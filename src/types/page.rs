use serde::{Deserialize, Serialize};

use crate::types::{PageId, error::DatabaseError};

pub const LEAF_HEADER_SIZE: usize = 8;
pub const INTERIOR_HEADER_SIZE: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageType {
    InteriorIndex = 2,
    InteriorTable = 5,
    LeafIndex = 10,
    LeafTable = 13,
}

impl PageType {
    pub fn from_u8(value: u8) -> Result<Self, DatabaseError> {
        match value {
            2 => Ok(PageType::InteriorIndex),
            5 => Ok(PageType::InteriorTable),
            10 => Ok(PageType::LeafIndex),
            13 => Ok(PageType::LeafTable),
            _ => Err(DatabaseError::InvalidPageType(value)),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            PageType::InteriorIndex => 2,
            PageType::InteriorTable => 5,
            PageType::LeafIndex => 10,
            PageType::LeafTable => 13,
        }
    }

    pub fn is_interior(&self) -> bool {
        matches!(self, PageType::InteriorIndex | PageType::InteriorTable)
    }

    pub fn is_table(&self) -> bool {
        matches!(self, PageType::InteriorTable | PageType::LeafTable)
    }

    /// Size of the on-page header: interior pages carry a trailing
    /// rightmost-child pointer, leaf pages do not.
    pub fn header_size(&self) -> usize {
        if self.is_interior() {
            INTERIOR_HEADER_SIZE
        } else {
            LEAF_HEADER_SIZE
        }
    }
}

/*
 * B-tree page header layout:
 * ┌──────────────────────────────────────────────────────────────┐
 * │ type(1) | first_freeblock(2) | cell_count(2) |               │
 * │ content_start(2) | fragmented_bytes(1) | [rightmost(4)]      │
 * ├──────────────────────────────────────────────────────────────┤
 * │ cell pointer array: cell_count big-endian u16 page offsets   │
 * └──────────────────────────────────────────────────────────────┘
 * All integers big-endian. The rightmost-child pointer exists only on
 * interior pages. On page 1 this header starts at byte 100, after the
 * file header.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BtreePageHeader {
    pub page_type: PageType,
    pub cell_count: u16,
    pub rightmost_child: Option<PageId>,
}

impl BtreePageHeader {
    /// Parse a page header from the first bytes of a page. `bytes` must
    /// hold at least the interior header size; callers read 12 bytes
    /// regardless of type since every page is at least 512 bytes long.
    pub fn from_bytes(bytes: &[u8], page_id: PageId) -> Result<Self, DatabaseError> {
        if bytes.len() < INTERIOR_HEADER_SIZE {
            return Err(DatabaseError::CorruptedPage {
                page_id,
                reason: format!("page header truncated at {} bytes", bytes.len()),
            });
        }
        let page_type = PageType::from_u8(bytes[0])?;
        let cell_count = u16::from_be_bytes([bytes[3], bytes[4]]);
        let rightmost_child = if page_type.is_interior() {
            Some(u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]))
        } else {
            None
        };
        Ok(Self {
            page_type,
            cell_count,
            rightmost_child,
        })
    }
}
