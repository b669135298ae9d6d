use thiserror::Error;

use crate::types::PageId;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid database header: {reason}")]
    InvalidHeader { reason: String },

    #[error("Invalid page type: {0}")]
    InvalidPageType(u8),

    #[error("Corrupted page: page_id={page_id}, reason={reason}")]
    CorruptedPage { page_id: PageId, reason: String },

    #[error("Unsupported serial type: {0}")]
    UnsupportedSerialType(i64),

    #[error("Table '{name}' not found")]
    TableNotFound { name: String },

    #[error("Column '{name}' not found in table '{table}'")]
    ColumnNotFound { name: String, table: String },

    #[error("Planning error: {0}")]
    Planner(#[from] crate::planner::error::PlannerError),
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
