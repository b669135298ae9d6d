use crate::{
    storage::{SQLITE_HEADER_SIZE, SQLITE_MAGIC},
    types::error::DatabaseError,
};

/// The 100-byte header at the start of the file. Only `page_size` feeds
/// offset arithmetic; the remaining fields are parsed so the shell can
/// report them and so fixture files can be assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseHeader {
    pub page_size: u16,
    pub write_version: u8,
    pub read_version: u8,
    pub reserved_space: u8,
    pub max_payload_fraction: u8,
    pub min_payload_fraction: u8,
    pub leaf_payload_fraction: u8,
    pub file_change_counter: u32,
    pub database_size_pages: u32,
    pub freelist_trunk_page: u32,
    pub freelist_page_count: u32,
    pub schema_cookie: u32,
    pub schema_format: u32,
    pub default_cache_size: u32,
    pub largest_root_page: u32,
    pub text_encoding: u32,
    pub user_version: u32,
    pub incremental_vacuum: u32,
    pub application_id: u32,
    pub version_valid_for: u32,
    pub sqlite_version: u32,
}

impl Default for DatabaseHeader {
    fn default() -> Self {
        Self {
            page_size: 4096,
            write_version: 1,
            read_version: 1,
            reserved_space: 0,
            max_payload_fraction: 64,
            min_payload_fraction: 32,
            leaf_payload_fraction: 32,
            file_change_counter: 1,
            database_size_pages: 1,
            freelist_trunk_page: 0,
            freelist_page_count: 0,
            schema_cookie: 1,
            schema_format: 4,
            default_cache_size: 0,
            largest_root_page: 1,
            text_encoding: 1,
            user_version: 0,
            incremental_vacuum: 0,
            application_id: 0,
            version_valid_for: 1,
            sqlite_version: 3049001,
        }
    }
}

fn be_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([bytes[at], bytes[at + 1]])
}

fn be_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

impl DatabaseHeader {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DatabaseError> {
        if bytes.len() < SQLITE_HEADER_SIZE {
            return Err(DatabaseError::InvalidHeader {
                reason: "header too short".to_string(),
            });
        }
        if &bytes[0..16] != SQLITE_MAGIC {
            return Err(DatabaseError::InvalidHeader {
                reason: "bad magic string".to_string(),
            });
        }
        Ok(Self {
            page_size: be_u16(bytes, 16),
            write_version: bytes[18],
            read_version: bytes[19],
            reserved_space: bytes[20],
            max_payload_fraction: bytes[21],
            min_payload_fraction: bytes[22],
            leaf_payload_fraction: bytes[23],
            file_change_counter: be_u32(bytes, 24),
            database_size_pages: be_u32(bytes, 28),
            freelist_trunk_page: be_u32(bytes, 32),
            freelist_page_count: be_u32(bytes, 36),
            schema_cookie: be_u32(bytes, 40),
            schema_format: be_u32(bytes, 44),
            default_cache_size: be_u32(bytes, 48),
            largest_root_page: be_u32(bytes, 52),
            text_encoding: be_u32(bytes, 56),
            user_version: be_u32(bytes, 60),
            incremental_vacuum: be_u32(bytes, 64),
            application_id: be_u32(bytes, 68),
            version_valid_for: be_u32(bytes, 92),
            sqlite_version: be_u32(bytes, 96),
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = vec![0u8; SQLITE_HEADER_SIZE];
        buffer[0..16].copy_from_slice(SQLITE_MAGIC);
        buffer[16..18].copy_from_slice(&self.page_size.to_be_bytes());
        buffer[18] = self.write_version;
        buffer[19] = self.read_version;
        buffer[20] = self.reserved_space;
        buffer[21] = self.max_payload_fraction;
        buffer[22] = self.min_payload_fraction;
        buffer[23] = self.leaf_payload_fraction;
        buffer[24..28].copy_from_slice(&self.file_change_counter.to_be_bytes());
        buffer[28..32].copy_from_slice(&self.database_size_pages.to_be_bytes());
        buffer[32..36].copy_from_slice(&self.freelist_trunk_page.to_be_bytes());
        buffer[36..40].copy_from_slice(&self.freelist_page_count.to_be_bytes());
        buffer[40..44].copy_from_slice(&self.schema_cookie.to_be_bytes());
        buffer[44..48].copy_from_slice(&self.schema_format.to_be_bytes());
        buffer[48..52].copy_from_slice(&self.default_cache_size.to_be_bytes());
        buffer[52..56].copy_from_slice(&self.largest_root_page.to_be_bytes());
        buffer[56..60].copy_from_slice(&self.text_encoding.to_be_bytes());
        buffer[60..64].copy_from_slice(&self.user_version.to_be_bytes());
        buffer[64..68].copy_from_slice(&self.incremental_vacuum.to_be_bytes());
        buffer[68..72].copy_from_slice(&self.application_id.to_be_bytes());
        buffer[92..96].copy_from_slice(&self.version_valid_for.to_be_bytes());
        buffer[96..100].copy_from_slice(&self.sqlite_version.to_be_bytes());
        buffer
    }
}
