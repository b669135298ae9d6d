use std::collections::{HashMap, HashSet};

use crate::{
    storage::pager::Pager,
    types::{
        error::{DatabaseError, Result},
        value::Value,
    },
};

/// The serial types the decoder implements. Floats (7), 48/64-bit
/// integers (5, 6), the reserved tags (10, 11) and non-empty BLOBs
/// (even tags >= 14) are rejected with `UnsupportedSerialType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialType {
    Null,
    Int8,
    Int16,
    Int24,
    Int32,
    Zero,
    One,
    EmptyBlob,
    Text(usize),
}

impl SerialType {
    pub fn from_tag(tag: i64) -> Result<Self> {
        match tag {
            0 => Ok(SerialType::Null),
            1 => Ok(SerialType::Int8),
            2 => Ok(SerialType::Int16),
            3 => Ok(SerialType::Int24),
            4 => Ok(SerialType::Int32),
            8 => Ok(SerialType::Zero),
            9 => Ok(SerialType::One),
            12 => Ok(SerialType::EmptyBlob),
            t if t >= 13 && t % 2 == 1 => Ok(SerialType::Text(((t - 13) / 2) as usize)),
            t => Err(DatabaseError::UnsupportedSerialType(t)),
        }
    }

    /// Number of content bytes the column occupies.
    pub fn content_size(&self) -> usize {
        match *self {
            SerialType::Null | SerialType::Zero | SerialType::One | SerialType::EmptyBlob => 0,
            SerialType::Int8 => 1,
            SerialType::Int16 => 2,
            SerialType::Int24 => 3,
            SerialType::Int32 => 4,
            SerialType::Text(len) => len,
        }
    }
}

pub struct RecordDecoder<'a> {
    pager: &'a Pager,
}

impl<'a> RecordDecoder<'a> {
    pub fn new(pager: &'a Pager) -> Self {
        Self { pager }
    }

    /// Decode the record payload starting at `payload_start`, materializing
    /// only the columns in `wanted`. Unwanted columns advance the content
    /// cursor without touching the file, and decoding stops as soon as the
    /// last wanted column has been read. Columns the record does not reach
    /// are simply absent from the returned map.
    pub fn decode(
        &self,
        payload_start: u64,
        wanted: &HashSet<usize>,
    ) -> Result<HashMap<usize, Value>> {
        let (header_size, header_varint_len) = self.pager.read_varint(payload_start)?;
        let header_end = payload_start + header_size as u64;
        let mut header_cursor = payload_start + header_varint_len as u64;
        // Content bytes follow the header, laid out in column order; this
        // cursor advances independently of the header cursor.
        let mut content_cursor = header_end;
        let mut values = HashMap::with_capacity(wanted.len());
        let mut column = 0usize;
        while header_cursor < header_end {
            let (tag, tag_len) = self.pager.read_varint(header_cursor)?;
            header_cursor += tag_len as u64;
            let serial_type = SerialType::from_tag(tag)?;
            if wanted.contains(&column) {
                values.insert(column, self.read_value(serial_type, content_cursor)?);
                if values.len() == wanted.len() {
                    break;
                }
            }
            content_cursor += serial_type.content_size() as u64;
            column += 1;
        }
        Ok(values)
    }

    fn read_value(&self, serial_type: SerialType, offset: u64) -> Result<Value> {
        match serial_type {
            SerialType::Null => Ok(Value::Null),
            SerialType::Zero => Ok(Value::Integer(0)),
            SerialType::One => Ok(Value::Integer(1)),
            SerialType::EmptyBlob => Ok(Value::Blob(Vec::new())),
            SerialType::Int8 | SerialType::Int16 | SerialType::Int24 | SerialType::Int32 => {
                let bytes = self.pager.read_bytes(offset, serial_type.content_size())?;
                let mut value: i64 = 0;
                for byte in bytes {
                    value = (value << 8) | byte as i64;
                }
                Ok(Value::Integer(value))
            }
            SerialType::Text(len) => {
                let bytes = self.pager.read_bytes(offset, len)?;
                // Single-byte-per-character interpretation; no multi-byte
                // decoding is attempted.
                Ok(Value::Text(bytes.iter().map(|&b| b as char).collect()))
            }
        }
    }
}
