//! Fixture support: assembles byte-exact database images so tests and
//! benches can exercise the reader against real files. Production code
//! never writes; the encode side lives only here.

use std::{
    fs,
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use tempfile::env::temp_dir;

use crate::{
    storage::{SQLITE_HEADER_SIZE, header::DatabaseHeader},
    types::{PageId, RowId, error::Result, page::PageType, value::Value},
};

static FIXTURE_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn get_unix_timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis()
}

pub fn create_temp_db_path() -> PathBuf {
    let mut temp_path = temp_dir();
    temp_path.push(format!(
        "kancil_test_{}_{}_{}.db",
        std::process::id(),
        get_unix_timestamp_millis(),
        FIXTURE_COUNTER.fetch_add(1, Ordering::Relaxed),
    ));
    temp_path
}

/// A database image written to a temp path; the file is removed on drop.
pub struct TempDatabase {
    pub path: PathBuf,
}

impl TempDatabase {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let path = create_temp_db_path();
        fs::write(&path, bytes)?;
        Ok(Self { path })
    }
}

impl Drop for TempDatabase {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Encode an integer with the file format's 1-9 byte varint scheme.
pub fn encode_varint(value: i64) -> Vec<u8> {
    let v = value as u64;
    if v >= 1 << 56 {
        // Nine bytes: eight 7-bit groups with the high bit set, then the
        // low byte whole.
        let mut bytes = [0u8; 9];
        bytes[8] = (v & 0xFF) as u8;
        let mut rest = v >> 8;
        for slot in bytes[..8].iter_mut().rev() {
            *slot = ((rest & 0x7F) as u8) | 0x80;
            rest >>= 7;
        }
        return bytes.to_vec();
    }
    let mut groups = Vec::with_capacity(8);
    let mut rest = v;
    loop {
        groups.push((rest & 0x7F) as u8);
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }
    groups.reverse();
    let last = groups.len() - 1;
    for (i, group) in groups.iter_mut().enumerate() {
        if i != last {
            *group |= 0x80;
        }
    }
    groups
}

/// Encode one record payload: header-size varint, serial-type varints,
/// then the content bytes in column order.
pub fn encode_record(values: &[Value]) -> Vec<u8> {
    let mut serials: Vec<i64> = Vec::with_capacity(values.len());
    let mut content = Vec::new();
    for value in values {
        match value {
            Value::Null => serials.push(0),
            Value::Integer(i) => {
                let v = *i as u64;
                if v <= 0xFF {
                    serials.push(1);
                    content.push(v as u8);
                } else if v <= 0xFFFF {
                    serials.push(2);
                    content.extend((v as u16).to_be_bytes());
                } else if v <= 0xFF_FFFF {
                    serials.push(3);
                    content.extend(&(v as u32).to_be_bytes()[1..]);
                } else {
                    serials.push(4);
                    content.extend((v as u32).to_be_bytes());
                }
            }
            Value::Real(r) => {
                serials.push(7);
                content.extend(r.to_be_bytes());
            }
            Value::Text(s) => {
                serials.push(13 + 2 * s.len() as i64);
                content.extend(s.bytes());
            }
            Value::Blob(b) => {
                serials.push(12 + 2 * b.len() as i64);
                content.extend(b);
            }
        }
    }
    let header_body: Vec<u8> = serials.iter().flat_map(|&s| encode_varint(s)).collect();
    // The header size counts its own varint; one byte covers every fixture.
    let header_size = header_body.len() + 1;
    assert!(header_size < 0x80, "record header too large for a fixture");
    let mut record = Vec::with_capacity(header_size + content.len());
    record.push(header_size as u8);
    record.extend(header_body);
    record.extend(content);
    record
}

/// Write a b-tree page into `buf`: header at `header_at`, pointer array
/// after it, cells packed from the page tail. Cell pointers are relative
/// to the start of `buf`, i.e. to the page.
fn write_btree_page(buf: &mut [u8], header_at: usize, page_type: PageType, cells: &[Vec<u8>], rightmost: Option<PageId>) {
    buf[header_at] = page_type.as_u8();
    buf[header_at + 3..header_at + 5].copy_from_slice(&(cells.len() as u16).to_be_bytes());
    if let Some(rightmost) = rightmost {
        buf[header_at + 8..header_at + 12].copy_from_slice(&rightmost.to_be_bytes());
    }
    let pointers_at = header_at + page_type.header_size();
    let mut tail = buf.len();
    for (i, cell) in cells.iter().enumerate() {
        tail -= cell.len();
        assert!(
            tail >= pointers_at + 2 * cells.len(),
            "fixture page overflow"
        );
        buf[tail..tail + cell.len()].copy_from_slice(cell);
        let at = pointers_at + 2 * i;
        buf[at..at + 2].copy_from_slice(&(tail as u16).to_be_bytes());
    }
    buf[header_at + 5..header_at + 7].copy_from_slice(&(tail as u16).to_be_bytes());
}

/// Assembles a complete database image: file header, page 1 schema
/// catalog, and any number of data pages. Pages are numbered in the order
/// they are added, starting at 2.
pub struct DatabaseBuilder {
    page_size: usize,
    data_pages: Vec<Vec<u8>>,
    schema_rows: Vec<Vec<Value>>,
}

impl DatabaseBuilder {
    pub fn new(page_size: usize) -> Self {
        assert!(page_size >= 512, "page size below format minimum");
        Self {
            page_size,
            data_pages: Vec::new(),
            schema_rows: Vec::new(),
        }
    }

    /// Page number the next added page will get.
    pub fn next_page_id(&self) -> PageId {
        self.data_pages.len() as PageId + 2
    }

    pub fn add_leaf_page(&mut self, rows: &[(RowId, Vec<Value>)]) -> PageId {
        let cells: Vec<Vec<u8>> = rows
            .iter()
            .map(|(row_id, values)| {
                let record = encode_record(values);
                let mut cell = encode_varint(record.len() as i64);
                cell.extend(encode_varint(*row_id));
                cell.extend(record);
                cell
            })
            .collect();
        let mut page = vec![0u8; self.page_size];
        write_btree_page(&mut page, 0, PageType::LeafTable, &cells, None);
        self.push_page(page)
    }

    pub fn add_interior_page(&mut self, children: &[(PageId, RowId)], rightmost: PageId) -> PageId {
        let cells: Vec<Vec<u8>> = children
            .iter()
            .map(|(child, key)| {
                let mut cell = child.to_be_bytes().to_vec();
                cell.extend(encode_varint(*key));
                cell
            })
            .collect();
        let mut page = vec![0u8; self.page_size];
        write_btree_page(&mut page, 0, PageType::InteriorTable, &cells, Some(rightmost));
        self.push_page(page)
    }

    /// Install arbitrary page bytes, e.g. a page with a bogus type tag.
    pub fn add_raw_page(&mut self, bytes: Vec<u8>) -> PageId {
        assert_eq!(bytes.len(), self.page_size, "raw page has wrong size");
        self.push_page(bytes)
    }

    fn push_page(&mut self, page: Vec<u8>) -> PageId {
        self.data_pages.push(page);
        self.data_pages.len() as PageId + 1
    }

    pub fn add_table(&mut self, name: &str, root_page: PageId, sql: &str) -> &mut Self {
        self.add_object("table", name, name, root_page, Some(sql))
    }

    /// Catalog row with full control, for index entries and entries with
    /// no stored SQL.
    pub fn add_object(
        &mut self,
        object_type: &str,
        name: &str,
        table_name: &str,
        root_page: PageId,
        sql: Option<&str>,
    ) -> &mut Self {
        self.schema_rows.push(vec![
            Value::Text(object_type.to_string()),
            Value::Text(name.to_string()),
            Value::Text(table_name.to_string()),
            Value::Integer(root_page as i64),
            match sql {
                Some(sql) => Value::Text(sql.to_string()),
                None => Value::Null,
            },
        ]);
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let page_count = self.data_pages.len() as u32 + 1;
        let header = DatabaseHeader {
            page_size: self.page_size as u16,
            database_size_pages: page_count,
            ..DatabaseHeader::default()
        };

        let mut page_one = vec![0u8; self.page_size];
        let cells: Vec<Vec<u8>> = self
            .schema_rows
            .iter()
            .enumerate()
            .map(|(i, values)| {
                let record = encode_record(values);
                let mut cell = encode_varint(record.len() as i64);
                cell.extend(encode_varint(i as i64 + 1));
                cell.extend(record);
                cell
            })
            .collect();
        write_btree_page(&mut page_one, SQLITE_HEADER_SIZE, PageType::LeafTable, &cells, None);
        page_one[..SQLITE_HEADER_SIZE].copy_from_slice(&header.to_bytes());

        let mut image = page_one;
        for page in &self.data_pages {
            image.extend_from_slice(page);
        }
        image
    }

    pub fn build(&self) -> Result<TempDatabase> {
        TempDatabase::from_bytes(&self.to_bytes())
    }
}
