use std::{fs::File, io, path::Path};

use crate::types::{MAX_VARINT_LEN, error::Result};

/// Random-access reader over the database file. Every read takes an
/// explicit offset and `&self`; there is no shared cursor, so one pager
/// can serve any number of interleaved readers.
#[derive(Debug)]
pub struct Pager {
    file: File,
}

impl Pager {
    /// Open the file read-only. The reader never needs write access.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self { file })
    }

    pub fn from_file(file: File) -> Self {
        Self { file }
    }

    pub fn file_size(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    #[cfg(unix)]
    fn read_exact_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        use std::os::unix::fs::FileExt;
        self.file.read_exact_at(buf, offset)
    }

    #[cfg(not(unix))]
    fn read_exact_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        use std::io::{Read, Seek, SeekFrom};
        let mut file = &self.file;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf)
    }

    // Fill as much of `buf` as the file allows, returning the byte count.
    #[cfg(unix)]
    fn read_at_most(&self, buf: &mut [u8], mut offset: u64) -> io::Result<usize> {
        use std::os::unix::fs::FileExt;
        let mut filled = 0;
        while filled < buf.len() {
            match self.file.read_at(&mut buf[filled..], offset) {
                Ok(0) => break,
                Ok(n) => {
                    filled += n;
                    offset += n as u64;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    #[cfg(not(unix))]
    fn read_at_most(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        use std::io::{Read, Seek, SeekFrom};
        let mut file = &self.file;
        file.seek(SeekFrom::Start(offset))?;
        let mut filled = 0;
        while filled < buf.len() {
            match file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    pub fn read_bytes(&self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_exact_at(&mut buf, offset)?;
        Ok(buf)
    }

    pub fn read_u8(&self, offset: u64) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact_at(&mut buf, offset)?;
        Ok(buf[0])
    }

    pub fn read_u16(&self, offset: u64) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_exact_at(&mut buf, offset)?;
        Ok(u16::from_be_bytes(buf))
    }

    pub fn read_u32(&self, offset: u64) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact_at(&mut buf, offset)?;
        Ok(u32::from_be_bytes(buf))
    }

    /// Decode a variable-length integer starting at `offset`, returning
    /// the value and the number of bytes it occupied. Each of the first
    /// eight bytes contributes seven payload bits and terminates the
    /// encoding when its high bit is clear; a ninth byte, when reached,
    /// is folded in whole.
    pub fn read_varint(&self, offset: u64) -> Result<(i64, usize)> {
        let mut buf = [0u8; MAX_VARINT_LEN];
        // A varint near the end of the file may be shorter than the
        // buffer, so a short read here is not yet an error.
        let available = self.read_at_most(&mut buf, offset)?;
        let mut value: i64 = 0;
        for (i, &byte) in buf[..available].iter().enumerate() {
            if i == MAX_VARINT_LEN - 1 {
                value = (value << 8) | byte as i64;
                return Ok((value, MAX_VARINT_LEN));
            }
            value = (value << 7) | (byte & 0x7F) as i64;
            if byte & 0x80 == 0 {
                return Ok((value, i + 1));
            }
        }
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("unterminated varint at offset {}", offset),
        )
        .into())
    }
}
