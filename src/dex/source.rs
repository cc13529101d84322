//! Bounds-checked random access over the bytes of a DEX file.
//!
//! Every read in the crate funnels through [`ByteSource::read_bytes`], which
//! rejects any `[offset, offset + length)` range that does not lie inside the
//! backing storage. Integer reads are little-endian.

use std::fmt;

use memmap2::Mmap;

/// A read that would leave the backing storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds {
    pub offset: usize,
    pub length: usize,
    pub file_len: usize,
}

impl fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bytes at {:#x} exceed source of {:#x} bytes",
            self.length, self.offset, self.file_len
        )
    }
}

impl std::error::Error for OutOfBounds {}

/// Immutable, randomly addressable view of a whole DEX file.
///
/// Implementors only hand out their backing bytes; the provided methods do
/// all bounds checking and never panic.
pub trait ByteSource {
    /// The complete file content.
    fn as_bytes(&self) -> &[u8];

    fn len(&self) -> usize {
        self.as_bytes().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow `length` bytes starting at `offset`.
    fn read_bytes(&self, offset: usize, length: usize) -> Result<&[u8], OutOfBounds> {
        let bytes = self.as_bytes();
        let oob = OutOfBounds { offset, length, file_len: bytes.len() };
        let end = offset.checked_add(length).ok_or(oob)?;
        bytes.get(offset..end).ok_or(oob)
    }

    fn read_u8(&self, offset: usize) -> Result<u8, OutOfBounds> {
        Ok(self.read_bytes(offset, 1)?[0])
    }

    fn read_u16(&self, offset: usize) -> Result<u16, OutOfBounds> {
        let b = self.read_bytes(offset, 2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn read_u32(&self, offset: usize) -> Result<u32, OutOfBounds> {
        let b = self.read_bytes(offset, 4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Everything from `offset` to the end of the source.
    fn tail(&self, offset: usize) -> Result<&[u8], OutOfBounds> {
        let len = self.len();
        self.read_bytes(offset, len.saturating_sub(offset))
    }
}

impl ByteSource for [u8] {
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

impl ByteSource for Vec<u8> {
    fn as_bytes(&self) -> &[u8] {
        self.as_slice()
    }
}

impl ByteSource for Box<[u8]> {
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

impl ByteSource for Mmap {
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

impl<T: ByteSource + ?Sized> ByteSource for &T {
    fn as_bytes(&self) -> &[u8] {
        (**self).as_bytes()
    }
}
