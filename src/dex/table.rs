//! Shared machinery for the fixed-stride id tables.
//!
//! Each table is an array of `size` entries of `ITEM_SIZE` bytes at a header
//! supplied offset. A decoder only describes one entry; [`TableDecoder`]
//! supplies bounds checking, error context and the bulk/random-access loops.

use log::debug;
use nom::IResult;
use serde::Serialize;

use crate::dex::error::{DexError, FormatError};
use crate::dex::header::DexHeader;
use crate::dex::source::ByteSource;

/// A decoded table together with where the header said it lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table<T> {
    pub size: u32,
    pub offset: u32,
    pub items: Vec<T>,
}

impl<T> Table<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<&T> {
        self.items.get(index as usize)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a Table<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

pub trait TableDecoder {
    /// Section name as it appears in the header, used in error contexts.
    const NAME: &'static str;
    /// Width of one entry of the id array.
    const ITEM_SIZE: usize;

    type Record;

    /// `(size, offset)` of this table.
    fn location(header: &DexHeader) -> (u32, u32);

    /// Decode the entry whose id-array slot starts at `offset`.
    fn read_item<S: ByteSource + ?Sized>(source: &S, index: u32, offset: usize) -> Result<Self::Record, DexError>;

    fn decode_one<S: ByteSource + ?Sized>(source: &S, header: &DexHeader, index: u32) -> Result<Self::Record, DexError>
    {
        let (size, base) = Self::location(header);
        if index >= size {
            fail!(FormatError::IndexOutOfRange { table: Self::NAME, index, size });
        }
        let offset = (base as usize).saturating_add(index as usize * Self::ITEM_SIZE);
        Self::read_item(source, index, offset)
            .map_err(|e| DexError::with_context(e, format!("{}[{}]", Self::NAME, index)))
    }

    /// Decode every entry. The first failing entry aborts the whole table.
    fn decode_all<S: ByteSource + ?Sized>(source: &S, header: &DexHeader) -> Result<Table<Self::Record>, DexError>
    {
        let (size, base) = Self::location(header);
        if size == 0 {
            // offset of an empty table is never read, stale or not
            return Ok(Table { size, offset: base, items: Vec::new() });
        }

        // The whole id array must be present before anything is allocated for it.
        let extent = (size as usize).saturating_mul(Self::ITEM_SIZE);
        source
            .read_bytes(base as usize, extent)
            .map_err(|oob| DexError::with_context(oob.into(), Self::NAME.to_string()))?;

        let mut items = Vec::with_capacity(size as usize);
        for index in 0..size {
            let offset = base as usize + index as usize * Self::ITEM_SIZE;
            let item = Self::read_item(source, index, offset)
                .map_err(|e| DexError::with_context(e, format!("{}[{}]", Self::NAME, index)))?;
            items.push(item);
        }

        debug!("[{}] decoded {} entries at {:#x}", Self::NAME, items.len(), base);
        Ok(Table { size, offset: base, items })
    }
}

/// Run a nom parser over exactly `width` bytes at `offset`.
pub(crate) fn parse_item<'a, S, O, P>(source: &'a S, offset: usize, width: usize, mut parser: P) -> Result<O, DexError>
where
    S: ByteSource + ?Sized,
    P: FnMut(&'a [u8]) -> IResult<&'a [u8], O>,
{
    let raw = source.read_bytes(offset, width)?;
    match parser(raw) {
        Ok((_, out)) => Ok(out),
        Err(_) => fail!(FormatError::Truncated { offset, length: width, file_len: source.len() }),
    }
}
