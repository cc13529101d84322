use serde::Serialize;

use crate::dex::error::{DexError, FormatError};
use crate::dex::header::DexHeader;
use crate::dex::leb::decode_uleb128;
use crate::dex::source::ByteSource;
use crate::dex::table::TableDecoder;

/// One entry of the string pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringRecord {
    pub index: u32,
    /// `string_data_off` of the entry.
    pub offset: u32,
    /// Declared length prefix: bytes of MUTF-8 text before the NUL.
    pub byte_len: u32,
    pub value: String,
}

/// `string_id_item` array: 32-bit offsets to `string_data_item`s.
pub struct StringTableDecoder;

impl TableDecoder for StringTableDecoder
{
    const NAME: &'static str = "string_ids";
    const ITEM_SIZE: usize = 4;

    type Record = StringRecord;

    fn location(header: &DexHeader) -> (u32, u32)
    {
        (header.string_ids_size, header.string_ids_off)
    }

    fn read_item<S: ByteSource + ?Sized>(source: &S, index: u32, offset: usize) -> Result<StringRecord, DexError>
    {
        let data_off = source.read_u32(offset)?;
        read_string_data(source, index, data_off)
    }
}

/// Decode a `string_data_item`: a uleb128 byte length, then exactly that many
/// MUTF-8 bytes and a NUL terminator.
pub(crate) fn read_string_data<S: ByteSource + ?Sized>(source: &S, index: u32, data_off: u32) -> Result<StringRecord, DexError>
{
    let malformed = || DexError::new(FormatError::MalformedString { index, offset: data_off as usize });

    let rest = source.tail(data_off as usize).map_err(|_| malformed())?;
    let (byte_len, used) = decode_uleb128(rest).ok_or_else(malformed)?;

    let len = byte_len as usize;
    let text = source
        .read_bytes((data_off as usize).saturating_add(used), len.saturating_add(1))
        .map_err(|_| malformed())?;
    let (body, terminator) = text.split_at(len);
    // MUTF-8 never encodes U+0000 as a raw zero byte
    if terminator != [0] || body.contains(&0) {
        return Err(malformed());
    }
    let value = cesu8::from_java_cesu8(body).map_err(|_| malformed())?;

    Ok(StringRecord {
        index,
        offset: data_off,
        byte_len,
        value: value.into_owned(),
    })
}
