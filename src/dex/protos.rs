use nom::multi::count;
use nom::number::complete::{le_u16, le_u32};
use nom::sequence::tuple;
use serde::Serialize;

use crate::dex::error::DexError;
use crate::dex::header::DexHeader;
use crate::dex::source::ByteSource;
use crate::dex::table::{parse_item, TableDecoder};

pub const PROTO_ID_ITEM_SIZE: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtoRecord {
    pub shorty_idx: u32,
    pub return_type_idx: u32,
    /// Offset of the parameter `type_list`, 0 when there are no parameters.
    pub parameters_off: u32,
    pub parameters: Vec<u16>,
}

impl ProtoRecord {
    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }
}

pub struct ProtoTableDecoder;

impl TableDecoder for ProtoTableDecoder
{
    const NAME: &'static str = "proto_ids";
    const ITEM_SIZE: usize = PROTO_ID_ITEM_SIZE;

    type Record = ProtoRecord;

    fn location(header: &DexHeader) -> (u32, u32)
    {
        (header.proto_ids_size, header.proto_ids_off)
    }

    fn read_item<S: ByteSource + ?Sized>(source: &S, _index: u32, offset: usize) -> Result<ProtoRecord, DexError>
    {
        let (shorty_idx, return_type_idx, parameters_off) =
            parse_item(source, offset, PROTO_ID_ITEM_SIZE, tuple((le_u32, le_u32, le_u32)))?;

        let parameters = read_type_list(source, parameters_off)
            .map_err(|e| DexError::with_context(e, "parameters".to_string()))?;

        Ok(ProtoRecord { shorty_idx, return_type_idx, parameters_off, parameters })
    }
}

/// Decode a `type_list` (u32 count, then that many u16 type indices).
/// An offset of 0 means an absent list and reads nothing.
pub fn read_type_list<S: ByteSource + ?Sized>(source: &S, offset: u32) -> Result<Vec<u16>, DexError>
{
    if offset == 0 {
        return Ok(vec![]);
    }

    let offset = offset as usize;
    let size = source.read_u32(offset)? as usize;
    let entries = offset.saturating_add(4);
    parse_item(source, entries, size.saturating_mul(2), count(le_u16, size))
}
