use nom::number::complete::le_u32;
use nom::sequence::tuple;
use serde::Serialize;

use crate::dex::error::DexError;
use crate::dex::header::DexHeader;
use crate::dex::source::ByteSource;
use crate::dex::table::{parse_item, TableDecoder};

/// Method ids are three 32-bit words, unlike the 8-byte field ids.
pub const METHOD_ID_ITEM_SIZE: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodRecord {
    pub class_idx: u32,
    pub proto_idx: u32,
    pub name_idx: u32,
}

pub struct MethodTableDecoder;

impl TableDecoder for MethodTableDecoder
{
    const NAME: &'static str = "method_ids";
    const ITEM_SIZE: usize = METHOD_ID_ITEM_SIZE;

    type Record = MethodRecord;

    fn location(header: &DexHeader) -> (u32, u32)
    {
        (header.method_ids_size, header.method_ids_off)
    }

    fn read_item<S: ByteSource + ?Sized>(source: &S, _index: u32, offset: usize) -> Result<MethodRecord, DexError>
    {
        let (class_idx, proto_idx, name_idx) =
            parse_item(source, offset, METHOD_ID_ITEM_SIZE, tuple((le_u32, le_u32, le_u32)))?;
        Ok(MethodRecord { class_idx, proto_idx, name_idx })
    }
}
