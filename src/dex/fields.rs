use nom::number::complete::{le_u16, le_u32};
use nom::sequence::tuple;
use serde::Serialize;

use crate::dex::error::DexError;
use crate::dex::header::DexHeader;
use crate::dex::source::ByteSource;
use crate::dex::table::{parse_item, TableDecoder};

pub const FIELD_ID_ITEM_SIZE: usize = 8;

/// `field_id_item`: two 16-bit type indices and a 32-bit name index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRecord {
    pub class_idx: u16,
    pub type_idx: u16,
    pub name_idx: u32,
}

pub struct FieldTableDecoder;

impl TableDecoder for FieldTableDecoder
{
    const NAME: &'static str = "field_ids";
    const ITEM_SIZE: usize = FIELD_ID_ITEM_SIZE;

    type Record = FieldRecord;

    fn location(header: &DexHeader) -> (u32, u32)
    {
        (header.field_ids_size, header.field_ids_off)
    }

    fn read_item<S: ByteSource + ?Sized>(source: &S, _index: u32, offset: usize) -> Result<FieldRecord, DexError>
    {
        let (class_idx, type_idx, name_idx) =
            parse_item(source, offset, FIELD_ID_ITEM_SIZE, tuple((le_u16, le_u16, le_u32)))?;
        Ok(FieldRecord { class_idx, type_idx, name_idx })
    }
}
