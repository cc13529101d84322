use crate::dex::error::DexError;
use crate::dex::header::DexHeader;
use crate::dex::source::ByteSource;
use crate::dex::table::TableDecoder;

/// `type_id_item` array. Each entry is the `string_ids` index of the type's
/// descriptor; the position in the table is the type index.
pub struct TypeTableDecoder;

impl TableDecoder for TypeTableDecoder
{
    const NAME: &'static str = "type_ids";
    const ITEM_SIZE: usize = 4;

    type Record = u32;

    fn location(header: &DexHeader) -> (u32, u32)
    {
        (header.type_ids_size, header.type_ids_off)
    }

    fn read_item<S: ByteSource + ?Sized>(source: &S, _index: u32, offset: usize) -> Result<u32, DexError>
    {
        Ok(source.read_u32(offset)?)
    }
}
