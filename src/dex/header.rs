/* header_item: the fixed 0x70 bytes at the start of every DEX file */

use log::{debug, warn};
use serde::Serialize;

use crate::dex::error::{DexError, FormatError};
use crate::dex::source::ByteSource;

pub const DEX_FILE_MAGIC: [u8; 8] = [0x64, 0x65, 0x78, 0x0a, 0x30, 0x33, 0x35, 0x00];
pub const ENDIAN_CONSTANT: u32 = 0x12345678;
pub const HEADER_SIZE: usize = 0x70;

const CHECKSUM_OFF: usize = 0x08;
const SIGNATURE_OFF: usize = 0x0C;
const FILE_SIZE_OFF: usize = 0x20;
const HEADER_SIZE_OFF: usize = 0x24;
const ENDIAN_TAG_OFF: usize = 0x28;
const LINK_OFF: usize = 0x2C;
const MAP_OFF: usize = 0x34;
const STRING_IDS_OFF: usize = 0x38;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DexHeader {
    pub magic: [u8; 8],
    pub checksum: u32,
    pub signature: [u8; 20],
    pub file_size: u32,
    pub header_size: u32,
    pub endian_tag: u32,
    pub link_size: u32,
    pub link_off: u32,
    pub map_off: u32,
    pub string_ids_size: u32,
    pub string_ids_off: u32,
    pub type_ids_size: u32,
    pub type_ids_off: u32,
    pub proto_ids_size: u32,
    pub proto_ids_off: u32,
    pub field_ids_size: u32,
    pub field_ids_off: u32,
    pub method_ids_size: u32,
    pub method_ids_off: u32,
    pub class_defs_size: u32,
    pub class_defs_off: u32,
    pub data_size: u32,
    pub data_off: u32,
}

impl DexHeader
{
    /// Numeric format version from the magic, e.g. 35.
    pub fn version(&self) -> Option<u32>
    {
        let digits = &self.magic[4..7];
        if !digits.iter().all(u8::is_ascii_digit) {
            return None;
        }
        Some(digits.iter().fold(0, |acc, d| acc * 10 + (d - b'0') as u32))
    }

    /// `(name, size, offset)` of each id table, in file order.
    pub fn tables(&self) -> [(&'static str, u32, u32); 6]
    {
        [
            ("string_ids", self.string_ids_size, self.string_ids_off),
            ("type_ids", self.type_ids_size, self.type_ids_off),
            ("proto_ids", self.proto_ids_size, self.proto_ids_off),
            ("field_ids", self.field_ids_size, self.field_ids_off),
            ("method_ids", self.method_ids_size, self.method_ids_off),
            ("class_defs", self.class_defs_size, self.class_defs_off),
        ]
    }
}

pub struct HeaderDecoder;

impl HeaderDecoder
{
    pub fn decode<S: ByteSource + ?Sized>(source: &S) -> Result<DexHeader, DexError>
    {
        let raw = source
            .read_bytes(0, HEADER_SIZE)
            .map_err(|oob| DexError::with_context(oob.into(), "header_item".to_string()))?;

        let mut magic = [0u8; 8];
        magic.copy_from_slice(&raw[..8]);
        if magic != DEX_FILE_MAGIC {
            fail!(FormatError::BadMagic(magic));
        }

        let endian_tag = raw.read_u32(ENDIAN_TAG_OFF)?;
        if endian_tag != ENDIAN_CONSTANT {
            fail!(FormatError::UnsupportedEndian(endian_tag));
        }

        let header_size = raw.read_u32(HEADER_SIZE_OFF)?;
        if header_size as usize != HEADER_SIZE {
            fail!(FormatError::BadHeaderSize(header_size));
        }

        let mut signature = [0u8; 20];
        signature.copy_from_slice(raw.read_bytes(SIGNATURE_OFF, 20)?);

        // string_ids through data: seven consecutive (size, off) pairs ending at 0x70
        let mut pairs = [(0u32, 0u32); 7];
        for (i, pair) in pairs.iter_mut().enumerate() {
            let at = STRING_IDS_OFF + 8 * i;
            *pair = (raw.read_u32(at)?, raw.read_u32(at + 4)?);
        }
        let [strings, types, protos, fields, methods, classes, data] = pairs;

        let header = DexHeader {
            magic,
            checksum: raw.read_u32(CHECKSUM_OFF)?,
            signature,
            file_size: raw.read_u32(FILE_SIZE_OFF)?,
            header_size,
            endian_tag,
            link_size: raw.read_u32(LINK_OFF)?,
            link_off: raw.read_u32(LINK_OFF + 4)?,
            map_off: raw.read_u32(MAP_OFF)?,
            string_ids_size: strings.0,
            string_ids_off: strings.1,
            type_ids_size: types.0,
            type_ids_off: types.1,
            proto_ids_size: protos.0,
            proto_ids_off: protos.1,
            field_ids_size: fields.0,
            field_ids_off: fields.1,
            method_ids_size: methods.0,
            method_ids_off: methods.1,
            class_defs_size: classes.0,
            class_defs_off: classes.1,
            data_size: data.0,
            data_off: data.1,
        };

        if header.file_size as usize != source.len() {
            warn!(
                "[header] file_size {:#x} does not match source length {:#x}",
                header.file_size,
                source.len()
            );
        }
        debug!("[header] dex version {:?}, {:#x} bytes", header.version(), header.file_size);

        Ok(header)
    }
}
