use bitflags::bitflags;
use nom::number::complete::le_u32;
use nom::sequence::tuple;
use serde::Serialize;

use crate::dex::error::DexError;
use crate::dex::header::DexHeader;
use crate::dex::source::ByteSource;
use crate::dex::table::{parse_item, TableDecoder};

pub const CLASS_DEF_ITEM_SIZE: usize = 32;
pub const NO_INDEX: u32 = 0xffffffff;

bitflags! {
    /// Access flags as they apply to a `class_def_item`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessFlags: u32 {
        const PUBLIC = 0x1;
        const PRIVATE = 0x2;
        const PROTECTED = 0x4;
        const STATIC = 0x8;
        const FINAL = 0x10;
        const INTERFACE = 0x200;
        const ABSTRACT = 0x400;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
    }
}

/// `class_def_item`. The four trailing offsets point at structures this crate
/// does not decode and are kept raw; 0 means absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDefRecord {
    pub class_idx: u32,
    pub access_flags: u32,
    /// `NO_INDEX` when the class has no superclass.
    pub superclass_idx: u32,
    pub interfaces_off: u32,
    /// `NO_INDEX` when the source file is unknown.
    pub source_file_idx: u32,
    pub annotations_off: u32,
    pub class_data_off: u32,
    pub static_values_off: u32,
}

fn non_zero(off: u32) -> Option<u32> {
    (off != 0).then_some(off)
}

impl ClassDefRecord {
    /// Known flags; unknown bits are retained.
    pub fn flags(&self) -> AccessFlags {
        AccessFlags::from_bits_retain(self.access_flags)
    }

    pub fn superclass(&self) -> Option<u32> {
        (self.superclass_idx != NO_INDEX).then_some(self.superclass_idx)
    }

    pub fn source_file(&self) -> Option<u32> {
        (self.source_file_idx != NO_INDEX).then_some(self.source_file_idx)
    }

    pub fn interfaces_off(&self) -> Option<u32> {
        non_zero(self.interfaces_off)
    }

    pub fn annotations_off(&self) -> Option<u32> {
        non_zero(self.annotations_off)
    }

    pub fn class_data_off(&self) -> Option<u32> {
        non_zero(self.class_data_off)
    }

    pub fn static_values_off(&self) -> Option<u32> {
        non_zero(self.static_values_off)
    }
}

pub struct ClassDefTableDecoder;

impl TableDecoder for ClassDefTableDecoder
{
    const NAME: &'static str = "class_defs";
    const ITEM_SIZE: usize = CLASS_DEF_ITEM_SIZE;

    type Record = ClassDefRecord;

    fn location(header: &DexHeader) -> (u32, u32)
    {
        (header.class_defs_size, header.class_defs_off)
    }

    fn read_item<S: ByteSource + ?Sized>(source: &S, _index: u32, offset: usize) -> Result<ClassDefRecord, DexError>
    {
        let (
            class_idx,
            access_flags,
            superclass_idx,
            interfaces_off,
            source_file_idx,
            annotations_off,
            class_data_off,
            static_values_off,
        ) = parse_item(
            source,
            offset,
            CLASS_DEF_ITEM_SIZE,
            tuple((le_u32, le_u32, le_u32, le_u32, le_u32, le_u32, le_u32, le_u32)),
        )?;

        Ok(ClassDefRecord {
            class_idx,
            access_flags,
            superclass_idx,
            interfaces_off,
            source_file_idx,
            annotations_off,
            class_data_off,
            static_values_off,
        })
    }
}
