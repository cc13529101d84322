#[macro_use]
pub mod error;

pub mod class_defs;
pub mod dex_file;
pub mod fields;
pub mod header;
pub(crate) mod leb;
pub mod methods;
pub mod protos;
pub mod source;
pub mod strings;
pub mod table;
pub mod types;

pub use crate::dex::class_defs::{AccessFlags, ClassDefRecord, ClassDefTableDecoder, NO_INDEX};
pub use crate::dex::dex_file::DexFile;
pub use crate::dex::error::{DexError, FormatError, IoError};
pub use crate::dex::fields::{FieldRecord, FieldTableDecoder};
pub use crate::dex::header::{DexHeader, HeaderDecoder};
pub use crate::dex::methods::{MethodRecord, MethodTableDecoder};
pub use crate::dex::protos::{read_type_list, ProtoRecord, ProtoTableDecoder};
pub use crate::dex::source::{ByteSource, OutOfBounds};
pub use crate::dex::strings::{StringRecord, StringTableDecoder};
pub use crate::dex::table::{Table, TableDecoder};
pub use crate::dex::types::TypeTableDecoder;
