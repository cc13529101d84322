//! # dexparse
//!
//! Decodes the id tables of a Dalvik Executable (DEX) file into indexable,
//! immutable records: the header, string pool, type ids, prototypes, field
//! ids, method ids and class definitions.
//!
//! Cross references stay plain indices. [`DexFile`] offers checked lookups
//! for callers that want names.
//!
//! # Examples
//!
//! ```no_run
//!  use dexparse::DexFile;
//!
//!  let dex = DexFile::open("classes.dex").unwrap();
//!  println!("{} strings, {} classes", dex.strings().len(), dex.class_defs().len());
//!  for class_def in dex.class_defs() {
//!      println!("{}", dex.class_name(class_def).unwrap());
//!  }
//! ```
//!
//! Tables can also be decoded one at a time from any [`ByteSource`]:
//!
//! ```no_run
//!  use dexparse::dex::{HeaderDecoder, StringTableDecoder, TableDecoder};
//!
//!  let bytes = std::fs::read("classes.dex").unwrap();
//!  let header = HeaderDecoder::decode(bytes.as_slice()).unwrap();
//!  let first = StringTableDecoder::decode_one(bytes.as_slice(), &header, 0).unwrap();
//!  println!("{}", first.value);
//! ```
//!
//! Anything shorter than a header is rejected:
//!
//! ```
//!  use dexparse::dex::HeaderDecoder;
//!
//!  let bytes = vec![0u8; 16];
//!  assert!(HeaderDecoder::decode(bytes.as_slice()).is_err());
//! ```

pub mod dex;

#[cfg(test)]
mod tests;

pub use crate::dex::{ByteSource, DexError, DexFile, DexHeader, FormatError, Table};
