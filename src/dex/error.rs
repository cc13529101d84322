use std::fmt;
use std::io;
use std::sync::Arc;

use thiserror::Error;

use crate::dex::source::OutOfBounds;

macro_rules! err {
    ($kind:expr) => {
        $crate::dex::error::DexError::new($kind)
    };
    ($kind:expr, $contextfmt:literal) => {
        $crate::dex::error::DexError::with_context($crate::dex::error::DexError::new($kind), $contextfmt.to_string())
    };
    ($kind:expr, $contextfmt:literal, $($contextargs:tt)*) => {
        $crate::dex::error::DexError::with_context($crate::dex::error::DexError::new($kind), format!($contextfmt, $($contextargs)*))
    };
}

macro_rules! fail {
    ($kind:expr) => {
        return Err($crate::dex::error::DexError::new($kind))
    };
    ($kind:expr, $contextfmt:literal) => {
        return Err($crate::dex::error::DexError::with_context(
            $crate::dex::error::DexError::new($kind),
            $contextfmt.to_string(),
        ))
    };
    ($kind:expr, $contextfmt:literal, $($contextargs:tt)*) => {
        return Err($crate::dex::error::DexError::with_context(
            $crate::dex::error::DexError::new($kind),
            format!($contextfmt, $($contextargs)*),
        ))
    };
}

/// What went wrong while decoding, independent of where.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError
{
    #[error("read of {length} bytes at {offset:#x} runs past end of file ({file_len:#x} bytes)")]
    Truncated { offset: usize, length: usize, file_len: usize },

    #[error("invalid magic {0:02x?}, expected \"dex\\n035\\0\"")]
    BadMagic([u8; 8]),

    #[error("unsupported endian tag {0:#010x}")]
    UnsupportedEndian(u32),

    #[error("unexpected header size {0:#x}")]
    BadHeaderSize(u32),

    #[error("malformed string_data_item for string {index} at {offset:#x}")]
    MalformedString { index: u32, offset: usize },

    #[error("index {index} out of range for {table} ({size} entries)")]
    IndexOutOfRange { table: &'static str, index: u32, size: u32 },

    #[error("I/O error: {0}")]
    Io(#[source] IoError),
}

/// A shareable `io::Error`, so that [`FormatError`] stays `Clone` and `Eq`.
/// Two values compare equal when their [`io::ErrorKind`]s do.
#[derive(Debug, Clone)]
pub struct IoError(Arc<io::Error>);

impl IoError
{
    pub fn kind(&self) -> io::ErrorKind
    {
        self.0.kind()
    }

    pub fn get_ref(&self) -> &io::Error
    {
        &self.0
    }
}

impl From<io::Error> for IoError
{
    fn from(e: io::Error) -> Self
    {
        IoError(Arc::new(e))
    }
}

impl PartialEq for IoError
{
    fn eq(&self, other: &Self) -> bool
    {
        self.kind() == other.kind()
    }
}

impl Eq for IoError {}

impl fmt::Display for IoError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for IoError
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)>
    {
        Some(self.0.as_ref())
    }
}

impl From<OutOfBounds> for FormatError
{
    fn from(oob: OutOfBounds) -> Self
    {
        FormatError::Truncated { offset: oob.offset, length: oob.length, file_len: oob.file_len }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DexError
{
    kind: FormatError,
    contexts: Vec<String>,
}

impl DexError
{
    pub(crate) fn new(kind: FormatError) -> Self
    {
        DexError {
            kind,
            contexts: Vec::new(),
        }
    }

    pub(crate) fn with_context(base: DexError, context: String) -> Self
    {
        let mut contexts = base.contexts;
        contexts.push(context);
        DexError { kind: base.kind, contexts }
    }

    /// The underlying failure, for matching.
    pub fn kind(&self) -> &FormatError
    {
        &self.kind
    }

    /// Innermost context first, e.g. `["parameters", "proto_ids[4]"]`.
    pub fn contexts(&self) -> &[String]
    {
        &self.contexts
    }
}

impl From<FormatError> for DexError
{
    fn from(kind: FormatError) -> Self
    {
        DexError::new(kind)
    }
}

impl From<OutOfBounds> for DexError
{
    fn from(oob: OutOfBounds) -> Self
    {
        DexError::new(oob.into())
    }
}

impl fmt::Display for DexError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.kind)?;
        let mut connector = " for ";
        for context in &self.contexts
        {
            write!(f, "{}{}", connector, context)?;
            connector = " of ";
        }
        Ok(())
    }
}

impl std::error::Error for DexError
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)>
    {
        Some(&self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_chains_contexts() {
        let e = err!(FormatError::Truncated { offset: 0x70, length: 4, file_len: 0x72 }, "proto_ids[{}]", 2);
        let e = DexError::with_context(e, "proto_ids".to_string());
        assert_eq!(
            e.to_string(),
            "read of 4 bytes at 0x70 runs past end of file (0x72 bytes) for proto_ids[2] of proto_ids"
        );
        assert_eq!(e.contexts().len(), 2);
    }

    #[test]
    fn io_errors_keep_their_source() {
        use std::error::Error;

        let e = err!(FormatError::Io(io::Error::new(io::ErrorKind::NotFound, "gone").into()), "classes.dex");
        assert_eq!(e.to_string(), "I/O error: gone for classes.dex");

        let kind = e.source().expect("format error");
        let io_error = kind.source().expect("io wrapper");
        let inner = io_error.source().and_then(|s| s.downcast_ref::<io::Error>()).expect("io::Error");
        assert_eq!(inner.kind(), io::ErrorKind::NotFound);

        let same_kind = FormatError::Io(io::Error::from(io::ErrorKind::NotFound).into());
        assert_eq!(e.kind(), &same_kind);
    }

    #[test]
    fn out_of_bounds_becomes_truncated() {
        let e: DexError = OutOfBounds { offset: 8, length: 4, file_len: 10 }.into();
        assert_eq!(e.kind(), &FormatError::Truncated { offset: 8, length: 4, file_len: 10 });
    }
}
