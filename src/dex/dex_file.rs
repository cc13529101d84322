/* A decode session: one source, its header and the six id tables */

use std::fs::File;
use std::path::Path;

use log::{debug, warn};
use memmap2::Mmap;

use crate::dex::class_defs::{ClassDefRecord, ClassDefTableDecoder};
use crate::dex::error::{DexError, FormatError};
use crate::dex::fields::{FieldRecord, FieldTableDecoder};
use crate::dex::header::{DexHeader, HeaderDecoder};
use crate::dex::methods::{MethodRecord, MethodTableDecoder};
use crate::dex::protos::{read_type_list, ProtoRecord, ProtoTableDecoder};
use crate::dex::source::ByteSource;
use crate::dex::strings::{StringRecord, StringTableDecoder};
use crate::dex::table::{Table, TableDecoder};
use crate::dex::types::TypeTableDecoder;

#[derive(Debug)]
pub struct DexFile<S: ByteSource> {
    source: S,
    header: DexHeader,
    strings: Table<StringRecord>,
    type_ids: Table<u32>,
    protos: Table<ProtoRecord>,
    fields: Table<FieldRecord>,
    methods: Table<MethodRecord>,
    class_defs: Table<ClassDefRecord>,
}

fn lookup<'t, T>(table: &'t Table<T>, name: &'static str, index: u32) -> Result<&'t T, DexError>
{
    table
        .get(index)
        .ok_or_else(|| err!(FormatError::IndexOutOfRange { table: name, index, size: table.size }))
}

impl<S: ByteSource> DexFile<S>
{
    /// Decode the header, then every table in file order.
    pub fn from_source(source: S) -> Result<Self, DexError>
    {
        let header = HeaderDecoder::decode(&source)?;

        let strings = StringTableDecoder::decode_all(&source, &header)?;
        let type_ids = TypeTableDecoder::decode_all(&source, &header)?;
        let protos = ProtoTableDecoder::decode_all(&source, &header)?;
        let fields = FieldTableDecoder::decode_all(&source, &header)?;
        let methods = MethodTableDecoder::decode_all(&source, &header)?;
        let class_defs = ClassDefTableDecoder::decode_all(&source, &header)?;

        Ok(DexFile { source, header, strings, type_ids, protos, fields, methods, class_defs })
    }

    /// Like [`DexFile::from_source`], but decodes the six tables as
    /// independent rayon tasks once the header is known. When several tables
    /// fail, the error of the earliest table in file order is returned.
    pub fn from_source_parallel(source: S) -> Result<Self, DexError>
    where
        S: Sync,
    {
        let header = HeaderDecoder::decode(&source)?;
        let (src, hdr) = (&source, &header);

        let ((strings, type_ids), ((protos, fields), (methods, class_defs))) = rayon::join(
            || {
                rayon::join(
                    || StringTableDecoder::decode_all(src, hdr),
                    || TypeTableDecoder::decode_all(src, hdr),
                )
            },
            || {
                rayon::join(
                    || {
                        rayon::join(
                            || ProtoTableDecoder::decode_all(src, hdr),
                            || FieldTableDecoder::decode_all(src, hdr),
                        )
                    },
                    || {
                        rayon::join(
                            || MethodTableDecoder::decode_all(src, hdr),
                            || ClassDefTableDecoder::decode_all(src, hdr),
                        )
                    },
                )
            },
        );

        Ok(DexFile {
            strings: strings?,
            type_ids: type_ids?,
            protos: protos?,
            fields: fields?,
            methods: methods?,
            class_defs: class_defs?,
            source,
            header,
        })
    }

    pub fn source(&self) -> &S
    {
        &self.source
    }

    pub fn header(&self) -> &DexHeader
    {
        &self.header
    }

    pub fn strings(&self) -> &Table<StringRecord>
    {
        &self.strings
    }

    pub fn type_ids(&self) -> &Table<u32>
    {
        &self.type_ids
    }

    pub fn protos(&self) -> &Table<ProtoRecord>
    {
        &self.protos
    }

    pub fn fields(&self) -> &Table<FieldRecord>
    {
        &self.fields
    }

    pub fn methods(&self) -> &Table<MethodRecord>
    {
        &self.methods
    }

    pub fn class_defs(&self) -> &Table<ClassDefRecord>
    {
        &self.class_defs
    }

    pub fn into_source(self) -> S
    {
        self.source
    }

    // Checked resolution. Nothing below is needed to decode the tables; it is
    // for callers that want names instead of indices.

    pub fn string(&self, string_idx: u32) -> Result<&str, DexError>
    {
        Ok(&lookup(&self.strings, "string_ids", string_idx)?.value)
    }

    /// Descriptor of a type, e.g. `Ljava/lang/Object;`.
    pub fn type_descriptor(&self, type_idx: u32) -> Result<&str, DexError>
    {
        let descriptor_idx = *lookup(&self.type_ids, "type_ids", type_idx)?;
        self.string(descriptor_idx)
            .map_err(|e| DexError::with_context(e, format!("type_ids[{}]", type_idx)))
    }

    /// JNI form of a prototype, e.g. `(ILjava/lang/String;)V`.
    pub fn proto_signature(&self, proto_idx: u32) -> Result<String, DexError>
    {
        let proto = lookup(&self.protos, "proto_ids", proto_idx)?;
        let mut sig = String::from("(");
        for &t in &proto.parameters {
            sig.push_str(self.type_descriptor(t as u32)?);
        }
        sig.push(')');
        sig.push_str(self.type_descriptor(proto.return_type_idx)?);
        Ok(sig)
    }

    /// `Lpkg/Cls;->name:T`
    pub fn field_descriptor(&self, field_idx: u32) -> Result<String, DexError>
    {
        let f = lookup(&self.fields, "field_ids", field_idx)?;
        Ok(format!(
            "{}->{}:{}",
            self.type_descriptor(f.class_idx as u32)?,
            self.string(f.name_idx)?,
            self.type_descriptor(f.type_idx as u32)?
        ))
    }

    /// `Lpkg/Cls;->name(I)V`
    pub fn method_descriptor(&self, method_idx: u32) -> Result<String, DexError>
    {
        let m = lookup(&self.methods, "method_ids", method_idx)?;
        Ok(format!(
            "{}->{}{}",
            self.type_descriptor(m.class_idx)?,
            self.string(m.name_idx)?,
            self.proto_signature(m.proto_idx)?
        ))
    }

    /// Like [`DexFile::method_descriptor`] but never fails; dangling indices
    /// render as `method@N`.
    pub fn describe_method(&self, method_idx: u32) -> String
    {
        self.method_descriptor(method_idx).unwrap_or_else(|e| {
            warn!("[resolver] method_ref {}: {}", method_idx, e);
            format!("method@{}", method_idx)
        })
    }

    pub fn describe_field(&self, field_idx: u32) -> String
    {
        self.field_descriptor(field_idx).unwrap_or_else(|e| {
            warn!("[resolver] field_ref {}: {}", field_idx, e);
            format!("field@{}", field_idx)
        })
    }

    pub fn class_name(&self, class_def: &ClassDefRecord) -> Result<&str, DexError>
    {
        self.type_descriptor(class_def.class_idx)
    }

    pub fn superclass_name(&self, class_def: &ClassDefRecord) -> Result<Option<&str>, DexError>
    {
        class_def.superclass().map(|t| self.type_descriptor(t)).transpose()
    }

    pub fn source_file(&self, class_def: &ClassDefRecord) -> Result<Option<&str>, DexError>
    {
        class_def.source_file().map(|s| self.string(s)).transpose()
    }

    /// Type indices of the interfaces a class implements, read from the
    /// `type_list` at `interfaces_off`.
    pub fn interfaces(&self, class_def: &ClassDefRecord) -> Result<Vec<u16>, DexError>
    {
        read_type_list(&self.source, class_def.interfaces_off)
            .map_err(|e| DexError::with_context(e, "interfaces".to_string()))
    }
}

impl<'a> DexFile<&'a [u8]>
{
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, DexError>
    {
        DexFile::from_source(bytes)
    }
}

impl DexFile<Mmap>
{
    /// Map `path` read-only and decode it. The mapping is released when the
    /// returned value is dropped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DexError>
    {
        let path = path.as_ref();
        let io_error = |e: std::io::Error| err!(FormatError::Io(e.into()), "{}", path.display());

        let file = File::open(path).map_err(io_error)?;
        // The map is only ever read; the file must not be truncated while mapped.
        let map = unsafe { Mmap::map(&file) }.map_err(io_error)?;
        debug!("[open] mapped {} ({:#x} bytes)", path.display(), map.len());

        DexFile::from_source(map)
    }
}
