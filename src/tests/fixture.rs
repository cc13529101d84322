/* Synthetic DEX images for tests: ids right after the header, data after the ids */

use crate::dex::header::{DEX_FILE_MAGIC, ENDIAN_CONSTANT, HEADER_SIZE};
use crate::dex::leb::encode_uleb128;

#[derive(Default)]
pub(crate) struct DexBuilder {
    strings: Vec<Vec<u8>>,
    types: Vec<u32>,
    protos: Vec<(u32, u32, Option<Vec<u16>>)>,
    fields: Vec<(u16, u16, u32)>,
    methods: Vec<(u32, u32, u32)>,
    class_defs: Vec<([u32; 8], Option<Vec<u16>>)>,
}

fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn patch_u32(buf: &mut [u8], at: usize, v: u32) {
    buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

fn patch_u16(buf: &mut [u8], at: usize, v: u16) {
    buf[at..at + 2].copy_from_slice(&v.to_le_bytes());
}

fn reserve(buf: &mut Vec<u8>, count: usize, width: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let at = buf.len();
    buf.resize(at + count * width, 0);
    at
}

fn put_type_list(buf: &mut Vec<u8>, list: &[u16]) -> u32 {
    while buf.len() % 4 != 0 {
        buf.push(0);
    }
    let at = buf.len() as u32;
    put_u32(buf, list.len() as u32);
    for t in list {
        buf.extend_from_slice(&t.to_le_bytes());
    }
    at
}

impl DexBuilder {
    pub(crate) fn new() -> Self {
        DexBuilder::default()
    }

    /// A well-formed string_data_item for `s`.
    pub(crate) fn string(mut self, s: &str) -> Self {
        let text = cesu8::to_java_cesu8(s);
        let mut data = encode_uleb128(text.len() as u32);
        data.extend_from_slice(&text);
        data.push(0);
        self.strings.push(data);
        self
    }

    /// A string_data_item taken verbatim.
    pub(crate) fn raw_string(mut self, data: &[u8]) -> Self {
        self.strings.push(data.to_vec());
        self
    }

    pub(crate) fn type_id(mut self, descriptor_idx: u32) -> Self {
        self.types.push(descriptor_idx);
        self
    }

    pub(crate) fn proto(mut self, shorty_idx: u32, return_type_idx: u32, parameters: Option<Vec<u16>>) -> Self {
        self.protos.push((shorty_idx, return_type_idx, parameters));
        self
    }

    pub(crate) fn field(mut self, class_idx: u16, type_idx: u16, name_idx: u32) -> Self {
        self.fields.push((class_idx, type_idx, name_idx));
        self
    }

    pub(crate) fn method(mut self, class_idx: u32, proto_idx: u32, name_idx: u32) -> Self {
        self.methods.push((class_idx, proto_idx, name_idx));
        self
    }

    /// `words` is the raw class_def_item; its interfaces_off is replaced when
    /// `interfaces` is given.
    pub(crate) fn class_def(mut self, words: [u32; 8], interfaces: Option<Vec<u16>>) -> Self {
        self.class_defs.push((words, interfaces));
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut out = vec![0u8; HEADER_SIZE];

        let string_ids_off = reserve(&mut out, self.strings.len(), 4);
        let type_ids_off = reserve(&mut out, self.types.len(), 4);
        let proto_ids_off = reserve(&mut out, self.protos.len(), 12);
        let field_ids_off = reserve(&mut out, self.fields.len(), 8);
        let method_ids_off = reserve(&mut out, self.methods.len(), 12);
        let class_defs_off = reserve(&mut out, self.class_defs.len(), 32);

        for (i, t) in self.types.iter().enumerate() {
            patch_u32(&mut out, type_ids_off + 4 * i, *t);
        }
        for (i, (class_idx, type_idx, name_idx)) in self.fields.iter().enumerate() {
            let at = field_ids_off + 8 * i;
            patch_u16(&mut out, at, *class_idx);
            patch_u16(&mut out, at + 2, *type_idx);
            patch_u32(&mut out, at + 4, *name_idx);
        }
        for (i, (class_idx, proto_idx, name_idx)) in self.methods.iter().enumerate() {
            let at = method_ids_off + 12 * i;
            patch_u32(&mut out, at, *class_idx);
            patch_u32(&mut out, at + 4, *proto_idx);
            patch_u32(&mut out, at + 8, *name_idx);
        }

        let data_off = out.len();

        for (i, data) in self.strings.iter().enumerate() {
            let at = out.len() as u32;
            out.extend_from_slice(data);
            patch_u32(&mut out, string_ids_off + 4 * i, at);
        }
        for (i, (shorty_idx, return_type_idx, parameters)) in self.protos.iter().enumerate() {
            let at = proto_ids_off + 12 * i;
            patch_u32(&mut out, at, *shorty_idx);
            patch_u32(&mut out, at + 4, *return_type_idx);
            if let Some(list) = parameters {
                let list_off = put_type_list(&mut out, list);
                patch_u32(&mut out, at + 8, list_off);
            }
        }
        for (i, (words, interfaces)) in self.class_defs.iter().enumerate() {
            let at = class_defs_off + 32 * i;
            let mut words = *words;
            if let Some(list) = interfaces {
                words[3] = put_type_list(&mut out, list);
            }
            for (w, v) in words.iter().enumerate() {
                patch_u32(&mut out, at + 4 * w, *v);
            }
        }

        let file_size = out.len();
        let data_size = file_size - data_off;

        out[..8].copy_from_slice(&DEX_FILE_MAGIC);
        patch_u32(&mut out, 0x08, 0xdeadbeef);
        for (i, b) in out[0x0C..0x20].iter_mut().enumerate() {
            *b = i as u8;
        }
        patch_u32(&mut out, 0x20, file_size as u32);
        patch_u32(&mut out, 0x24, HEADER_SIZE as u32);
        patch_u32(&mut out, 0x28, ENDIAN_CONSTANT);

        let pairs = [
            (self.strings.len(), string_ids_off),
            (self.types.len(), type_ids_off),
            (self.protos.len(), proto_ids_off),
            (self.fields.len(), field_ids_off),
            (self.methods.len(), method_ids_off),
            (self.class_defs.len(), class_defs_off),
            (data_size, if data_size == 0 { 0 } else { data_off }),
        ];
        for (i, (size, off)) in pairs.iter().enumerate() {
            patch_u32(&mut out, 0x38 + 8 * i, *size as u32);
            patch_u32(&mut out, 0x3C + 8 * i, *off as u32);
        }

        out
    }
}

/// The small file used across the scenario tests: two classes, a few
/// members and a proto with and without parameters.
pub(crate) fn sample() -> Vec<u8> {
    DexBuilder::new()
        .string("<init>") // 0
        .string("I") // 1
        .string("LHello;") // 2
        .string("Ljava/lang/Object;") // 3
        .string("Ljava/lang/Runnable;") // 4
        .string("Hello.java") // 5
        .string("V") // 6
        .string("VI") // 7
        .string("count") // 8
        .string("run") // 9
        .type_id(1) // 0 I
        .type_id(2) // 1 LHello;
        .type_id(3) // 2 Ljava/lang/Object;
        .type_id(4) // 3 Ljava/lang/Runnable;
        .type_id(6) // 4 V
        .proto(6, 4, None) // ()V
        .proto(7, 4, Some(vec![0])) // (I)V
        .field(1, 0, 8)
        .method(1, 0, 0)
        .method(1, 1, 9)
        .class_def([1, 0x1, 2, 0, 5, 0, 0, 0], Some(vec![3]))
        .class_def([2, 0x1, 0xffffffff, 0, 0xffffffff, 0, 0, 0], None)
        .build()
}
