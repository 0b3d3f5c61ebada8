use crate::Tag;

/// Builds raw NBT byte streams for tests. It deliberately validates nothing:
/// malformed streams are half the point.
pub struct Builder {
    payload: Vec<u8>,
}

impl Builder {
    pub fn new() -> Self {
        Builder {
            payload: Vec::new(),
        }
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.payload.push(tag as u8);
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        let encoded = cesu8::to_java_cesu8(name);
        self.payload
            .extend_from_slice(&(encoded.len() as u16).to_be_bytes());
        self.payload.extend_from_slice(&encoded);
        self
    }

    pub fn start_compound(self, name: &str) -> Self {
        self.tag(Tag::Compound).name(name)
    }

    /// A no-op, marking where a compound inside a list logically starts.
    pub fn start_anon_compound(self) -> Self {
        self
    }

    pub fn end_compound(self) -> Self {
        self.tag(Tag::End)
    }

    pub fn start_list(self, name: &str, element_tag: Tag, len: i32) -> Self {
        self.tag(Tag::List)
            .name(name)
            .tag(element_tag)
            .int_payload(len)
    }

    pub fn start_anon_list(self, element_tag: Tag, len: i32) -> Self {
        self.tag(element_tag).int_payload(len)
    }

    pub fn byte(self, name: &str, v: i8) -> Self {
        self.tag(Tag::Byte).name(name).byte_payload(v)
    }

    pub fn short(self, name: &str, v: i16) -> Self {
        self.tag(Tag::Short).name(name).short_payload(v)
    }

    pub fn int(self, name: &str, v: i32) -> Self {
        self.tag(Tag::Int).name(name).int_payload(v)
    }

    pub fn long(self, name: &str, v: i64) -> Self {
        self.tag(Tag::Long).name(name).long_payload(v)
    }

    pub fn float(self, name: &str, v: f32) -> Self {
        self.tag(Tag::Float).name(name).float_payload(v)
    }

    pub fn double(self, name: &str, v: f64) -> Self {
        self.tag(Tag::Double).name(name).double_payload(v)
    }

    pub fn string(self, name: &str, v: &str) -> Self {
        self.tag(Tag::String).name(name).string_payload(v)
    }

    pub fn byte_array(self, name: &str, vs: &[i8]) -> Self {
        let mut out = self
            .tag(Tag::ByteArray)
            .name(name)
            .int_payload(vs.len() as i32);
        for v in vs {
            out = out.byte_payload(*v);
        }
        out
    }

    pub fn int_array(self, name: &str, vs: &[i32]) -> Self {
        let mut out = self
            .tag(Tag::IntArray)
            .name(name)
            .int_payload(vs.len() as i32);
        for v in vs {
            out = out.int_payload(*v);
        }
        out
    }

    pub fn long_array(self, name: &str, vs: &[i64]) -> Self {
        let mut out = self
            .tag(Tag::LongArray)
            .name(name)
            .int_payload(vs.len() as i32);
        for v in vs {
            out = out.long_payload(*v);
        }
        out
    }

    pub fn byte_payload(mut self, v: i8) -> Self {
        self.payload.push(v as u8);
        self
    }

    pub fn short_payload(mut self, v: i16) -> Self {
        self.payload.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn int_payload(mut self, v: i32) -> Self {
        self.payload.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn long_payload(mut self, v: i64) -> Self {
        self.payload.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn float_payload(mut self, v: f32) -> Self {
        self.payload.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn double_payload(mut self, v: f64) -> Self {
        self.payload.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn string_payload(self, v: &str) -> Self {
        self.name(v)
    }

    /// Append bytes verbatim, for corner cases with no builder method.
    pub fn raw_bytes(mut self, bytes: &[u8]) -> Self {
        self.payload.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.payload
    }
}
