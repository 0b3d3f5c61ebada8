//! Binary NBT encoding: [`Value`] trees to bytes.

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use crate::error::{Error, Result};
use crate::{Tag, Value};

/// Serialize a value to binary NBT with an empty root name.
pub fn to_bytes(value: &Value) -> Result<Vec<u8>> {
    to_bytes_named("", value)
}

/// Serialize a value to binary NBT, naming the root tag.
pub fn to_bytes_named(name: &str, value: &Value) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    to_writer_named(&mut out, name, value)?;
    Ok(out)
}

/// Serialize a value as binary NBT into a writer, with an empty root name.
pub fn to_writer<W: Write>(writer: W, value: &Value) -> Result<()> {
    to_writer_named(writer, "", value)
}

/// Serialize a value as binary NBT into a writer, naming the root tag.
pub fn to_writer_named<W: Write>(mut writer: W, name: &str, value: &Value) -> Result<()> {
    writer.write_tag(value.tag())?;
    writer.write_size_prefixed_str(name)?;
    write_payload(&mut writer, value)
}

pub(crate) trait WriteNbt: Write {
    fn write_tag(&mut self, tag: Tag) -> Result<()> {
        self.write_u8(tag as u8)?;
        Ok(())
    }

    fn write_size_prefixed_str(&mut self, key: &str) -> Result<()> {
        let key = cesu8::to_java_cesu8(key);
        let len: u16 = key
            .len()
            .try_into()
            .map_err(|_| Error::value(format!("string too long for nbt: {} bytes", key.len())))?;
        self.write_u16::<BigEndian>(len)?;
        self.write_all(&key)?;
        Ok(())
    }

    fn write_len(&mut self, len: usize) -> Result<()> {
        let len: i32 = len
            .try_into()
            .map_err(|_| Error::value(format!("length too large for nbt: {}", len)))?;
        self.write_i32::<BigEndian>(len)?;
        Ok(())
    }
}

impl<T> WriteNbt for T where T: Write {}

fn write_payload<W: Write>(writer: &mut W, value: &Value) -> Result<()> {
    match value {
        Value::Byte(v) => writer.write_i8(*v)?,
        Value::Short(v) => writer.write_i16::<BigEndian>(*v)?,
        Value::Int(v) => writer.write_i32::<BigEndian>(*v)?,
        Value::Long(v) => writer.write_i64::<BigEndian>(*v)?,
        Value::Float(v) => writer.write_f32::<BigEndian>(*v)?,
        Value::Double(v) => writer.write_f64::<BigEndian>(*v)?,
        Value::String(v) => writer.write_size_prefixed_str(v)?,
        Value::ByteArray(v) => {
            writer.write_len(v.len())?;
            for b in v {
                writer.write_i8(*b)?;
            }
        }
        Value::IntArray(v) => {
            writer.write_len(v.len())?;
            for n in v {
                writer.write_i32::<BigEndian>(*n)?;
            }
        }
        Value::LongArray(v) => {
            writer.write_len(v.len())?;
            for n in v {
                writer.write_i64::<BigEndian>(*n)?;
            }
        }
        Value::List(list) => {
            let element_tag = list.element_tag();
            writer.write_tag(element_tag)?;
            writer.write_len(list.len())?;
            for element in list {
                if element_tag == Tag::Compound && element.tag() != Tag::Compound {
                    // Heterogeneous list: smuggle the element inside a
                    // 1-entry compound keyed by the empty string.
                    writer.write_tag(element.tag())?;
                    writer.write_size_prefixed_str("")?;
                    write_payload(writer, element)?;
                    writer.write_tag(Tag::End)?;
                } else {
                    write_payload(writer, element)?;
                }
            }
        }
        Value::Compound(compound) => {
            for (key, value) in compound {
                writer.write_tag(value.tag())?;
                writer.write_size_prefixed_str(key)?;
                write_payload(writer, value)?;
            }
            writer.write_tag(Tag::End)?;
        }
    }
    Ok(())
}
