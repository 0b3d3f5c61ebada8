use serde::de::value::{MapDeserializer, SeqDeserializer};
use serde::de::{self, Deserialize, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;

use crate::error::{Error, Result};
use crate::{Compound, List, Value};

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("valid NBT")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Value, E> {
                Ok(Value::Byte(i8::from(v)))
            }

            fn visit_i8<E: de::Error>(self, v: i8) -> std::result::Result<Value, E> {
                Ok(Value::Byte(v))
            }

            fn visit_i16<E: de::Error>(self, v: i16) -> std::result::Result<Value, E> {
                Ok(Value::Short(v))
            }

            fn visit_i32<E: de::Error>(self, v: i32) -> std::result::Result<Value, E> {
                Ok(Value::Int(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Value, E> {
                Ok(Value::Long(v))
            }

            fn visit_u8<E: de::Error>(self, v: u8) -> std::result::Result<Value, E> {
                Ok(Value::Byte(v as i8))
            }

            fn visit_u16<E: de::Error>(self, v: u16) -> std::result::Result<Value, E> {
                Ok(Value::Short(v as i16))
            }

            fn visit_u32<E: de::Error>(self, v: u32) -> std::result::Result<Value, E> {
                Ok(Value::Int(v as i32))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Value, E> {
                i64::try_from(v)
                    .map(Value::Long)
                    .map_err(|_| E::custom(format!("{} does not fit in an nbt long", v)))
            }

            fn visit_f32<E: de::Error>(self, v: f32) -> std::result::Result<Value, E> {
                Ok(Value::Float(v))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Value, E> {
                Ok(Value::Double(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Value, E> {
                Ok(Value::String(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Value, E> {
                Ok(Value::String(v))
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> std::result::Result<Value, E> {
                Ok(Value::ByteArray(v.iter().map(|b| *b as i8).collect()))
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut list = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(el) = seq.next_element()? {
                    list.push(el);
                }
                Ok(Value::List(List::from(list)))
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut compound = Compound::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    compound.insert(key, value);
                }
                Ok(Value::Compound(compound))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

/// Interpret a [`Value`] as an instance of type `T`. This is the read side
/// of the bridge: a tree loaded from binary or SNBT becomes an arbitrary
/// typed value.
///
/// ```
/// use serde::Deserialize;
/// use nbtkit::{from_value, nbt};
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct Spawn {
///     x: i32,
///     z: i32,
/// }
///
/// let v = nbt!({"x": 7, "z": -3});
/// assert_eq!(from_value::<Spawn>(&v).unwrap(), Spawn { x: 7, z: -3 });
/// ```
pub fn from_value<'de, T>(value: &'de Value) -> Result<T>
where
    T: Deserialize<'de>,
{
    T::deserialize(value)
}

impl<'de> IntoDeserializer<'de, Error> for &'de Value {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

impl<'de> serde::Deserializer<'de> for &'de Value {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Value::Byte(v) => visitor.visit_i8(*v),
            Value::Short(v) => visitor.visit_i16(*v),
            Value::Int(v) => visitor.visit_i32(*v),
            Value::Long(v) => visitor.visit_i64(*v),
            Value::Float(v) => visitor.visit_f32(*v),
            Value::Double(v) => visitor.visit_f64(*v),
            Value::String(v) => visitor.visit_borrowed_str(v),
            Value::ByteArray(v) => visitor.visit_seq(SeqDeserializer::new(v.iter().copied())),
            Value::IntArray(v) => visitor.visit_seq(SeqDeserializer::new(v.iter().copied())),
            Value::LongArray(v) => visitor.visit_seq(SeqDeserializer::new(v.iter().copied())),
            Value::List(l) => visitor.visit_seq(SeqDeserializer::new(l.iter())),
            Value::Compound(c) => {
                visitor.visit_map(MapDeserializer::new(c.iter().map(|(k, v)| (k.as_str(), v))))
            }
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.as_i64() {
            Some(v) => visitor.visit_bool(v != 0),
            None => Err(Error::value(format!("expected bool, got {:?}", self.tag()))),
        }
    }

    // NBT has no null; an absent compound key is the only way to spell None,
    // so a present value is always Some.
    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            // Unit variants arrive as their name.
            Value::String(s) => visitor.visit_enum(s.as_str().into_deserializer()),
            // Data-carrying variants arrive as a 1-entry compound.
            Value::Compound(c) if c.len() == 1 => {
                let (variant, value) = match c.iter().next() {
                    Some((k, v)) => (k, v),
                    None => unreachable!("len checked above"),
                };
                visitor.visit_enum(EnumDeserializer { variant, value })
            }
            _ => Err(Error::value(format!(
                "expected string or 1-entry compound for enum, got {:?}",
                self.tag()
            ))),
        }
    }

    forward_to_deserialize_any! {
        i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

struct EnumDeserializer<'de> {
    variant: &'de str,
    value: &'de Value,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer<'de> {
    type Error = Error;
    type Variant = VariantDeserializer<'de>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant =
            seed.deserialize(IntoDeserializer::<Error>::into_deserializer(self.variant))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer<'de> {
    value: &'de Value,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer<'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Err(Error::value("expected unit variant, found value"))
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self.value)
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        serde::Deserializer::deserialize_any(self.value, visitor)
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        serde::Deserializer::deserialize_any(self.value, visitor)
    }
}
