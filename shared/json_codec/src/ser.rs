//! Serialization from Rust types to JSON.

use crate::descriptor::Record;
use crate::error::Result;
use crate::options::SerializeOptions;
use crate::serializer::Serializer;
use crate::sink::{Sink, WriteSink};
use std::collections::{LinkedList, VecDeque};
use std::io::Write;

/// Trait for types that can be serialized to JSON.
pub trait Serialize {
    /// Writes this value's JSON text.
    fn serialize(&self, out: &mut Serializer<'_>) -> Result<()>;

    /// Whether a record member holding this value counts as empty.
    ///
    /// Only empty strings and empty sequences are empty members. Wrappers
    /// do not inherit it: `Some(String::new())` is written as `""` and
    /// `None` as `null`, both kept when empty members are ignored.
    fn is_empty_member(&self) -> bool {
        false
    }
}

impl Serialize for String {
    fn serialize(&self, out: &mut Serializer<'_>) -> Result<()> {
        out.write_str(self)
    }

    fn is_empty_member(&self) -> bool {
        self.is_empty()
    }
}

impl Serialize for str {
    fn serialize(&self, out: &mut Serializer<'_>) -> Result<()> {
        out.write_str(self)
    }

    fn is_empty_member(&self) -> bool {
        self.is_empty()
    }
}

impl Serialize for bool {
    fn serialize(&self, out: &mut Serializer<'_>) -> Result<()> {
        out.write_bool(*self)
    }
}

impl Serialize for f64 {
    fn serialize(&self, out: &mut Serializer<'_>) -> Result<()> {
        out.write_f64(*self)
    }
}

impl Serialize for f32 {
    fn serialize(&self, out: &mut Serializer<'_>) -> Result<()> {
        out.write_f32(*self)
    }
}

macro_rules! serialize_integer {
    ($method:ident as $wide:ty: $($ty:ty),*) => {
        $(
            impl Serialize for $ty {
                fn serialize(&self, out: &mut Serializer<'_>) -> Result<()> {
                    out.$method(*self as $wide)
                }
            }
        )*
    };
}

serialize_integer!(write_i64 as i64: i8, i16, i32, i64, isize);
serialize_integer!(write_u64 as u64: u8, u16, u32, u64, usize);

impl<T: Serialize> Serialize for Option<T> {
    fn serialize(&self, out: &mut Serializer<'_>) -> Result<()> {
        match self {
            Some(value) => value.serialize(out),
            None => out.write_null(),
        }
    }
}

impl<T: Serialize + ?Sized> Serialize for &T {
    fn serialize(&self, out: &mut Serializer<'_>) -> Result<()> {
        (**self).serialize(out)
    }

    fn is_empty_member(&self) -> bool {
        (**self).is_empty_member()
    }
}

macro_rules! serialize_sequence {
    ($($container:ident),*) => {
        $(
            impl<T: Serialize> Serialize for $container<T> {
                fn serialize(&self, out: &mut Serializer<'_>) -> Result<()> {
                    serialize_elements(self.iter(), out)
                }

                fn is_empty_member(&self) -> bool {
                    self.is_empty()
                }
            }
        )*
    };
}

serialize_sequence!(Vec, VecDeque, LinkedList);

impl<T: Serialize> Serialize for [T] {
    fn serialize(&self, out: &mut Serializer<'_>) -> Result<()> {
        serialize_elements(self.iter(), out)
    }

    fn is_empty_member(&self) -> bool {
        self.is_empty()
    }
}

/// Writes `[e0,e1,...]` in iteration order.
pub fn serialize_elements<'v, T, I>(elements: I, out: &mut Serializer<'_>) -> Result<()>
where
    T: Serialize + 'v,
    I: IntoIterator<Item = &'v T>,
{
    out.write_raw("[")?;
    for (index, element) in elements.into_iter().enumerate() {
        if index > 0 {
            out.write_raw(",")?;
        }
        element.serialize(out)?;
    }
    out.write_raw("]")
}

/// Writes a registered record as an object, members in descriptor order.
pub fn serialize_record<T: Record>(value: &T, out: &mut Serializer<'_>) -> Result<()> {
    let skip_empty = out.options().ignore_empty_members;
    out.write_raw("{")?;
    let mut first = true;
    for field in T::descriptor().fields {
        let member = (field.get)(value);
        if skip_empty && member.is_empty_member() {
            continue;
        }
        if !first {
            out.write_raw(",")?;
        }
        first = false;
        out.write_key(field.name)?;
        member.serialize(out)?;
    }
    out.write_raw("}")
}

/// Serializes `value` into `sink`.
pub fn serialize<T: Serialize + ?Sized>(
    value: &T,
    sink: &mut dyn Sink,
    options: &SerializeOptions,
) -> Result<()> {
    let mut out = Serializer::new(sink, *options);
    value.serialize(&mut out)
}

/// Serializes to a JSON string with default options.
pub fn to_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    to_string_with(value, &SerializeOptions::default())
}

/// Serializes to a JSON string.
pub fn to_string_with<T: Serialize + ?Sized>(
    value: &T,
    options: &SerializeOptions,
) -> Result<String> {
    let mut out = String::new();
    serialize(value, &mut out, options)?;
    Ok(out)
}

/// Serializes to a byte vector.
pub fn to_vec<T: Serialize + ?Sized>(value: &T, options: &SerializeOptions) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    serialize(value, &mut out, options)?;
    Ok(out)
}

/// Serializes directly into an outgoing writer.
pub fn to_writer<T: Serialize + ?Sized, W: Write>(
    value: &T,
    writer: W,
    options: &SerializeOptions,
) -> Result<()> {
    let mut sink = WriteSink::new(writer);
    serialize(value, &mut sink, options)?;
    sink.into_inner()
        .map(|_| ())
        .map_err(crate::error::JsonError::SinkWriteFailure)
}
