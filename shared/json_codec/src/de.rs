//! Deserialization targets: how JSON values land in Rust values.
//!
//! The [`Deserializer`](crate::deserializer::Deserializer) never knows the
//! concrete type it is filling. It asks each slot, through these object-safe
//! traits, whether it accepts a scalar, an object or an array.

use crate::descriptor::{Describe, Record, Shape};
use crate::error::{JsonError, Result};
use crate::parser::Scalar;
use std::collections::{LinkedList, VecDeque};

/// Trait for values that can be populated in place from JSON events.
pub trait Deserialize {
    /// Describes what this slot accepts, for error messages. Usually the
    /// `Display` of the type's [`Shape`].
    fn expecting(&self) -> String;

    /// Stores a scalar into this slot.
    fn assign(&mut self, value: Scalar<'_>) -> Result<()> {
        Err(JsonError::mismatch(self.expecting(), value.describe()))
    }

    /// Returns this slot as a record, if it is one.
    fn as_record_mut(&mut self) -> Option<&mut dyn RecordTarget> {
        None
    }

    /// Returns this slot as a sequence, if it is one.
    fn as_sequence_mut(&mut self) -> Option<&mut dyn SequenceTarget> {
        None
    }
}

/// A record being populated field by field.
pub trait RecordTarget {
    fn type_name(&self) -> &'static str;
    /// Position of the field named `name`, if the record has one.
    fn field_index(&self, name: &str) -> Option<usize>;
    /// Member name and declared shape of the field at `index`.
    fn member(&self, index: usize) -> Option<(&'static str, Shape)>;
    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Deserialize>;
}

impl<T: Record> RecordTarget for T {
    fn type_name(&self) -> &'static str {
        T::descriptor().type_name
    }

    fn field_index(&self, name: &str) -> Option<usize> {
        T::descriptor().index_of(name)
    }

    fn member(&self, index: usize) -> Option<(&'static str, Shape)> {
        T::descriptor()
            .fields
            .get(index)
            .map(|field| (field.name, (field.shape)()))
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Deserialize> {
        let field = T::descriptor().fields.get(index)?;
        Some((field.get_mut)(self))
    }
}

/// A sequence being appended to, one element per JSON array item.
pub trait SequenceTarget {
    /// Appends a default-constructed element and returns it.
    fn append_default(&mut self) -> Option<&mut dyn Deserialize>;
    /// Returns the most recently appended element.
    fn current_mut(&mut self) -> Option<&mut dyn Deserialize>;
}

fn integer_from<T>(value: Scalar<'_>, expecting: &str) -> Result<T>
where
    T: TryFrom<i64> + TryFrom<u64>,
{
    let converted = match value {
        Scalar::Int(n) => <T as TryFrom<i64>>::try_from(n).ok(),
        Scalar::Uint(n) => <T as TryFrom<u64>>::try_from(n).ok(),
        _ => return Err(JsonError::mismatch(expecting, value.describe())),
    };
    converted.ok_or_else(|| {
        JsonError::mismatch(expecting, format!("{} (out of range)", value.describe()))
    })
}

macro_rules! deserialize_integer {
    ($($ty:ty),*) => {
        $(
            impl Deserialize for $ty {
                fn expecting(&self) -> String {
                    <$ty as Describe>::shape().to_string()
                }

                fn assign(&mut self, value: Scalar<'_>) -> Result<()> {
                    *self = integer_from::<$ty>(value, &self.expecting())?;
                    Ok(())
                }
            }
        )*
    };
}

deserialize_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! deserialize_float {
    ($($ty:ty),*) => {
        $(
            impl Deserialize for $ty {
                fn expecting(&self) -> String {
                    <$ty as Describe>::shape().to_string()
                }

                fn assign(&mut self, value: Scalar<'_>) -> Result<()> {
                    let converted = match value {
                        Scalar::Int(n) => n as $ty,
                        Scalar::Uint(n) => n as $ty,
                        Scalar::Float(n) => n as $ty,
                        _ => return Err(JsonError::mismatch(self.expecting(), value.describe())),
                    };
                    // Narrowing to f32 can overflow.
                    if !converted.is_finite() {
                        return Err(JsonError::mismatch(
                            self.expecting(),
                            format!("{} (out of range)", value.describe()),
                        ));
                    }
                    *self = converted;
                    Ok(())
                }
            }
        )*
    };
}

deserialize_float!(f32, f64);

impl Deserialize for bool {
    fn expecting(&self) -> String {
        bool::shape().to_string()
    }

    fn assign(&mut self, value: Scalar<'_>) -> Result<()> {
        match value {
            Scalar::Bool(b) => {
                *self = b;
                Ok(())
            }
            _ => Err(JsonError::mismatch(self.expecting(), value.describe())),
        }
    }
}

impl Deserialize for String {
    fn expecting(&self) -> String {
        String::shape().to_string()
    }

    fn assign(&mut self, value: Scalar<'_>) -> Result<()> {
        match value {
            Scalar::Str(s) => {
                self.clear();
                self.push_str(s);
                Ok(())
            }
            _ => Err(JsonError::mismatch(self.expecting(), value.describe())),
        }
    }
}

/// `null` clears the slot; anything else fills it, starting from `T::default()`.
impl<T: Deserialize + Describe + Default> Deserialize for Option<T> {
    fn expecting(&self) -> String {
        Self::shape().to_string()
    }

    fn assign(&mut self, value: Scalar<'_>) -> Result<()> {
        match value {
            Scalar::Null => {
                *self = None;
                Ok(())
            }
            other => self.get_or_insert_with(T::default).assign(other),
        }
    }

    fn as_record_mut(&mut self) -> Option<&mut dyn RecordTarget> {
        self.get_or_insert_with(T::default).as_record_mut()
    }

    fn as_sequence_mut(&mut self) -> Option<&mut dyn SequenceTarget> {
        self.get_or_insert_with(T::default).as_sequence_mut()
    }
}

macro_rules! deserialize_sequence {
    ($($container:ident: $push:ident, $last:ident);* $(;)?) => {
        $(
            impl<T: Deserialize + Default> SequenceTarget for $container<T> {
                fn append_default(&mut self) -> Option<&mut dyn Deserialize> {
                    self.$push(T::default());
                    self.current_mut()
                }

                fn current_mut(&mut self) -> Option<&mut dyn Deserialize> {
                    self.$last().map(|element| element as &mut dyn Deserialize)
                }
            }

            impl<T: Deserialize + Describe + Default> Deserialize for $container<T> {
                fn expecting(&self) -> String {
                    Self::shape().to_string()
                }

                fn as_sequence_mut(&mut self) -> Option<&mut dyn SequenceTarget> {
                    Some(self)
                }
            }
        )*
    };
}

deserialize_sequence! {
    Vec: push, last_mut;
    VecDeque: push_back, back_mut;
    LinkedList: push_back, back_mut;
}
