//! Static type descriptors for registered record types.
//!
//! A [`Descriptor`] lists a record's fields in declaration order together
//! with accessors for reading and populating each one. Descriptors are built
//! by [`impl_json!`](crate::impl_json), live in a `static`, and are never
//! mutated, so any number of threads may read them concurrently.

use crate::de::Deserialize;
use crate::ser::Serialize;
use std::collections::{LinkedList, VecDeque};
use std::fmt;

/// Kind of an atomic JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    Integer,
    Float,
    String,
}

/// Statically known shape of a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// An atomic value.
    Scalar(ScalarKind),
    /// A nullable slot wrapping another shape.
    Optional(Box<Shape>),
    /// A registered record, identified by its type name.
    Record(&'static str),
    /// An ordered, homogeneous sequence.
    Sequence(Box<Shape>),
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Scalar(ScalarKind::Bool) => write!(f, "boolean"),
            Shape::Scalar(ScalarKind::Integer) => write!(f, "integer"),
            Shape::Scalar(ScalarKind::Float) => write!(f, "number"),
            Shape::Scalar(ScalarKind::String) => write!(f, "string"),
            Shape::Optional(inner) => write!(f, "{} or null", inner),
            Shape::Record(name) => write!(f, "object {}", name),
            Shape::Sequence(inner) => write!(f, "array of {}", inner),
        }
    }
}

/// Types whose shape is known at compile time.
pub trait Describe {
    /// Returns the shape of values of this type.
    fn shape() -> Shape;
}

/// One entry of a record's descriptor.
pub struct Field<T: 'static> {
    /// JSON member name.
    pub name: &'static str,
    /// Shape of the field's value.
    pub shape: fn() -> Shape,
    /// Read accessor used by the serializer.
    pub get: fn(&T) -> &dyn Serialize,
    /// Write accessor used by the deserializer.
    pub get_mut: fn(&mut T) -> &mut dyn Deserialize,
}

/// Field table for a record type, in declaration order.
pub struct Descriptor<T: 'static> {
    pub type_name: &'static str,
    pub fields: &'static [Field<T>],
}

impl<T> Descriptor<T> {
    /// Returns the position of the field named `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }
}

/// A record type that opted in to the codec through registration.
pub trait Record: Sized + 'static {
    /// Returns the shared, immutable descriptor of this type.
    fn descriptor() -> &'static Descriptor<Self>;
}

macro_rules! describe_scalar {
    ($kind:ident: $($ty:ty),*) => {
        $(
            impl Describe for $ty {
                fn shape() -> Shape {
                    Shape::Scalar(ScalarKind::$kind)
                }
            }
        )*
    };
}

describe_scalar!(Bool: bool);
describe_scalar!(Integer: i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
describe_scalar!(Float: f32, f64);
describe_scalar!(String: String);

impl<T: Describe> Describe for Option<T> {
    fn shape() -> Shape {
        Shape::Optional(Box::new(T::shape()))
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn shape() -> Shape {
        Shape::Sequence(Box::new(T::shape()))
    }
}

impl<T: Describe> Describe for VecDeque<T> {
    fn shape() -> Shape {
        Shape::Sequence(Box::new(T::shape()))
    }
}

impl<T: Describe> Describe for LinkedList<T> {
    fn shape() -> Shape {
        Shape::Sequence(Box::new(T::shape()))
    }
}
