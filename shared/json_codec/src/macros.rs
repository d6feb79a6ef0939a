//! Registration macros for JSON serialization.

/// Registers a struct with the codec.
///
/// Lists the fields that take part in JSON conversion, in the order they are
/// emitted. The macro builds the type's static [`Descriptor`](crate::Descriptor)
/// and implements [`Record`](crate::Record), [`Describe`](crate::Describe),
/// [`Serialize`](crate::Serialize) and [`Deserialize`](crate::Deserialize).
/// Fields left out of the list are never read or written. A member name that
/// differs from the Rust field name is given with `as "name"`.
///
/// # Examples
///
/// ```
/// use json_codec::{from_str, impl_json, to_string};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Post {
///     id: i32,
///     user_id: String,
///     tags: Vec<String>,
/// }
///
/// impl_json! {
///     Post {
///         id: i32,
///         user_id as "userId": String,
///         tags: Vec<String>,
///     }
/// }
///
/// let post = Post { id: 1, user_id: "u7".to_string(), tags: vec![] };
/// assert_eq!(to_string(&post).unwrap(), r#"{"id":1,"userId":"u7"}"#);
///
/// // Missing members keep their defaults.
/// let parsed: Post = from_str(r#"{"userId":"u8"}"#).unwrap();
/// assert_eq!(parsed.id, 0);
/// assert_eq!(parsed.user_id, "u8");
/// ```
#[macro_export]
macro_rules! impl_json {
    ($struct_name:ident { $($field:ident $(as $json_name:literal)?: $field_ty:ty),* $(,)? }) => {
        impl $crate::Record for $struct_name {
            fn descriptor() -> &'static $crate::Descriptor<Self> {
                static DESCRIPTOR: $crate::Descriptor<$struct_name> = $crate::Descriptor {
                    type_name: stringify!($struct_name),
                    fields: &[
                        $(
                            $crate::Field {
                                name: $crate::__json_member_name!($field $(, $json_name)?),
                                shape: <$field_ty as $crate::Describe>::shape,
                                get: |value| &value.$field,
                                get_mut: |value| &mut value.$field,
                            },
                        )*
                    ],
                };
                &DESCRIPTOR
            }
        }

        impl $crate::Describe for $struct_name {
            fn shape() -> $crate::Shape {
                $crate::Shape::Record(stringify!($struct_name))
            }
        }

        impl $crate::Serialize for $struct_name {
            fn serialize(&self, out: &mut $crate::Serializer<'_>) -> $crate::Result<()> {
                $crate::ser::serialize_record(self, out)
            }
        }

        impl $crate::Deserialize for $struct_name {
            fn expecting(&self) -> String {
                <Self as $crate::Describe>::shape().to_string()
            }

            fn as_record_mut(&mut self) -> Option<&mut dyn $crate::RecordTarget> {
                Some(self)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __json_member_name {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident, $json_name:literal) => {
        $json_name
    };
}

/// Registers an enum with unit variants, serialized as JSON strings.
///
/// # Examples
///
/// ```
/// use json_codec::{from_str, impl_json_enum, to_string};
///
/// #[derive(Debug, Default, PartialEq)]
/// enum Role {
///     Owner,
///     #[default]
///     Guest,
/// }
///
/// impl_json_enum! {
///     Role {
///         Owner,
///         Guest,
///     }
/// }
///
/// assert_eq!(to_string(&Role::Owner).unwrap(), r#""Owner""#);
/// assert_eq!(from_str::<Role>(r#""Guest""#).unwrap(), Role::Guest);
/// ```
#[macro_export]
macro_rules! impl_json_enum {
    ($enum_name:ident { $($variant:ident),* $(,)? }) => {
        impl $crate::Describe for $enum_name {
            fn shape() -> $crate::Shape {
                $crate::Shape::Scalar($crate::ScalarKind::String)
            }
        }

        impl $crate::Serialize for $enum_name {
            fn serialize(&self, out: &mut $crate::Serializer<'_>) -> $crate::Result<()> {
                match self {
                    $(
                        $enum_name::$variant => out.write_str(stringify!($variant)),
                    )*
                }
            }
        }

        impl $crate::Deserialize for $enum_name {
            fn expecting(&self) -> String {
                format!("string naming a {} variant", stringify!($enum_name))
            }

            fn assign(&mut self, value: $crate::Scalar<'_>) -> $crate::Result<()> {
                let $crate::Scalar::Str(name) = value else {
                    return Err($crate::JsonError::FieldTypeMismatch {
                        expected: self.expecting(),
                        found: value.describe(),
                    });
                };
                *self = match name {
                    $(
                        stringify!($variant) => $enum_name::$variant,
                    )*
                    _ => {
                        return Err($crate::JsonError::FieldTypeMismatch {
                            expected: self.expecting(),
                            found: format!("unknown variant '{}'", name),
                        });
                    }
                };
                Ok(())
            }
        }
    };
}
