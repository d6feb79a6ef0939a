//! Typed JSON codec for REST request and response bodies.
//!
//! Record types opt in with [`impl_json!`], which lists their fields in the
//! order they are emitted. Serialization walks a value and writes canonical
//! JSON to a [`Sink`]. Deserialization is event-driven: the streaming
//! [`Reader`] feeds a [`Deserializer`] that fills a caller-owned value in
//! place, optionally behind a [`ResourceGuard`] that caps how many input
//! bytes one parse may consume.
//!
//! # Example
//!
//! ```
//! use json_codec::{from_str_into, impl_json, to_string};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Person {
//!     id: i32,
//!     name: String,
//!     balance: f64,
//! }
//!
//! impl_json! {
//!     Person {
//!         id: i32,
//!         name: String,
//!         balance: f64,
//!     }
//! }
//!
//! let person = Person { id: 100, name: "John Doe".to_string(), balance: 123.45 };
//! assert_eq!(
//!     to_string(&person).unwrap(),
//!     r#"{"id":100,"name":"John Doe","balance":123.45}"#
//! );
//!
//! let mut parsed = Person::default();
//! from_str_into(&mut parsed, r#"{"balance":1.5,"id":7,"extra":[1,2]}"#).unwrap();
//! assert_eq!(parsed, Person { id: 7, name: String::new(), balance: 1.5 });
//! ```

pub mod config;
pub mod de;
pub mod descriptor;
pub mod deserializer;
pub mod error;
pub mod guard;
pub mod macros;
pub mod options;
pub mod parser;
pub mod reply;
pub mod ser;
pub mod serializer;
pub mod sink;

pub use config::CodecConfig;
pub use de::{Deserialize, RecordTarget, SequenceTarget};
pub use descriptor::{Describe, Descriptor, Field, Record, ScalarKind, Shape};
pub use deserializer::{Deserializer, bind, from_reader_into, from_str, from_str_into};
pub use error::{ErrorKind, JsonError, Result};
pub use guard::ResourceGuard;
pub use options::{DeserializeOptions, SerializeOptions};
pub use parser::{Handler, Reader, Scalar};
pub use reply::{Reply, RequestBody, deserialize_reply, deserialize_reply_string};
pub use ser::{Serialize, serialize, to_string, to_string_with, to_vec, to_writer};
pub use serializer::Serializer;
pub use sink::{Sink, WriteSink};
