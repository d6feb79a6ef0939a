//! Glue between the codec and a REST client's request and response bodies.
//!
//! The codec owns no connections. A transport hands it a [`Reply`] to read a
//! response body from, and takes a [`RequestBody`] to write.

use crate::de::Deserialize;
use crate::deserializer::from_reader_into;
use crate::error::{JsonError, Result};
use crate::options::{DeserializeOptions, SerializeOptions};
use crate::ser::{Serialize, serialize};
use std::io::{self, Read};

/// A received response whose body can be consumed once.
pub trait Reply {
    /// Reads the remaining body into a string.
    fn body_as_string(&mut self) -> io::Result<String>;

    /// The remaining body as a byte stream.
    fn body_stream(&mut self) -> &mut dyn Read;
}

/// Streams a response body into `target` as it is read.
///
/// The body is never buffered whole; `options.max_bytes` bounds how much of
/// it is consumed.
pub fn deserialize_reply<T, P>(target: &mut T, reply: &mut P, options: &DeserializeOptions) -> Result<()>
where
    T: Deserialize,
    P: Reply + ?Sized,
{
    from_reader_into(target, reply.body_stream(), options)
}

/// Materializes a response body first, then populates `target` from it.
pub fn deserialize_reply_string<T, P>(
    target: &mut T,
    reply: &mut P,
    options: &DeserializeOptions,
) -> Result<()>
where
    T: Deserialize,
    P: Reply + ?Sized,
{
    let body = reply
        .body_as_string()
        .map_err(JsonError::SourceReadFailure)?;
    if let Some(logger) = &options.logger {
        logger.debug(&format!("Deserializing reply body of {} bytes", body.len()));
    }
    from_reader_into(target, body.as_bytes(), options)
}

/// A serialized request body, ready to hand to an outgoing write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    text: String,
}

impl RequestBody {
    pub fn from_value<T: Serialize + ?Sized>(value: &T, options: &SerializeOptions) -> Result<Self> {
        let mut text = String::new();
        serialize(value, &mut text, options)?;
        Ok(Self { text })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl AsRef<[u8]> for RequestBody {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Cursor;

    struct CannedReply {
        body: Cursor<Vec<u8>>,
    }

    impl CannedReply {
        fn new(body: &str) -> Self {
            Self {
                body: Cursor::new(body.as_bytes().to_vec()),
            }
        }
    }

    impl Reply for CannedReply {
        fn body_as_string(&mut self) -> io::Result<String> {
            let mut text = String::new();
            self.body.read_to_string(&mut text)?;
            Ok(text)
        }

        fn body_stream(&mut self) -> &mut dyn Read {
            &mut self.body
        }
    }

    #[test]
    fn test_deserialize_reply_stream() {
        let mut reply = CannedReply::new("[3, 1, 2]");
        let mut values: Vec<u8> = Vec::new();
        deserialize_reply(&mut values, &mut reply, &DeserializeOptions::default()).unwrap();
        assert_eq!(values, vec![3, 1, 2]);
    }

    #[test]
    fn test_deserialize_reply_string() {
        let mut reply = CannedReply::new(r#""hello""#);
        let mut text = String::new();
        deserialize_reply_string(&mut text, &mut reply, &DeserializeOptions::default()).unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn test_reply_respects_budget() {
        let mut reply = CannedReply::new("[1,2,3,4,5,6,7,8,9]");
        let mut values: Vec<u8> = Vec::new();
        let options = DeserializeOptions::default().max_bytes(8);
        let err = deserialize_reply(&mut values, &mut reply, &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceLimitExceeded);
    }

    #[test]
    fn test_request_body() {
        let body = RequestBody::from_value(&vec![1, 2], &SerializeOptions::default()).unwrap();
        assert_eq!(body.as_str(), "[1,2]");
        assert_eq!(body.as_bytes(), b"[1,2]");
        assert_eq!(body.len(), 5);
        assert!(!body.is_empty());
    }
}
