//! Event-driven population of a caller-owned value graph.
//!
//! The [`Deserializer`] is a [`Handler`]: the tokenizer feeds it events and
//! it writes each value into the slot the event belongs to. Where that slot
//! lives is tracked on an explicit stack of frames. Frames store positions
//! (the active field index of a record, "last element" of a sequence), never
//! references, and the live target is re-derived from the root for every
//! event that needs it. The graph is only ever borrowed mutably once.

use crate::de::Deserialize;
use crate::error::{JsonError, Result};
use crate::guard::ResourceGuard;
use crate::options::DeserializeOptions;
use crate::parser::{Handler, Reader, Scalar};
use logging::Logger;
use std::io::Read;

/// One level of nesting in the target graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// Filling a record; `active` is the field the next value belongs to.
    Record { active: Option<usize> },
    /// Filling a sequence; every value appends an element.
    Sequence,
    /// Discarding the value of an unknown member, `depth` levels deep.
    Skip { depth: usize },
}

/// Populates a borrowed target from tokenizer events.
///
/// Fields never mentioned in the input keep their previous values, and
/// sequences are appended to rather than replaced. If a call fails the
/// target is left in an indeterminate, partially-updated state.
pub struct Deserializer<'a> {
    root: &'a mut dyn Deserialize,
    frames: Vec<Frame>,
    skip_next: bool,
    complete: bool,
    logger: Option<Logger>,
}

impl<'a> Deserializer<'a> {
    pub fn new(root: &'a mut dyn Deserialize) -> Self {
        Self {
            root,
            frames: Vec::new(),
            skip_next: false,
            complete: false,
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Option<Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Whether a complete top-level value has been stored.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    fn log_debug(&self, message: &str) {
        if let Some(logger) = &self.logger {
            logger.debug(message);
        }
    }

    fn log_warn(&self, message: &str) {
        if let Some(logger) = &self.logger {
            logger.warn(message);
        }
    }

    /// Walks from the root through `frames`, returning the value the last
    /// frame in `frames` descended into.
    ///
    /// Runs once per event, so an event at depth `d` costs O(d).
    fn descend<'r>(
        root: &'r mut dyn Deserialize,
        frames: &[Frame],
    ) -> Result<&'r mut dyn Deserialize> {
        let mut current = root;
        for frame in frames {
            let next = match *frame {
                Frame::Record {
                    active: Some(index),
                } => current
                    .as_record_mut()
                    .and_then(|record| record.field_mut(index)),
                Frame::Sequence => current
                    .as_sequence_mut()
                    .and_then(|sequence| sequence.current_mut()),
                Frame::Record { active: None } | Frame::Skip { .. } => None,
            };
            current = next.ok_or_else(|| {
                JsonError::malformed(0, "value does not belong to any field or element")
            })?;
        }
        Ok(current)
    }

    /// Returns the slot the next value is written to, creating a new
    /// element when the innermost frame is a sequence.
    fn next_slot(&mut self) -> Result<&mut dyn Deserialize> {
        let Some((top, parents)) = self.frames.split_last() else {
            if self.complete {
                return Err(JsonError::malformed(0, "more than one top-level value"));
            }
            return Ok(&mut *self.root);
        };
        let container = Self::descend(&mut *self.root, parents)?;
        match *top {
            Frame::Record {
                active: Some(index),
            } => container
                .as_record_mut()
                .and_then(|record| record.field_mut(index))
                .ok_or_else(|| JsonError::malformed(0, "active field vanished")),
            Frame::Sequence => match container.as_sequence_mut() {
                Some(sequence) => sequence
                    .append_default()
                    .ok_or_else(|| JsonError::malformed(0, "sequence rejected a new element")),
                None => Err(JsonError::malformed(0, "sequence frame without a sequence")),
            },
            Frame::Record { active: None } => {
                Err(JsonError::malformed(0, "object member value without a key"))
            }
            Frame::Skip { .. } => Err(JsonError::malformed(0, "no slot while skipping")),
        }
    }

    /// Marks the innermost value as finished.
    fn finish_value(&mut self) {
        match self.frames.last_mut() {
            Some(Frame::Record { active }) => *active = None,
            Some(_) => {}
            None => self.complete = true,
        }
    }

    /// Consumes structure events inside a skipped member.
    /// Returns `true` when the event was swallowed.
    fn skip_open(&mut self) -> bool {
        if let Some(Frame::Skip { depth }) = self.frames.last_mut() {
            *depth += 1;
            return true;
        }
        if self.skip_next {
            self.skip_next = false;
            self.frames.push(Frame::Skip { depth: 1 });
            return true;
        }
        false
    }

    /// Rewrites a mismatch raised for a record member so that it names the
    /// member and its declared shape.
    fn in_member(&mut self, err: JsonError) -> JsonError {
        let found = match &err {
            JsonError::FieldTypeMismatch { found, .. } => found.clone(),
            _ => return err,
        };
        let Some((&Frame::Record { active: Some(index) }, parents)) = self.frames.split_last()
        else {
            return err;
        };
        let Ok(container) = Self::descend(&mut *self.root, parents) else {
            return err;
        };
        let Some(record) = container.as_record_mut() else {
            return err;
        };
        match record.member(index) {
            Some((name, shape)) => JsonError::FieldTypeMismatch {
                expected: format!("{} for member '{}' of {}", shape, name, record.type_name()),
                found,
            },
            None => err,
        }
    }

    fn open(&mut self, found: &str, frame: Frame) -> Result<()> {
        if self.skip_open() {
            return Ok(());
        }
        let slot = self.next_slot()?;
        let accepted = match frame {
            Frame::Record { .. } => slot.as_record_mut().is_some(),
            Frame::Sequence => slot.as_sequence_mut().is_some(),
            Frame::Skip { .. } => false,
        };
        if !accepted {
            let err = JsonError::mismatch(slot.expecting(), found);
            let err = self.in_member(err);
            self.log_warn(&err.to_string());
            return Err(err);
        }
        self.frames.push(frame);
        Ok(())
    }

    fn close(&mut self, found: &str) -> Result<()> {
        match self.frames.pop() {
            Some(Frame::Skip { depth }) if depth > 1 => {
                self.frames.push(Frame::Skip { depth: depth - 1 });
                Ok(())
            }
            Some(_) => {
                self.finish_value();
                Ok(())
            }
            None => Err(JsonError::malformed(0, format!("unbalanced {}", found))),
        }
    }
}

impl Handler for Deserializer<'_> {
    fn start_object(&mut self) -> Result<()> {
        self.open("object", Frame::Record { active: None })
    }

    fn key(&mut self, name: &str) -> Result<()> {
        let Some((top, parents)) = self.frames.split_last() else {
            return Err(JsonError::malformed(0, "key outside of an object"));
        };
        match top {
            Frame::Skip { .. } => return Ok(()),
            Frame::Record { .. } => {}
            Frame::Sequence => return Err(JsonError::malformed(0, "key inside an array")),
        }

        let container = Self::descend(&mut *self.root, parents)?;
        let Some(record) = container.as_record_mut() else {
            return Err(JsonError::malformed(0, "record frame without a record"));
        };
        let lookup = record.field_index(name);
        let type_name = record.type_name();

        match lookup {
            Some(index) => {
                if let Some(Frame::Record { active }) = self.frames.last_mut() {
                    *active = Some(index);
                }
            }
            None => {
                self.skip_next = true;
                self.log_debug(&format!(
                    "Ignoring unknown member '{}' of {}",
                    name, type_name
                ));
            }
        }
        Ok(())
    }

    fn end_object(&mut self) -> Result<()> {
        self.close("object")
    }

    fn start_array(&mut self) -> Result<()> {
        self.open("array", Frame::Sequence)
    }

    fn end_array(&mut self) -> Result<()> {
        self.close("array")
    }

    fn scalar(&mut self, value: Scalar<'_>) -> Result<()> {
        if let Some(Frame::Skip { .. }) = self.frames.last() {
            return Ok(());
        }
        if self.skip_next {
            self.skip_next = false;
            self.finish_value();
            return Ok(());
        }
        let slot = self.next_slot()?;
        if let Err(err) = slot.assign(value) {
            let err = self.in_member(err);
            self.log_warn(&err.to_string());
            return Err(err);
        }
        self.finish_value();
        Ok(())
    }
}

const LOG_COMPONENT: &str = "json_codec";

/// Wires `target` to a byte-budgeted event handler.
///
/// Feed the result to [`Reader::parse`]. `max_bytes` of `None` means
/// unlimited.
pub fn bind<T: Deserialize>(
    target: &mut T,
    max_bytes: Option<usize>,
) -> ResourceGuard<Deserializer<'_>> {
    ResourceGuard::new(Deserializer::new(target), max_bytes)
}

/// Populates `target` from a JSON document read from `source`.
///
/// # Errors
///
/// Fails on malformed input, on a value that does not fit its slot, when
/// the byte or depth budget in `options` is exceeded, and when `source`
/// cannot be read.
pub fn from_reader_into<T: Deserialize, R: Read>(
    target: &mut T,
    source: R,
    options: &DeserializeOptions,
) -> Result<()> {
    let logger = options
        .logger
        .as_ref()
        .map(|logger| logger.for_component(LOG_COMPONENT));
    let deserializer = Deserializer::new(target).with_logger(logger.clone());
    let mut handler = ResourceGuard::new(deserializer, options.max_bytes).with_logger(logger);
    Reader::with_max_depth(options.max_depth).parse(source, &mut handler)?;
    if !handler.inner().is_complete() {
        return Err(JsonError::malformed(
            handler.bytes_consumed(),
            "document ended before the value was complete",
        ));
    }
    Ok(())
}

/// Populates `target` from a JSON string with default options.
pub fn from_str_into<T: Deserialize>(target: &mut T, json: &str) -> Result<()> {
    from_reader_into(target, json.as_bytes(), &DeserializeOptions::default())
}

/// Deserializes a fresh value from a JSON string.
///
/// Fields absent from the input keep their `Default` values.
pub fn from_str<T: Deserialize + Default>(json: &str) -> Result<T> {
    let mut value = T::default();
    from_str_into(&mut value, json)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_root_scalar() {
        let mut n = 0u32;
        from_str_into(&mut n, " 17 ").unwrap();
        assert_eq!(n, 17);
    }

    #[test]
    fn test_int_vector() {
        let ints: Vec<i32> = from_str("[1,2,3,4,5,6,7,8,9,10]").unwrap();
        assert_eq!(ints, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_nested_sequences() {
        let nested: Vec<Vec<u8>> = from_str("[[1,2],[],[3]]").unwrap();
        assert_eq!(nested, vec![vec![1, 2], vec![], vec![3]]);
    }

    #[test]
    fn test_sequence_appends_to_existing_contents() {
        let mut values = vec![7];
        from_str_into(&mut values, "[8,9]").unwrap();
        assert_eq!(values, vec![7, 8, 9]);
    }

    #[test]
    fn test_object_into_scalar_is_mismatch() {
        let mut n = 0i32;
        let err = from_str_into(&mut n, r#"{"a":1}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldTypeMismatch);
    }

    #[test]
    fn test_array_into_string_is_mismatch() {
        let mut s = String::new();
        let err = from_str_into(&mut s, "[]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldTypeMismatch);
    }

    #[test]
    fn test_scalar_into_sequence_is_mismatch() {
        let mut values: Vec<i32> = Vec::new();
        let err = from_str_into(&mut values, "5").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldTypeMismatch);
    }

    #[test]
    fn test_element_type_mismatch() {
        let mut values: Vec<i32> = Vec::new();
        let err = from_str_into(&mut values, r#"[1,"two"]"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldTypeMismatch);
    }

    #[test]
    fn test_malformed_is_forwarded() {
        let mut values: Vec<i32> = Vec::new();
        let err = from_str_into(&mut values, "[1,2").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_optional_sequence() {
        let mut values: Option<Vec<u8>> = None;
        from_str_into(&mut values, "[1]").unwrap();
        assert_eq!(values, Some(vec![1]));
        from_str_into(&mut values, "null").unwrap();
        assert_eq!(values, None);
    }

    #[test]
    fn test_bind_drives_reader() {
        let mut values: Vec<f64> = Vec::new();
        let mut handler = bind(&mut values, Some(64));
        Reader::new().parse_str("[1.5, 2, -3]", &mut handler).unwrap();
        assert_eq!(handler.bytes_consumed(), 12);
        drop(handler);
        assert_eq!(values, vec![1.5, 2.0, -3.0]);
    }

    #[test]
    fn test_handler_rejects_second_root_value() {
        let mut n = 0i32;
        let mut deserializer = Deserializer::new(&mut n);
        deserializer.scalar(Scalar::Uint(1)).unwrap();
        assert!(deserializer.is_complete());
        assert!(deserializer.scalar(Scalar::Uint(2)).is_err());
    }

    #[derive(Debug, Default, PartialEq)]
    struct Sample {
        count: u8,
        tags: Vec<String>,
    }

    crate::impl_json! {
        Sample {
            count: u8,
            tags: Vec<String>,
        }
    }

    #[test]
    fn test_mismatch_names_the_member() {
        let err = from_str::<Sample>(r#"{"count":"many"}"#).unwrap_err();
        match err {
            JsonError::FieldTypeMismatch { expected, found } => {
                assert_eq!(expected, "integer for member 'count' of Sample");
                assert_eq!(found, "string");
            }
            other => panic!("Expected FieldTypeMismatch, got {:?}", other),
        }

        let err = from_str::<Sample>(r#"{"tags":{}}"#).unwrap_err();
        assert!(matches!(
            err,
            JsonError::FieldTypeMismatch { ref expected, .. }
                if expected == "array of string for member 'tags' of Sample"
        ));
    }

    #[test]
    fn test_element_mismatch_keeps_element_shape() {
        let err = from_str::<Sample>(r#"{"tags":["a",1]}"#).unwrap_err();
        assert!(matches!(
            err,
            JsonError::FieldTypeMismatch { ref expected, .. } if expected == "string"
        ));
    }
}
