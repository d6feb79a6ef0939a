//! Streaming JSON tokenizer.
//!
//! [`Reader::parse`] pulls bytes from any [`Read`] and reports what it finds
//! to a [`Handler`] as a flat sequence of events. Nothing is materialized
//! beyond the key or scalar currently being read, and nesting is tracked on
//! an explicit stack, so deeply nested input cannot exhaust the call stack.
//!
//! The grammar is strict RFC 8259: no comments, no trailing commas, no
//! `NaN`/`Infinity`, exactly one top-level value.

use crate::error::{JsonError, Result};
use crate::options::DEFAULT_MAX_DEPTH;
use std::io::{self, BufRead, BufReader, Read};

/// An atomic JSON value reported by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Null,
    Bool(bool),
    /// Negative integer literal that fits in `i64`.
    Int(i64),
    /// Non-negative integer literal that fits in `u64`.
    Uint(u64),
    /// Any other number.
    Float(f64),
    Str(&'a str),
}

impl Scalar<'_> {
    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Scalar::Null => "null".to_string(),
            Scalar::Bool(b) => format!("boolean {}", b),
            Scalar::Int(n) => format!("integer {}", n),
            Scalar::Uint(n) => format!("integer {}", n),
            Scalar::Float(n) => format!("number {}", n),
            Scalar::Str(_) => "string".to_string(),
        }
    }
}

/// Receives tokenizer events.
///
/// Returning an error from any method aborts the parse immediately.
pub trait Handler {
    fn start_object(&mut self) -> Result<()>;
    fn key(&mut self, name: &str) -> Result<()>;
    fn end_object(&mut self) -> Result<()>;
    fn start_array(&mut self) -> Result<()>;
    fn end_array(&mut self) -> Result<()>;
    fn scalar(&mut self, value: Scalar<'_>) -> Result<()>;

    /// Called as raw input bytes are read, before the event they belong to.
    fn consumed(&mut self, _bytes: usize) -> Result<()> {
        Ok(())
    }
}

impl<H: Handler + ?Sized> Handler for &mut H {
    fn start_object(&mut self) -> Result<()> {
        (**self).start_object()
    }

    fn key(&mut self, name: &str) -> Result<()> {
        (**self).key(name)
    }

    fn end_object(&mut self) -> Result<()> {
        (**self).end_object()
    }

    fn start_array(&mut self) -> Result<()> {
        (**self).start_array()
    }

    fn end_array(&mut self) -> Result<()> {
        (**self).end_array()
    }

    fn scalar(&mut self, value: Scalar<'_>) -> Result<()> {
        (**self).scalar(value)
    }

    fn consumed(&mut self, bytes: usize) -> Result<()> {
        (**self).consumed(bytes)
    }
}

/// Streaming JSON tokenizer.
#[derive(Debug, Clone, Copy)]
pub struct Reader {
    max_depth: usize,
}

impl Default for Reader {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Value,
    FirstValueOrEnd,
    FirstKeyOrEnd,
    Key,
    CommaOrEnd,
}

impl Reader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum object/array nesting depth.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Tokenizes one JSON document from `source`, feeding `handler`.
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` for syntax errors, `SourceReadFailure` if
    /// `source` fails, `ResourceLimitExceeded` if nesting exceeds the
    /// configured depth, and whatever the handler returns.
    pub fn parse<R: Read, H: Handler + ?Sized>(&self, source: R, handler: &mut H) -> Result<()> {
        let mut input = Input::new(source);
        let mut stack: Vec<Container> = Vec::new();
        let mut expect = Expect::Value;

        loop {
            input.skip_whitespace(handler)?;
            match expect {
                Expect::Value | Expect::FirstValueOrEnd => {
                    let byte = input.peek_required()?;
                    if expect == Expect::FirstValueOrEnd && byte == b']' {
                        input.bump(handler)?;
                        stack.pop();
                        handler.end_array()?;
                        expect = Expect::CommaOrEnd;
                        continue;
                    }
                    expect = self.read_value(&mut input, &mut stack, handler)?;
                }
                Expect::FirstKeyOrEnd | Expect::Key => {
                    let byte = input.peek_required()?;
                    if expect == Expect::FirstKeyOrEnd && byte == b'}' {
                        input.bump(handler)?;
                        stack.pop();
                        handler.end_object()?;
                        expect = Expect::CommaOrEnd;
                        continue;
                    }
                    if byte != b'"' {
                        return Err(input.unexpected(byte, "object key"));
                    }
                    let key = input.read_string(handler)?;
                    handler.key(key)?;
                    input.skip_whitespace(handler)?;
                    input.expect_byte(b':', handler)?;
                    expect = Expect::Value;
                }
                Expect::CommaOrEnd => {
                    let Some(container) = stack.last().copied() else {
                        break;
                    };
                    let byte = input.peek_required()?;
                    match (container, byte) {
                        (_, b',') => {
                            input.bump(handler)?;
                            expect = match container {
                                Container::Object => Expect::Key,
                                Container::Array => Expect::Value,
                            };
                        }
                        (Container::Object, b'}') => {
                            input.bump(handler)?;
                            stack.pop();
                            handler.end_object()?;
                        }
                        (Container::Array, b']') => {
                            input.bump(handler)?;
                            stack.pop();
                            handler.end_array()?;
                        }
                        (Container::Object, other) => {
                            return Err(input.unexpected(other, "',' or '}'"));
                        }
                        (Container::Array, other) => {
                            return Err(input.unexpected(other, "',' or ']'"));
                        }
                    }
                }
            }
        }

        match input.peek()? {
            None => Ok(()),
            Some(_) => Err(JsonError::malformed(
                input.offset,
                "trailing characters after JSON value",
            )),
        }
    }

    /// Parses a complete document held in memory.
    pub fn parse_str<H: Handler + ?Sized>(&self, json: &str, handler: &mut H) -> Result<()> {
        self.parse(json.as_bytes(), handler)
    }

    fn read_value<R: Read, H: Handler + ?Sized>(
        &self,
        input: &mut Input<R>,
        stack: &mut Vec<Container>,
        handler: &mut H,
    ) -> Result<Expect> {
        let byte = input.peek_required()?;
        match byte {
            b'{' | b'[' => {
                if stack.len() >= self.max_depth {
                    return Err(JsonError::ResourceLimitExceeded {
                        resource: "depth",
                        limit: self.max_depth,
                        consumed: stack.len() + 1,
                    });
                }
                input.bump(handler)?;
                if byte == b'{' {
                    stack.push(Container::Object);
                    handler.start_object()?;
                    Ok(Expect::FirstKeyOrEnd)
                } else {
                    stack.push(Container::Array);
                    handler.start_array()?;
                    Ok(Expect::FirstValueOrEnd)
                }
            }
            b'"' => {
                let text = input.read_string(handler)?;
                handler.scalar(Scalar::Str(text))?;
                Ok(Expect::CommaOrEnd)
            }
            b't' => {
                input.expect_literal(b"true", handler)?;
                handler.scalar(Scalar::Bool(true))?;
                Ok(Expect::CommaOrEnd)
            }
            b'f' => {
                input.expect_literal(b"false", handler)?;
                handler.scalar(Scalar::Bool(false))?;
                Ok(Expect::CommaOrEnd)
            }
            b'n' => {
                input.expect_literal(b"null", handler)?;
                handler.scalar(Scalar::Null)?;
                Ok(Expect::CommaOrEnd)
            }
            b'-' | b'0'..=b'9' => {
                let number = input.read_number(handler)?;
                handler.scalar(number)?;
                Ok(Expect::CommaOrEnd)
            }
            other => Err(input.unexpected(other, "a JSON value")),
        }
    }
}

/// Buffered byte source with one byte of lookahead.
struct Input<R> {
    reader: BufReader<R>,
    offset: usize,
    scratch: Vec<u8>,
}

impl<R: Read> Input<R> {
    fn new(source: R) -> Self {
        Self {
            reader: BufReader::new(source),
            offset: 0,
            scratch: Vec::new(),
        }
    }

    fn peek(&mut self) -> Result<Option<u8>> {
        loop {
            match self.reader.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(JsonError::SourceReadFailure(err)),
            }
        }
    }

    fn peek_required(&mut self) -> Result<u8> {
        self.peek()?
            .ok_or_else(|| JsonError::malformed(self.offset, "unexpected end of input"))
    }

    /// Consumes one byte and reports it to the handler.
    fn bump<H: Handler + ?Sized>(&mut self, handler: &mut H) -> Result<u8> {
        let byte = self.peek_required()?;
        self.reader.consume(1);
        self.offset += 1;
        handler.consumed(1)?;
        Ok(byte)
    }

    fn unexpected(&self, byte: u8, wanted: &str) -> JsonError {
        JsonError::malformed(
            self.offset,
            format!("unexpected character '{}', expected {}", byte.escape_ascii(), wanted),
        )
    }

    fn skip_whitespace<H: Handler + ?Sized>(&mut self, handler: &mut H) -> Result<()> {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek()? {
            self.bump(handler)?;
        }
        Ok(())
    }

    fn expect_byte<H: Handler + ?Sized>(&mut self, expected: u8, handler: &mut H) -> Result<()> {
        let byte = self.peek_required()?;
        if byte != expected {
            return Err(self.unexpected(byte, &format!("'{}'", expected as char)));
        }
        self.bump(handler)?;
        Ok(())
    }

    fn expect_literal<H: Handler + ?Sized>(&mut self, literal: &[u8], handler: &mut H) -> Result<()> {
        for &expected in literal {
            self.expect_byte(expected, handler)?;
        }
        Ok(())
    }

    /// Reads a quoted string, returning its unescaped contents.
    fn read_string<H: Handler + ?Sized>(&mut self, handler: &mut H) -> Result<&str> {
        let start = self.offset;
        self.expect_byte(b'"', handler)?;
        self.scratch.clear();
        loop {
            let byte = self
                .bump(handler)
                .map_err(|err| match err {
                    JsonError::MalformedInput { .. } => {
                        JsonError::malformed(start, "unterminated string")
                    }
                    other => other,
                })?;
            match byte {
                b'"' => break,
                b'\\' => self.read_escape(handler)?,
                0x00..=0x1F => {
                    return Err(JsonError::malformed(
                        self.offset - 1,
                        "control character in string",
                    ));
                }
                _ => self.scratch.push(byte),
            }
        }
        std::str::from_utf8(&self.scratch)
            .map_err(|_| JsonError::malformed(start, "invalid UTF-8 in string"))
    }

    fn read_escape<H: Handler + ?Sized>(&mut self, handler: &mut H) -> Result<()> {
        let byte = self.bump(handler)?;
        let decoded = match byte {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\x08',
            b'f' => '\x0C',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => self.read_unicode_escape(handler)?,
            other => {
                return Err(JsonError::malformed(
                    self.offset - 1,
                    format!("invalid escape sequence '\\{}'", other.escape_ascii()),
                ));
            }
        };
        let mut buf = [0u8; 4];
        self.scratch
            .extend_from_slice(decoded.encode_utf8(&mut buf).as_bytes());
        Ok(())
    }

    fn read_unicode_escape<H: Handler + ?Sized>(&mut self, handler: &mut H) -> Result<char> {
        let start = self.offset;
        let high = self.read_hex4(handler)?;
        let code = match high {
            0xD800..=0xDBFF => {
                self.expect_byte(b'\\', handler)?;
                self.expect_byte(b'u', handler)?;
                let low = self.read_hex4(handler)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(JsonError::malformed(start, "unpaired surrogate in \\u escape"));
                }
                0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => {
                return Err(JsonError::malformed(start, "unpaired surrogate in \\u escape"));
            }
            code => code,
        };
        char::from_u32(code)
            .ok_or_else(|| JsonError::malformed(start, format!("invalid \\u escape {:04X}", code)))
    }

    fn read_hex4<H: Handler + ?Sized>(&mut self, handler: &mut H) -> Result<u32> {
        let mut code = 0u32;
        for _ in 0..4 {
            let byte = self.bump(handler)?;
            let digit = (byte as char).to_digit(16).ok_or_else(|| {
                JsonError::malformed(
                    self.offset - 1,
                    format!("invalid hex digit '{}' in \\u escape", byte.escape_ascii()),
                )
            })?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn take_digits<H: Handler + ?Sized>(&mut self, handler: &mut H) -> Result<usize> {
        let mut count = 0;
        while let Some(byte @ b'0'..=b'9') = self.peek()? {
            self.bump(handler)?;
            self.scratch.push(byte);
            count += 1;
        }
        Ok(count)
    }

    fn read_number<H: Handler + ?Sized>(&mut self, handler: &mut H) -> Result<Scalar<'static>> {
        let start = self.offset;
        self.scratch.clear();
        let negative = self.peek()? == Some(b'-');
        if negative {
            self.bump(handler)?;
            self.scratch.push(b'-');
        }

        match self.peek()? {
            Some(b'0') => {
                self.bump(handler)?;
                self.scratch.push(b'0');
            }
            Some(b'1'..=b'9') => {
                self.take_digits(handler)?;
            }
            _ => return Err(JsonError::malformed(self.offset, "expected digit")),
        }

        let mut integral = true;
        if self.peek()? == Some(b'.') {
            integral = false;
            self.bump(handler)?;
            self.scratch.push(b'.');
            if self.take_digits(handler)? == 0 {
                return Err(JsonError::malformed(
                    self.offset,
                    "expected digit after decimal point",
                ));
            }
        }

        if let Some(marker @ (b'e' | b'E')) = self.peek()? {
            integral = false;
            self.bump(handler)?;
            self.scratch.push(marker);
            if let Some(sign @ (b'+' | b'-')) = self.peek()? {
                self.bump(handler)?;
                self.scratch.push(sign);
            }
            if self.take_digits(handler)? == 0 {
                return Err(JsonError::malformed(self.offset, "expected digit in exponent"));
            }
        }

        // The scratch buffer only ever holds ASCII here.
        let text = std::str::from_utf8(&self.scratch)
            .map_err(|_| JsonError::malformed(start, "invalid number"))?;
        if integral {
            if negative {
                if let Ok(value) = text.parse::<i64>() {
                    return Ok(Scalar::Int(value));
                }
            } else if let Ok(value) = text.parse::<u64>() {
                return Ok(Scalar::Uint(value));
            }
        }
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Scalar::Float(value)),
            Ok(_) => Err(JsonError::malformed(
                start,
                format!("number '{}' is out of range", text),
            )),
            Err(_) => Err(JsonError::malformed(start, format!("invalid number '{}'", text))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    /// Records events as strings.
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        bytes: usize,
    }

    impl Handler for Recorder {
        fn start_object(&mut self) -> Result<()> {
            self.events.push("{".to_string());
            Ok(())
        }

        fn key(&mut self, name: &str) -> Result<()> {
            self.events.push(format!("key:{}", name));
            Ok(())
        }

        fn end_object(&mut self) -> Result<()> {
            self.events.push("}".to_string());
            Ok(())
        }

        fn start_array(&mut self) -> Result<()> {
            self.events.push("[".to_string());
            Ok(())
        }

        fn end_array(&mut self) -> Result<()> {
            self.events.push("]".to_string());
            Ok(())
        }

        fn scalar(&mut self, value: Scalar<'_>) -> Result<()> {
            let text = match value {
                Scalar::Null => "null".to_string(),
                Scalar::Bool(b) => b.to_string(),
                Scalar::Int(n) => format!("i{}", n),
                Scalar::Uint(n) => format!("u{}", n),
                Scalar::Float(n) => format!("f{}", n),
                Scalar::Str(s) => format!("s:{}", s),
            };
            self.events.push(text);
            Ok(())
        }

        fn consumed(&mut self, bytes: usize) -> Result<()> {
            self.bytes += bytes;
            Ok(())
        }
    }

    fn events(json: &str) -> Vec<String> {
        let mut recorder = Recorder::default();
        Reader::new().parse_str(json, &mut recorder).unwrap();
        recorder.events
    }

    fn error_kind(json: &str) -> ErrorKind {
        let mut recorder = Recorder::default();
        Reader::new().parse_str(json, &mut recorder).unwrap_err().kind()
    }

    #[test]
    fn test_parse_simple_object() {
        assert_eq!(
            events(r#"{ "id" : 100, "name" : "John" }"#),
            vec!["{", "key:id", "u100", "key:name", "s:John", "}"]
        );
    }

    #[test]
    fn test_parse_nested() {
        assert_eq!(
            events(r#"{"a":[1,{"b":null}],"c":{}}"#),
            vec!["{", "key:a", "[", "u1", "{", "key:b", "null", "}", "]", "key:c", "{", "}", "}"]
        );
    }

    #[test]
    fn test_parse_empty_containers() {
        assert_eq!(events("[]"), vec!["[", "]"]);
        assert_eq!(events(" { } "), vec!["{", "}"]);
        assert_eq!(events("[[],[]]"), vec!["[", "[", "]", "[", "]", "]"]);
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(
            events("[0,-1,42,3.14,-2.5e3,1E2]"),
            vec!["[", "u0", "i-1", "u42", "f3.14", "f-2500", "f100", "]"]
        );
    }

    #[test]
    fn test_integer_overflow_becomes_float() {
        assert_eq!(events("18446744073709551615"), vec!["u18446744073709551615"]);
        assert_eq!(events("18446744073709551616"), vec!["f18446744073709552000"]);
        assert_eq!(events("-9223372036854775809"), vec!["f-9223372036854776000"]);
    }

    #[test]
    fn test_float_overflow_is_rejected() {
        assert_eq!(events("[1e308,-1e308]").len(), 4);

        let mut recorder = Recorder::default();
        let err = Reader::new().parse_str("[1e400]", &mut recorder).unwrap_err();
        assert!(matches!(
            err,
            JsonError::MalformedInput { offset: 1, ref reason } if reason.contains("out of range")
        ));
        assert_eq!(error_kind("-1e400"), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(events("[true,false,null]"), vec!["[", "true", "false", "null", "]"]);
    }

    #[test]
    fn test_parse_string_escapes() {
        assert_eq!(events(r#""Hello\nWorld""#), vec!["s:Hello\nWorld"]);
        assert_eq!(events(r#""a\"b\\c\/d""#), vec!["s:a\"b\\c/d"]);
        assert_eq!(events(r#""éA""#), vec!["s:éA"]);
        assert_eq!(events(r#""😀""#), vec!["s:😀"]);
        assert_eq!(events("\"ñ—\""), vec!["s:ñ—"]);
    }

    #[test]
    fn test_counts_every_byte() {
        let json = " {\"a\" : [1, 2]} \n";
        let mut recorder = Recorder::default();
        Reader::new().parse_str(json, &mut recorder).unwrap();
        assert_eq!(recorder.bytes, json.len());
    }

    #[test]
    fn test_invalid_json() {
        assert_eq!(error_kind(""), ErrorKind::MalformedInput);
        assert_eq!(error_kind("{"), ErrorKind::MalformedInput);
        assert_eq!(error_kind(r#""unterminated"#), ErrorKind::MalformedInput);
        assert_eq!(error_kind("invalid"), ErrorKind::MalformedInput);
        assert_eq!(error_kind("[1,]"), ErrorKind::MalformedInput);
        assert_eq!(error_kind(r#"{"a":1,}"#), ErrorKind::MalformedInput);
        assert_eq!(error_kind(r#"{"a" 1}"#), ErrorKind::MalformedInput);
        assert_eq!(error_kind("[1 2]"), ErrorKind::MalformedInput);
        assert_eq!(error_kind("01"), ErrorKind::MalformedInput);
        assert_eq!(error_kind("1."), ErrorKind::MalformedInput);
        assert_eq!(error_kind("-"), ErrorKind::MalformedInput);
        assert_eq!(error_kind("NaN"), ErrorKind::MalformedInput);
        assert_eq!(error_kind("[1] // comment"), ErrorKind::MalformedInput);
        assert_eq!(error_kind("\"tab\there\""), ErrorKind::MalformedInput);
        assert_eq!(error_kind(r#""\x""#), ErrorKind::MalformedInput);
        assert_eq!(error_kind(r#""\udc00""#), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_trailing_characters() {
        let mut recorder = Recorder::default();
        let err = Reader::new()
            .parse_str(r#"{"key": "value"} extra"#, &mut recorder)
            .unwrap_err();
        assert!(matches!(err, JsonError::MalformedInput { offset: 17, .. }));
    }

    #[test]
    fn test_depth_limit() {
        let mut recorder = Recorder::default();
        let err = Reader::with_max_depth(3)
            .parse_str("[[[[1]]]]", &mut recorder)
            .unwrap_err();
        assert!(matches!(
            err,
            JsonError::ResourceLimitExceeded {
                resource: "depth",
                limit: 3,
                ..
            }
        ));

        let mut recorder = Recorder::default();
        assert!(Reader::with_max_depth(3)
            .parse_str("[[[1]]]", &mut recorder)
            .is_ok());
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        let depth = 100_000;
        let json = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let mut recorder = Recorder::default();
        Reader::with_max_depth(depth).parse_str(&json, &mut recorder).unwrap();
        assert_eq!(recorder.events.len(), depth * 2);
    }

    #[test]
    fn test_source_read_failure() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            }
        }
        let mut recorder = Recorder::default();
        let err = Reader::new().parse(Failing, &mut recorder).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SourceReadFailure);
    }
}
