//! Low-level JSON emission onto a [`Sink`].

use crate::error::{JsonError, Result};
use crate::options::SerializeOptions;
use crate::sink::Sink;

/// Emits JSON tokens to a borrowed sink.
///
/// Created once per serialization call; [`Serialize`](crate::Serialize)
/// implementations drive it.
pub struct Serializer<'a> {
    sink: &'a mut dyn Sink,
    options: SerializeOptions,
}

impl<'a> Serializer<'a> {
    pub fn new(sink: &'a mut dyn Sink, options: SerializeOptions) -> Self {
        Self { sink, options }
    }

    /// Options in effect for this call.
    pub fn options(&self) -> &SerializeOptions {
        &self.options
    }

    /// Writes `text` verbatim.
    pub fn write_raw(&mut self, text: &str) -> Result<()> {
        self.sink
            .write_text(text)
            .map_err(JsonError::SinkWriteFailure)
    }

    pub fn write_null(&mut self) -> Result<()> {
        self.write_raw("null")
    }

    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_raw(if value { "true" } else { "false" })
    }

    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.write_raw(&value.to_string())
    }

    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.write_raw(&value.to_string())
    }

    /// Writes the shortest representation that parses back to `value`.
    /// Non-finite values have no JSON literal and are written as `null`.
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        match format_f64(value) {
            Some(text) => self.write_raw(&text),
            None => self.write_null(),
        }
    }

    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        match format_f32(value) {
            Some(text) => self.write_raw(&text),
            None => self.write_null(),
        }
    }

    /// Writes `value` as a quoted, escaped JSON string.
    pub fn write_str(&mut self, value: &str) -> Result<()> {
        self.write_raw("\"")?;
        let mut start = 0;
        for (index, ch) in value.char_indices() {
            let escaped = match ch {
                '"' => "\\\"",
                '\\' => "\\\\",
                '\x08' => "\\b",
                '\x0C' => "\\f",
                '\n' => "\\n",
                '\r' => "\\r",
                '\t' => "\\t",
                ch if (ch as u32) < 0x20 => {
                    self.write_raw(&value[start..index])?;
                    self.write_raw(&format!("\\u{:04x}", ch as u32))?;
                    start = index + 1;
                    continue;
                }
                _ => continue,
            };
            self.write_raw(&value[start..index])?;
            self.write_raw(escaped)?;
            start = index + ch.len_utf8();
        }
        self.write_raw(&value[start..])?;
        self.write_raw("\"")
    }

    /// Writes `"name":`.
    pub fn write_key(&mut self, name: &str) -> Result<()> {
        self.write_str(name)?;
        self.write_raw(":")
    }
}

macro_rules! float_formatter {
    ($name:ident, $ty:ty) => {
        fn $name(value: $ty) -> Option<String> {
            if !value.is_finite() {
                return None;
            }
            let magnitude = value.abs();
            if magnitude == 0.0 || (1e-5..1e16).contains(&magnitude) {
                Some(format!("{}", value))
            } else {
                Some(format!("{:e}", value))
            }
        }
    };
}

float_formatter!(format_f64, f64);
float_formatter!(format_f32, f32);
