//! Append-only output destinations for serialized JSON.

use std::io::{self, Write};

/// An append-only destination for serialized text.
///
/// Implemented for in-memory buffers, and for any [`Write`] through
/// [`WriteSink`].
pub trait Sink {
    /// Appends `text` to the destination.
    fn write_text(&mut self, text: &str) -> io::Result<()>;
}

impl Sink for String {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.push_str(text);
        Ok(())
    }
}

impl Sink for Vec<u8> {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.extend_from_slice(text.as_bytes());
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        (**self).write_text(text)
    }
}

/// Adapts an [`io::Write`] (socket, file, request body stream) into a [`Sink`].
#[derive(Debug)]
pub struct WriteSink<W> {
    writer: W,
    written: usize,
}

impl<W: Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of bytes handed to the writer so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes and returns the wrapped writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> Sink for WriteSink<W> {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.written += text.len();
        Ok(())
    }
}
