//! Byte budget enforcement for parses of untrusted input.

use crate::error::{JsonError, Result};
use crate::parser::{Handler, Scalar};
use logging::Logger;

/// Wraps a [`Handler`] and aborts the parse once more than `limit` input
/// bytes have been read.
///
/// Bytes are counted as the tokenizer reads them, so an oversized string or
/// number is rejected while it is still being read, not after it has been
/// buffered in full.
pub struct ResourceGuard<H> {
    inner: H,
    limit: Option<usize>,
    consumed: usize,
    logger: Option<Logger>,
}

impl<H: Handler> ResourceGuard<H> {
    /// `limit` of `None` means unlimited.
    pub fn new(inner: H, limit: Option<usize>) -> Self {
        Self {
            inner,
            limit,
            consumed: 0,
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Option<Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Bytes read so far.
    pub fn bytes_consumed(&self) -> usize {
        self.consumed
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H: Handler> Handler for ResourceGuard<H> {
    fn start_object(&mut self) -> Result<()> {
        self.inner.start_object()
    }

    fn key(&mut self, name: &str) -> Result<()> {
        self.inner.key(name)
    }

    fn end_object(&mut self) -> Result<()> {
        self.inner.end_object()
    }

    fn start_array(&mut self) -> Result<()> {
        self.inner.start_array()
    }

    fn end_array(&mut self) -> Result<()> {
        self.inner.end_array()
    }

    fn scalar(&mut self, value: Scalar<'_>) -> Result<()> {
        self.inner.scalar(value)
    }

    fn consumed(&mut self, bytes: usize) -> Result<()> {
        self.consumed = self.consumed.saturating_add(bytes);
        if let Some(limit) = self.limit {
            if self.consumed > limit {
                if let Some(logger) = &self.logger {
                    logger.warn(&format!(
                        "Aborting parse: input exceeded limit of {} bytes",
                        limit
                    ));
                }
                return Err(JsonError::ResourceLimitExceeded {
                    resource: "bytes",
                    limit,
                    consumed: self.consumed,
                });
            }
        }
        self.inner.consumed(bytes)
    }
}
