//! Per-call options for serialization and deserialization.

use logging::Logger;

/// Default ceiling on object/array nesting while parsing.
///
/// The deserializer re-walks the open path from the root for every event,
/// so each event costs time proportional to the current depth. Keep this
/// low for untrusted bodies.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options for one serialization call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Omit record members holding an empty string or an empty sequence.
    pub ignore_empty_members: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            ignore_empty_members: true,
        }
    }
}

impl SerializeOptions {
    pub fn ignore_empty_members(mut self, ignore: bool) -> Self {
        self.ignore_empty_members = ignore;
        self
    }
}

/// Options for one deserialization call.
#[derive(Clone)]
pub struct DeserializeOptions {
    /// Maximum number of input bytes consumed; `None` is unlimited.
    pub max_bytes: Option<usize>,
    /// Maximum object/array nesting depth.
    pub max_depth: usize,
    /// Receives diagnostics about skipped members and aborted parses.
    pub logger: Option<Logger>,
}

impl Default for DeserializeOptions {
    fn default() -> Self {
        Self {
            max_bytes: None,
            max_depth: DEFAULT_MAX_DEPTH,
            logger: None,
        }
    }
}

impl DeserializeOptions {
    pub fn max_bytes(mut self, limit: usize) -> Self {
        self.max_bytes = Some(limit);
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }
}

impl std::fmt::Debug for DeserializeOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeserializeOptions")
            .field("max_bytes", &self.max_bytes)
            .field("max_depth", &self.max_depth)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}
