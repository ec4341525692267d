//! Source locations for tokens and diagnostics.
//!
//! Resolution never reads files; it only carries the spans the parser
//! attached to tokens so that diagnostics can point back at them.

use serde::Serialize;
use std::num::NonZeroU32;

/// Identifies one source buffer (a file or a synthesized buffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceId(NonZeroU32);

impl SourceId {
    /// Buffer holding compiler-provided declarations.
    pub const BUILTIN: SourceId = SourceId(NonZeroU32::MIN);

    pub fn new(id: u32) -> Option<Self> {
        NonZeroU32::new(id).map(SourceId)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

/// Byte range inside one source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceSpan {
    pub source_id: SourceId,
    pub offset: u32,
    pub length: u32,
}

impl Default for SourceSpan {
    fn default() -> Self {
        Self::empty()
    }
}

impl SourceSpan {
    pub fn new_with_length(source_id: SourceId, offset: u32, length: u32) -> Self {
        SourceSpan {
            source_id,
            offset,
            length,
        }
    }

    /// Zero-length span in the builtin buffer, for errors with no token.
    pub fn empty() -> Self {
        Self::new_with_length(SourceId::BUILTIN, 0, 0)
    }

    pub fn start(&self) -> u32 {
        self.offset
    }

    pub fn end(&self) -> u32 {
        self.offset.saturating_add(self.length)
    }

    pub fn len(&self) -> u32 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

impl std::fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}..{}", self.source_id.get(), self.start(), self.end())
    }
}
