//! Grid configuration.

/// Limits applied by an [`InfiniteGrid`](crate::InfiniteGrid).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridConfig {
    /// Maximum number of blocks a single object may cover.
    ///
    /// Insertion enumerates every covered block, so an unbounded object
    /// costs unbounded time and memory. `None` disables the check.
    pub max_object_span: Option<u64>,
}

impl GridConfig {
    /// Configuration that rejects objects covering more than `blocks` blocks.
    pub const fn with_max_object_span(blocks: u64) -> Self {
        Self {
            max_object_span: Some(blocks),
        }
    }
}
