//! Collection options and statistics

use serde::{Deserialize, Serialize};

/// Default maximum documents per segment
pub const DEFAULT_SEGMENT_MAX_DOCS: u32 = 1_000_000;

/// Options for creating or opening a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionOptions {
    /// Maximum number of documents per segment
    #[serde(default = "default_segment_max_docs")]
    pub segment_max_docs: u32,
    /// Index build threads (0 = auto)
    #[serde(default)]
    pub index_build_parallel: u32,
    /// Persist after every write operation
    #[serde(default = "default_auto_flush")]
    pub auto_flush: bool,
}

fn default_segment_max_docs() -> u32 {
    DEFAULT_SEGMENT_MAX_DOCS
}

fn default_auto_flush() -> bool {
    true
}

impl Default for CollectionOptions {
    fn default() -> Self {
        CollectionOptions {
            segment_max_docs: DEFAULT_SEGMENT_MAX_DOCS,
            index_build_parallel: 0,
            auto_flush: true,
        }
    }
}

/// Point-in-time collection statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollectionStats {
    /// Live documents
    pub doc_count: u64,
    /// Segments the documents occupy
    pub segment_count: u32,
    /// Fields with an index attached
    pub indexed_field_count: u32,
}

impl CollectionStats {
    /// Derive statistics from counts and the segment size
    pub fn compute(doc_count: u64, segment_max_docs: u32, indexed_field_count: u32) -> Self {
        let per_segment = u64::from(segment_max_docs.max(1));
        CollectionStats {
            doc_count,
            segment_count: doc_count.div_ceil(per_segment) as u32,
            indexed_field_count,
        }
    }
}
