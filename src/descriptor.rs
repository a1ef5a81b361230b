//! Plain-old-data descriptors shared with C callers

use std::os::raw::{c_char, c_int};
use std::ptr;
use zvec_core::{CollectionOptions, CollectionStats, DEFAULT_SEGMENT_MAX_DOCS};

/// `zvec_field_def_t`: one field, optionally with index parameters
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CFieldDef {
    /// Field name (borrowed)
    pub name: *const c_char,
    /// `DataType` tag
    pub data_type: i32,
    /// Vector dimension, 0 for scalars
    pub dimension: i32,
    /// Non-zero if nulls are accepted
    pub nullable: c_int,
    /// `IndexType` tag, 0 for no index
    pub index_type: i32,
    /// `MetricType` tag
    pub metric_type: i32,
    /// HNSW graph degree, 0 for default
    pub m: i32,
    /// HNSW construction breadth, 0 for default
    pub ef_construction: i32,
    /// IVF list count, 0 for default
    pub n_lists: i32,
    /// `QuantizeType` tag
    pub quantize_type: i32,
}

impl CFieldDef {
    /// All-zero descriptor with a null name
    pub const fn empty() -> Self {
        CFieldDef {
            name: ptr::null(),
            data_type: 0,
            dimension: 0,
            nullable: 0,
            index_type: 0,
            metric_type: 0,
            m: 0,
            ef_construction: 0,
            n_lists: 0,
            quantize_type: 0,
        }
    }
}

/// `zvec_collection_options_t`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CCollectionOptions {
    /// Maximum documents per segment, 0 for default
    pub segment_max_docs: i32,
    /// Index build threads, 0 for auto
    pub index_build_parallel: i32,
    /// Non-zero to persist after every write
    pub auto_flush: c_int,
}

impl From<&CCollectionOptions> for CollectionOptions {
    fn from(c: &CCollectionOptions) -> Self {
        CollectionOptions {
            segment_max_docs: if c.segment_max_docs > 0 {
                c.segment_max_docs as u32
            } else {
                DEFAULT_SEGMENT_MAX_DOCS
            },
            index_build_parallel: c.index_build_parallel.max(0) as u32,
            auto_flush: c.auto_flush != 0,
        }
    }
}

/// `zvec_query_def_t`: a complete query in one struct
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CQueryDef {
    /// Result count
    pub topk: i32,
    /// Target vector field (borrowed)
    pub field_name: *const c_char,
    /// Query vector (borrowed)
    pub vector_data: *const f32,
    /// Query vector length
    pub vector_len: usize,
    /// Filter expression, may be null
    pub filter: *const c_char,
    /// Non-zero to return vector fields
    pub include_vector: c_int,
    /// Accepted for layout compatibility; primary keys are always returned
    pub include_doc_id: c_int,
    /// Output projection, may be null
    pub output_fields: *const *const c_char,
    /// Number of entries in `output_fields`
    pub output_fields_count: usize,
    /// `IndexType` tag selecting search parameters, 0 for none
    pub index_type: i32,
    /// HNSW search breadth, 0 for default
    pub ef_search: i32,
    /// IVF probe count, 0 for default
    pub n_probe: i32,
}

/// `zvec_collection_stats_t`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CCollectionStats {
    /// Live documents
    pub doc_count: u64,
    /// Segments in use
    pub segment_count: u32,
    /// Fields carrying an index
    pub indexed_field_count: u32,
}

impl From<CollectionStats> for CCollectionStats {
    fn from(s: CollectionStats) -> Self {
        CCollectionStats {
            doc_count: s.doc_count,
            segment_count: s.segment_count,
            indexed_field_count: s.indexed_field_count,
        }
    }
}
