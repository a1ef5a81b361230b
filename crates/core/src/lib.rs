//! Core types for zvec
//!
//! This crate defines the native values the C boundary marshals to and from:
//! - DataType, IndexType, MetricType, QuantizeType: stable integer tags
//! - FieldValue: typed field value (scalars, dense and sparse vectors)
//! - Doc: primary key, score, and field map
//! - FieldSchema / CollectionSchema: field definitions
//! - IndexParams / QueryParams: per-family index and search parameters
//! - VectorQuery: similarity query descriptor
//! - CollectionOptions / CollectionStats
//! - Error / StatusCode: error hierarchy and wire codes

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod doc;
pub mod error;
pub mod options;
pub mod params;
pub mod query;
pub mod schema;
pub mod types;
pub mod value;

pub use doc::Doc;
pub use error::{Error, Result, StatusCode};
pub use options::{CollectionOptions, CollectionStats, DEFAULT_SEGMENT_MAX_DOCS};
pub use params::{
    IndexParams, QueryParams, DEFAULT_HNSW_EF_CONSTRUCTION, DEFAULT_HNSW_EF_SEARCH,
    DEFAULT_HNSW_M, DEFAULT_IVF_NPROBE, DEFAULT_IVF_N_ITERS, DEFAULT_IVF_N_LIST,
};
pub use query::{decode_vector, encode_vector, VectorQuery, DEFAULT_TOPK};
pub use schema::{check_index_fits, CollectionSchema, FieldSchema};
pub use types::{DataType, IndexType, MetricType, QuantizeType};
pub use value::{FieldValue, FromFieldValue};
