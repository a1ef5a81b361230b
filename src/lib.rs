//! zvec - C ABI for an in-process vector store
//!
//! Exposes collections, documents, schemas, and similarity queries through a
//! flat `extern "C"` surface declared in `include/zvec.h`.
//!
//! # Quick Start (C)
//!
//! ```c
//! zvec_schema_handle_t schema = zvec_schema_create("docs");
//! zvec_field_def_t emb = { .name = "emb", .data_type = ZVEC_DATA_TYPE_VECTOR_FP32,
//!                          .dimension = 4, .index_type = ZVEC_INDEX_TYPE_FLAT };
//! zvec_schema_add_vector_field(schema, &emb);
//!
//! zvec_collection_handle_t coll = NULL;
//! zvec_status_t st = zvec_collection_create_and_open("./data", schema, NULL, &coll);
//! zvec_schema_destroy(schema);
//! ```
//!
//! # Handles
//!
//! Every `*_create` / `*_open` returns an owning pointer the caller releases
//! exactly once with the matching `*_destroy`. Documents lent out by a result
//! belong to the result. Strings returned by accessors are borrowed until the
//! next string-returning call on the same handle.
//!
//! # Status
//!
//! Fallible calls return a [`CStatus`]: code 0 with a null message on success.
//! Engine failures keep their [`StatusCode`]; argument checks at the boundary
//! report `INVALID_ARGUMENT` with a static message.
//!
//! Native types live in `zvec-core`; the storage engine in `zvec-engine`.

#![warn(clippy::all)]
#![allow(clippy::missing_safety_doc)]

pub mod collection;
pub mod descriptor;
pub mod document;
mod ffi;
pub mod logging;
pub mod params;
pub mod query;
pub mod result;
pub mod schema;
pub mod status;

pub use collection::CollectionHandle;
pub use descriptor::{CCollectionOptions, CCollectionStats, CFieldDef, CQueryDef};
pub use document::DocHandle;
pub use logging::init_logging;
pub use params::{build_field_schema, build_index_params};
pub use query::QueryHandle;
pub use result::ResultHandle;
pub use schema::SchemaHandle;
pub use status::CStatus;
pub use zvec_core::StatusCode;

use std::os::raw::c_char;

/// Library version as a static NUL-terminated string
#[no_mangle]
pub extern "C" fn zvec_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}
