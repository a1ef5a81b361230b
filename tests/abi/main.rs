//! C Surface Integration Tests
//!
//! Drives the exported `zvec_*` functions the way a C caller would:
//! raw handles, NUL-terminated strings, status records.

#[path = "../common/mod.rs"]
mod common;

mod collection_lifecycle;
mod end_to_end;
mod handle_safety;
mod index_params;
