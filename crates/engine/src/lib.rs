//! Reference engine for zvec
//!
//! This crate owns everything behind the C boundary:
//! - Collection: create/open/destroy, writes, index changes, query and fetch
//! - Registry: one in-memory instance per collection directory
//! - Config: `zvec.toml` options file
//! - Storage: `collection.snapshot` persistence
//! - Filter: scalar filter expressions
//! - Distance: similarity functions for exact search

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod config;
pub mod distance;
pub mod filter;
mod registry;
mod storage;

pub use collection::{BatchResults, Collection};
pub use config::CONFIG_FILE_NAME;
pub use filter::FilterExpr;
pub use storage::SNAPSHOT_FILE_NAME;
