//! Collection handle: lifecycle, index management, writes and reads
//!
//! Every function copies its inputs into native values before calling the
//! engine and converts the engine's result through [`CStatus`]. Batch writes
//! report the first failing item; the `*_with_results` variants also write one
//! status code per item.

use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;
use std::sync::Arc;
use tracing::debug;
use zvec_core::{check_index_fits, CollectionOptions, Doc, Result};
use zvec_engine::{BatchResults, Collection};

use crate::descriptor::{CCollectionOptions, CCollectionStats, CFieldDef};
use crate::document::DocHandle;
use crate::ffi::{slice_arg, str_arg, string_array_arg, to_cstring};
use crate::params::build_index_params;
use crate::query::QueryHandle;
use crate::result::ResultHandle;
use crate::schema::SchemaHandle;
use crate::status::{invalid_arg, item_code, CStatus};

/// Opaque collection handle (`zvec_collection_handle_t`)
///
/// Handles opened on the same path share one engine instance.
#[derive(Debug)]
pub struct CollectionHandle {
    collection: Arc<Collection>,
    path_cache: CString,
}

impl CollectionHandle {
    fn new(collection: Arc<Collection>, path: &str) -> Self {
        CollectionHandle {
            collection,
            path_cache: to_cstring(path),
        }
    }

    /// Borrow the engine collection
    pub fn collection(&self) -> &Arc<Collection> {
        &self.collection
    }
}

type BatchWrite = fn(&Collection, &[Doc]) -> Result<BatchResults>;

unsafe fn options_arg(options: *const CCollectionOptions) -> Option<CollectionOptions> {
    options.as_ref().map(CollectionOptions::from)
}

/// Publish a new handle through `out`
unsafe fn emit(
    out: *mut *mut CollectionHandle,
    result: Result<Arc<Collection>>,
    path: &str,
) -> CStatus {
    match result {
        Ok(collection) => {
            let handle = Box::into_raw(Box::new(CollectionHandle::new(collection, path)));
            debug!(target: "zvec::ffi", path, ?handle, "Created collection handle");
            *out = handle;
            CStatus::ok()
        }
        Err(e) => CStatus::from_error(&e),
    }
}

/// Write per-item codes, then summarize
unsafe fn report(result: Result<BatchResults>, out_codes: *mut i32) -> CStatus {
    let results = match result {
        Ok(results) => results,
        Err(e) => return CStatus::from_error(&e),
    };
    if !out_codes.is_null() {
        let codes = std::slice::from_raw_parts_mut(out_codes, results.len());
        for (code, result) in codes.iter_mut().zip(&results) {
            *code = item_code(result);
        }
    }
    CStatus::first_failure(&results)
}

unsafe fn write_docs(
    handle: *const CollectionHandle,
    docs: *const *mut DocHandle,
    count: usize,
    out_codes: *mut i32,
    name: &'static str,
    op: BatchWrite,
) -> CStatus {
    let Some(handle) = handle.as_ref() else {
        return invalid_arg!("null collection handle");
    };
    if count == 0 {
        return CStatus::ok();
    }
    let Some(entries) = slice_arg(docs, count) else {
        return invalid_arg!("null document array");
    };
    let mut batch = Vec::with_capacity(count);
    for &entry in entries {
        let Some(doc) = entry.as_ref() else {
            return invalid_arg!("null document in batch");
        };
        batch.push(doc.doc.clone());
    }
    debug!(target: "zvec::ffi", op = name, count, "Batch write");
    report(op(handle.collection.as_ref(), &batch), out_codes)
}

unsafe fn delete_ids(
    handle: *const CollectionHandle,
    ids: *const *const c_char,
    count: usize,
    out_codes: *mut i32,
) -> CStatus {
    let Some(handle) = handle.as_ref() else {
        return invalid_arg!("null collection handle");
    };
    if count == 0 {
        return CStatus::ok();
    }
    let Some(ids) = string_array_arg(ids, count) else {
        return invalid_arg!("primary key is null or not valid UTF-8");
    };
    debug!(target: "zvec::ffi", op = "delete", count, "Batch write");
    report(handle.collection.delete(ids.as_slice()), out_codes)
}

// =========================================================================
// Lifecycle
// =========================================================================

/// Create a collection at `path` and open it
///
/// `options` may be null for defaults. On success `*out` receives a new
/// handle; on failure `*out` is left untouched.
///
/// # Safety
/// `path` must be null or a NUL-terminated string; `schema` null or a live
/// schema handle; `options` null or a valid options struct; `out` null or
/// valid for one write.
#[no_mangle]
pub unsafe extern "C" fn zvec_collection_create_and_open(
    path: *const c_char,
    schema: *const SchemaHandle,
    options: *const CCollectionOptions,
    out: *mut *mut CollectionHandle,
) -> CStatus {
    if path.is_null() || out.is_null() {
        return invalid_arg!("null argument");
    }
    let Some(schema) = schema.as_ref() else {
        return invalid_arg!("null schema");
    };
    let Some(path) = str_arg(path) else {
        return invalid_arg!("path is not valid UTF-8");
    };
    let options = options_arg(options).unwrap_or_default();
    debug!(target: "zvec::ffi", path, schema = schema.schema.name(), "Creating collection");
    emit(
        out,
        Collection::create_and_open(path, schema.schema.clone(), options),
        path,
    )
}

/// Open an existing collection
///
/// Non-null `options` override the stored ones for this session.
///
/// # Safety
/// See [`zvec_collection_create_and_open`].
#[no_mangle]
pub unsafe extern "C" fn zvec_collection_open(
    path: *const c_char,
    options: *const CCollectionOptions,
    out: *mut *mut CollectionHandle,
) -> CStatus {
    if path.is_null() || out.is_null() {
        return invalid_arg!("null argument");
    }
    let Some(path) = str_arg(path) else {
        return invalid_arg!("path is not valid UTF-8");
    };
    debug!(target: "zvec::ffi", path, "Opening collection");
    emit(out, Collection::open(path, options_arg(options)), path)
}

/// Release a collection handle; the persisted data is kept
///
/// # Safety
/// `handle` must be null or a live collection handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_collection_destroy(handle: *mut CollectionHandle) {
    if !handle.is_null() {
        debug!(target: "zvec::ffi", ?handle, "Destroying collection handle");
        drop(Box::from_raw(handle));
    }
}

/// Erase the collection's persisted data
///
/// The handle stays allocated and must still be destroyed; every other
/// operation on it fails with `NOT_FOUND`.
///
/// # Safety
/// `handle` must be null or a live collection handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_collection_destroy_data(handle: *mut CollectionHandle) -> CStatus {
    let Some(handle) = handle.as_ref() else {
        return invalid_arg!("null collection handle");
    };
    debug!(target: "zvec::ffi", path = ?handle.collection.path(), "Destroying collection data");
    CStatus::from_result(&handle.collection.destroy_data())
}

/// Persist pending writes
///
/// # Safety
/// `handle` must be null or a live collection handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_collection_flush(handle: *mut CollectionHandle) -> CStatus {
    let Some(handle) = handle.as_ref() else {
        return invalid_arg!("null collection handle");
    };
    debug!(target: "zvec::ffi", path = ?handle.collection.path(), "Flush");
    CStatus::from_result(&handle.collection.flush())
}

/// Compact and persist the collection
///
/// # Safety
/// `handle` must be null or a live collection handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_collection_optimize(handle: *mut CollectionHandle) -> CStatus {
    let Some(handle) = handle.as_ref() else {
        return invalid_arg!("null collection handle");
    };
    debug!(target: "zvec::ffi", path = ?handle.collection.path(), "Optimize");
    CStatus::from_result(&handle.collection.optimize())
}

// =========================================================================
// Index management
// =========================================================================

/// Attach an index described by `def` to `field_name`
///
/// Only the index part of `def` is read. Vector families require a vector
/// field and `INVERT` requires a scalar one.
///
/// # Safety
/// `handle` must be null or a live collection handle; `field_name` null or a
/// NUL-terminated string; `def` null or a valid descriptor.
#[no_mangle]
pub unsafe extern "C" fn zvec_collection_create_index(
    handle: *mut CollectionHandle,
    field_name: *const c_char,
    def: *const CFieldDef,
) -> CStatus {
    let (Some(handle), Some(def)) = (handle.as_ref(), def.as_ref()) else {
        return invalid_arg!("null argument");
    };
    let Some(field) = str_arg(field_name) else {
        return invalid_arg!("field name is null or not valid UTF-8");
    };
    let Some(params) = build_index_params(def) else {
        return invalid_arg!("invalid index definition");
    };
    if let Some(schema_field) = handle.collection.schema().field(field) {
        if let Err(e) = check_index_fits(field, schema_field.data_type(), &params) {
            return CStatus::from_error(&e);
        }
    }
    debug!(target: "zvec::ffi", field, index = params.index_type().name(), "Creating index");
    CStatus::from_result(&handle.collection.create_index(field, params))
}

/// Remove the index attached to `field_name`
///
/// # Safety
/// `handle` must be null or a live collection handle; `field_name` null or a
/// NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn zvec_collection_drop_index(
    handle: *mut CollectionHandle,
    field_name: *const c_char,
) -> CStatus {
    let Some(handle) = handle.as_ref() else {
        return invalid_arg!("null collection handle");
    };
    let Some(field) = str_arg(field_name) else {
        return invalid_arg!("field name is null or not valid UTF-8");
    };
    debug!(target: "zvec::ffi", field, "Dropping index");
    CStatus::from_result(&handle.collection.drop_index(field))
}

// =========================================================================
// Writes
// =========================================================================

/// Insert documents; an existing primary key fails that item
///
/// A zero `count` is a no-op. A null entry rejects the whole batch before
/// anything is written.
///
/// # Safety
/// `handle` must be null or a live collection handle; `docs` null or valid
/// for `count` reads of document handles.
#[no_mangle]
pub unsafe extern "C" fn zvec_collection_insert(
    handle: *mut CollectionHandle,
    docs: *const *mut DocHandle,
    count: usize,
) -> CStatus {
    write_docs(handle, docs, count, ptr::null_mut(), "insert", Collection::insert)
}

/// Insert or replace documents
///
/// # Safety
/// See [`zvec_collection_insert`].
#[no_mangle]
pub unsafe extern "C" fn zvec_collection_upsert(
    handle: *mut CollectionHandle,
    docs: *const *mut DocHandle,
    count: usize,
) -> CStatus {
    write_docs(handle, docs, count, ptr::null_mut(), "upsert", Collection::upsert)
}

/// Merge fields into existing documents; a missing primary key fails that item
///
/// # Safety
/// See [`zvec_collection_insert`].
#[no_mangle]
pub unsafe extern "C" fn zvec_collection_update(
    handle: *mut CollectionHandle,
    docs: *const *mut DocHandle,
    count: usize,
) -> CStatus {
    write_docs(handle, docs, count, ptr::null_mut(), "update", Collection::update)
}

/// [`zvec_collection_insert`] with one status code per item in `out_codes`
///
/// # Safety
/// As [`zvec_collection_insert`]; `out_codes` must be null or valid for
/// `count` writes.
#[no_mangle]
pub unsafe extern "C" fn zvec_collection_insert_with_results(
    handle: *mut CollectionHandle,
    docs: *const *mut DocHandle,
    count: usize,
    out_codes: *mut i32,
) -> CStatus {
    write_docs(handle, docs, count, out_codes, "insert", Collection::insert)
}

/// [`zvec_collection_upsert`] with one status code per item in `out_codes`
///
/// # Safety
/// See [`zvec_collection_insert_with_results`].
#[no_mangle]
pub unsafe extern "C" fn zvec_collection_upsert_with_results(
    handle: *mut CollectionHandle,
    docs: *const *mut DocHandle,
    count: usize,
    out_codes: *mut i32,
) -> CStatus {
    write_docs(handle, docs, count, out_codes, "upsert", Collection::upsert)
}

/// [`zvec_collection_update`] with one status code per item in `out_codes`
///
/// # Safety
/// See [`zvec_collection_insert_with_results`].
#[no_mangle]
pub unsafe extern "C" fn zvec_collection_update_with_results(
    handle: *mut CollectionHandle,
    docs: *const *mut DocHandle,
    count: usize,
    out_codes: *mut i32,
) -> CStatus {
    write_docs(handle, docs, count, out_codes, "update", Collection::update)
}

/// Delete documents by primary key; a missing key fails that item
///
/// # Safety
/// `handle` must be null or a live collection handle; `ids` null or valid for
/// `count` reads of NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn zvec_collection_delete(
    handle: *mut CollectionHandle,
    ids: *const *const c_char,
    count: usize,
) -> CStatus {
    delete_ids(handle, ids, count, ptr::null_mut())
}

/// [`zvec_collection_delete`] with one status code per item in `out_codes`
///
/// # Safety
/// As [`zvec_collection_delete`]; `out_codes` must be null or valid for
/// `count` writes.
#[no_mangle]
pub unsafe extern "C" fn zvec_collection_delete_with_results(
    handle: *mut CollectionHandle,
    ids: *const *const c_char,
    count: usize,
    out_codes: *mut i32,
) -> CStatus {
    delete_ids(handle, ids, count, out_codes)
}

/// Delete every document matching a filter expression
///
/// # Safety
/// `handle` must be null or a live collection handle; `filter` null or a
/// NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn zvec_collection_delete_by_filter(
    handle: *mut CollectionHandle,
    filter: *const c_char,
) -> CStatus {
    let Some(handle) = handle.as_ref() else {
        return invalid_arg!("null collection handle");
    };
    let Some(filter) = str_arg(filter) else {
        return invalid_arg!("filter is null or not valid UTF-8");
    };
    debug!(target: "zvec::ffi", filter, "Delete by filter");
    CStatus::from_result(&handle.collection.delete_by_filter(filter))
}

// =========================================================================
// Reads
// =========================================================================

/// Run a similarity query
///
/// On success `*out_result` receives a result ordered by descending score.
///
/// # Safety
/// `handle` and `query` must be null or live handles; `out_result` null or
/// valid for one write.
#[no_mangle]
pub unsafe extern "C" fn zvec_collection_query(
    handle: *mut CollectionHandle,
    query: *const QueryHandle,
    out_result: *mut *mut ResultHandle,
) -> CStatus {
    let (Some(handle), Some(query)) = (handle.as_ref(), query.as_ref()) else {
        return invalid_arg!("null argument");
    };
    if out_result.is_null() {
        return invalid_arg!("null argument");
    }
    debug!(
        target: "zvec::ffi",
        field = %query.query.field_name,
        topk = query.query.topk,
        "Query"
    );
    match handle.collection.query(&query.query) {
        Ok(docs) => {
            *out_result = ResultHandle::into_raw(docs);
            CStatus::ok()
        }
        Err(e) => CStatus::from_error(&e),
    }
}

/// Fetch documents by primary key in request order; missing keys are skipped
///
/// A zero `count` fetches every document in primary key order.
///
/// # Safety
/// `handle` must be null or a live collection handle; `ids` null or valid for
/// `count` reads of NUL-terminated strings; `out_result` null or valid for
/// one write.
#[no_mangle]
pub unsafe extern "C" fn zvec_collection_fetch(
    handle: *mut CollectionHandle,
    ids: *const *const c_char,
    count: usize,
    out_result: *mut *mut ResultHandle,
) -> CStatus {
    let Some(handle) = handle.as_ref() else {
        return invalid_arg!("null collection handle");
    };
    if out_result.is_null() {
        return invalid_arg!("null argument");
    }
    let Some(ids) = string_array_arg(ids, count) else {
        return invalid_arg!("primary key is null or not valid UTF-8");
    };
    debug!(target: "zvec::ffi", count, "Fetch");
    match handle.collection.fetch(ids.as_slice()) {
        Ok(docs) => {
            *out_result = ResultHandle::into_raw(docs);
            CStatus::ok()
        }
        Err(e) => CStatus::from_error(&e),
    }
}

/// Path the collection was opened with, borrowed from the handle
///
/// # Safety
/// `handle` must be null or a live collection handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_collection_get_path(
    handle: *const CollectionHandle,
) -> *const c_char {
    handle.as_ref().map_or(ptr::null(), |h| h.path_cache.as_ptr())
}

/// Copy of the collection's current schema as a new schema handle
///
/// The caller destroys the returned handle. Null for a null handle.
///
/// # Safety
/// `handle` must be null or a live collection handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_collection_get_schema(
    handle: *const CollectionHandle,
) -> *mut SchemaHandle {
    match handle.as_ref() {
        Some(handle) => Box::into_raw(Box::new(SchemaHandle::new(handle.collection.schema()))),
        None => ptr::null_mut(),
    }
}

/// Write collection statistics into `out`
///
/// # Safety
/// `handle` must be null or a live collection handle; `out` null or valid for
/// one write.
#[no_mangle]
pub unsafe extern "C" fn zvec_collection_get_stats(
    handle: *const CollectionHandle,
    out: *mut CCollectionStats,
) -> CStatus {
    let (Some(handle), Some(out)) = (handle.as_ref(), out.as_mut()) else {
        return invalid_arg!("null argument");
    };
    match handle.collection.stats() {
        Ok(stats) => {
            *out = CCollectionStats::from(stats);
            CStatus::ok()
        }
        Err(e) => CStatus::from_error(&e),
    }
}
