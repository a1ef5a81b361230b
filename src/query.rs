//! Query handle: configure a similarity query before running it

use std::os::raw::{c_char, c_int};
use std::ptr;
use tracing::debug;
use zvec_core::{IndexType, QueryParams, Result, VectorQuery};

use crate::descriptor::CQueryDef;
use crate::ffi::{slice_arg, str_arg, string_array_arg};
use crate::status::{invalid_arg, CStatus};

/// Opaque query handle (`zvec_query_handle_t`)
#[derive(Debug, Default)]
pub struct QueryHandle {
    pub(crate) query: VectorQuery,
}

/// Run a setter that can fail only on a family mismatch
fn tune(result: Result<()>) -> CStatus {
    match result {
        Ok(()) => CStatus::ok(),
        Err(_) => invalid_arg!("unsupported for this index family"),
    }
}

/// Search-time parameters for a family tag
///
/// `Some(None)` for `UNDEFINED`, `None` for unknown tags and for families
/// without search parameters.
fn params_for(index_type: i32) -> Option<Option<QueryParams>> {
    match IndexType::from_i32(index_type)? {
        IndexType::Undefined => Some(None),
        family => QueryParams::default_for(family).map(Some),
    }
}

/// Create a query with default settings (top-k 10, no filter)
#[no_mangle]
pub extern "C" fn zvec_query_create() -> *mut QueryHandle {
    let handle = Box::into_raw(Box::new(QueryHandle::default()));
    debug!(target: "zvec::ffi", ?handle, "Created query handle");
    handle
}

/// Build a query from a flat definition
///
/// Returns null when `def` is null, carries a null vector with a non-zero
/// length, names an unknown index family, or sets a tunable the family does
/// not support. Zero tunables keep the family defaults.
///
/// # Safety
/// `def` must be null or point to a valid definition whose pointers satisfy
/// the same rules as the individual setters.
#[no_mangle]
pub unsafe extern "C" fn zvec_query_create_from_def(def: *const CQueryDef) -> *mut QueryHandle {
    let Some(def) = def.as_ref() else {
        return ptr::null_mut();
    };
    match query_from_def(def) {
        Some(query) => {
            let handle = Box::into_raw(Box::new(QueryHandle { query }));
            debug!(target: "zvec::ffi", ?handle, "Created query handle from definition");
            handle
        }
        None => ptr::null_mut(),
    }
}

unsafe fn query_from_def(def: &CQueryDef) -> Option<VectorQuery> {
    let mut query = VectorQuery::new();
    query.topk = def.topk;
    if !def.field_name.is_null() {
        query.field_name = str_arg(def.field_name)?.to_owned();
    }
    query.set_vector(slice_arg(def.vector_data, def.vector_len)?);
    if !def.filter.is_null() {
        let filter = str_arg(def.filter)?;
        query.filter = (!filter.is_empty()).then(|| filter.to_owned());
    }
    query.include_vector = def.include_vector != 0;
    if !def.output_fields.is_null() {
        query.output_fields = Some(string_array_arg(def.output_fields, def.output_fields_count)?);
    }
    query.query_params = params_for(def.index_type)?;
    if def.ef_search > 0 {
        query.set_ef_search(def.ef_search).ok()?;
    }
    if def.n_probe > 0 {
        query.set_n_probe(def.n_probe).ok()?;
    }
    Some(query)
}

/// Destroy a query handle
///
/// # Safety
/// `handle` must be null or a live query handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_query_destroy(handle: *mut QueryHandle) {
    if !handle.is_null() {
        debug!(target: "zvec::ffi", ?handle, "Destroying query handle");
        drop(Box::from_raw(handle));
    }
}

/// Set the number of results; checked when the query runs
///
/// # Safety
/// `handle` must be null or a live query handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_query_set_topk(handle: *mut QueryHandle, topk: i32) -> CStatus {
    let Some(handle) = handle.as_mut() else {
        return invalid_arg!("null query handle");
    };
    handle.query.topk = topk;
    CStatus::ok()
}

/// Set the target vector field
///
/// # Safety
/// `handle` must be null or a live query handle; `field_name` must be null or
/// a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn zvec_query_set_field_name(
    handle: *mut QueryHandle,
    field_name: *const c_char,
) -> CStatus {
    let Some(handle) = handle.as_mut() else {
        return invalid_arg!("null query handle");
    };
    let Some(field_name) = str_arg(field_name) else {
        return invalid_arg!("field name is null or not valid UTF-8");
    };
    handle.query.field_name = field_name.to_owned();
    CStatus::ok()
}

/// Copy the query vector
///
/// # Safety
/// `data` must be null or valid for `len` reads.
#[no_mangle]
pub unsafe extern "C" fn zvec_query_set_vector(
    handle: *mut QueryHandle,
    data: *const f32,
    len: usize,
) -> CStatus {
    let Some(handle) = handle.as_mut() else {
        return invalid_arg!("null query handle");
    };
    let Some(data) = slice_arg(data, len) else {
        return invalid_arg!("null vector data");
    };
    handle.query.set_vector(data);
    CStatus::ok()
}

/// Set the filter expression; null or empty clears it
///
/// The expression is parsed when the query runs.
///
/// # Safety
/// `filter` must be null or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn zvec_query_set_filter(
    handle: *mut QueryHandle,
    filter: *const c_char,
) -> CStatus {
    let Some(handle) = handle.as_mut() else {
        return invalid_arg!("null query handle");
    };
    if filter.is_null() {
        handle.query.filter = None;
        return CStatus::ok();
    }
    let Some(filter) = str_arg(filter) else {
        return invalid_arg!("filter is not valid UTF-8");
    };
    handle.query.filter = (!filter.is_empty()).then(|| filter.to_owned());
    CStatus::ok()
}

/// Return vector fields with each result when `include` is non-zero
///
/// # Safety
/// `handle` must be null or a live query handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_query_set_include_vector(
    handle: *mut QueryHandle,
    include: c_int,
) -> CStatus {
    let Some(handle) = handle.as_mut() else {
        return invalid_arg!("null query handle");
    };
    handle.query.include_vector = include != 0;
    CStatus::ok()
}

/// Project results onto `fields`; a null array clears the projection
///
/// # Safety
/// `fields` must be null or valid for `count` string pointers.
#[no_mangle]
pub unsafe extern "C" fn zvec_query_set_output_fields(
    handle: *mut QueryHandle,
    fields: *const *const c_char,
    count: usize,
) -> CStatus {
    let Some(handle) = handle.as_mut() else {
        return invalid_arg!("null query handle");
    };
    if fields.is_null() {
        handle.query.output_fields = None;
        return CStatus::ok();
    }
    let Some(fields) = string_array_arg(fields, count) else {
        return invalid_arg!("output field name is null or not valid UTF-8");
    };
    handle.query.output_fields = Some(fields);
    CStatus::ok()
}

/// Install default search parameters for an index family; 0 clears them
///
/// # Safety
/// `handle` must be null or a live query handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_query_set_index_type(
    handle: *mut QueryHandle,
    index_type: i32,
) -> CStatus {
    let Some(handle) = handle.as_mut() else {
        return invalid_arg!("null query handle");
    };
    let Some(params) = params_for(index_type) else {
        return invalid_arg!("index type has no search parameters");
    };
    handle.query.query_params = params;
    CStatus::ok()
}

/// Set the HNSW search breadth
///
/// Installs HNSW parameters when none are set. Fails without changing the
/// query when it targets another family.
///
/// # Safety
/// `handle` must be null or a live query handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_query_set_ef_search(handle: *mut QueryHandle, ef: i32) -> CStatus {
    let Some(handle) = handle.as_mut() else {
        return invalid_arg!("null query handle");
    };
    tune(handle.query.set_ef_search(ef))
}

/// Set the IVF probe count
///
/// Installs IVF parameters when none are set. Fails without changing the
/// query when it targets another family.
///
/// # Safety
/// `handle` must be null or a live query handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_query_set_n_probe(handle: *mut QueryHandle, n_probe: i32) -> CStatus {
    let Some(handle) = handle.as_mut() else {
        return invalid_arg!("null query handle");
    };
    tune(handle.query.set_n_probe(n_probe))
}
