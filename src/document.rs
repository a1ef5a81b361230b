//! Document handle: typed field setters and getters
//!
//! Getters never coerce: reading an `int64` field through `zvec_doc_get_int32`
//! yields 0, exactly as if the field were absent. String getters return a
//! pointer into a per-handle cache that the next string-returning call on the
//! same handle overwrites.

use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::ptr;
use tracing::debug;
use zvec_core::{Doc, FieldValue};

use crate::ffi::{slice_arg, str_arg, to_cstring};
use crate::status::{invalid_arg, CStatus};

/// Opaque document handle (`zvec_doc_handle_t`)
#[derive(Debug, Default)]
pub struct DocHandle {
    pub(crate) doc: Doc,
    string_cache: CString,
}

impl DocHandle {
    pub(crate) fn new(doc: Doc) -> Self {
        DocHandle {
            doc,
            string_cache: CString::default(),
        }
    }

    /// Borrow the native document
    pub fn doc(&self) -> &Doc {
        &self.doc
    }

    fn cache_str(&mut self, s: &str) -> *const c_char {
        self.string_cache = to_cstring(s);
        self.string_cache.as_ptr()
    }
}

/// Store `value` under `field`, replacing any previous value
unsafe fn set_field(handle: *mut DocHandle, field: *const c_char, value: FieldValue) -> CStatus {
    let Some(handle) = handle.as_mut() else {
        return invalid_arg!("null document handle");
    };
    let Some(field) = str_arg(field) else {
        return invalid_arg!("field name is null or not valid UTF-8");
    };
    handle.doc.set(field, value);
    CStatus::ok()
}

unsafe fn field_value<'a>(
    handle: *const DocHandle,
    field: *const c_char,
) -> Option<&'a FieldValue> {
    let handle = handle.as_ref()?;
    handle.doc.value(str_arg(field)?)
}

// =========================================================================
// Lifecycle
// =========================================================================

/// Create an empty document
///
/// The caller owns the handle and releases it with `zvec_doc_destroy`.
#[no_mangle]
pub extern "C" fn zvec_doc_create() -> *mut DocHandle {
    let handle = Box::into_raw(Box::new(DocHandle::default()));
    debug!(target: "zvec::ffi", ?handle, "Created document handle");
    handle
}

/// Destroy a document handle
///
/// # Safety
/// `handle` must be null or a pointer returned by `zvec_doc_create` that has
/// not been destroyed. Documents borrowed from a result must not be passed here.
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_destroy(handle: *mut DocHandle) {
    if !handle.is_null() {
        debug!(target: "zvec::ffi", ?handle, "Destroying document handle");
        drop(Box::from_raw(handle));
    }
}

// =========================================================================
// Primary key and score
// =========================================================================

/// Set the primary key
///
/// # Safety
/// `handle` must be null or a live document handle; `pk` must be null or a
/// NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_set_pk(handle: *mut DocHandle, pk: *const c_char) -> CStatus {
    let Some(handle) = handle.as_mut() else {
        return invalid_arg!("null document handle");
    };
    let Some(pk) = str_arg(pk) else {
        return invalid_arg!("primary key is null or not valid UTF-8");
    };
    handle.doc.set_pk(pk);
    CStatus::ok()
}

/// Primary key, or null for a null handle
///
/// Shares the string cache with `zvec_doc_get_string`.
///
/// # Safety
/// `handle` must be null or a live document handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_get_pk(handle: *mut DocHandle) -> *const c_char {
    match handle.as_mut() {
        Some(handle) => {
            let pk = handle.doc.pk().to_owned();
            handle.cache_str(&pk)
        }
        None => ptr::null(),
    }
}

/// Relevance score; 0 outside query results
///
/// # Safety
/// `handle` must be null or a live document handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_get_score(handle: *const DocHandle) -> f64 {
    handle.as_ref().map_or(0.0, |h| h.doc.score())
}

/// Number of fields set on the document
///
/// # Safety
/// `handle` must be null or a live document handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_field_count(handle: *const DocHandle) -> usize {
    handle.as_ref().map_or(0, |h| h.doc.field_count())
}

// =========================================================================
// Scalar setters
// =========================================================================

/// Store a string value
///
/// # Safety
/// `handle` must be null or a live document handle; `field` and `value` must
/// be null or NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_set_string(
    handle: *mut DocHandle,
    field: *const c_char,
    value: *const c_char,
) -> CStatus {
    let Some(value) = str_arg(value) else {
        return invalid_arg!("string value is null or not valid UTF-8");
    };
    set_field(handle, field, FieldValue::String(value.to_owned()))
}

/// Store an int32 value
///
/// # Safety
/// See [`zvec_doc_set_string`].
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_set_int32(
    handle: *mut DocHandle,
    field: *const c_char,
    value: i32,
) -> CStatus {
    set_field(handle, field, FieldValue::Int32(value))
}

/// Store an int64 value
///
/// # Safety
/// See [`zvec_doc_set_string`].
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_set_int64(
    handle: *mut DocHandle,
    field: *const c_char,
    value: i64,
) -> CStatus {
    set_field(handle, field, FieldValue::Int64(value))
}

/// Store a float value
///
/// # Safety
/// See [`zvec_doc_set_string`].
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_set_float(
    handle: *mut DocHandle,
    field: *const c_char,
    value: f32,
) -> CStatus {
    set_field(handle, field, FieldValue::Float(value))
}

/// Store a double value
///
/// # Safety
/// See [`zvec_doc_set_string`].
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_set_double(
    handle: *mut DocHandle,
    field: *const c_char,
    value: f64,
) -> CStatus {
    set_field(handle, field, FieldValue::Double(value))
}

/// Store a bool value; any non-zero `value` is true
///
/// # Safety
/// See [`zvec_doc_set_string`].
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_set_bool(
    handle: *mut DocHandle,
    field: *const c_char,
    value: c_int,
) -> CStatus {
    set_field(handle, field, FieldValue::Bool(value != 0))
}

/// Store an explicit null
///
/// # Safety
/// See [`zvec_doc_set_string`].
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_set_null(
    handle: *mut DocHandle,
    field: *const c_char,
) -> CStatus {
    set_field(handle, field, FieldValue::Null)
}

// =========================================================================
// Vectors
// =========================================================================

/// Store a copy of a dense f32 vector
///
/// # Safety
/// `data` must be null or valid for `len` reads.
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_set_vector_f32(
    handle: *mut DocHandle,
    field: *const c_char,
    data: *const f32,
    len: usize,
) -> CStatus {
    let Some(data) = slice_arg(data, len) else {
        return invalid_arg!("null vector data");
    };
    set_field(handle, field, FieldValue::VectorFp32(data.to_vec()))
}

/// Store a sparse f32 vector from parallel index/value arrays of length `len`
///
/// There is no matching getter.
///
/// # Safety
/// `indices` and `values` must be null or valid for `len` reads.
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_set_sparse_vector_f32(
    handle: *mut DocHandle,
    field: *const c_char,
    indices: *const u32,
    values: *const f32,
    len: usize,
) -> CStatus {
    let (Some(indices), Some(values)) = (slice_arg(indices, len), slice_arg(values, len)) else {
        return invalid_arg!("null sparse vector data");
    };
    set_field(
        handle,
        field,
        FieldValue::SparseVectorFp32 {
            indices: indices.to_vec(),
            values: values.to_vec(),
        },
    )
}

/// Copy up to `max_len` elements of a dense vector into `out`
///
/// Returns the number of elements copied; 0 when the field is absent or not a
/// dense vector.
///
/// # Safety
/// `out` must be null or valid for `max_len` writes.
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_get_vector_f32(
    handle: *const DocHandle,
    field: *const c_char,
    out: *mut f32,
    max_len: usize,
) -> usize {
    if out.is_null() {
        return 0;
    }
    let Some(vector) = field_value(handle, field).and_then(FieldValue::as_vector) else {
        return 0;
    };
    let n = vector.len().min(max_len);
    ptr::copy_nonoverlapping(vector.as_ptr(), out, n);
    n
}

/// Stored length of a dense vector field, 0 when absent
///
/// # Safety
/// `handle` must be null or a live document handle; `field` must be null or
/// a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_get_vector_len(
    handle: *const DocHandle,
    field: *const c_char,
) -> usize {
    field_value(handle, field)
        .and_then(FieldValue::as_vector)
        .map_or(0, <[f32]>::len)
}

// =========================================================================
// Scalar getters
// =========================================================================

/// 1 if the field holds any value, including null
///
/// # Safety
/// `handle` must be null or a live document handle; `field` must be null or
/// a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_has_field(
    handle: *const DocHandle,
    field: *const c_char,
) -> c_int {
    c_int::from(field_value(handle, field).is_some())
}

/// String value, or null when absent or not a string
///
/// # Safety
/// See [`zvec_doc_has_field`].
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_get_string(
    handle: *mut DocHandle,
    field: *const c_char,
) -> *const c_char {
    let Some(value) = field_value(handle, field).and_then(FieldValue::as_str) else {
        return ptr::null();
    };
    let value = value.to_owned();
    match handle.as_mut() {
        Some(handle) => handle.cache_str(&value),
        None => ptr::null(),
    }
}

/// Int32 value, 0 when absent or of another type
///
/// # Safety
/// See [`zvec_doc_has_field`].
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_get_int32(handle: *const DocHandle, field: *const c_char) -> i32 {
    match field_value(handle, field) {
        Some(FieldValue::Int32(v)) => *v,
        _ => 0,
    }
}

/// Int64 value, 0 when absent or of another type
///
/// # Safety
/// See [`zvec_doc_has_field`].
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_get_int64(handle: *const DocHandle, field: *const c_char) -> i64 {
    match field_value(handle, field) {
        Some(FieldValue::Int64(v)) => *v,
        _ => 0,
    }
}

/// Float value, 0 when absent or of another type
///
/// # Safety
/// See [`zvec_doc_has_field`].
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_get_float(handle: *const DocHandle, field: *const c_char) -> f32 {
    match field_value(handle, field) {
        Some(FieldValue::Float(v)) => *v,
        _ => 0.0,
    }
}

/// Double value, 0 when absent or of another type
///
/// # Safety
/// See [`zvec_doc_has_field`].
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_get_double(
    handle: *const DocHandle,
    field: *const c_char,
) -> f64 {
    match field_value(handle, field) {
        Some(FieldValue::Double(v)) => *v,
        _ => 0.0,
    }
}

/// Bool value as 0/1, 0 when absent or of another type
///
/// # Safety
/// See [`zvec_doc_has_field`].
#[no_mangle]
pub unsafe extern "C" fn zvec_doc_get_bool(
    handle: *const DocHandle,
    field: *const c_char,
) -> c_int {
    match field_value(handle, field) {
        Some(FieldValue::Bool(v)) => c_int::from(*v),
        _ => 0,
    }
}
