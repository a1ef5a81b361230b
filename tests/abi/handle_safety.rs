//! Handle Safety Tests
//!
//! Null handles and null arguments: accessors return zero values, write
//! paths return INVALID_ARGUMENT, destroy is a no-op, out-params are left
//! untouched on failure.

use crate::common::*;
use std::ptr;
use zvec::collection::*;
use zvec::document::*;
use zvec::query::*;
use zvec::result::*;
use zvec::schema::*;
use zvec::{zvec_version, CCollectionStats, CollectionHandle, ResultHandle};
use zvec_core::MetricType;

#[test]
fn destroy_null_is_noop() {
    unsafe {
        zvec_doc_destroy(ptr::null_mut());
        zvec_schema_destroy(ptr::null_mut());
        zvec_query_destroy(ptr::null_mut());
        zvec_collection_destroy(ptr::null_mut());
        zvec_result_destroy(ptr::null_mut());
    }
}

#[test]
fn null_collection_handle_write_paths() {
    let f = cstr("f");
    unsafe {
        let null: *mut CollectionHandle = ptr::null_mut();
        assert_eq!(zvec_collection_flush(null).code, 2);
        assert_eq!(zvec_collection_optimize(null).code, 2);
        assert_eq!(zvec_collection_destroy_data(null).code, 2);
        assert_eq!(zvec_collection_drop_index(null, f.as_ptr()).code, 2);
        assert_eq!(zvec_collection_delete_by_filter(null, f.as_ptr()).code, 2);
        assert_eq!(zvec_collection_insert(null, ptr::null(), 0).code, 2);
        let mut stats = CCollectionStats::default();
        assert_eq!(zvec_collection_get_stats(null, &mut stats).code, 2);
        assert!(zvec_collection_get_path(null).is_null());
        assert!(zvec_collection_get_schema(null).is_null());
    }
}

#[test]
fn open_null_path_leaves_out_untouched() {
    let mut out: *mut CollectionHandle = ptr::null_mut();
    let status = unsafe { zvec_collection_open(ptr::null(), ptr::null(), &mut out) };
    assert_eq!(status.code, 2);
    assert_eq!(message(status), "null argument");
    assert!(out.is_null());

    let path = cstr("/nonexistent");
    let status = unsafe { zvec_collection_open(path.as_ptr(), ptr::null(), ptr::null_mut()) };
    assert_eq!(status.code, 2);
}

#[test]
fn query_and_fetch_need_out_result() {
    let coll = TestCollection::new(MetricType::L2);
    unsafe {
        let q = zvec_query_create();
        assert_eq!(zvec_collection_query(coll.handle, q, ptr::null_mut()).code, 2);
        let mut result: *mut ResultHandle = ptr::null_mut();
        assert_eq!(zvec_collection_query(coll.handle, ptr::null(), &mut result).code, 2);
        assert!(result.is_null());
        assert_eq!(zvec_collection_fetch(coll.handle, ptr::null(), 0, ptr::null_mut()).code, 2);
        assert_eq!(zvec_collection_fetch(coll.handle, ptr::null(), 3, &mut result).code, 2);
        assert!(result.is_null());
        zvec_query_destroy(q);
    }
}

#[test]
fn null_document_accessors_are_zero() {
    let f = cstr("f");
    let mut buf = [0f32; 4];
    unsafe {
        let null: *mut zvec::DocHandle = ptr::null_mut();
        assert!(zvec_doc_get_pk(null).is_null());
        assert!(zvec_doc_get_string(null, f.as_ptr()).is_null());
        assert_eq!(zvec_doc_get_int32(null, f.as_ptr()), 0);
        assert_eq!(zvec_doc_get_int64(null, f.as_ptr()), 0);
        assert_eq!(zvec_doc_get_double(null, f.as_ptr()), 0.0);
        assert_eq!(zvec_doc_get_vector_f32(null, f.as_ptr(), buf.as_mut_ptr(), 4), 0);
        assert_eq!(zvec_doc_field_count(null), 0);
        assert_eq!(zvec_doc_set_pk(null, f.as_ptr()).code, 2);
        assert_eq!(zvec_doc_set_null(null, f.as_ptr()).code, 2);
    }
}

#[test]
fn null_schema_accessors_are_zero() {
    unsafe {
        let null: *mut zvec::SchemaHandle = ptr::null_mut();
        assert_eq!(zvec_schema_get_field_count(null), 0);
        assert_eq!(zvec_schema_get_vector_count(null), 0);
        assert!(zvec_schema_get_field(null, 0).name.is_null());
        assert_eq!(zvec_schema_add_field(null, ptr::null()).code, 2);
    }
}

#[test]
fn status_message_lives_until_next_failure() {
    let dir = tempfile::TempDir::new().unwrap();
    let missing = cstr(dir.path().join("none").to_str().unwrap());
    let mut out: *mut CollectionHandle = ptr::null_mut();
    let first = unsafe { zvec_collection_open(missing.as_ptr(), ptr::null(), &mut out) };
    let copied = message(first);
    assert!(copied.contains("none"));
    assert_eq!(message(first), copied);
}

#[test]
fn version_is_static() {
    let a = zvec_version();
    let b = zvec_version();
    assert_eq!(a, b);
    assert_eq!(read_str(a).as_deref(), Some(env!("CARGO_PKG_VERSION")));
}
