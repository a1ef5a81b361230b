//! Collection Lifecycle Tests
//!
//! Create/open/reopen, writes and their per-item codes, fetch, delete,
//! index management, stats, and data destruction.

use crate::common::*;
use std::ptr;
use zvec::collection::*;
use zvec::document::*;
use zvec::{CCollectionOptions, CCollectionStats, CFieldDef, CollectionHandle, ResultHandle};
use zvec_core::{IndexType, MetricType, StatusCode};

fn stats(coll: &TestCollection) -> CCollectionStats {
    let mut out = CCollectionStats::default();
    unsafe { assert_ok(zvec_collection_get_stats(coll.handle, &mut out)) };
    out
}

fn fetch(coll: &TestCollection, ids: &[&str]) -> Vec<String> {
    let owned: Vec<_> = ids.iter().map(|s| cstr(s)).collect();
    let ptrs: Vec<_> = owned.iter().map(|s| s.as_ptr()).collect();
    let mut result: *mut ResultHandle = ptr::null_mut();
    unsafe {
        assert_ok(zvec_collection_fetch(coll.handle, ptrs.as_ptr(), ptrs.len(), &mut result));
    }
    drain_pks(result)
}

// ============================================================================
// Create / open
// ============================================================================

#[test]
fn create_twice_fails_with_already_exists() {
    let coll = TestCollection::new(MetricType::L2);
    let schema = standard_schema(MetricType::L2);
    let mut out: *mut CollectionHandle = ptr::null_mut();
    unsafe {
        let status =
            zvec_collection_create_and_open(coll.path.as_ptr(), schema, ptr::null(), &mut out);
        zvec::schema::zvec_schema_destroy(schema);
        assert_eq!(status.code, StatusCode::AlreadyExists.as_i32());
        assert!(out.is_null());
    }
}

#[test]
fn open_missing_path_is_not_found() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = cstr(dir.path().join("absent").to_str().unwrap());
    let mut out: *mut CollectionHandle = ptr::null_mut();
    let status = unsafe { zvec_collection_open(path.as_ptr(), ptr::null(), &mut out) };
    assert_eq!(status.code, StatusCode::NotFound.as_i32());
    assert!(!message(status).is_empty());
    assert!(out.is_null());
}

#[test]
fn open_while_open_shares_instance() {
    let coll = TestCollection::new(MetricType::L2);
    coll.seed(vec![make_doc("a", "t", 1, [1.0, 0.0, 0.0, 0.0])]);
    let mut second: *mut CollectionHandle = ptr::null_mut();
    unsafe {
        assert_ok(zvec_collection_open(coll.path.as_ptr(), ptr::null(), &mut second));
        let mut s = CCollectionStats::default();
        assert_ok(zvec_collection_get_stats(second, &mut s));
        assert_eq!(s.doc_count, 1);
        zvec_collection_destroy(second);
    }
    assert_eq!(stats(&coll).doc_count, 1);
}

#[test]
fn data_survives_reopen() {
    let mut coll = TestCollection::new(MetricType::L2);
    coll.seed(vec![
        make_doc("a", "alpha", 1, [1.0, 0.0, 0.0, 0.0]),
        make_doc("b", "beta", 2, [0.0, 1.0, 0.0, 0.0]),
    ]);
    coll.reopen();
    assert_eq!(stats(&coll).doc_count, 2);
    assert_eq!(fetch(&coll, &["b", "a"]), vec!["b", "a"]);
}

#[test]
fn open_options_override_segment_size() {
    let mut coll = TestCollection::new(MetricType::L2);
    coll.seed(vec![
        make_doc("a", "t", 1, [1.0, 0.0, 0.0, 0.0]),
        make_doc("b", "t", 1, [0.0, 1.0, 0.0, 0.0]),
        make_doc("c", "t", 1, [0.0, 0.0, 1.0, 0.0]),
    ]);
    coll.close();
    let options = CCollectionOptions {
        segment_max_docs: 2,
        index_build_parallel: 0,
        auto_flush: 1,
    };
    let mut handle: *mut CollectionHandle = ptr::null_mut();
    unsafe { assert_ok(zvec_collection_open(coll.path.as_ptr(), &options, &mut handle)) };
    coll.handle = handle;
    let s = stats(&coll);
    assert_eq!(s.doc_count, 3);
    assert_eq!(s.segment_count, 2);
}

#[test]
fn get_path_returns_open_path() {
    let coll = TestCollection::new(MetricType::L2);
    let path = unsafe { read_str(zvec_collection_get_path(coll.handle)) };
    assert_eq!(path.as_deref(), coll.path.to_str().ok());
}

// ============================================================================
// Writes
// ============================================================================

#[test]
fn insert_duplicate_reports_per_item() {
    let coll = TestCollection::new(MetricType::L2);
    coll.seed(vec![make_doc("a", "t", 1, [1.0, 0.0, 0.0, 0.0])]);
    let docs = vec![
        make_doc("b", "t", 1, [0.0, 1.0, 0.0, 0.0]),
        make_doc("a", "t", 1, [0.0, 0.0, 1.0, 0.0]),
    ];
    let mut codes = [-1i32; 2];
    let status = unsafe {
        zvec_collection_insert_with_results(
            coll.handle,
            docs.as_ptr(),
            2,
            codes.as_mut_ptr(),
        )
    };
    destroy_docs(&docs);
    assert_eq!(status.code, StatusCode::AlreadyExists.as_i32());
    assert_eq!(codes, [0, StatusCode::AlreadyExists.as_i32()]);
    assert_eq!(stats(&coll).doc_count, 2);
}

#[test]
fn insert_rejects_wrong_dimension_and_unknown_field() {
    let coll = TestCollection::new(MetricType::L2);
    let emb = cstr("emb");
    let extra = cstr("extra");
    let short = [1.0f32, 2.0];
    unsafe {
        let bad_dim = make_doc("x", "t", 1, [0.0; 4]);
        assert_ok(zvec_doc_set_vector_f32(bad_dim, emb.as_ptr(), short.as_ptr(), 2));
        let unknown = make_doc("y", "t", 1, [0.0; 4]);
        assert_ok(zvec_doc_set_int32(unknown, extra.as_ptr(), 1));
        let docs = vec![bad_dim, unknown];
        let mut codes = [-1i32; 2];
        let status =
            zvec_collection_insert_with_results(coll.handle, docs.as_ptr(), 2, codes.as_mut_ptr());
        destroy_docs(&docs);
        assert_eq!(status.code, StatusCode::InvalidArgument.as_i32());
        assert_eq!(codes, [2, 2]);
    }
    assert_eq!(stats(&coll).doc_count, 0);
}

#[test]
fn upsert_replaces_and_update_merges() {
    let coll = TestCollection::new(MetricType::L2);
    coll.seed(vec![make_doc("a", "old", 1, [1.0, 0.0, 0.0, 0.0])]);
    let title = cstr("title");
    let year = cstr("year");
    let pk = cstr("a");
    let new_title = cstr("new");
    unsafe {
        let patch = zvec_doc_create();
        assert_ok(zvec_doc_set_pk(patch, pk.as_ptr()));
        assert_ok(zvec_doc_set_string(patch, title.as_ptr(), new_title.as_ptr()));
        let docs = [patch];
        assert_ok(zvec_collection_update(coll.handle, docs.as_ptr(), 1));

        let mut result: *mut ResultHandle = ptr::null_mut();
        let ids = [pk.as_ptr()];
        assert_ok(zvec_collection_fetch(coll.handle, ids.as_ptr(), 1, &mut result));
        let doc = zvec::result::zvec_result_get_doc(result, 0);
        assert_eq!(read_str(zvec_doc_get_string(doc, title.as_ptr())).as_deref(), Some("new"));
        assert_eq!(zvec_doc_get_int64(doc, year.as_ptr()), 1);
        zvec::result::zvec_result_destroy(result);

        assert_ok(zvec_collection_upsert(coll.handle, docs.as_ptr(), 1));
        let mut result: *mut ResultHandle = ptr::null_mut();
        assert_ok(zvec_collection_fetch(coll.handle, ids.as_ptr(), 1, &mut result));
        let doc = zvec::result::zvec_result_get_doc(result, 0);
        assert_eq!(zvec_doc_has_field(doc, year.as_ptr()), 0);
        zvec::result::zvec_result_destroy(result);
        zvec_doc_destroy(patch);
    }
}

#[test]
fn update_missing_is_not_found() {
    let coll = TestCollection::new(MetricType::L2);
    let docs = vec![make_doc("ghost", "t", 1, [0.0; 4])];
    let mut codes = [-1i32; 1];
    let status = unsafe {
        zvec_collection_update_with_results(
            coll.handle,
            docs.as_ptr(),
            1,
            codes.as_mut_ptr(),
        )
    };
    destroy_docs(&docs);
    assert_eq!(status.code, StatusCode::NotFound.as_i32());
    assert_eq!(codes, [StatusCode::NotFound.as_i32()]);
}

#[test]
fn delete_and_delete_by_filter() {
    let coll = TestCollection::new(MetricType::L2);
    coll.seed(vec![
        make_doc("a", "t", 1990, [1.0, 0.0, 0.0, 0.0]),
        make_doc("b", "t", 2005, [0.0, 1.0, 0.0, 0.0]),
        make_doc("c", "t", 2015, [0.0, 0.0, 1.0, 0.0]),
    ]);
    let a = cstr("a");
    let missing = cstr("zzz");
    let ids = [a.as_ptr(), missing.as_ptr()];
    let mut codes = [-1i32; 2];
    unsafe {
        let status =
            zvec_collection_delete_with_results(coll.handle, ids.as_ptr(), 2, codes.as_mut_ptr());
        assert_eq!(status.code, StatusCode::NotFound.as_i32());
        assert_eq!(codes, [0, StatusCode::NotFound.as_i32()]);

        let filter = cstr("year > 2010");
        assert_ok(zvec_collection_delete_by_filter(coll.handle, filter.as_ptr()));
    }
    assert_eq!(fetch(&coll, &[]), vec!["b"]);
}

#[test]
fn fetch_keeps_request_order_and_skips_missing() {
    let coll = TestCollection::new(MetricType::L2);
    coll.seed(vec![
        make_doc("a", "t", 1, [1.0, 0.0, 0.0, 0.0]),
        make_doc("b", "t", 1, [0.0, 1.0, 0.0, 0.0]),
        make_doc("c", "t", 1, [0.0, 0.0, 1.0, 0.0]),
    ]);
    assert_eq!(fetch(&coll, &["c", "missing", "a"]), vec!["c", "a"]);
    assert_eq!(fetch(&coll, &[]), vec!["a", "b", "c"]);
}

#[test]
fn flush_and_optimize_succeed() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = cstr(dir.path().join("manual").to_str().unwrap());
    let options = CCollectionOptions {
        segment_max_docs: 0,
        index_build_parallel: 0,
        auto_flush: 0,
    };
    let schema = standard_schema(MetricType::L2);
    let mut handle: *mut CollectionHandle = ptr::null_mut();
    unsafe {
        assert_ok(zvec_collection_create_and_open(path.as_ptr(), schema, &options, &mut handle));
        zvec::schema::zvec_schema_destroy(schema);
        let docs = vec![make_doc("a", "t", 1, [1.0, 0.0, 0.0, 0.0])];
        assert_ok(zvec_collection_insert(handle, docs.as_ptr(), 1));
        destroy_docs(&docs);
        assert_ok(zvec_collection_flush(handle));
        assert_ok(zvec_collection_optimize(handle));
        zvec_collection_destroy(handle);

        let mut reopened: *mut CollectionHandle = ptr::null_mut();
        assert_ok(zvec_collection_open(path.as_ptr(), ptr::null(), &mut reopened));
        let mut s = CCollectionStats::default();
        assert_ok(zvec_collection_get_stats(reopened, &mut s));
        assert_eq!(s.doc_count, 1);
        zvec_collection_destroy(reopened);
    }
}

// ============================================================================
// Indexes
// ============================================================================

#[test]
fn index_lifecycle_updates_schema_and_stats() {
    let coll = TestCollection::new(MetricType::L2);
    let emb = cstr("emb");
    let title = cstr("title");
    assert_eq!(stats(&coll).indexed_field_count, 1);
    unsafe {
        let hnsw = CFieldDef {
            index_type: IndexType::Hnsw.as_i32(),
            metric_type: MetricType::Cosine.as_i32(),
            m: 24,
            ..CFieldDef::empty()
        };
        assert_ok(zvec_collection_create_index(coll.handle, emb.as_ptr(), &hnsw));
        let invert = CFieldDef {
            index_type: IndexType::Invert.as_i32(),
            ..CFieldDef::empty()
        };
        assert_ok(zvec_collection_create_index(coll.handle, title.as_ptr(), &invert));
        assert_eq!(stats(&coll).indexed_field_count, 2);

        let schema = zvec_collection_get_schema(coll.handle);
        let v = zvec::schema::zvec_schema_get_vector(schema, 0);
        assert_eq!(v.index_type, IndexType::Hnsw.as_i32());
        assert_eq!(v.m, 24);
        zvec::schema::zvec_schema_destroy(schema);

        assert_ok(zvec_collection_drop_index(coll.handle, title.as_ptr()));
        assert_eq!(
            zvec_collection_drop_index(coll.handle, title.as_ptr()).code,
            StatusCode::NotFound.as_i32()
        );
        let missing = cstr("nope");
        assert_eq!(
            zvec_collection_create_index(coll.handle, missing.as_ptr(), &hnsw).code,
            StatusCode::NotFound.as_i32()
        );
    }
    assert_eq!(stats(&coll).indexed_field_count, 1);
}

#[test]
fn invert_on_vector_field_rejected() {
    let coll = TestCollection::new(MetricType::L2);
    let emb = cstr("emb");
    let invert = CFieldDef {
        index_type: IndexType::Invert.as_i32(),
        ..CFieldDef::empty()
    };
    let status = unsafe { zvec_collection_create_index(coll.handle, emb.as_ptr(), &invert) };
    assert_eq!(status.code, StatusCode::InvalidArgument.as_i32());
}

// ============================================================================
// Destroy data
// ============================================================================

#[test]
fn destroy_data_removes_directory() {
    let coll = TestCollection::new(MetricType::L2);
    coll.seed(vec![make_doc("a", "t", 1, [1.0, 0.0, 0.0, 0.0])]);
    let dir = std::path::PathBuf::from(coll.path.to_str().unwrap());
    unsafe {
        assert_ok(zvec_collection_destroy_data(coll.handle));
        assert!(!dir.exists());
        assert_eq!(zvec_collection_flush(coll.handle).code, StatusCode::NotFound.as_i32());
        let mut out = CCollectionStats::default();
        assert_eq!(
            zvec_collection_get_stats(coll.handle, &mut out).code,
            StatusCode::NotFound.as_i32()
        );
    }
}
