//! Shared helpers for the C surface test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;
use tempfile::TempDir;
use zvec::collection::*;
use zvec::document::*;
use zvec::result::*;
use zvec::schema::*;
use zvec::{CFieldDef, CStatus, CollectionHandle, DocHandle, ResultHandle, SchemaHandle};
use zvec_core::{DataType, IndexType, MetricType};

// ============================================================================
// Strings and statuses
// ============================================================================

pub fn cstr(s: &str) -> CString {
    CString::new(s).unwrap()
}

/// Copy a borrowed C string; `None` for null
pub fn read_str(p: *const c_char) -> Option<String> {
    if p.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(p) }.to_str().unwrap().to_owned())
    }
}

pub fn message(status: CStatus) -> String {
    read_str(status.message).unwrap_or_default()
}

#[track_caller]
pub fn assert_ok(status: CStatus) {
    assert!(status.is_ok(), "expected ok, got {}: {}", status.code, message(status));
}

// ============================================================================
// Descriptors
// ============================================================================

pub fn scalar_def(name: &CString, data_type: DataType) -> CFieldDef {
    CFieldDef {
        name: name.as_ptr(),
        data_type: data_type.as_i32(),
        ..CFieldDef::empty()
    }
}

pub fn vector_def(
    name: &CString,
    dimension: i32,
    index_type: IndexType,
    metric: MetricType,
) -> CFieldDef {
    CFieldDef {
        name: name.as_ptr(),
        data_type: DataType::VectorFp32.as_i32(),
        dimension,
        index_type: index_type.as_i32(),
        metric_type: metric.as_i32(),
        ..CFieldDef::empty()
    }
}

/// Schema `docs`: `title` string, `year` int64, `emb` 4-d FLAT vector
pub fn standard_schema(metric: MetricType) -> *mut SchemaHandle {
    let name = cstr("docs");
    let title = cstr("title");
    let year = cstr("year");
    let emb = cstr("emb");
    unsafe {
        let schema = zvec_schema_create(name.as_ptr());
        assert_ok(zvec_schema_add_field(schema, &scalar_def(&title, DataType::String)));
        assert_ok(zvec_schema_add_field(schema, &scalar_def(&year, DataType::Int64)));
        assert_ok(zvec_schema_add_vector_field(
            schema,
            &vector_def(&emb, 4, IndexType::Flat, metric),
        ));
        schema
    }
}

// ============================================================================
// Documents
// ============================================================================

pub fn make_doc(pk: &str, title: &str, year: i64, emb: [f32; 4]) -> *mut DocHandle {
    let pk = cstr(pk);
    let title_field = cstr("title");
    let title = cstr(title);
    let year_field = cstr("year");
    let emb_field = cstr("emb");
    unsafe {
        let doc = zvec_doc_create();
        assert_ok(zvec_doc_set_pk(doc, pk.as_ptr()));
        assert_ok(zvec_doc_set_string(doc, title_field.as_ptr(), title.as_ptr()));
        assert_ok(zvec_doc_set_int64(doc, year_field.as_ptr(), year));
        assert_ok(zvec_doc_set_vector_f32(doc, emb_field.as_ptr(), emb.as_ptr(), 4));
        doc
    }
}

pub fn destroy_docs(docs: &[*mut DocHandle]) {
    for &doc in docs {
        unsafe { zvec_doc_destroy(doc) };
    }
}

/// Primary keys of a result in order, then destroy it
pub fn drain_pks(result: *mut ResultHandle) -> Vec<String> {
    unsafe {
        let pks = (0..zvec_result_count(result))
            .map(|i| read_str(zvec_doc_get_pk(zvec_result_get_doc(result, i))).unwrap())
            .collect();
        zvec_result_destroy(result);
        pks
    }
}

// ============================================================================
// TestCollection - collection in a temp directory
// ============================================================================

pub struct TestCollection {
    pub handle: *mut CollectionHandle,
    pub path: CString,
    pub dir: TempDir,
}

impl TestCollection {
    /// Create the standard schema collection with default options
    pub fn new(metric: MetricType) -> Self {
        let dir = TempDir::new().unwrap();
        let path = cstr(dir.path().join("coll").to_str().unwrap());
        let schema = standard_schema(metric);
        let mut handle = ptr::null_mut();
        unsafe {
            let status =
                zvec_collection_create_and_open(path.as_ptr(), schema, ptr::null(), &mut handle);
            zvec_schema_destroy(schema);
            assert_ok(status);
        }
        TestCollection { handle, path, dir }
    }

    pub fn insert(&self, docs: &[*mut DocHandle]) -> CStatus {
        unsafe { zvec_collection_insert(self.handle, docs.as_ptr(), docs.len()) }
    }

    /// Insert owned docs, asserting success
    pub fn seed(&self, docs: Vec<*mut DocHandle>) {
        let status = self.insert(&docs);
        destroy_docs(&docs);
        assert_ok(status);
    }

    /// Release the handle, keeping the directory
    pub fn close(&mut self) {
        unsafe { zvec_collection_destroy(self.handle) };
        self.handle = ptr::null_mut();
    }

    pub fn reopen(&mut self) {
        self.close();
        let mut handle = ptr::null_mut();
        unsafe {
            assert_ok(zvec_collection_open(self.path.as_ptr(), ptr::null(), &mut handle));
        }
        self.handle = handle;
    }
}

impl Drop for TestCollection {
    fn drop(&mut self) {
        unsafe { zvec_collection_destroy(self.handle) };
    }
}
