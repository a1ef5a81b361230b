//! End-to-End Tests
//!
//! Full caller flows: schema, collection, documents, query, results.

use crate::common::*;
use std::ptr;
use zvec::collection::*;
use zvec::document::*;
use zvec::query::*;
use zvec::result::*;
use zvec::schema::*;
use zvec::{CollectionHandle, ResultHandle};
use zvec_core::{DataType, IndexType, MetricType};

#[test]
fn four_dim_flat_exact_match_is_top_one() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = cstr(dir.path().join("e2e").to_str().unwrap());
    let name = cstr("e2e");
    let id = cstr("id");
    let emb = cstr("embedding");
    let pk = cstr("a");
    let vector = [0.0f32, 0.0, 0.0, 1.0];
    unsafe {
        let schema = zvec_schema_create(name.as_ptr());
        assert_ok(zvec_schema_add_field(schema, &scalar_def(&id, DataType::String)));
        assert_ok(zvec_schema_add_vector_field(
            schema,
            &vector_def(&emb, 4, IndexType::Flat, MetricType::L2),
        ));

        let mut coll: *mut CollectionHandle = ptr::null_mut();
        assert_ok(zvec_collection_create_and_open(path.as_ptr(), schema, ptr::null(), &mut coll));
        zvec_schema_destroy(schema);

        let doc = zvec_doc_create();
        assert_ok(zvec_doc_set_pk(doc, pk.as_ptr()));
        assert_ok(zvec_doc_set_string(doc, id.as_ptr(), pk.as_ptr()));
        assert_ok(zvec_doc_set_vector_f32(doc, emb.as_ptr(), vector.as_ptr(), 4));
        let docs = [doc];
        assert_ok(zvec_collection_insert(coll, docs.as_ptr(), 1));
        zvec_doc_destroy(doc);

        let q = zvec_query_create();
        assert_ok(zvec_query_set_field_name(q, emb.as_ptr()));
        assert_ok(zvec_query_set_vector(q, vector.as_ptr(), 4));
        assert_ok(zvec_query_set_topk(q, 1));
        let mut result: *mut ResultHandle = ptr::null_mut();
        assert_ok(zvec_collection_query(coll, q, &mut result));
        zvec_query_destroy(q);

        assert_eq!(zvec_result_count(result), 1);
        let hit = zvec_result_get_doc(result, 0);
        assert_eq!(read_str(zvec_doc_get_pk(hit)).as_deref(), Some("a"));
        assert!((zvec_doc_get_score(hit) - 1.0).abs() < 1e-9);
        zvec_result_destroy(result);
        zvec_collection_destroy(coll);
    }
}

#[test]
fn ranking_by_metric() {
    for metric in [MetricType::L2, MetricType::Ip, MetricType::Cosine] {
        let coll = TestCollection::new(metric);
        coll.seed(vec![
            make_doc("near", "t", 1, [1.0, 0.1, 0.0, 0.0]),
            make_doc("far", "t", 1, [0.0, 0.0, 1.0, 0.0]),
            make_doc("mid", "t", 1, [0.5, 0.5, 0.0, 0.0]),
        ]);
        let field = cstr("emb");
        let vector = [1.0f32, 0.0, 0.0, 0.0];
        unsafe {
            let q = zvec_query_create();
            assert_ok(zvec_query_set_field_name(q, field.as_ptr()));
            assert_ok(zvec_query_set_vector(q, vector.as_ptr(), 4));
            let mut result: *mut ResultHandle = ptr::null_mut();
            assert_ok(zvec_collection_query(coll.handle, q, &mut result));
            zvec_query_destroy(q);

            let scores: Vec<f64> = (0..zvec_result_count(result))
                .map(|i| zvec_doc_get_score(zvec_result_get_doc(result, i)))
                .collect();
            assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{:?}: {:?}", metric, scores);
            assert_eq!(drain_pks(result), vec!["near", "mid", "far"], "{:?}", metric);
        }
    }
}

#[test]
fn equal_scores_break_ties_by_pk() {
    let coll = TestCollection::new(MetricType::L2);
    coll.seed(vec![
        make_doc("z", "t", 1, [0.0, 1.0, 0.0, 0.0]),
        make_doc("m", "t", 1, [0.0, 0.0, 1.0, 0.0]),
        make_doc("b", "t", 1, [0.0, 0.0, 0.0, 1.0]),
    ]);
    let field = cstr("emb");
    let vector = [1.0f32, 0.0, 0.0, 0.0];
    unsafe {
        let q = zvec_query_create();
        assert_ok(zvec_query_set_field_name(q, field.as_ptr()));
        assert_ok(zvec_query_set_vector(q, vector.as_ptr(), 4));
        let mut result: *mut ResultHandle = ptr::null_mut();
        assert_ok(zvec_collection_query(coll.handle, q, &mut result));
        zvec_query_destroy(q);
        assert_eq!(drain_pks(result), vec!["b", "m", "z"]);
    }
}

#[test]
fn results_outlive_collection_handle() {
    let coll = TestCollection::new(MetricType::L2);
    coll.seed(vec![make_doc("a", "kept", 1, [1.0, 0.0, 0.0, 0.0])]);
    let a = cstr("a");
    let title = cstr("title");
    let ids = [a.as_ptr()];
    let mut result: *mut ResultHandle = ptr::null_mut();
    unsafe {
        assert_ok(zvec_collection_fetch(coll.handle, ids.as_ptr(), 1, &mut result));
    }
    drop(coll);
    unsafe {
        let doc = zvec_result_get_doc(result, 0);
        assert_eq!(read_str(zvec_doc_get_string(doc, title.as_ptr())).as_deref(), Some("kept"));
        assert_eq!(zvec_doc_get_score(doc), 0.0);
        zvec_result_destroy(result);
    }
}

#[test]
fn filter_grammar_from_client_library() {
    let coll = TestCollection::new(MetricType::L2);
    coll.seed(vec![
        make_doc("a", "Hello World", 2020, [1.0, 0.0, 0.0, 0.0]),
        make_doc("b", "it's here", 2021, [0.0, 1.0, 0.0, 0.0]),
        make_doc("c", "Goodbye", 1999, [0.0, 0.0, 1.0, 0.0]),
    ]);
    let cases: [(&str, &[&str]); 6] = [
        ("(title == 'it\\'s here')", &["b"]),
        ("((year >= 2020) && (title HAS_PREFIX 'Hello'))", &["a"]),
        ("title HAS_SUFFIX 'bye'", &["c"]),
        ("title CONTAIN_ANY ('World', 'here')", &["a", "b"]),
        ("!(year < 2000)", &["a", "b"]),
        ("(missing IS NULL) || (year == 1999)", &["a", "b", "c"]),
    ];
    let field = cstr("emb");
    let vector = [0.0f32, 0.0, 0.0, 1.0];
    for (expr, expected) in cases {
        let filter = cstr(expr);
        unsafe {
            let q = zvec_query_create();
            assert_ok(zvec_query_set_field_name(q, field.as_ptr()));
            assert_ok(zvec_query_set_vector(q, vector.as_ptr(), 4));
            assert_ok(zvec_query_set_filter(q, filter.as_ptr()));
            let mut result: *mut ResultHandle = ptr::null_mut();
            assert_ok(zvec_collection_query(coll.handle, q, &mut result));
            zvec_query_destroy(q);
            let mut pks = drain_pks(result);
            pks.sort();
            assert_eq!(pks, expected.to_vec(), "filter {}", expr);
        }
    }
}

#[test]
fn nan_vectors_do_not_break_ranking() {
    let coll = TestCollection::new(MetricType::Ip);
    let docs: Vec<_> = (0..60)
        .map(|i| {
            let x = if i % 3 == 0 { f32::NAN } else { i as f32 };
            make_doc(&format!("{:02}", i), "t", 1, [x, 0.0, 0.0, 0.0])
        })
        .collect();
    coll.seed(docs);
    let field = cstr("emb");
    let vector = [1.0f32, 0.0, 0.0, 0.0];
    unsafe {
        let q = zvec_query_create();
        assert_ok(zvec_query_set_field_name(q, field.as_ptr()));
        assert_ok(zvec_query_set_vector(q, vector.as_ptr(), 4));
        assert_ok(zvec_query_set_topk(q, 3));
        let mut result: *mut ResultHandle = ptr::null_mut();
        assert_ok(zvec_collection_query(coll.handle, q, &mut result));
        zvec_query_destroy(q);
        assert_eq!(drain_pks(result), vec!["59", "58", "56"]);
    }
}
