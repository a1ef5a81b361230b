//! Parameter Builder Tests
//!
//! Descriptor to `IndexParams` / `FieldSchema` mapping and defaults.

use crate::common::*;
use zvec::{build_field_schema, build_index_params, CFieldDef};
use zvec_core::{DataType, IndexParams, IndexType, MetricType, QuantizeType};

#[test]
fn hnsw_zero_tunables_take_defaults() {
    let emb = cstr("emb");
    let def = vector_def(&emb, 8, IndexType::Hnsw, MetricType::Cosine);
    match build_index_params(&def) {
        Some(IndexParams::Hnsw { m, ef_construction, metric, .. }) => {
            assert_eq!(m, 16);
            assert_eq!(ef_construction, 200);
            assert_eq!(metric, MetricType::Cosine);
        }
        other => panic!("expected HNSW params, got {:?}", other),
    }
}

#[test]
fn hnsw_explicit_tunables_carried_exactly() {
    let emb = cstr("emb");
    let def = CFieldDef {
        m: 32,
        ef_construction: 400,
        quantize_type: QuantizeType::Fp16.as_i32(),
        ..vector_def(&emb, 8, IndexType::Hnsw, MetricType::L2)
    };
    assert_eq!(
        build_index_params(&def),
        Some(IndexParams::Hnsw {
            metric: MetricType::L2,
            m: 32,
            ef_construction: 400,
            quantize: QuantizeType::Fp16,
        })
    );
}

#[test]
fn ivf_defaults() {
    let emb = cstr("emb");
    let def = vector_def(&emb, 8, IndexType::Ivf, MetricType::L2);
    assert_eq!(
        build_index_params(&def),
        Some(IndexParams::Ivf {
            metric: MetricType::L2,
            n_list: 1024,
            n_iters: 10,
            use_soar: false,
            quantize: QuantizeType::Undefined,
        })
    );
}

#[test]
fn flat_and_invert() {
    let emb = cstr("emb");
    let flat = vector_def(&emb, 8, IndexType::Flat, MetricType::Ip);
    assert_eq!(
        build_index_params(&flat),
        Some(IndexParams::Flat {
            metric: MetricType::Ip,
            quantize: QuantizeType::Undefined,
        })
    );
    let title = cstr("title");
    let invert = CFieldDef {
        index_type: IndexType::Invert.as_i32(),
        ..scalar_def(&title, DataType::String)
    };
    assert_eq!(build_index_params(&invert), Some(IndexParams::Invert));
}

#[test]
fn undefined_or_unknown_index_builds_nothing() {
    let emb = cstr("emb");
    let mut def = vector_def(&emb, 8, IndexType::Undefined, MetricType::L2);
    assert_eq!(build_index_params(&def), None);
    def.index_type = 7;
    assert_eq!(build_index_params(&def), None);
}

#[test]
fn field_without_index_carries_none() {
    let emb = cstr("emb");
    let def = vector_def(&emb, 16, IndexType::Undefined, MetricType::Undefined);
    let field = unsafe { build_field_schema(&def) }.unwrap();
    assert_eq!(field.name(), "emb");
    assert_eq!(field.data_type(), DataType::VectorFp32);
    assert_eq!(field.dimension(), 16);
    assert!(field.index_params().is_none());
}

#[test]
fn negative_dimension_rejected() {
    let emb = cstr("emb");
    let def = vector_def(&emb, -1, IndexType::Undefined, MetricType::Undefined);
    assert!(unsafe { build_field_schema(&def) }.is_err());
}
