//! Descriptor to native conversion for fields and indexes

use std::os::raw::c_char;
use tracing::debug;
use zvec_core::{
    DataType, Error, FieldSchema, IndexParams, IndexType, MetricType, QuantizeType, Result,
};

use crate::descriptor::CFieldDef;
use crate::ffi::str_arg;

/// Build index parameters from a descriptor
///
/// Non-positive tunables take their defaults (m 16, ef_construction 200,
/// n_lists 1024). Returns `None` for `UNDEFINED` or an unknown index type,
/// and for unknown metric or quantization tags.
pub fn build_index_params(def: &CFieldDef) -> Option<IndexParams> {
    let index_type = IndexType::from_i32(def.index_type)?;
    let metric = MetricType::from_i32(def.metric_type)?;
    let quantize = QuantizeType::from_i32(def.quantize_type)?;
    match index_type {
        IndexType::Hnsw => Some(IndexParams::hnsw(metric, def.m, def.ef_construction, quantize)),
        IndexType::Ivf => Some(IndexParams::ivf(metric, def.n_lists, quantize)),
        IndexType::Flat => Some(IndexParams::flat(metric, quantize)),
        IndexType::Invert => Some(IndexParams::Invert),
        IndexType::Undefined => None,
    }
}

/// Build a field schema from a descriptor
///
/// When the descriptor names an index type the index must build and must fit
/// the data type, otherwise the whole field is rejected.
///
/// # Errors
/// `InvalidArgument` for a null or non-UTF-8 name, an unknown data type, a
/// negative dimension, or an index that cannot be attached.
///
/// # Safety
/// `def.name` must be null or a valid NUL-terminated string.
pub unsafe fn build_field_schema(def: &CFieldDef) -> Result<FieldSchema> {
    let name = str_arg(def.name)
        .ok_or_else(|| Error::invalid_argument("field name is null or not valid UTF-8"))?;
    let data_type = DataType::from_i32(def.data_type)
        .filter(|dt| *dt != DataType::Undefined)
        .ok_or_else(|| {
            Error::invalid_argument(format!(
                "field '{}' has unknown data type {}",
                name, def.data_type
            ))
        })?;
    let dimension = u32::try_from(def.dimension).map_err(|_| {
        Error::invalid_argument(format!(
            "field '{}' has negative dimension {}",
            name, def.dimension
        ))
    })?;

    let mut field = FieldSchema::new(name, data_type, dimension, def.nullable != 0);
    if def.index_type != IndexType::Undefined.as_i32() {
        let params = build_index_params(def).ok_or_else(|| {
            Error::invalid_argument(format!(
                "field '{}' requests index type {} that cannot be built",
                name, def.index_type
            ))
        })?;
        field.set_index_params(params)?;
    }
    debug!(
        target: "zvec::ffi",
        field = name,
        data_type = data_type.name(),
        index = field.index_type().name(),
        "Built field schema"
    );
    Ok(field)
}

/// Describe a field, borrowing `name` for the descriptor's name pointer
pub fn field_descriptor(field: &FieldSchema, name: *const c_char) -> CFieldDef {
    let mut def = CFieldDef {
        name,
        data_type: field.data_type().as_i32(),
        dimension: field.dimension() as i32,
        nullable: i32::from(field.nullable()),
        index_type: field.index_type().as_i32(),
        ..CFieldDef::empty()
    };
    match field.index_params() {
        Some(IndexParams::Hnsw {
            metric,
            m,
            ef_construction,
            quantize,
        }) => {
            def.metric_type = metric.as_i32();
            def.quantize_type = quantize.as_i32();
            def.m = *m;
            def.ef_construction = *ef_construction;
        }
        Some(IndexParams::Ivf {
            metric,
            n_list,
            quantize,
            ..
        }) => {
            def.metric_type = metric.as_i32();
            def.quantize_type = quantize.as_i32();
            def.n_lists = *n_list;
        }
        Some(IndexParams::Flat { metric, quantize }) => {
            def.metric_type = metric.as_i32();
            def.quantize_type = quantize.as_i32();
        }
        Some(IndexParams::Invert) | None => {}
    }
    def
}
