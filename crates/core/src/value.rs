//! Field value types for zvec documents
//!
//! ## Value Model
//!
//! A document field holds exactly one of:
//! - String, Int32, Int64, Float, Double, Bool, Null (scalars)
//! - VectorFp32 (dense vector)
//! - SparseVectorFp32 (parallel index/value arrays)
//!
//! ### Type Rules
//!
//! - No implicit coercions: an `Int32` field never reads back as `Int64`
//! - `Null` is a value, not the absence of one
//! - Float equality follows IEEE-754 (`NaN != NaN`)

use crate::types::DataType;
use serde::{Deserialize, Serialize};

/// A single typed field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Explicit null
    Null,
    /// UTF-8 string
    String(String),
    /// Boolean
    Bool(bool),
    /// 32-bit signed integer
    Int32(i32),
    /// 64-bit signed integer
    Int64(i64),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    /// Dense vector of 32-bit floats
    VectorFp32(Vec<f32>),
    /// Sparse vector; `indices` and `values` have equal length
    SparseVectorFp32 {
        /// Dimension indices
        indices: Vec<u32>,
        /// Values at those indices
        values: Vec<f32>,
    },
}

impl FieldValue {
    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::String(_) => "string",
            FieldValue::Bool(_) => "bool",
            FieldValue::Int32(_) => "int32",
            FieldValue::Int64(_) => "int64",
            FieldValue::Float(_) => "float",
            FieldValue::Double(_) => "double",
            FieldValue::VectorFp32(_) => "vector_fp32",
            FieldValue::SparseVectorFp32 { .. } => "sparse_vector_fp32",
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Check if this value can be stored in a field declared as `data_type`
    ///
    /// Null is accepted here; nullability is checked against the field schema.
    pub fn fits(&self, data_type: DataType) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::String(_) => data_type == DataType::String,
            FieldValue::Bool(_) => data_type == DataType::Bool,
            FieldValue::Int32(_) => data_type == DataType::Int32,
            FieldValue::Int64(_) => data_type == DataType::Int64,
            FieldValue::Float(_) => data_type == DataType::Float,
            FieldValue::Double(_) => data_type == DataType::Double,
            FieldValue::VectorFp32(_) => data_type.is_dense_vector(),
            FieldValue::SparseVectorFp32 { .. } => data_type.is_sparse_vector(),
        }
    }

    /// Borrow the dense vector payload
    pub fn as_vector(&self) -> Option<&[f32]> {
        match self {
            FieldValue::VectorFp32(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the string payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view for comparisons in filter expressions
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int32(n) => Some(*n as f64),
            FieldValue::Int64(n) => Some(*n as f64),
            FieldValue::Float(n) => Some(*n as f64),
            FieldValue::Double(n) => Some(*n),
            _ => None,
        }
    }
}

/// Typed extraction from a [`FieldValue`]
///
/// Implemented for every type the document accessors can read back.
/// Returns `None` when the stored variant differs from `Self`.
pub trait FromFieldValue: Sized {
    /// Extract an owned value of this type
    fn from_field_value(value: &FieldValue) -> Option<Self>;
}

macro_rules! impl_scalar_value {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for FieldValue {
            fn from(v: $ty) -> Self {
                FieldValue::$variant(v)
            }
        }

        impl FromFieldValue for $ty {
            fn from_field_value(value: &FieldValue) -> Option<Self> {
                match value {
                    FieldValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

impl_scalar_value!(String, String);
impl_scalar_value!(bool, Bool);
impl_scalar_value!(i32, Int32);
impl_scalar_value!(i64, Int64);
impl_scalar_value!(f32, Float);
impl_scalar_value!(f64, Double);
impl_scalar_value!(Vec<f32>, VectorFp32);

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}
