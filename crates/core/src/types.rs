//! Type tags shared with C callers
//!
//! This module defines:
//! - DataType: Field data type (scalar, dense vector, sparse vector)
//! - IndexType: Index family attached to a field
//! - MetricType: Distance metric for vector indexes
//! - QuantizeType: Storage quantization for vector indexes
//!
//! ## Stable Tags
//!
//! Every enum here crosses the C boundary as an `int32_t`. The integer
//! values are frozen; new variants take new numbers and old numbers are
//! never reused.

use serde::{Deserialize, Serialize};

/// Field data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum DataType {
    /// Undefined or unknown type
    #[default]
    Undefined = 0,
    /// Raw bytes
    Binary = 1,
    /// UTF-8 string
    String = 2,
    /// Boolean
    Bool = 3,
    /// 32-bit signed integer
    Int32 = 4,
    /// 64-bit signed integer
    Int64 = 5,
    /// 32-bit unsigned integer
    UInt32 = 6,
    /// 64-bit unsigned integer
    UInt64 = 7,
    /// 32-bit float
    Float = 8,
    /// 64-bit float
    Double = 9,
    /// Dense vector of 16-bit floats
    VectorFp16 = 22,
    /// Dense vector of 32-bit floats
    VectorFp32 = 23,
    /// Dense vector of 64-bit floats
    VectorFp64 = 24,
    /// Dense vector of 8-bit integers
    VectorInt8 = 26,
    /// Dense vector of 16-bit integers
    VectorInt16 = 27,
    /// Sparse vector of 16-bit floats
    SparseVectorFp16 = 30,
    /// Sparse vector of 32-bit floats
    SparseVectorFp32 = 31,
}

impl DataType {
    /// Integer tag used on the wire
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Decode from the integer tag used on the wire
    pub fn from_i32(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(DataType::Undefined),
            1 => Some(DataType::Binary),
            2 => Some(DataType::String),
            3 => Some(DataType::Bool),
            4 => Some(DataType::Int32),
            5 => Some(DataType::Int64),
            6 => Some(DataType::UInt32),
            7 => Some(DataType::UInt64),
            8 => Some(DataType::Float),
            9 => Some(DataType::Double),
            22 => Some(DataType::VectorFp16),
            23 => Some(DataType::VectorFp32),
            24 => Some(DataType::VectorFp64),
            26 => Some(DataType::VectorInt8),
            27 => Some(DataType::VectorInt16),
            30 => Some(DataType::SparseVectorFp16),
            31 => Some(DataType::SparseVectorFp32),
            _ => None,
        }
    }

    /// Dense vector kinds
    pub fn is_dense_vector(self) -> bool {
        matches!(
            self,
            DataType::VectorFp16
                | DataType::VectorFp32
                | DataType::VectorFp64
                | DataType::VectorInt8
                | DataType::VectorInt16
        )
    }

    /// Sparse vector kinds
    pub fn is_sparse_vector(self) -> bool {
        matches!(self, DataType::SparseVectorFp16 | DataType::SparseVectorFp32)
    }

    /// Any vector kind (dense or sparse)
    pub fn is_vector(self) -> bool {
        self.is_dense_vector() || self.is_sparse_vector()
    }

    /// Human-readable name for display
    pub fn name(self) -> &'static str {
        match self {
            DataType::Undefined => "undefined",
            DataType::Binary => "binary",
            DataType::String => "string",
            DataType::Bool => "bool",
            DataType::Int32 => "int32",
            DataType::Int64 => "int64",
            DataType::UInt32 => "uint32",
            DataType::UInt64 => "uint64",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::VectorFp16 => "vector_fp16",
            DataType::VectorFp32 => "vector_fp32",
            DataType::VectorFp64 => "vector_fp64",
            DataType::VectorInt8 => "vector_int8",
            DataType::VectorInt16 => "vector_int16",
            DataType::SparseVectorFp16 => "sparse_vector_fp16",
            DataType::SparseVectorFp32 => "sparse_vector_fp32",
        }
    }
}

/// Index family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum IndexType {
    /// No index
    #[default]
    Undefined = 0,
    /// Graph-based (HNSW)
    Hnsw = 1,
    /// Inverted-list (IVF)
    Ivf = 3,
    /// Exhaustive scan
    Flat = 4,
    /// Inverted index over scalar fields
    Invert = 10,
}

impl IndexType {
    /// Integer tag used on the wire
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Decode from the integer tag used on the wire
    pub fn from_i32(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(IndexType::Undefined),
            1 => Some(IndexType::Hnsw),
            3 => Some(IndexType::Ivf),
            4 => Some(IndexType::Flat),
            10 => Some(IndexType::Invert),
            _ => None,
        }
    }

    /// Families that only index vector fields
    pub fn is_vector_index(self) -> bool {
        matches!(self, IndexType::Hnsw | IndexType::Ivf | IndexType::Flat)
    }

    /// Human-readable name for display
    pub fn name(self) -> &'static str {
        match self {
            IndexType::Undefined => "undefined",
            IndexType::Hnsw => "hnsw",
            IndexType::Ivf => "ivf",
            IndexType::Flat => "flat",
            IndexType::Invert => "invert",
        }
    }
}

/// Distance metric for vector indexes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum MetricType {
    /// Not specified (engine picks L2)
    #[default]
    Undefined = 0,
    /// Euclidean distance
    L2 = 1,
    /// Inner product
    Ip = 2,
    /// Cosine similarity
    Cosine = 3,
}

impl MetricType {
    /// Integer tag used on the wire
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Decode from the integer tag used on the wire
    pub fn from_i32(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(MetricType::Undefined),
            1 => Some(MetricType::L2),
            2 => Some(MetricType::Ip),
            3 => Some(MetricType::Cosine),
            _ => None,
        }
    }

    /// Human-readable name for display
    pub fn name(self) -> &'static str {
        match self {
            MetricType::Undefined => "undefined",
            MetricType::L2 => "l2",
            MetricType::Ip => "ip",
            MetricType::Cosine => "cosine",
        }
    }
}

/// Storage quantization for vector indexes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum QuantizeType {
    /// No quantization
    #[default]
    Undefined = 0,
    /// Half precision
    Fp16 = 1,
    /// 8-bit scalar quantization
    Int8 = 2,
    /// 4-bit scalar quantization
    Int4 = 3,
}

impl QuantizeType {
    /// Integer tag used on the wire
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Decode from the integer tag used on the wire
    pub fn from_i32(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(QuantizeType::Undefined),
            1 => Some(QuantizeType::Fp16),
            2 => Some(QuantizeType::Int8),
            3 => Some(QuantizeType::Int4),
            _ => None,
        }
    }
}
