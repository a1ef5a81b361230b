//! Index and search-time parameters
//!
//! Both are closed sum types: one variant per index family. Construction-time
//! parameters (`IndexParams`) are immutable once attached to a field.
//! Search-time parameters (`QueryParams`) live on a query and may only be
//! tuned through the setter that matches their family.

use crate::error::{Error, Result};
use crate::types::{IndexType, MetricType, QuantizeType};
use serde::{Deserialize, Serialize};

/// Default HNSW graph degree
pub const DEFAULT_HNSW_M: i32 = 16;
/// Default HNSW construction breadth
pub const DEFAULT_HNSW_EF_CONSTRUCTION: i32 = 200;
/// Default IVF list count
pub const DEFAULT_IVF_N_LIST: i32 = 1024;
/// IVF training iterations
pub const DEFAULT_IVF_N_ITERS: i32 = 10;
/// Default HNSW search breadth
pub const DEFAULT_HNSW_EF_SEARCH: i32 = 64;
/// Default IVF probe count
pub const DEFAULT_IVF_NPROBE: i32 = 64;

/// Construction-time index parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexParams {
    /// Graph-based index
    Hnsw {
        /// Distance metric
        metric: MetricType,
        /// Graph degree
        m: i32,
        /// Construction breadth
        ef_construction: i32,
        /// Storage quantization
        quantize: QuantizeType,
    },
    /// Inverted-list index
    Ivf {
        /// Distance metric
        metric: MetricType,
        /// Number of lists
        n_list: i32,
        /// Training iterations
        n_iters: i32,
        /// SOAR spilling
        use_soar: bool,
        /// Storage quantization
        quantize: QuantizeType,
    },
    /// Exhaustive scan
    Flat {
        /// Distance metric
        metric: MetricType,
        /// Storage quantization
        quantize: QuantizeType,
    },
    /// Inverted index over a scalar field
    Invert,
}

impl IndexParams {
    /// HNSW parameters; non-positive tunables fall back to defaults
    pub fn hnsw(metric: MetricType, m: i32, ef_construction: i32, quantize: QuantizeType) -> Self {
        IndexParams::Hnsw {
            metric,
            m: if m > 0 { m } else { DEFAULT_HNSW_M },
            ef_construction: if ef_construction > 0 {
                ef_construction
            } else {
                DEFAULT_HNSW_EF_CONSTRUCTION
            },
            quantize,
        }
    }

    /// IVF parameters; a non-positive list count falls back to the default
    pub fn ivf(metric: MetricType, n_list: i32, quantize: QuantizeType) -> Self {
        IndexParams::Ivf {
            metric,
            n_list: if n_list > 0 { n_list } else { DEFAULT_IVF_N_LIST },
            n_iters: DEFAULT_IVF_N_ITERS,
            use_soar: false,
            quantize,
        }
    }

    /// Flat parameters
    pub fn flat(metric: MetricType, quantize: QuantizeType) -> Self {
        IndexParams::Flat { metric, quantize }
    }

    /// Index family of this variant
    pub fn index_type(&self) -> IndexType {
        match self {
            IndexParams::Hnsw { .. } => IndexType::Hnsw,
            IndexParams::Ivf { .. } => IndexType::Ivf,
            IndexParams::Flat { .. } => IndexType::Flat,
            IndexParams::Invert => IndexType::Invert,
        }
    }

    /// Metric, for vector families
    pub fn metric(&self) -> Option<MetricType> {
        match self {
            IndexParams::Hnsw { metric, .. }
            | IndexParams::Ivf { metric, .. }
            | IndexParams::Flat { metric, .. } => Some(*metric),
            IndexParams::Invert => None,
        }
    }

    /// Check if this family only applies to vector fields
    pub fn is_vector_index(&self) -> bool {
        self.index_type().is_vector_index()
    }

    /// Default search-time parameters for this family
    pub fn default_query_params(&self) -> Option<QueryParams> {
        QueryParams::default_for(self.index_type())
    }
}

/// Search-time parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryParams {
    /// HNSW search breadth
    Hnsw {
        /// Candidate list size
        ef: i32,
    },
    /// IVF probe count
    Ivf {
        /// Lists to probe
        nprobe: i32,
    },
    /// Exhaustive scan (no tunables)
    Flat,
}

impl QueryParams {
    /// Default variant for an index family; `None` for non-vector families
    pub fn default_for(index_type: IndexType) -> Option<Self> {
        match index_type {
            IndexType::Hnsw => Some(QueryParams::Hnsw {
                ef: DEFAULT_HNSW_EF_SEARCH,
            }),
            IndexType::Ivf => Some(QueryParams::Ivf {
                nprobe: DEFAULT_IVF_NPROBE,
            }),
            IndexType::Flat => Some(QueryParams::Flat),
            IndexType::Undefined | IndexType::Invert => None,
        }
    }

    /// Index family this variant targets
    pub fn index_type(&self) -> IndexType {
        match self {
            QueryParams::Hnsw { .. } => IndexType::Hnsw,
            QueryParams::Ivf { .. } => IndexType::Ivf,
            QueryParams::Flat => IndexType::Flat,
        }
    }

    /// Set the HNSW search breadth
    ///
    /// # Errors
    /// `InvalidArgument` when this is not an HNSW variant; `self` is unchanged.
    pub fn set_ef(&mut self, value: i32) -> Result<()> {
        match self {
            QueryParams::Hnsw { ef } => {
                *ef = value;
                Ok(())
            }
            other => Err(Error::invalid_argument(format!(
                "ef_search is not supported by {} query parameters",
                other.index_type().name()
            ))),
        }
    }

    /// Set the IVF probe count
    ///
    /// # Errors
    /// `InvalidArgument` when this is not an IVF variant; `self` is unchanged.
    pub fn set_nprobe(&mut self, value: i32) -> Result<()> {
        match self {
            QueryParams::Ivf { nprobe } => {
                *nprobe = value;
                Ok(())
            }
            other => Err(Error::invalid_argument(format!(
                "n_probe is not supported by {} query parameters",
                other.index_type().name()
            ))),
        }
    }
}
