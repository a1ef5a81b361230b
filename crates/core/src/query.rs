//! Vector query descriptor
//!
//! The query vector travels as an opaque byte buffer holding the
//! little-endian encoding of a dense f32 vector. `encode_vector` and
//! `decode_vector` are the only two places that know that layout.

use crate::error::{Error, Result};
use crate::params::QueryParams;
use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

/// Default result cardinality
pub const DEFAULT_TOPK: i32 = 10;

/// Similarity query against one vector field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorQuery {
    /// Number of results to return
    pub topk: i32,
    /// Target vector field
    pub field_name: String,
    /// Encoded query vector
    pub query_vector: Vec<u8>,
    /// Optional filter expression over scalar fields
    pub filter: Option<String>,
    /// Whether vector fields are included in results
    pub include_vector: bool,
    /// Fields to project; `None` returns every scalar field
    pub output_fields: Option<Vec<String>>,
    /// Search-time parameters for the target field's index family
    pub query_params: Option<QueryParams>,
}

impl Default for VectorQuery {
    fn default() -> Self {
        VectorQuery {
            topk: DEFAULT_TOPK,
            field_name: String::new(),
            query_vector: Vec::new(),
            filter: None,
            include_vector: false,
            output_fields: None,
            query_params: None,
        }
    }
}

impl VectorQuery {
    /// Create a query with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the query vector
    pub fn set_vector(&mut self, vector: &[f32]) {
        self.query_vector = encode_vector(vector);
    }

    /// Decode the query vector
    ///
    /// # Errors
    /// `InvalidArgument` if the payload length is not a multiple of 4.
    pub fn vector(&self) -> Result<Vec<f32>> {
        decode_vector(&self.query_vector)
    }

    /// Set the HNSW search breadth, installing HNSW parameters if none are set
    ///
    /// # Errors
    /// `InvalidArgument` if the query already targets another family.
    pub fn set_ef_search(&mut self, ef: i32) -> Result<()> {
        match self.query_params.as_mut() {
            Some(params) => params.set_ef(ef),
            None => {
                self.query_params = Some(QueryParams::Hnsw { ef });
                Ok(())
            }
        }
    }

    /// Set the IVF probe count, installing IVF parameters if none are set
    ///
    /// # Errors
    /// `InvalidArgument` if the query already targets another family.
    pub fn set_n_probe(&mut self, nprobe: i32) -> Result<()> {
        match self.query_params.as_mut() {
            Some(params) => params.set_nprobe(nprobe),
            None => {
                self.query_params = Some(QueryParams::Ivf { nprobe });
                Ok(())
            }
        }
    }
}

/// Encode a dense vector into the query payload layout
pub fn encode_vector(vector: &[f32]) -> Vec<u8> {
    let mut buf = vec![0u8; vector.len() * 4];
    LittleEndian::write_f32_into(vector, &mut buf);
    buf
}

/// Decode the query payload layout into a dense vector
///
/// # Errors
/// `InvalidArgument` if the payload length is not a multiple of 4.
pub fn decode_vector(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(Error::invalid_argument(format!(
            "query vector payload of {} bytes is not a whole number of f32 values",
            bytes.len()
        )));
    }
    let mut out = vec![0f32; bytes.len() / 4];
    LittleEndian::read_f32_into(bytes, &mut out);
    Ok(out)
}
