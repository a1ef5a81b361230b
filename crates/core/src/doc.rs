//! Document type
//!
//! A `Doc` is a primary key, a relevance score, and an ordered map of
//! field values. Fields are kept in a `BTreeMap` so iteration order (and
//! therefore snapshot bytes) is deterministic.

use crate::value::{FieldValue, FromFieldValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Doc {
    pk: String,
    score: f64,
    fields: BTreeMap<String, FieldValue>,
}

impl Doc {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document with a primary key
    pub fn with_pk(pk: impl Into<String>) -> Self {
        Doc {
            pk: pk.into(),
            ..Self::default()
        }
    }

    /// Primary key (empty when unset)
    pub fn pk(&self) -> &str {
        &self.pk
    }

    /// Replace the primary key
    pub fn set_pk(&mut self, pk: impl Into<String>) {
        self.pk = pk.into();
    }

    /// Relevance score; only meaningful on query results
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Set the relevance score (engine side only)
    pub fn set_score(&mut self, score: f64) {
        self.score = score;
    }

    /// Store a value, replacing anything previously stored under `field`
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Store an explicit null
    pub fn set_null(&mut self, field: impl Into<String>) {
        self.fields.insert(field.into(), FieldValue::Null);
    }

    /// Store a sparse vector from parallel index/value arrays
    ///
    /// Callers are responsible for passing slices of equal length.
    pub fn set_sparse(&mut self, field: impl Into<String>, indices: &[u32], values: &[f32]) {
        self.fields.insert(
            field.into(),
            FieldValue::SparseVectorFp32 {
                indices: indices.to_vec(),
                values: values.to_vec(),
            },
        );
    }

    /// Typed read; `None` when absent or stored as a different type
    pub fn get<T: FromFieldValue>(&self, field: &str) -> Option<T> {
        self.fields.get(field).and_then(T::from_field_value)
    }

    /// Untyped read
    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Check if the field holds any value, null included
    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Check if the field holds an explicit null
    pub fn is_null(&self, field: &str) -> bool {
        matches!(self.fields.get(field), Some(FieldValue::Null))
    }

    /// Number of fields holding a value
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Iterate fields in name order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copy every field of `other` over this document (update semantics)
    pub fn merge_from(&mut self, other: &Doc) {
        for (name, value) in &other.fields {
            self.fields.insert(name.clone(), value.clone());
        }
    }

    /// Keep only the fields accepted by `keep`
    pub fn retain_fields(&mut self, mut keep: impl FnMut(&str, &FieldValue) -> bool) {
        self.fields.retain(|k, v| keep(k, v));
    }
}
