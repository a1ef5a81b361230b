//! Field and collection schemas

use crate::error::{Error, Result};
use crate::params::IndexParams;
use crate::types::{DataType, IndexType};
use crate::value::FieldValue;
use serde::{Deserialize, Serialize};

/// Definition of one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    name: String,
    data_type: DataType,
    dimension: u32,
    nullable: bool,
    index_params: Option<IndexParams>,
}

impl FieldSchema {
    /// Create a field without an index
    pub fn new(
        name: impl Into<String>,
        data_type: DataType,
        dimension: u32,
        nullable: bool,
    ) -> Self {
        FieldSchema {
            name: name.into(),
            data_type,
            dimension,
            nullable,
            index_params: None,
        }
    }

    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared data type
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Vector dimension (0 for scalars)
    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Whether null values are accepted
    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// Check if the declared type is a vector kind
    pub fn is_vector_field(&self) -> bool {
        self.data_type.is_vector()
    }

    /// Attached index parameters
    pub fn index_params(&self) -> Option<&IndexParams> {
        self.index_params.as_ref()
    }

    /// Index family, `Undefined` when no index is attached
    pub fn index_type(&self) -> IndexType {
        self.index_params
            .as_ref()
            .map(IndexParams::index_type)
            .unwrap_or_default()
    }

    /// Attach index parameters after checking the family fits the field
    ///
    /// # Errors
    /// - `InvalidArgument` if a vector family is attached to a scalar field
    /// - `InvalidArgument` if the inverted index is attached to a vector field
    pub fn set_index_params(&mut self, params: IndexParams) -> Result<()> {
        check_index_fits(&self.name, self.data_type, &params)?;
        self.index_params = Some(params);
        Ok(())
    }

    /// Remove the attached index, returning it
    pub fn clear_index_params(&mut self) -> Option<IndexParams> {
        self.index_params.take()
    }

    /// Check a value against this field's type, nullability, and dimension
    ///
    /// # Errors
    /// `InvalidArgument` describing the first rule the value breaks.
    pub fn validate_value(&self, value: &FieldValue) -> Result<()> {
        if value.is_null() {
            if self.nullable {
                return Ok(());
            }
            return Err(Error::invalid_argument(format!(
                "field '{}' is not nullable",
                self.name
            )));
        }
        if !value.fits(self.data_type) {
            return Err(Error::invalid_argument(format!(
                "field '{}' expects {}, got {}",
                self.name,
                self.data_type.name(),
                value.type_name()
            )));
        }
        match value {
            FieldValue::VectorFp32(v)
                if self.dimension > 0 && v.len() != self.dimension as usize =>
            {
                Err(Error::invalid_argument(format!(
                    "field '{}' dimension mismatch: expected {}, got {}",
                    self.name,
                    self.dimension,
                    v.len()
                )))
            }
            FieldValue::SparseVectorFp32 { indices, values } if indices.len() != values.len() => {
                Err(Error::invalid_argument(format!(
                    "field '{}' sparse vector has {} indices and {} values",
                    self.name,
                    indices.len(),
                    values.len()
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Check that an index family may be attached to a field of `data_type`
pub fn check_index_fits(field: &str, data_type: DataType, params: &IndexParams) -> Result<()> {
    if params.is_vector_index() && !data_type.is_vector() {
        return Err(Error::invalid_argument(format!(
            "{} index requires a vector field, '{}' is {}",
            params.index_type().name(),
            field,
            data_type.name()
        )));
    }
    if matches!(params, IndexParams::Invert) && data_type.is_vector() {
        return Err(Error::invalid_argument(format!(
            "invert index requires a scalar field, '{}' is {}",
            field,
            data_type.name()
        )));
    }
    Ok(())
}

/// Named, ordered list of field definitions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CollectionSchema {
    name: String,
    fields: Vec<FieldSchema>,
}

impl CollectionSchema {
    /// Create an empty schema
    pub fn new(name: impl Into<String>) -> Self {
        CollectionSchema {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Schema name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a field
    ///
    /// # Errors
    /// `AlreadyExists` if a field with the same name is present.
    pub fn add_field(&mut self, field: FieldSchema) -> Result<()> {
        if self.has_field(field.name()) {
            return Err(Error::already_exists(format!(
                "field '{}' already exists in schema '{}'",
                field.name(),
                self.name
            )));
        }
        self.fields.push(field);
        Ok(())
    }

    /// Check if a field with this name exists
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name() == name)
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Look up a field by name for mutation (engine-side index changes)
    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldSchema> {
        self.fields.iter_mut().find(|f| f.name() == name)
    }

    /// All fields in declaration order
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Vector-typed fields in declaration order
    pub fn vector_fields(&self) -> Vec<&FieldSchema> {
        self.fields.iter().filter(|f| f.is_vector_field()).collect()
    }

    /// Check the schema can back a collection
    ///
    /// # Errors
    /// `InvalidSchema` if the schema has no fields or a vector field has no dimension.
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(Error::invalid_schema(format!(
                "schema '{}' has no fields",
                self.name
            )));
        }
        for field in &self.fields {
            if field.data_type().is_dense_vector() && field.dimension() == 0 {
                return Err(Error::invalid_schema(format!(
                    "vector field '{}' has dimension 0",
                    field.name()
                )));
            }
            if field.data_type() == DataType::Undefined {
                return Err(Error::invalid_schema(format!(
                    "field '{}' has undefined data type",
                    field.name()
                )));
            }
        }
        Ok(())
    }
}
