//! Schema handle: build a schema field by field, or inspect one read back
//! from an open collection

use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;
use tracing::debug;
use zvec_core::{CollectionSchema, DataType, FieldSchema};

use crate::descriptor::CFieldDef;
use crate::ffi::{str_arg, to_cstring};
use crate::params::{build_field_schema, field_descriptor};
use crate::status::{invalid_arg, CStatus};

/// Opaque schema handle (`zvec_schema_handle_t`)
///
/// Keeps a C copy of every field name so descriptors returned by the getters
/// can borrow them for the lifetime of the handle.
#[derive(Debug)]
pub struct SchemaHandle {
    pub(crate) schema: CollectionSchema,
    name_cache: CString,
    field_names: Vec<CString>,
}

impl SchemaHandle {
    pub(crate) fn new(schema: CollectionSchema) -> Self {
        let name_cache = to_cstring(schema.name());
        let field_names = schema.fields().iter().map(|f| to_cstring(f.name())).collect();
        SchemaHandle {
            schema,
            name_cache,
            field_names,
        }
    }

    fn push_field(&mut self, field: FieldSchema) -> CStatus {
        let name = to_cstring(field.name());
        match self.schema.add_field(field) {
            Ok(()) => {
                self.field_names.push(name);
                CStatus::ok()
            }
            Err(e) => CStatus::from_error(&e),
        }
    }

    fn describe(&self, field: &FieldSchema) -> CFieldDef {
        let name = self
            .schema
            .fields()
            .iter()
            .position(|f| f.name() == field.name())
            .and_then(|i| self.field_names.get(i))
            .map_or(ptr::null(), |n| n.as_ptr());
        field_descriptor(field, name)
    }
}

/// Create an empty schema
///
/// Returns null when `name` is null or not valid UTF-8.
///
/// # Safety
/// `name` must be null or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn zvec_schema_create(name: *const c_char) -> *mut SchemaHandle {
    let Some(name) = str_arg(name) else {
        return ptr::null_mut();
    };
    let handle = Box::into_raw(Box::new(SchemaHandle::new(CollectionSchema::new(name))));
    debug!(target: "zvec::ffi", schema = name, ?handle, "Created schema handle");
    handle
}

/// Destroy a schema handle
///
/// # Safety
/// `handle` must be null or a live schema handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_schema_destroy(handle: *mut SchemaHandle) {
    if !handle.is_null() {
        debug!(target: "zvec::ffi", ?handle, "Destroying schema handle");
        drop(Box::from_raw(handle));
    }
}

/// Append a field of any type
///
/// # Safety
/// `handle` must be null or a live schema handle; `def` must be null or point
/// to a valid descriptor.
#[no_mangle]
pub unsafe extern "C" fn zvec_schema_add_field(
    handle: *mut SchemaHandle,
    def: *const CFieldDef,
) -> CStatus {
    let (Some(handle), Some(def)) = (handle.as_mut(), def.as_ref()) else {
        return invalid_arg!("null argument");
    };
    match build_field_schema(def) {
        Ok(field) => handle.push_field(field),
        Err(e) => CStatus::from_error(&e),
    }
}

/// Append a field that must have a vector data type
///
/// # Safety
/// See [`zvec_schema_add_field`].
#[no_mangle]
pub unsafe extern "C" fn zvec_schema_add_vector_field(
    handle: *mut SchemaHandle,
    def: *const CFieldDef,
) -> CStatus {
    let (Some(handle), Some(def)) = (handle.as_mut(), def.as_ref()) else {
        return invalid_arg!("null argument");
    };
    if !DataType::from_i32(def.data_type).is_some_and(DataType::is_vector) {
        return invalid_arg!("not a vector field type");
    }
    match build_field_schema(def) {
        Ok(field) => handle.push_field(field),
        Err(e) => CStatus::from_error(&e),
    }
}

/// Schema name, borrowed from the handle
///
/// # Safety
/// `handle` must be null or a live schema handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_schema_get_name(handle: *const SchemaHandle) -> *const c_char {
    handle.as_ref().map_or(ptr::null(), |h| h.name_cache.as_ptr())
}

/// Number of fields
///
/// # Safety
/// `handle` must be null or a live schema handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_schema_get_field_count(handle: *const SchemaHandle) -> usize {
    handle.as_ref().map_or(0, |h| h.schema.fields().len())
}

/// Number of vector-typed fields
///
/// # Safety
/// `handle` must be null or a live schema handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_schema_get_vector_count(handle: *const SchemaHandle) -> usize {
    handle.as_ref().map_or(0, |h| h.schema.vector_fields().len())
}

/// Describe the field at `index` in declaration order
///
/// The name is borrowed from the handle. Out of range yields an all-zero
/// descriptor with a null name.
///
/// # Safety
/// `handle` must be null or a live schema handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_schema_get_field(
    handle: *const SchemaHandle,
    index: usize,
) -> CFieldDef {
    handle
        .as_ref()
        .and_then(|h| h.schema.fields().get(index).map(|f| h.describe(f)))
        .unwrap_or_else(CFieldDef::empty)
}

/// Describe the vector field at `index`, including its index parameters
///
/// # Safety
/// `handle` must be null or a live schema handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_schema_get_vector(
    handle: *const SchemaHandle,
    index: usize,
) -> CFieldDef {
    handle
        .as_ref()
        .and_then(|h| h.schema.vector_fields().get(index).map(|f| h.describe(f)))
        .unwrap_or_else(CFieldDef::empty)
}
