//! Result handle: an ordered set of documents from a query or fetch

use std::ptr;
use tracing::debug;
use zvec_core::Doc;

use crate::document::DocHandle;

/// Opaque result handle (`zvec_result_handle_t`)
///
/// Owns one document handle per entry; `zvec_result_get_doc` lends them out.
#[derive(Debug, Default)]
pub struct ResultHandle {
    docs: Vec<DocHandle>,
}

impl ResultHandle {
    pub(crate) fn into_raw(docs: Vec<Doc>) -> *mut ResultHandle {
        let handle = Box::into_raw(Box::new(ResultHandle {
            docs: docs.into_iter().map(DocHandle::new).collect(),
        }));
        debug!(target: "zvec::ffi", ?handle, "Created result handle");
        handle
    }
}

/// Destroy a result and every document it lends out
///
/// # Safety
/// `handle` must be null or a live result handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_result_destroy(handle: *mut ResultHandle) {
    if !handle.is_null() {
        debug!(target: "zvec::ffi", ?handle, "Destroying result handle");
        drop(Box::from_raw(handle));
    }
}

/// Number of documents
///
/// # Safety
/// `handle` must be null or a live result handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_result_count(handle: *const ResultHandle) -> usize {
    handle.as_ref().map_or(0, |h| h.docs.len())
}

/// Borrow the document at `index`, null when out of range
///
/// The document belongs to the result: read it with the `zvec_doc_get_*`
/// accessors and never pass it to `zvec_doc_destroy`.
///
/// # Safety
/// `handle` must be null or a live result handle.
#[no_mangle]
pub unsafe extern "C" fn zvec_result_get_doc(
    handle: *mut ResultHandle,
    index: usize,
) -> *mut DocHandle {
    handle
        .as_mut()
        .and_then(|h| h.docs.get_mut(index))
        .map_or(ptr::null_mut(), |d| d as *mut DocHandle)
}
