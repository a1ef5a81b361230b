//! Helpers for reading caller-owned C data
//!
//! Every input is copied before the call returns; nothing here retains a
//! caller pointer.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Borrow a NUL-terminated UTF-8 string
///
/// Returns `None` for null pointers and invalid UTF-8.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
pub(crate) unsafe fn str_arg<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

/// Borrow `len` elements starting at `ptr`
///
/// A zero length yields an empty slice even for a null pointer.
///
/// # Safety
/// When `len > 0`, `ptr` must be null or valid for `len` reads.
pub(crate) unsafe fn slice_arg<'a, T>(ptr: *const T, len: usize) -> Option<&'a [T]> {
    if len == 0 {
        return Some(&[]);
    }
    if ptr.is_null() {
        return None;
    }
    Some(std::slice::from_raw_parts(ptr, len))
}

/// Copy an array of C strings
///
/// Returns `None` if the array or any entry is null or not UTF-8.
///
/// # Safety
/// `ptr` must be null or valid for `count` reads of string pointers that
/// satisfy [`str_arg`].
pub(crate) unsafe fn string_array_arg(
    ptr: *const *const c_char,
    count: usize,
) -> Option<Vec<String>> {
    slice_arg(ptr, count)?
        .iter()
        .map(|&s| str_arg(s).map(str::to_owned))
        .collect()
}

/// Owned C copy of a Rust string; interior NULs truncate the copy
pub(crate) fn to_cstring(s: &str) -> CString {
    let end = s.find('\0').unwrap_or(s.len());
    CString::new(&s[..end]).unwrap_or_default()
}
