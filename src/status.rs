//! Status record returned by every fallible call
//!
//! Engine errors keep their code; their message is stored in a thread-local
//! buffer that stays valid until the next failing call on the same thread.
//! Statuses synthesized at the boundary point at static strings.

use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;
use zvec_core::{Error, Result, StatusCode};

/// `zvec_status_t`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CStatus {
    /// 0 on success, otherwise a `StatusCode` value
    pub code: i32,
    /// Null on success, otherwise a borrowed NUL-terminated message
    pub message: *const c_char,
}

thread_local! {
    static LAST_ERROR: RefCell<CString> = RefCell::new(CString::default());
}

/// Build an invalid-argument status over a string literal
macro_rules! invalid_arg {
    ($msg:literal) => {
        $crate::status::CStatus::invalid_argument(concat!($msg, "\0"))
    };
}
pub(crate) use invalid_arg;

impl CStatus {
    /// Success
    pub const fn ok() -> Self {
        CStatus {
            code: 0,
            message: ptr::null(),
        }
    }

    /// Locally synthesized invalid-argument status
    ///
    /// `msg` must end with a NUL byte; use the `invalid_arg!` macro.
    pub(crate) const fn invalid_argument(msg: &'static str) -> Self {
        CStatus {
            code: StatusCode::InvalidArgument as i32,
            message: msg.as_ptr() as *const c_char,
        }
    }

    /// Translate a native error, parking its message in the thread-local buffer
    pub fn from_error(err: &Error) -> Self {
        let message = CString::new(err.to_string().replace('\0', " ")).unwrap_or_default();
        let message = LAST_ERROR.with(|slot| {
            let mut slot = slot.borrow_mut();
            *slot = message;
            slot.as_ptr()
        });
        CStatus {
            code: err.code().as_i32(),
            message,
        }
    }

    /// Translate a native result
    pub fn from_result<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => CStatus::ok(),
            Err(e) => CStatus::from_error(e),
        }
    }

    /// Summary of a batch write: the first failing item, or success
    pub fn first_failure(results: &[Result<()>]) -> Self {
        results
            .iter()
            .find_map(|r| r.as_ref().err())
            .map_or_else(CStatus::ok, CStatus::from_error)
    }

    /// Check for success
    pub fn is_ok(&self) -> bool {
        self.code == 0
    }
}

/// Code written into per-item result arrays
pub(crate) fn item_code(result: &Result<()>) -> i32 {
    match result {
        Ok(()) => StatusCode::Ok.as_i32(),
        Err(e) => e.code().as_i32(),
    }
}
