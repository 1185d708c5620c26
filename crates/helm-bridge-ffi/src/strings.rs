//! String transfer across the boundary
//!
//! Arguments are borrowed for the duration of one call. Results are heap
//! `CString`s handed to the caller, who returns them through `free_string`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crate::error::BoundaryError;

/// Borrow a required string argument
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// and unmodified for `'a`.
pub(crate) unsafe fn borrow_str<'a>(
    ptr: *const c_char,
    name: &'static str,
) -> Result<&'a str, BoundaryError> {
    if ptr.is_null() {
        return Err(BoundaryError::NullArgument { name });
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| BoundaryError::InvalidUtf8 { name })
}

/// Hand a string to the caller
///
/// Interior NUL bytes are replaced with U+FFFD so a result can always be
/// produced.
pub(crate) fn into_raw(value: String) -> *mut c_char {
    let value = if value.contains('\0') {
        value.replace('\0', "\u{FFFD}")
    } else {
        value
    };

    match CString::new(value) {
        Ok(s) => s.into_raw(),
        // Unreachable after the replacement above
        Err(_) => std::ptr::null_mut(),
    }
}

/// Take back a string produced by [`into_raw`]
///
/// # Safety
///
/// `ptr` must be null or a pointer returned by [`into_raw`] that has not been
/// released yet.
pub(crate) unsafe fn release(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    drop(unsafe { CString::from_raw(ptr) });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_borrow_str() {
        let owned = CString::new("demo").unwrap();
        assert_eq!(unsafe { borrow_str(owned.as_ptr(), "release_name") }.unwrap(), "demo");

        let err = unsafe { borrow_str(std::ptr::null(), "release_name") }.unwrap_err();
        assert_eq!(err.to_string(), "argument 'release_name' is null");

        let bad = CString::new(vec![0xff, 0xfe]).unwrap();
        let err = unsafe { borrow_str(bad.as_ptr(), "namespace") }.unwrap_err();
        assert!(matches!(err, BoundaryError::InvalidUtf8 { name: "namespace" }));
    }

    #[test]
    fn test_into_raw_replaces_nul() {
        let ptr = into_raw("a\0b".to_string());
        let back = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string();
        unsafe { release(ptr) };
        assert_eq!(back, "a\u{FFFD}b");
    }

    #[test]
    fn test_release_null_is_noop() {
        unsafe { release(std::ptr::null_mut()) };
    }
}
