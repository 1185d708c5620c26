//! Exported C functions
//!
//! Returned strings follow the result convention: `""` on success without
//! payload, the payload itself (a JSON array for listings), or `ERROR:`
//! followed by a description. Every returned pointer must be released exactly
//! once with [`free_string`].

use std::any::Any;
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};

use helm_bridge_core::Outcome;

use crate::error::BoundaryError;
use crate::ops;
use crate::strings::{borrow_str, into_raw, release};

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "operation panicked".to_string()
    }
}

/// Run one operation, converting errors and panics into the result string
fn respond<F>(operation: F) -> *mut c_char
where
    F: FnOnce() -> Result<Outcome, BoundaryError>,
{
    let outcome = match panic::catch_unwind(AssertUnwindSafe(operation)) {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => Outcome::failure(e),
        Err(payload) => Outcome::failure(BoundaryError::Panic(panic_message(payload))),
    };
    into_raw(outcome.into_wire())
}

#[unsafe(no_mangle)]
pub extern "C" fn install_release(
    release_name: *const c_char,
    chart_name: *const c_char,
    chart_version: *const c_char,
    values_yaml: *const c_char,
    namespace: *const c_char,
    suppress_output: bool,
) -> *mut c_char {
    respond(|| {
        let release_name = unsafe { borrow_str(release_name, "release_name") }?;
        let chart_name = unsafe { borrow_str(chart_name, "chart_name") }?;
        let chart_version = unsafe { borrow_str(chart_version, "chart_version") }?;
        let values_yaml = unsafe { borrow_str(values_yaml, "values_yaml") }?;
        let namespace = unsafe { borrow_str(namespace, "namespace") }?;

        Ok(ops::install(
            release_name,
            chart_name,
            chart_version,
            values_yaml,
            namespace,
            suppress_output,
        ))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uninstall_release(
    release_name: *const c_char,
    namespace: *const c_char,
    suppress_output: bool,
) -> *mut c_char {
    respond(|| {
        let release_name = unsafe { borrow_str(release_name, "release_name") }?;
        let namespace = unsafe { borrow_str(namespace, "namespace") }?;
        Ok(ops::uninstall(release_name, namespace, suppress_output))
    })
}

/// Never fails; invalid arguments and lookup errors read as `false`
#[unsafe(no_mangle)]
pub extern "C" fn release_exists(release_name: *const c_char, namespace: *const c_char) -> bool {
    panic::catch_unwind(AssertUnwindSafe(|| {
        let release_name = unsafe { borrow_str(release_name, "release_name") }.ok()?;
        let namespace = unsafe { borrow_str(namespace, "namespace") }.ok()?;
        Some(ops::exists(release_name, namespace))
    }))
    .ok()
    .flatten()
    .unwrap_or(false)
}

#[unsafe(no_mangle)]
pub extern "C" fn list_releases(namespace: *const c_char) -> *mut c_char {
    respond(|| {
        let namespace = unsafe { borrow_str(namespace, "namespace") }?;
        Ok(ops::list(namespace))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn add_repo(repo_name: *const c_char, repo_url: *const c_char) -> *mut c_char {
    respond(|| {
        let repo_name = unsafe { borrow_str(repo_name, "repo_name") }?;
        let repo_url = unsafe { borrow_str(repo_url, "repo_url") }?;
        Ok(ops::add_repo(repo_name, repo_url))
    })
}

/// Install a stderr `tracing` subscriber; null uses `RUST_LOG` or `info`
#[unsafe(no_mangle)]
pub extern "C" fn init_logging(filter: *const c_char) -> *mut c_char {
    respond(|| {
        let filter = if filter.is_null() {
            None
        } else {
            Some(unsafe { borrow_str(filter, "filter") }?)
        };
        Ok(ops::init_logging(filter))
    })
}

/// Release a string returned by this library; null is a no-op
#[unsafe(no_mangle)]
pub extern "C" fn free_string(ptr: *mut c_char) {
    // SAFETY: the caller passes a pointer obtained from this library, once
    unsafe { release(ptr) }
}
