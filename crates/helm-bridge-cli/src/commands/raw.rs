//! Raw mode - print boundary result strings verbatim
//!
//! Goes through the same operations as the C ABI, so the output is exactly
//! what a host would receive.

use helm_bridge::ops;
use helm_bridge_core::to_helm_error;

use crate::exit_codes;

/// Print a result string and return its exit code
pub fn emit(wire: String) -> i32 {
    println!("{}", wire);
    if to_helm_error(&wire).is_some() {
        exit_codes::ERROR
    } else {
        exit_codes::SUCCESS
    }
}

pub fn install(
    release: &str,
    chart: &str,
    version: &str,
    values_yaml: &str,
    namespace: &str,
    debug: bool,
) -> i32 {
    emit(ops::install(release, chart, version, values_yaml, namespace, !debug).into_wire())
}

pub fn uninstall(release: &str, namespace: &str, debug: bool) -> i32 {
    emit(ops::uninstall(release, namespace, !debug).into_wire())
}

pub fn exists(release: &str, namespace: &str) -> i32 {
    println!("{}", ops::exists(release, namespace));
    exit_codes::SUCCESS
}

pub fn list(namespace: &str) -> i32 {
    emit(ops::list(namespace).into_wire())
}

pub fn add_repo(name: &str, url: &str) -> i32 {
    emit(ops::add_repo(name, url).into_wire())
}
