//! helm-bridge FFI - C ABI over the helm-bridge client
//!
//! Exposes install, uninstall, existence check, listing and repository
//! registration to non-Rust hosts. Each call is self-contained: it builds its
//! own client and runtime, blocks until Helm finishes, and returns a string the
//! caller must hand back to `free_string`. See `include/helm_bridge.h`.
//!
//! In-process Rust callers should use `helm-bridge-client` directly; the
//! [`ops`] module is the same surface on Rust strings.

mod abi;
mod error;
pub mod ops;
mod strings;

pub use abi::{
    add_repo, free_string, init_logging, install_release, list_releases, release_exists,
    uninstall_release,
};
pub use error::BoundaryError;
