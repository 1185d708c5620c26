//! CLI commands

pub mod exists;
pub mod install;
pub mod list;
pub mod raw;
pub mod repo;
pub mod uninstall;

use helm_bridge_client::{ClientOptions, HelmClient, sink_for};

use crate::error::Result;

/// Build a client for `namespace`; `debug` forwards Helm's debug output to the log
pub fn client(namespace: &str, debug: bool) -> Result<HelmClient> {
    Ok(HelmClient::new(
        ClientOptions::new(namespace).with_sink(sink_for(!debug)),
    )?)
}
