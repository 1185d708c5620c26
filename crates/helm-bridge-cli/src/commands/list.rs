//! List command - list releases in a namespace

use helm_bridge_client::StateMask;

use crate::display;
use crate::error::{CliError, Result};

/// Run the list command
pub async fn run(namespace: &str, output_json: bool, debug: bool) -> Result<()> {
    let client = super::client(namespace, debug)?;
    let releases = client.list_releases_by_state_mask(StateMask::All).await?;

    if output_json {
        let json = serde_json::to_string_pretty(&releases)
            .map_err(|e| CliError::internal(e.to_string()))?;
        println!("{}", json);
        return Ok(());
    }

    display::print_releases(namespace, &releases);
    Ok(())
}
