//! Uninstall command - remove a release

use console::style;
use helm_bridge_client::uninstall_release;

use crate::error::Result;

/// Run the uninstall command
pub async fn run(release: &str, namespace: &str, ignore_not_found: bool, debug: bool) -> Result<()> {
    let client = super::client(namespace, debug)?;

    if ignore_not_found {
        let status = uninstall_release(&client, release).await?;
        println!("{} {}", style("✓").green().bold(), status);
        return Ok(());
    }

    client.uninstall_release_by_name(release).await?;
    println!(
        "{} Release {} uninstalled",
        style("✓").green().bold(),
        style(release).cyan()
    );
    Ok(())
}
