//! Exists command - check whether a release is installed

use crate::error::Result;

/// Run the exists command
pub async fn run(release: &str, namespace: &str, debug: bool) -> Result<()> {
    let client = super::client(namespace, debug)?;
    println!("{}", client.release_exists(release).await);
    Ok(())
}
