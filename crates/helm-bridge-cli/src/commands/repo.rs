//! Repository commands

use console::style;
use helm_bridge_client::fetch_repo_index;
use helm_bridge_core::RepoEntry;

use crate::display;
use crate::error::{CliError, Result};

/// Add a repository, replacing an existing entry of the same name
pub async fn add(name: &str, url: &str, debug: bool) -> Result<()> {
    let repo = RepoEntry::new(name, url).map_err(|e| CliError::input(e.to_string()))?;
    let client = super::client("default", debug)?;

    client.add_or_update_chart_repo(&repo).await?;
    println!(
        "{} \"{}\" has been added to your repositories",
        style("✓").green().bold(),
        name
    );
    Ok(())
}

/// Show the latest chart versions published by a repository
pub async fn index(url: &str, chart: Option<&str>) -> Result<()> {
    let index = fetch_repo_index(url).await?;

    if let Some(chart) = chart {
        if index.versions(chart).is_empty() {
            return Err(CliError::NotFound {
                message: format!("chart '{}' not found in {}", chart, url),
            });
        }
    }

    display::print_index(&index, chart);
    Ok(())
}
