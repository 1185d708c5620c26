//! Install command - install a chart as a new release

use std::path::Path;

use console::style;
use helm_bridge_client::{ChartVersion, install_release_from_repo};
use helm_bridge_core::ChartSpec;

use crate::error::{CliError, Result};

/// Read the values document, if any
pub fn read_values(values: Option<&Path>) -> Result<String> {
    match values {
        Some(path) => std::fs::read_to_string(path).map_err(|e| CliError::Io {
            message: format!("{}: {}", path.display(), e),
        }),
        None => Ok(String::new()),
    }
}

/// Run the install command
pub async fn run(
    release: &str,
    chart: &str,
    version: Option<&str>,
    values: Option<&Path>,
    namespace: &str,
    skip_existing: bool,
    debug: bool,
) -> Result<()> {
    let values_yaml = read_values(values)?;
    let client = super::client(namespace, debug)?;

    println!(
        "{} Installing {} from {} into namespace {}",
        style("→").blue().bold(),
        style(release).cyan(),
        style(chart).cyan(),
        style(namespace).yellow()
    );

    if skip_existing {
        let (repo_name, chart_name) = chart.split_once('/').ok_or_else(|| {
            CliError::input_with_help(
                format!("chart '{}' is not a repository reference", chart),
                "--skip-existing expects <repo>/<chart>",
            )
        })?;
        let chart = ChartVersion {
            repo_name,
            chart_name,
            chart_version: version,
        };
        let values = (!values_yaml.is_empty()).then_some(values_yaml.as_str());

        let status = install_release_from_repo(&client, release, chart, values).await?;
        println!("{} {}", style("✓").green().bold(), status);
        return Ok(());
    }

    let spec = ChartSpec::new(release, chart, namespace)
        .with_version(version.unwrap_or_default())
        .with_values(values_yaml);
    client.install_chart(&spec).await?;

    println!(
        "{} Release {} installed",
        style("✓").green().bold(),
        style(release).cyan()
    );
    Ok(())
}
