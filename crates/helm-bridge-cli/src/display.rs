//! Display formatting for CLI output

use console::{StyledObject, style};
use helm_bridge_client::RepoIndex;
use helm_bridge_core::{ReleaseStatus, ReleaseSummary};

fn status_style(release: &ReleaseSummary) -> StyledObject<&str> {
    let label = release.status.as_str();
    match release.status() {
        ReleaseStatus::Deployed => style(label).green(),
        ReleaseStatus::Failed => style(label).red(),
        s if s.is_pending() => style(label).yellow(),
        _ => style(label).dim(),
    }
}

/// Print releases as a table
pub fn print_releases(namespace: &str, releases: &[ReleaseSummary]) {
    if releases.is_empty() {
        println!("No releases found in namespace {}", namespace);
        return;
    }

    println!(
        "{:<24} {:<15} {:<15} {:<18} {:<30}",
        style("NAME").bold(),
        style("NAMESPACE").bold(),
        style("VERSION").bold(),
        style("STATUS").bold(),
        style("UPDATED").bold()
    );

    for release in releases {
        println!(
            "{:<24} {:<15} {:<15} {:<18} {:<30}",
            release.name,
            release.namespace,
            release.version,
            status_style(release),
            release.last_updated
        );
    }
}

/// Print the latest version of each chart in an index
pub fn print_index(index: &RepoIndex, chart: Option<&str>) {
    let mut names: Vec<&str> = match chart {
        Some(chart) => vec![chart],
        None => index.entries.keys().map(String::as_str).collect(),
    };
    names.sort_unstable();

    println!(
        "{:<30} {:<15} {:<15} {}",
        style("CHART").bold(),
        style("VERSION").bold(),
        style("APP VERSION").bold(),
        style("DESCRIPTION").bold()
    );

    for name in names {
        let Some(latest) = index.latest_version(name) else {
            println!("{:<30} {}", name, style("no versions").dim());
            continue;
        };
        println!(
            "{:<30} {:<15} {:<15} {}",
            name,
            latest.version,
            latest.app_version.as_deref().unwrap_or(""),
            latest.description.as_deref().unwrap_or("")
        );
    }
}
