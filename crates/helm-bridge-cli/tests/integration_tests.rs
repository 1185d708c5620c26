//! Integration tests for CLI commands

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Get the fixtures path
fn fixtures_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures")
}

/// Run helm-bridge against the fake helm with its own release state
fn helm_bridge(state: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_helm-bridge"))
        .args(args)
        .env("HELM_BRIDGE_HELM_BIN", format!("{}/fake-helm.sh", fixtures_path()))
        .env("FAKE_HELM_STATE_DIR", state)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute helm-bridge")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

mod raw_mode {
    use super::*;

    #[test]
    fn test_empty_list() {
        let state = TempDir::new().unwrap();
        let output = helm_bridge(state.path(), &["--raw", "list", "-n", "empty"]);

        assert!(output.status.success());
        assert_eq!(stdout(&output), "[]\n");
    }

    #[test]
    fn test_install_then_exists() {
        let state = TempDir::new().unwrap();

        let output = helm_bridge(
            state.path(),
            &["--raw", "install", "demo", "stable/nginx", "--version", "1.2.3"],
        );
        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert_eq!(stdout(&output), "\n");

        let output = helm_bridge(state.path(), &["--raw", "exists", "demo"]);
        assert_eq!(stdout(&output), "true\n");

        let output = helm_bridge(state.path(), &["--raw", "list"]);
        let releases: Vec<serde_json::Value> = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(releases[0]["name"], "demo");
        assert_eq!(releases[0]["version"], "1.2.3");
    }

    #[test]
    fn test_failure_prints_error_string() {
        let state = TempDir::new().unwrap();
        let output = helm_bridge(state.path(), &["--raw", "uninstall", "ghost"]);

        assert_eq!(output.status.code(), Some(1));
        insta::assert_snapshot!(stdout(&output).trim_end(), @"ERROR:uninstall: Release not loaded: ghost: release: not found");
    }

    #[test]
    fn test_index_has_no_raw_form() {
        let state = TempDir::new().unwrap();
        let output = helm_bridge(
            state.path(),
            &["--raw", "repo", "index", "https://charts.example.com"],
        );

        assert_eq!(output.status.code(), Some(64));
    }
}

mod install_command {
    use super::*;

    #[test]
    fn test_install_and_list_json() {
        let state = TempDir::new().unwrap();

        let output = helm_bridge(
            state.path(),
            &["install", "web", "stable/nginx", "--version", "1.2.3", "-n", "apps"],
        );
        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(stdout(&output).contains("installed"));

        let output = helm_bridge(state.path(), &["list", "-n", "apps", "--json"]);
        let releases: Vec<serde_json::Value> = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0]["namespace"], "apps");
        assert_eq!(releases[0]["status"], "deployed");
    }

    #[test]
    fn test_install_with_values_file() {
        let state = TempDir::new().unwrap();
        let values = state.path().join("values.yaml");
        std::fs::write(&values, "replicaCount: 3\n").unwrap();

        let output = helm_bridge(
            state.path(),
            &["install", "web", "stable/nginx", "-f", values.to_str().unwrap()],
        );
        assert!(output.status.success(), "stderr: {}", stderr(&output));

        let seen = std::fs::read_to_string(state.path().join("releases/default/web.values")).unwrap();
        assert_eq!(seen, "replicaCount: 3\n");
    }

    #[test]
    fn test_missing_values_file() {
        let state = TempDir::new().unwrap();
        let output = helm_bridge(
            state.path(),
            &["install", "web", "stable/nginx", "-f", "/nonexistent/values.yaml"],
        );

        assert_eq!(output.status.code(), Some(5));
    }

    #[test]
    fn test_skip_existing() {
        let state = TempDir::new().unwrap();
        let args = [
            "install",
            "web",
            "stable/nginx",
            "--version",
            "1.2.3",
            "--skip-existing",
        ];

        let first = helm_bridge(state.path(), &args);
        assert!(first.status.success(), "stderr: {}", stderr(&first));
        assert!(stdout(&first).contains("The release web was successfully installed."));

        let second = helm_bridge(state.path(), &args);
        assert!(second.status.success());
        assert!(stdout(&second).contains("is already installed (requested 1.2.3), skipping."));
    }

    #[test]
    fn test_version_conflict() {
        let state = TempDir::new().unwrap();
        helm_bridge(state.path(), &["install", "web", "stable/nginx", "--version", "1.0.0"]);

        let output = helm_bridge(
            state.path(),
            &["install", "web", "stable/nginx", "--version", "1.2.3", "--skip-existing"],
        );
        assert_eq!(output.status.code(), Some(64));
        assert!(stderr(&output).contains("(1.0.0)"));
    }

    #[test]
    fn test_helm_failure_exit_code() {
        let state = TempDir::new().unwrap();
        let output = helm_bridge(state.path(), &["install", "web", "nginx"]);

        assert_eq!(output.status.code(), Some(2));
        assert!(stderr(&output).contains("repo_name/path_to_chart"));
    }

    #[test]
    fn test_missing_helm_binary() {
        let state = TempDir::new().unwrap();
        let output = helm_bridge(
            state.path(),
            &["--helm-bin", "/nonexistent/helm", "install", "web", "stable/nginx"],
        );

        assert_eq!(output.status.code(), Some(2));
        assert!(stderr(&output).contains("HELM_BRIDGE_HELM_BIN"));
    }
}

mod uninstall_command {
    use super::*;

    #[test]
    fn test_not_found_exit_code() {
        let state = TempDir::new().unwrap();
        let output = helm_bridge(state.path(), &["uninstall", "ghost"]);

        assert_eq!(output.status.code(), Some(3));
    }

    #[test]
    fn test_ignore_not_found() {
        let state = TempDir::new().unwrap();
        let output = helm_bridge(state.path(), &["uninstall", "ghost", "--ignore-not-found"]);

        assert!(output.status.success());
        assert!(stdout(&output).contains("The release ghost is not installed, skipping."));
    }

    #[test]
    fn test_uninstall_existing() {
        let state = TempDir::new().unwrap();
        helm_bridge(state.path(), &["install", "web", "stable/nginx"]);

        let output = helm_bridge(state.path(), &["uninstall", "web"]);
        assert!(output.status.success());

        let output = helm_bridge(state.path(), &["exists", "web"]);
        assert_eq!(stdout(&output), "false\n");
    }
}

mod repo_command {
    use super::*;

    #[test]
    fn test_add_repository() {
        let state = TempDir::new().unwrap();
        let output = helm_bridge(
            state.path(),
            &["repo", "add", "stable", "https://charts.helm.sh/stable"],
        );

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        let url = std::fs::read_to_string(state.path().join("repos/stable")).unwrap();
        assert_eq!(url.trim(), "https://charts.helm.sh/stable");
    }

    #[test]
    fn test_invalid_repository_url() {
        let state = TempDir::new().unwrap();
        let output = helm_bridge(state.path(), &["repo", "add", "local", "file:///tmp/charts"]);

        assert_eq!(output.status.code(), Some(64));
    }
}
