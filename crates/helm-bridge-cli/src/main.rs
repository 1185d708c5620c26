//! helm-bridge CLI - Helm release operations from the command line

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use helm_bridge_client::config::{ENV_HELM_BIN, ENV_KUBE_CONTEXT, ENV_KUBECONFIG};
use tracing_subscriber::EnvFilter;

mod commands;
mod display;
mod error;
mod exit_codes;

use error::{CliError, Result};

#[derive(Parser)]
#[command(name = "helm-bridge")]
#[command(author = "helm-bridge Contributors")]
#[command(version)]
#[command(about = "Install, inspect and remove Helm releases", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Args)]
struct GlobalArgs {
    /// Enable debug output (includes Helm's own debug log)
    #[arg(long, global = true)]
    debug: bool,

    /// Print result strings exactly as the C library returns them
    #[arg(long, global = true)]
    raw: bool,

    /// Path to the helm executable
    #[arg(long, global = true, env = ENV_HELM_BIN)]
    helm_bin: Option<PathBuf>,

    /// Kubeconfig file
    #[arg(long, global = true, env = ENV_KUBECONFIG)]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context
    #[arg(long, global = true, env = ENV_KUBE_CONTEXT)]
    kube_context: Option<String>,
}

impl GlobalArgs {
    /// Hand connection settings to every client through the environment
    fn export(&self) {
        let vars = [
            (ENV_HELM_BIN, self.helm_bin.as_ref().map(|p| p.as_os_str().to_owned())),
            (ENV_KUBECONFIG, self.kubeconfig.as_ref().map(|p| p.as_os_str().to_owned())),
            (ENV_KUBE_CONTEXT, self.kube_context.as_ref().map(Into::into)),
        ];
        for (key, value) in vars {
            if let Some(value) = value {
                // SAFETY: We're the only thread at this point (start of main)
                unsafe { std::env::set_var(key, value) };
            }
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Install a chart as a new release
    #[command(disable_version_flag = true)]
    Install {
        /// Release name
        release: String,

        /// Chart reference (<repo>/<chart>, path or URL)
        chart: String,

        /// Chart version
        #[arg(long)]
        version: Option<String>,

        /// Values file
        #[arg(short = 'f', long = "values")]
        values: Option<PathBuf>,

        /// Target namespace
        #[arg(short, long, default_value = "default")]
        namespace: String,

        /// Skip when the release already exists at the requested version
        #[arg(long)]
        skip_existing: bool,
    },

    /// Uninstall a release
    Uninstall {
        /// Release name
        release: String,

        /// Namespace
        #[arg(short, long, default_value = "default")]
        namespace: String,

        /// Succeed when the release does not exist
        #[arg(long)]
        ignore_not_found: bool,
    },

    /// Check whether a release exists
    Exists {
        /// Release name
        release: String,

        /// Namespace
        #[arg(short, long, default_value = "default")]
        namespace: String,
    },

    /// List releases in a namespace
    List {
        /// Namespace
        #[arg(short, long, default_value = "default")]
        namespace: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage chart repositories
    Repo {
        #[command(subcommand)]
        command: RepoCommands,
    },
}

#[derive(Subcommand)]
enum RepoCommands {
    /// Add a repository (replaces an existing entry of the same name)
    Add {
        /// Repository name
        name: String,

        /// Repository URL
        url: String,
    },

    /// Show the latest chart versions published by a repository
    Index {
        /// Repository URL
        url: String,

        /// Only show this chart
        chart: Option<String>,
    },
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run through the C ABI operations, printing the raw result
fn run_raw(command: &Commands, debug: bool) -> Result<i32> {
    let code = match command {
        Commands::Install {
            release,
            chart,
            version,
            values,
            namespace,
            ..
        } => {
            let values_yaml = commands::install::read_values(values.as_deref())?;
            commands::raw::install(
                release,
                chart,
                version.as_deref().unwrap_or_default(),
                &values_yaml,
                namespace,
                debug,
            )
        }
        Commands::Uninstall {
            release, namespace, ..
        } => commands::raw::uninstall(release, namespace, debug),
        Commands::Exists { release, namespace } => commands::raw::exists(release, namespace),
        Commands::List { namespace, .. } => commands::raw::list(namespace),
        Commands::Repo {
            command: RepoCommands::Add { name, url },
        } => commands::raw::add_repo(name, url),
        Commands::Repo {
            command: RepoCommands::Index { .. },
        } => {
            return Err(CliError::input(
                "--raw is only available for operations of the C library",
            ));
        }
    };
    Ok(code)
}

fn run(command: Commands, debug: bool) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::internal(e.to_string()))?;

    runtime.block_on(async {
        match command {
            Commands::Install {
                release,
                chart,
                version,
                values,
                namespace,
                skip_existing,
            } => {
                commands::install::run(
                    &release,
                    &chart,
                    version.as_deref(),
                    values.as_deref(),
                    &namespace,
                    skip_existing,
                    debug,
                )
                .await
            }

            Commands::Uninstall {
                release,
                namespace,
                ignore_not_found,
            } => commands::uninstall::run(&release, &namespace, ignore_not_found, debug).await,

            Commands::Exists { release, namespace } => {
                commands::exists::run(&release, &namespace, debug).await
            }

            Commands::List { namespace, json } => commands::list::run(&namespace, json, debug).await,

            Commands::Repo { command } => match command {
                RepoCommands::Add { name, url } => commands::repo::add(&name, &url, debug).await,
                RepoCommands::Index { url, chart } => {
                    commands::repo::index(&url, chart.as_deref()).await
                }
            },
        }
    })
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    cli.global.export();
    init_tracing(cli.global.debug);

    let result = if cli.global.raw {
        run_raw(&cli.command, cli.global.debug)
    } else {
        run(cli.command, cli.global.debug).map(|()| exit_codes::SUCCESS)
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            std::process::exit(code);
        }
    }
}
