// src/main.rs

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use slackstat::config::Config;
use slackstat::status::{PackageIndex, ParseMode, StatusReporter, UpdateStatus};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "slackstat")]
#[command(author, version, about = "Package status reporter for Slackware systems", long_about = None)]
struct Cli {
    /// Config file path (default: /etc/slackstat.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the external package tool executable
    #[arg(short, long, global = true)]
    tool: Option<PathBuf>,

    /// Skip malformed tool output lines instead of failing
    #[arg(long, global = true)]
    lenient: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List installed packages
    Installed {
        /// Emit the index as JSON
        #[arg(long)]
        json: bool,
    },
    /// List packages available from a repository mirror
    Available {
        /// Repository mirror locator (URL or absolute path)
        mirror: String,
        /// Emit the index as JSON
        #[arg(long)]
        json: bool,
    },
    /// List pending upgrades
    Upgrades {
        /// Emit the index as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether newer repository metadata is available
    Check,
    /// Refresh repository metadata if it is stale
    Refresh,
    /// Show the latest known version of the named packages
    Latest {
        /// Package names to look up
        #[arg(required = true)]
        names: Vec<String>,
        /// Emit the index as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        shell: Shell,
    },
}

/// Render an index either as JSON or as an aligned plain listing
fn print_index(index: &PackageIndex, heading: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(index)?);
        return Ok(());
    }

    if index.is_empty() {
        println!("No packages found.");
        return Ok(());
    }

    println!("{}:", heading);
    for (name, version) in index {
        println!("  {} {}", name, version);
    }
    println!("\nTotal: {} package(s)", index.len());
    Ok(())
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if let Some(tool) = cli.tool {
        config.tool_path = tool;
    }
    if cli.lenient {
        config.parse_mode = ParseMode::Lenient;
    }

    let reporter = StatusReporter::new(&config);

    match cli.command {
        Some(Commands::Installed { json }) => {
            let index = reporter.list_installed()?;
            print_index(&index, "Installed packages", json)
        }
        Some(Commands::Available { mirror, json }) => {
            let index = reporter.list_available(&mirror)?;
            print_index(&index, "Available packages", json)
        }
        Some(Commands::Upgrades { json }) => {
            let index = reporter.list_upgrades()?;
            print_index(&index, "Pending upgrades", json)
        }
        Some(Commands::Check) => {
            match reporter.check_updates()? {
                UpdateStatus::Available => println!("Updates are available."),
                UpdateStatus::Current => println!("Package metadata is current."),
            }
            Ok(())
        }
        Some(Commands::Refresh) => {
            info!("Refreshing package metadata");
            if reporter.refresh()? {
                println!("Package metadata updated.");
            } else {
                println!("Package metadata already current.");
            }
            Ok(())
        }
        Some(Commands::Latest { names, json }) => {
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            let latest = reporter.latest_version(&names)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&latest)?);
                return Ok(());
            }

            for name in &names {
                match latest.get(*name) {
                    Some(version) if version.is_empty() => {
                        println!("  {} (latest version installed)", name)
                    }
                    Some(version) => println!("  {} {}", name, version),
                    None => println!("  {} (not in pkglist)", name),
                }
            }
            Ok(())
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "slackstat", &mut std::io::stdout());
            Ok(())
        }
        None => {
            // No command provided, show help
            println!("Slackstat v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'slackstat --help' for usage information");
            Ok(())
        }
    }
}
