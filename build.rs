// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    let config_arg = Arg::new("config")
        .short('c')
        .long("config")
        .value_name("PATH")
        .help("Config file path (default: /etc/slackstat.toml if present)");
    let tool_arg = Arg::new("tool")
        .short('t')
        .long("tool")
        .value_name("PATH")
        .help("Override the external package tool executable");
    let lenient_arg = Arg::new("lenient")
        .long("lenient")
        .action(clap::ArgAction::SetTrue)
        .help("Skip malformed tool output lines instead of failing");
    let json_arg = Arg::new("json")
        .long("json")
        .action(clap::ArgAction::SetTrue)
        .help("Emit the index as JSON");

    Command::new("slackstat")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Slackstat Contributors")
        .about("Package status reporter for Slackware systems")
        .subcommand_required(false)
        .arg(config_arg)
        .arg(tool_arg)
        .arg(lenient_arg)
        .subcommand(
            Command::new("installed")
                .about("List installed packages")
                .arg(json_arg.clone()),
        )
        .subcommand(
            Command::new("available")
                .about("List packages available from a repository mirror")
                .arg(
                    Arg::new("mirror")
                        .required(true)
                        .help("Repository mirror locator (URL or absolute path)"),
                )
                .arg(json_arg.clone()),
        )
        .subcommand(
            Command::new("upgrades")
                .about("List pending upgrades")
                .arg(json_arg.clone()),
        )
        .subcommand(
            Command::new("check").about("Check whether newer repository metadata is available"),
        )
        .subcommand(Command::new("refresh").about("Refresh repository metadata if it is stale"))
        .subcommand(
            Command::new("latest")
                .about("Show the latest known version of the named packages")
                .arg(
                    Arg::new("names")
                        .required(true)
                        .num_args(1..)
                        .help("Package names to look up"),
                )
                .arg(json_arg),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish", "powershell"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory
    let out_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("Failed to create man directory");

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();
    man.render(&mut buffer).expect("Failed to render man page");

    let man_path = man_dir.join("slackstat.1");
    fs::write(&man_path, buffer).expect("Failed to write man page");

    println!("cargo:warning=Man page generated at {}", man_path.display());
}
