// src/status/mod.rs

//! Package status reporting
//!
//! The reporter answers four questions about a Slackware system: what is
//! installed, what a mirror offers, whether the tool's metadata is stale,
//! and which upgrades are pending. Each answer comes from one synchronous
//! tool invocation (or one pkglist read); nothing is cached between calls,
//! so two calls against unchanged external state return equal indexes.

pub mod parser;

pub use parser::{PackageBasename, PackageIndex, PackageRecord, ParseMode, PkglistEntry};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::tool::ToolCommand;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Exit code the tool uses to signal that newer metadata is available
const UPDATES_AVAILABLE_CODE: i32 = 100;

const LIST_INSTALLED_ARGS: &[&str] = &["list-installed"];
const CHECK_UPDATES_ARGS: &[&str] = &["check-updates"];
const UPDATE_ARGS: &[&str] = &["-batch=on", "-default_answer=y", "update"];
const UPGRADE_DRY_RUN_ARGS: &[&str] = &["-batch=on", "-default_answer=n", "upgrade-all"];

/// Outcome of a metadata staleness check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    /// The repository has metadata newer than the local copy
    Available,
    /// Local metadata is current
    Current,
}

/// Stateless reporter over the external package tool
#[derive(Debug, Clone)]
pub struct StatusReporter {
    tool: ToolCommand,
    pkglist_path: PathBuf,
    parse_mode: ParseMode,
}

impl StatusReporter {
    pub fn new(config: &Config) -> Self {
        Self {
            tool: ToolCommand::new(&config.tool_path),
            pkglist_path: config.pkglist_path.clone(),
            parse_mode: config.parse_mode,
        }
    }

    /// Snapshot of installed packages as a name-to-version index.
    ///
    /// Fails with `ExternalTool` if the tool cannot be spawned or exits
    /// non-zero; no partial index is returned.
    pub fn list_installed(&self) -> Result<PackageIndex> {
        let output = self.tool.run_checked(LIST_INSTALLED_ARGS)?;
        let index = parser::parse_index(&output.stdout, self.parse_mode)?;

        info!("Found {} installed packages", index.len());
        Ok(index)
    }

    /// Snapshot of packages a repository mirror offers.
    ///
    /// The mirror locator must be non-empty and either an absolute path or a
    /// URL with a scheme; anything else is a `Configuration` error and no
    /// subprocess is spawned.
    pub fn list_available(&self, mirror: &str) -> Result<PackageIndex> {
        validate_mirror(mirror)?;

        let output = self.tool.run_checked(&["list-available", mirror])?;
        let index = parser::parse_index(&output.stdout, self.parse_mode)?;

        info!("Found {} available packages at {}", index.len(), mirror);
        Ok(index)
    }

    /// Ask the tool whether its repository metadata is stale.
    ///
    /// The tool's `check-updates` signals through its exit code: 100 means
    /// newer metadata exists, 0 means current, anything else is a failure.
    pub fn check_updates(&self) -> Result<UpdateStatus> {
        let output = self.tool.run(CHECK_UPDATES_ARGS)?;

        match output.code {
            Some(UPDATES_AVAILABLE_CODE) => Ok(UpdateStatus::Available),
            Some(0) => Ok(UpdateStatus::Current),
            code => Err(Error::ExternalTool(format!(
                "check-updates exited with {:?}: {}",
                code,
                output.stderr.trim()
            ))),
        }
    }

    /// Refresh the tool's metadata if the repository has something newer.
    ///
    /// Returns whether new metadata was actually fetched.
    pub fn refresh(&self) -> Result<bool> {
        match self.check_updates()? {
            UpdateStatus::Current => {
                debug!("Metadata is current, skipping update");
                Ok(false)
            }
            UpdateStatus::Available => {
                info!("Updating package metadata");
                self.tool.run_checked(UPDATE_ARGS)?;
                Ok(true)
            }
        }
    }

    /// Pending upgrades as a name-to-version-build index.
    ///
    /// Dry-runs the tool's batch upgrade with default answer "no" and
    /// scrapes the candidate archive names out of the transcript. The
    /// declined run exits non-zero by design, so only spawn failure is
    /// treated as a tool error here.
    pub fn list_upgrades(&self) -> Result<PackageIndex> {
        let output = self.tool.run(UPGRADE_DRY_RUN_ARGS)?;

        let mut upgrades = PackageIndex::new();
        for line in output.stdout.lines() {
            let Some(stem) = parser::upgrade_archive_stem(line) else {
                continue;
            };
            match parser::parse_package_basename(stem) {
                Ok(pkg) => {
                    let version_build = pkg.version_build();
                    upgrades.insert(pkg.name, version_build);
                }
                Err(e) => match self.parse_mode {
                    ParseMode::Strict => return Err(e),
                    ParseMode::Lenient => {
                        warn!("Skipping unparseable archive name {:?}: {}", stem, e);
                    }
                },
            }
        }

        info!("Found {} pending upgrades", upgrades.len());
        Ok(upgrades)
    }

    /// Latest known version for each of the given package names.
    ///
    /// Looks the names up in the tool's pkglist file. A name maps to its
    /// `version-build` string, or to the empty string when that exact
    /// version is already installed; names absent from the pkglist are
    /// absent from the result.
    pub fn latest_version(&self, names: &[&str]) -> Result<PackageIndex> {
        if names.is_empty() {
            return Ok(PackageIndex::new());
        }

        let installed = self.list_installed()?;
        let pkglist = fs::read_to_string(&self.pkglist_path)?;

        let mut latest = PackageIndex::new();
        for line in pkglist.lines() {
            if line.trim().is_empty() {
                continue;
            }

            let entry = match parser::parse_pkglist_line(line) {
                Ok(entry) => entry,
                Err(e) => match self.parse_mode {
                    ParseMode::Strict => return Err(e),
                    ParseMode::Lenient => {
                        warn!("Skipping unparseable pkglist line: {}", e);
                        continue;
                    }
                },
            };

            if !names.contains(&entry.name.as_str()) {
                continue;
            }

            let candidate = entry.version_build();
            let version = if installed.get(&entry.name) == Some(&candidate) {
                String::new()
            } else {
                candidate
            };
            latest.insert(entry.name, version);
        }

        Ok(latest)
    }

    /// Whether an upgrade (or initial install) is available for a package
    pub fn upgrade_available(&self, name: &str) -> Result<bool> {
        let latest = self.latest_version(&[name])?;
        Ok(latest.get(name).is_some_and(|v| !v.is_empty()))
    }
}

/// Validate a repository mirror locator.
///
/// slackpkg accepts two mirror forms, a local absolute path or a URL; an
/// empty or whitespace-bearing locator is rejected before any subprocess
/// is spawned.
fn validate_mirror(mirror: &str) -> Result<()> {
    let trimmed = mirror.trim();

    if trimmed.is_empty() {
        return Err(Error::Configuration(
            "Repository mirror locator must not be empty".to_string(),
        ));
    }

    if trimmed.split_whitespace().count() > 1 {
        return Err(Error::Configuration(format!(
            "Repository mirror locator must not contain whitespace: {:?}",
            mirror
        )));
    }

    if !trimmed.starts_with('/') && !trimmed.contains("://") {
        return Err(Error::Configuration(format!(
            "Repository mirror locator must be an absolute path or URL: {:?}",
            mirror
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_mirror_accepts_url_and_path() {
        assert!(validate_mirror("https://mirrors.slackware.com/slackware64-15.0/").is_ok());
        assert!(validate_mirror("ftp://ftp.slackware.com/pub/slackware64-15.0/").is_ok());
        assert!(validate_mirror("/var/cache/slackware64-15.0").is_ok());
    }

    #[test]
    fn test_validate_mirror_rejects_empty() {
        assert!(matches!(
            validate_mirror(""),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            validate_mirror("   "),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_mirror_rejects_malformed() {
        assert!(matches!(
            validate_mirror("not a locator"),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            validate_mirror("relative/path"),
            Err(Error::Configuration(_))
        ));
    }
}
