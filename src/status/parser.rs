// src/status/parser.rs

//! Parsers for the external tool's line-oriented output
//!
//! Three formats appear in practice:
//! - list output: one `name version` record per line, whitespace separated
//! - package basenames: `name-version-arch-build`, split from the right so
//!   hyphenated names survive
//! - pkglist files: eight space-separated fields per line

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Mapping from package name to version string, built fresh per query
pub type PackageIndex = BTreeMap<String, String>;

/// One parsed line of list output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
}

/// How to treat output lines that do not match the record format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Fail the whole query with a parse error naming the offending line
    #[default]
    Strict,
    /// Skip malformed lines with a warning and keep the valid records
    Lenient,
}

/// Components of a Slackware package basename (`name-version-arch-build`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageBasename {
    pub name: String,
    pub version: String,
    pub arch: String,
    pub build: String,
}

impl PackageBasename {
    /// The `version-build` string the installed database reports
    pub fn version_build(&self) -> String {
        format!("{}-{}", self.version, self.build)
    }
}

/// One line of a slackpkg pkglist file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkglistEntry {
    pub name: String,
    pub version: String,
    pub build: String,
}

impl PkglistEntry {
    pub fn version_build(&self) -> String {
        format!("{}-{}", self.version, self.build)
    }
}

/// Parse a single two-field `name version` record
pub fn parse_record_line(line: &str) -> Result<PackageRecord> {
    let mut fields = line.split_whitespace();

    match (fields.next(), fields.next(), fields.next()) {
        (Some(name), Some(version), None) => Ok(PackageRecord {
            name: name.to_string(),
            version: version.to_string(),
        }),
        _ => Err(Error::Parse(format!(
            "Expected 'name version' record, got: {:?}",
            line
        ))),
    }
}

/// Parse full list output into a package index.
///
/// Blank lines are always skipped. Duplicate names overwrite last-wins; the
/// tool does not guarantee stable ordering, so callers must not rely on
/// which duplicate survives beyond that rule. Malformed lines fail the whole
/// query in strict mode and are skipped with a warning in lenient mode.
pub fn parse_index(output: &str, mode: ParseMode) -> Result<PackageIndex> {
    let mut index = PackageIndex::new();

    for (lineno, line) in output.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match parse_record_line(line) {
            Ok(record) => {
                index.insert(record.name, record.version);
            }
            Err(e) => match mode {
                ParseMode::Strict => {
                    return Err(Error::Parse(format!("Line {}: {}", lineno + 1, e)));
                }
                ParseMode::Lenient => {
                    warn!("Skipping malformed line {}: {:?}", lineno + 1, line);
                }
            },
        }
    }

    Ok(index)
}

/// Split a package basename into name, version, arch and build.
///
/// The split runs from the right: the last three hyphen-separated fields are
/// build, arch and version, everything before them is the name. This is how
/// names like `xorg-server` keep their internal hyphens.
pub fn parse_package_basename(basename: &str) -> Result<PackageBasename> {
    let mut fields = basename.rsplitn(4, '-');

    match (fields.next(), fields.next(), fields.next(), fields.next()) {
        (Some(build), Some(arch), Some(version), Some(name))
            if !build.is_empty() && !arch.is_empty() && !version.is_empty() && !name.is_empty() =>
        {
            Ok(PackageBasename {
                name: name.to_string(),
                version: version.to_string(),
                arch: arch.to_string(),
                build: build.to_string(),
            })
        }
        _ => Err(Error::Parse(format!(
            "Expected 'name-version-arch-build' basename, got: {:?}",
            basename
        ))),
    }
}

/// Extract the package basename from an upgrade listing line.
///
/// The tool's dry-run upgrade output names candidate archives as
/// `name-version-arch-build.tgz` (or .tbz/.tlz/.txz); every other line is
/// banner text and returns None.
pub fn upgrade_archive_stem(line: &str) -> Option<&str> {
    let trimmed = line.trim();

    for ext in [".tgz", ".tbz", ".tlz", ".txz"] {
        if let Some(stem) = trimmed.strip_suffix(ext) {
            return Some(stem);
        }
    }

    None
}

/// Parse one pkglist line.
///
/// pkglist lines carry eight space-separated fields:
/// `repo name version arch build basename path filename`. Only name, version
/// and build matter for status reporting.
pub fn parse_pkglist_line(line: &str) -> Result<PkglistEntry> {
    let fields: Vec<&str> = line.split_whitespace().collect();

    if fields.len() != 8 {
        return Err(Error::Parse(format!(
            "Expected 8-field pkglist line, got {} fields: {:?}",
            fields.len(),
            line
        )));
    }

    Ok(PkglistEntry {
        name: fields[1].to_string(),
        version: fields[2].to_string(),
        build: fields[4].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_line() {
        let record = parse_record_line("bash 5.2.21-x86_64-1").unwrap();
        assert_eq!(record.name, "bash");
        assert_eq!(record.version, "5.2.21-x86_64-1");
    }

    #[test]
    fn test_parse_record_line_rejects_wrong_field_count() {
        assert!(parse_record_line("bash").is_err());
        assert!(parse_record_line("bash 5.2 extra").is_err());
        assert!(parse_record_line("").is_err());
    }

    #[test]
    fn test_parse_index_unique_names() {
        let output = "bash 5.2.21-1\ncoreutils 9.4-1\nzlib 1.3.1-1\n";
        let index = parse_index(output, ParseMode::Strict).unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index["bash"], "5.2.21-1");
        assert_eq!(index["coreutils"], "9.4-1");
        assert_eq!(index["zlib"], "1.3.1-1");
    }

    #[test]
    fn test_parse_index_skips_blank_lines() {
        let output = "bash 5.2.21-1\n\n   \ncoreutils 9.4-1\n";
        let index = parse_index(output, ParseMode::Strict).unwrap();
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_parse_index_duplicate_name_last_wins() {
        // The tool may emit multiple installed versions of one name; the
        // last line wins by convention.
        let output = "bash 5.2.15-1\nbash 5.2.21-1\n";
        let index = parse_index(output, ParseMode::Strict).unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index["bash"], "5.2.21-1");
    }

    #[test]
    fn test_parse_index_strict_fails_on_malformed_line() {
        let output = "bash 5.2.21-1\nnot-a-record\nzlib 1.3.1-1\n";
        let result = parse_index(output, ParseMode::Strict);

        match result {
            Err(Error::Parse(msg)) => assert!(msg.contains("Line 2")),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_index_lenient_skips_malformed_line() {
        let output = "bash 5.2.21-1\nnot-a-record\nzlib 1.3.1-1\n";
        let index = parse_index(output, ParseMode::Lenient).unwrap();

        assert_eq!(index.len(), 2);
        assert!(index.contains_key("bash"));
        assert!(index.contains_key("zlib"));
    }

    #[test]
    fn test_parse_package_basename() {
        let pkg = parse_package_basename("xorg-server-21.1.13-x86_64-1").unwrap();
        assert_eq!(pkg.name, "xorg-server");
        assert_eq!(pkg.version, "21.1.13");
        assert_eq!(pkg.arch, "x86_64");
        assert_eq!(pkg.build, "1");
        assert_eq!(pkg.version_build(), "21.1.13-1");
    }

    #[test]
    fn test_parse_package_basename_rejects_short_input() {
        assert!(parse_package_basename("bash-5.2.21").is_err());
        assert!(parse_package_basename("bash").is_err());
        assert!(parse_package_basename("").is_err());
    }

    #[test]
    fn test_upgrade_archive_stem() {
        assert_eq!(
            upgrade_archive_stem("bash-5.2.21-x86_64-1.txz"),
            Some("bash-5.2.21-x86_64-1")
        );
        assert_eq!(
            upgrade_archive_stem("  openssl-3.1.4-x86_64-1.tgz  "),
            Some("openssl-3.1.4-x86_64-1")
        );
        assert_eq!(upgrade_archive_stem("Checking local integrity..."), None);
        assert_eq!(upgrade_archive_stem(""), None);
    }

    #[test]
    fn test_parse_pkglist_line() {
        let line = "slackware64 xorg-server 21.1.13 x86_64 1 \
                    xorg-server-21.1.13-x86_64-1 ./slackware64/x txz";
        let entry = parse_pkglist_line(line).unwrap();

        assert_eq!(entry.name, "xorg-server");
        assert_eq!(entry.version, "21.1.13");
        assert_eq!(entry.build, "1");
        assert_eq!(entry.version_build(), "21.1.13-1");
    }

    #[test]
    fn test_parse_pkglist_line_rejects_wrong_field_count() {
        assert!(parse_pkglist_line("slackware64 bash 5.2.21").is_err());
        assert!(parse_pkglist_line("").is_err());
    }
}
