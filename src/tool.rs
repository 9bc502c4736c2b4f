// src/tool.rs

//! Subprocess boundary to the external package tool
//!
//! Every query runs the configured executable once, waits for it, and
//! captures its full output. There is no retry, timeout, or shared state;
//! callers needing bounded latency must impose their own deadline.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Captured result of one tool invocation
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Exit code, if the process exited normally
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Handle to the configured external package tool executable
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run the tool with the given arguments and capture its output.
    ///
    /// A non-zero exit is not an error here; `check-updates` style
    /// subcommands carry meaning in their exit codes. Spawn failure maps to
    /// `Error::ExternalTool`. slackpkg truncates its output unless TERSE is
    /// off, so the child always runs with `TERSE=0`.
    pub fn run(&self, args: &[&str]) -> Result<ToolOutput> {
        debug!("Running {} {}", self.program.display(), args.join(" "));

        let output = Command::new(&self.program)
            .args(args)
            .env("TERSE", "0")
            .output()
            .map_err(|e| {
                Error::ExternalTool(format!(
                    "Failed to run {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        let result = ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        debug!(
            "{} exited with {:?} ({} bytes stdout)",
            self.program.display(),
            result.code,
            result.stdout.len()
        );

        Ok(result)
    }

    /// Run the tool and reject any non-zero exit as `Error::ExternalTool`
    pub fn run_checked(&self, args: &[&str]) -> Result<ToolOutput> {
        let output = self.run(args)?;

        if !output.success() {
            return Err(Error::ExternalTool(format!(
                "{} {} exited with status {}: {}",
                self.program.display(),
                args.join(" "),
                match output.code {
                    Some(code) => code.to_string(),
                    None => "signal".to_string(),
                },
                output.stderr.trim()
            )));
        }

        Ok(output)
    }
}
