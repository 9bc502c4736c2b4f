// src/lib.rs

//! Slackstat: package status reporting for Slackware systems
//!
//! Slackstat wraps an external slackpkg-style package tool and turns its
//! line-oriented output into structured name-to-version mappings. It keeps no
//! state of its own: every query spawns one subprocess, captures its output,
//! and parses the result fresh.
//!
//! # Architecture
//!
//! - Tool boundary: one subprocess per query, fully reaped on every path
//! - Parsers: pure functions over captured output, strict or lenient
//! - Indexes: `installed` and `available` are built independently and never
//!   merged; comparison is a caller concern

pub mod config;
mod error;
pub mod status;
pub mod tool;

pub use error::{Error, Result};
