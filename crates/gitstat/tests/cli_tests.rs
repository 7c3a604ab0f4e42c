// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! CLI tests for argument parsing
//!
//! These tests verify flag parsing, conflicts, and defaults of the
//! gitstat command line.

use std::path::PathBuf;

use clap::Parser;
use gitstat::config::{Config, InputSource};
use gitstat::export::OutputFormat;
use tracing::Level;

// ============================================================================
// Logging flags
// ============================================================================

#[test]
fn test_verbose_short_flag_v() {
    let config = Config::try_parse_from(["gitstat", "-v"]).expect("parse should succeed");
    assert!(config.verbose);
    assert_eq!(config.log_level(), Level::DEBUG);
}

#[test]
fn test_quiet_long_flag() {
    let config = Config::try_parse_from(["gitstat", "--quiet"]).expect("parse should succeed");
    assert!(config.quiet);
    assert_eq!(config.log_level(), Level::WARN);
}

#[test]
fn test_verbose_wins_over_quiet() {
    let config = Config::try_parse_from(["gitstat", "-v", "-q"]).expect("parse should succeed");
    assert_eq!(config.log_level(), Level::DEBUG);
}

// ============================================================================
// Input selection
// ============================================================================

#[test]
fn test_repo_short_flag() {
    let config =
        Config::try_parse_from(["gitstat", "-C", "/some/repo"]).expect("parse should succeed");
    assert_eq!(
        config.input_source(),
        InputSource::Git(PathBuf::from("/some/repo"))
    );
}

#[test]
fn test_input_stdin() {
    let config = Config::try_parse_from(["gitstat", "-i", "-"]).expect("parse should succeed");
    assert_eq!(config.input_source(), InputSource::Stdin);
}

#[test]
fn test_input_conflicts_with_repo() {
    let result = Config::try_parse_from(["gitstat", "-i", "log.txt", "-C", "/repo"]);
    assert!(result.is_err(), "--input and --repo are exclusive");
}

#[test]
fn test_input_conflicts_with_filters() {
    let result = Config::try_parse_from(["gitstat", "-i", "log.txt", "--after-date", "2026-01-01"]);
    assert!(result.is_err(), "Filters only apply when running git");
}

// ============================================================================
// History filters
// ============================================================================

#[test]
fn test_commit_range() {
    let config = Config::try_parse_from([
        "gitstat",
        "--after-commit",
        "v1.0",
        "--before-commit",
        "v2.0",
    ])
    .expect("parse should succeed");
    assert_eq!(config.after_commit.as_deref(), Some("v1.0"));
    assert_eq!(config.before_commit.as_deref(), Some("v2.0"));
}

#[test]
fn test_before_commit_requires_after_commit() {
    let result = Config::try_parse_from(["gitstat", "--before-commit", "v2.0"]);
    assert!(result.is_err());
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn test_default_format_is_jsonl() {
    let config = Config::try_parse_from(["gitstat"]).expect("parse should succeed");
    assert_eq!(config.format, OutputFormat::Jsonl);
}

#[test]
fn test_tables_format_with_output_dir() {
    let config = Config::try_parse_from([
        "gitstat",
        "-f",
        "tables",
        "-o",
        "out",
        "--repository",
        "acme/site",
    ])
    .expect("parse should succeed");
    assert_eq!(config.format, OutputFormat::Tables);
    assert_eq!(config.tables_dir(), PathBuf::from("out"));
    assert_eq!(config.repository.as_deref(), Some("acme/site"));
}

#[test]
fn test_unknown_format_rejected() {
    let result = Config::try_parse_from(["gitstat", "--format", "csv"]);
    assert!(result.is_err());
}
