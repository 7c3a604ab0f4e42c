// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gitstat: per-commit and per-file change statistics from git history
//!
//! Runs `git log --stat` (or reads captured output), parses it into commit
//! records, and writes them as JSON or as flattened tables.

use anyhow::Context;
use clap::Parser;
use tracing::info;

use gitstat::config::Config;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so stdout stays clean for exported records
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    let summary = gitstat::run::run(&config).context("gitstat run failed")?;

    info!(
        commits = summary.parse.commits,
        discarded_lines = summary.parse.discarded_lines,
        branch_messages = summary.export.branch_messages,
        file_changes = summary.export.file_changes,
        "Export complete"
    );
    Ok(())
}
