// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! End-to-end run: line source, parser, exporter
//!
//! # Example
//!
//! ```no_run
//! use gitstat::config::Config;
//! use gitstat::run::run;
//!
//! let config = Config::default();
//! let summary = run(&config).expect("run");
//! println!("Exported {} commits", summary.export.commits);
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use gitstat_log::{CommitRecord, CommitStream, LogError, ParseStats};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{Config, ConfigError, InputSource};
use crate::export::{ExportError, ExportStats, OutputFormat, TableWriter, write_json, write_jsonl};
use crate::git::{GitError, GitLogCommand, GitRepo};

/// Errors from a full run
#[derive(Debug, Error)]
pub enum RunError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Git error
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// Log parse error
    #[error("Parse error: {0}")]
    Log(#[from] LogError),

    /// Export error
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Error opening input or output
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Outcome of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Parser counters
    pub parse: ParseStats,
    /// Export counters
    pub export: ExportStats,
}

/// Read commits from the configured source and export them
///
/// # Errors
///
/// Returns `RunError` if the source cannot be read, the log is malformed,
/// or the output cannot be written. Nothing is exported on a parse error.
pub fn run(config: &Config) -> Result<RunSummary, RunError> {
    config.validate()?;
    let (mut records, parse) = collect_commits(config)?;
    let export = export(config, &mut records)?;
    Ok(RunSummary { parse, export })
}

/// Parse every commit from the configured source
///
/// # Errors
///
/// Returns `RunError` if the source fails or the log is malformed.
pub fn collect_commits(config: &Config) -> Result<(Vec<CommitRecord>, ParseStats), RunError> {
    match config.input_source() {
        InputSource::Stdin => {
            debug!("Reading log from stdin");
            read_commits(io::stdin().lock())
        }
        InputSource::File(path) => {
            debug!(path = %path.display(), "Reading log from file");
            read_commits(BufReader::new(File::open(&path)?))
        }
        InputSource::Git(path) => read_git_commits(config, &path),
    }
}

/// Parse every commit from buffered log text
///
/// # Errors
///
/// Returns `RunError::Log` on a read failure or malformed log.
pub fn read_commits<R: BufRead>(reader: R) -> Result<(Vec<CommitRecord>, ParseStats), RunError> {
    let mut stream = CommitStream::from_reader(reader);
    let records = stream.by_ref().collect::<Result<Vec<_>, _>>()?;
    Ok((records, stream.stats()))
}

fn read_git_commits(
    config: &Config,
    path: &Path,
) -> Result<(Vec<CommitRecord>, ParseStats), RunError> {
    let repo = GitRepo::discover(path)?;
    let mut command = GitLogCommand::new(repo.run_dir());
    if let Some(ref date) = config.after_date {
        command = command.after_date(date.as_str());
    }
    if let Some(ref after) = config.after_commit {
        command = command.after_commit(repo.resolve(after)?);
        if let Some(ref before) = config.before_commit {
            command = command.before_commit(repo.resolve(before)?);
        }
    }

    info!(repo = %repo.run_dir().display(), "Reading git history");
    let mut process = command.spawn()?;
    let mut stream = process.commits()?;
    match stream.by_ref().collect::<Result<Vec<_>, _>>() {
        Ok(records) => {
            let stats = stream.stats();
            drop(stream);
            process.wait()?;
            Ok((records, stats))
        }
        Err(err) => {
            drop(stream);
            process.kill();
            Err(err.into())
        }
    }
}

/// Export parsed commits in the configured format
///
/// # Errors
///
/// Returns `RunError` if the output cannot be written.
pub fn export(config: &Config, records: &mut [CommitRecord]) -> Result<ExportStats, RunError> {
    let stats = match config.format {
        OutputFormat::Tables => TableWriter::new(config.tables_dir())
            .with_repository(config.repository.clone())
            .write(records)?,
        format => {
            let writer: Box<dyn Write> = match config.output {
                Some(ref path) => Box::new(BufWriter::new(File::create(path)?)),
                None => Box::new(BufWriter::new(io::stdout().lock())),
            };
            match format {
                OutputFormat::Json => write_json(writer, records)?,
                _ => write_jsonl(writer, records)?,
            }
        }
    };
    Ok(stats)
}
