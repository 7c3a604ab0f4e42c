// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Record export
//!
//! Commits can be written whole (`json`, `jsonl`) or flattened into three
//! tables, each a JSON-lines file:
//!
//! - `commits.jsonl`: one row per commit
//! - `commit_branch_messages.jsonl`: one row per squashed branch message
//! - `commit_file_changes.jsonl`: one row per changed file
//!
//! Table files are appended to, so repeated incremental runs accumulate.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use gitstat_log::CommitRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// File name of the commits table
pub const COMMITS_TABLE: &str = "commits.jsonl";
/// File name of the branch messages table
pub const BRANCH_MESSAGES_TABLE: &str = "commit_branch_messages.jsonl";
/// File name of the file changes table
pub const FILE_CHANGES_TABLE: &str = "commit_file_changes.jsonl";

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// Error writing output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// A single JSON array of commits
    Json,
    /// One JSON commit per line
    #[default]
    Jsonl,
    /// Three flattened JSON-lines tables in a directory
    Tables,
}

/// A row of the commits table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRow {
    /// Repository label, if one was given
    pub repository: Option<String>,
    /// Commit SHA
    pub sha: String,
    /// Author date
    pub date: Option<DateTime<Utc>>,
    /// Commit subject
    pub subject: String,
    /// PR number from the subject
    pub pr_number: Option<u64>,
    /// Reverted PR number from the subject
    pub revert_pr_number: Option<u64>,
    /// Author name
    pub author_name: Option<String>,
    /// Author email
    pub author_email: Option<String>,
}

impl CommitRow {
    /// Flatten a commit into its table row
    #[must_use]
    pub fn from_record(record: &CommitRecord, repository: Option<&str>) -> Self {
        Self {
            repository: repository.map(str::to_string),
            sha: record.hash.clone(),
            date: record.date,
            subject: record.subject.clone(),
            pr_number: record.pr_number,
            revert_pr_number: record.revert_pr_number,
            author_name: record.author.as_ref().map(|a| a.name.clone()),
            author_email: record.author.as_ref().map(|a| a.email.clone()),
        }
    }
}

/// A row of the branch messages table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchMessageRow {
    /// SHA of the commit carrying the message
    pub parent_sha: String,
    /// Date of the commit carrying the message
    pub parent_date: Option<DateTime<Utc>>,
    /// Message text
    pub message: String,
    /// Position of the message in the commit body
    pub index: usize,
}

impl BranchMessageRow {
    /// All branch message rows of one commit, in body order
    #[must_use]
    pub fn from_record(record: &CommitRecord) -> Vec<Self> {
        record
            .branch_commit_messages
            .iter()
            .enumerate()
            .map(|(index, message)| Self {
                parent_sha: record.hash.clone(),
                parent_date: record.date,
                message: message.clone(),
                index,
            })
            .collect()
    }
}

/// A row of the file changes table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChangeRow {
    /// SHA of the commit that changed the file
    pub parent_sha: String,
    /// Date of the commit that changed the file
    pub parent_date: Option<DateTime<Utc>>,
    /// Final file path
    pub file_name: String,
    /// Previous path for renames
    pub renamed_from: Option<String>,
    /// Total changed lines
    pub total_changes: u64,
    /// Inserted lines (may be estimated)
    pub num_inserts: u64,
    /// Deleted lines (may be estimated)
    pub num_deletes: u64,
}

impl FileChangeRow {
    /// All file change rows of one commit, ordered by path
    #[must_use]
    pub fn from_record(record: &CommitRecord) -> Vec<Self> {
        record
            .file_map
            .iter()
            .map(|(name, change)| Self {
                parent_sha: record.hash.clone(),
                parent_date: record.date,
                file_name: name.clone(),
                renamed_from: change.renamed_from.clone(),
                total_changes: change.total_changes,
                num_inserts: change.num_inserts,
                num_deletes: change.num_deletes,
            })
            .collect()
    }
}

/// Rows written by an export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Commits (or commit rows) written
    pub commits: usize,
    /// Branch message rows written
    pub branch_messages: usize,
    /// File change rows written
    pub file_changes: usize,
}

/// Sort commits oldest first; undated commits go last in their input order
pub fn sort_by_date(records: &mut [CommitRecord]) {
    records.sort_by_key(|r| (r.date.is_none(), r.date));
}

/// Write commits as one pretty JSON array
///
/// # Errors
///
/// Returns `ExportError` if serialization or writing fails.
pub fn write_json<W: Write>(
    mut writer: W,
    records: &[CommitRecord],
) -> Result<ExportStats, ExportError> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(ExportStats {
        commits: records.len(),
        ..Default::default()
    })
}

/// Write commits as JSON lines
///
/// # Errors
///
/// Returns `ExportError` if serialization or writing fails.
pub fn write_jsonl<W: Write>(
    mut writer: W,
    records: &[CommitRecord],
) -> Result<ExportStats, ExportError> {
    write_lines(&mut writer, records)?;
    writer.flush()?;
    Ok(ExportStats {
        commits: records.len(),
        ..Default::default()
    })
}

fn write_lines<W: Write, T: Serialize>(writer: &mut W, rows: &[T]) -> Result<(), ExportError> {
    for row in rows {
        serde_json::to_writer(&mut *writer, row)?;
        writeln!(writer)?;
    }
    Ok(())
}

/// Appends commits to the three table files in a directory
#[derive(Debug, Clone)]
pub struct TableWriter {
    dir: PathBuf,
    repository: Option<String>,
}

impl TableWriter {
    /// Create a writer for a directory (created on first write)
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            repository: None,
        }
    }

    /// Stamp commit rows with a repository label
    #[must_use]
    pub fn with_repository(mut self, repository: Option<String>) -> Self {
        self.repository = repository;
        self
    }

    /// Directory the tables live in
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Sort commits oldest first and append them to the tables
    ///
    /// # Errors
    ///
    /// Returns `ExportError` if the directory or a table cannot be written.
    pub fn write(&self, records: &mut [CommitRecord]) -> Result<ExportStats, ExportError> {
        fs::create_dir_all(&self.dir)?;
        sort_by_date(records);

        let commit_rows: Vec<CommitRow> = records
            .iter()
            .map(|r| CommitRow::from_record(r, self.repository.as_deref()))
            .collect();
        let branch_rows: Vec<BranchMessageRow> =
            records.iter().flat_map(BranchMessageRow::from_record).collect();
        let file_rows: Vec<FileChangeRow> =
            records.iter().flat_map(FileChangeRow::from_record).collect();

        self.append(COMMITS_TABLE, &commit_rows)?;
        self.append(BRANCH_MESSAGES_TABLE, &branch_rows)?;
        self.append(FILE_CHANGES_TABLE, &file_rows)?;

        let stats = ExportStats {
            commits: commit_rows.len(),
            branch_messages: branch_rows.len(),
            file_changes: file_rows.len(),
        };
        info!(
            dir = %self.dir.display(),
            commits = stats.commits,
            branch_messages = stats.branch_messages,
            file_changes = stats.file_changes,
            "Appended tables"
        );
        Ok(stats)
    }

    fn append<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<(), ExportError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.join(table))?;
        let mut writer = BufWriter::new(file);
        write_lines(&mut writer, rows)?;
        writer.flush()?;
        Ok(())
    }
}
