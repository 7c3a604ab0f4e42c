//! Commit record types

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Commit author as reported by the `Author:` header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Author name
    pub name: String,
    /// Author email (without angle brackets)
    pub email: String,
}

/// How far a [`FileChange`] insert/delete split can be trusted
///
/// `git log --stat` only reports a total per file plus a `+`/`-` histogram
/// that is scaled down when the change is wider than the terminal budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitPrecision {
    /// The histogram had one character per changed line
    Exact,
    /// The split was derived from a scaled histogram
    Estimated,
}

/// Per-file change statistics from one stat line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    /// Total changed lines reported for the file
    pub total_changes: u64,
    /// Inserted lines (best effort, see `split`)
    pub num_inserts: u64,
    /// Deleted lines (best effort, see `split`)
    pub num_deletes: u64,
    /// Previous path when the stat line reported a rename
    pub renamed_from: Option<String>,
    /// Whether `num_inserts`/`num_deletes` are exact or estimated
    pub split: SplitPrecision,
}

impl FileChange {
    /// Check if this entry describes a rename
    #[must_use]
    pub fn is_rename(&self) -> bool {
        self.renamed_from.is_some()
    }
}

/// A fully parsed commit from `git log --stat` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// The commit hash (40 hex characters)
    pub hash: String,
    /// Author, if an `Author:` header was present
    pub author: Option<Author>,
    /// Author date, if a `Date:` header was present and parseable
    pub date: Option<DateTime<Utc>>,
    /// First message line, trimmed
    pub subject: String,
    /// Last `(#N)` reference in the subject
    pub pr_number: Option<u64>,
    /// First `(#N)` reference in the subject, when there are at least two
    pub revert_pr_number: Option<u64>,
    /// `    * ` bullet lines from the body, in order of appearance
    pub branch_commit_messages: Vec<String>,
    /// Changed files keyed by their final path (binary changes excluded)
    pub file_map: BTreeMap<String, FileChange>,
}

impl CommitRecord {
    /// Validate that a hash is a 40-character hex string
    #[must_use]
    pub fn is_valid_hash(hash: &str) -> bool {
        hash.len() == 40 && hash.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Get the short hash (first 7 characters)
    #[must_use]
    pub fn short_hash(&self) -> &str {
        &self.hash[..7.min(self.hash.len())]
    }

    /// Check if the subject cites an earlier PR as reverted
    #[must_use]
    pub fn is_revert(&self) -> bool {
        self.revert_pr_number.is_some()
    }

    /// Sum of inserted lines across all files
    #[must_use]
    pub fn total_inserts(&self) -> u64 {
        self.file_map.values().map(|f| f.num_inserts).sum()
    }

    /// Sum of deleted lines across all files
    #[must_use]
    pub fn total_deletes(&self) -> u64 {
        self.file_map.values().map(|f| f.num_deletes).sum()
    }
}
