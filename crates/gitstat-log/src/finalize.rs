// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Commit finalization
//!
//! Turns the buffered lines of one closed commit into a [`CommitRecord`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::trace;

use crate::classify::{BodyLine, body_line, header_field};
use crate::commit::{Author, CommitRecord};
use crate::error::LogError;
use crate::stat::{StatLine, parse_stat_line, parse_summary_line};

static PR_REFERENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(#(\d+)\)").expect("Invalid PR reference regex"));

/// Bullet marking a squashed branch commit inside the message body
const BRANCH_BULLET: &str = "* ";

/// The commit currently being accumulated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommit {
    pub(crate) hash: String,
    pub(crate) author: Option<Author>,
    pub(crate) date: Option<DateTime<Utc>>,
    pub(crate) raw_lines: Vec<String>,
}

impl PendingCommit {
    /// Start a commit with no headers and an empty body
    #[must_use]
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            author: None,
            date: None,
            raw_lines: Vec::new(),
        }
    }

    /// Hash from the boundary line
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Body lines buffered so far
    #[must_use]
    pub fn raw_lines(&self) -> &[String] {
        &self.raw_lines
    }
}

/// Derive every field of a closed commit from its buffered lines
///
/// # Errors
///
/// Returns `LogError::MalformedStatLine` if a line outside the message
/// matches neither the stat, summary, nor header grammar.
pub fn finalize(pending: PendingCommit) -> Result<CommitRecord, LogError> {
    let PendingCommit {
        hash,
        author,
        date,
        raw_lines,
    } = pending;

    let mut subject: Option<String> = None;
    let mut branch_commit_messages = Vec::new();
    let mut file_map = BTreeMap::new();

    for line in &raw_lines {
        match body_line(line) {
            BodyLine::Blank => {}
            BodyLine::Message(text) => {
                if subject.is_none() {
                    subject = Some(text.trim().to_string());
                } else if let Some(message) = text.strip_prefix(BRANCH_BULLET) {
                    branch_commit_messages.push(message.to_string());
                }
            }
            BodyLine::FileSection(text) => {
                if parse_summary_line(text).is_some() {
                    continue;
                }
                match parse_stat_line(text) {
                    Some(StatLine::Text { path, change }) => {
                        file_map.insert(path, change);
                    }
                    Some(StatLine::Binary { path }) => {
                        trace!(hash = %hash, path = %path, "Skipping binary change");
                    }
                    // Only unindented `Key: Value` lines are trailers
                    None if header_field(line).is_some() => {
                        trace!(hash = %hash, line = %text, "Ignoring header trailer");
                    }
                    None => {
                        return Err(LogError::MalformedStatLine {
                            hash,
                            line: line.clone(),
                        });
                    }
                }
            }
        }
    }

    let subject = subject.unwrap_or_default();
    let references = pr_references(&subject);
    let pr_number = references.last().copied();
    let revert_pr_number = if references.len() >= 2 {
        references.first().copied()
    } else {
        None
    };

    Ok(CommitRecord {
        hash,
        author,
        date,
        subject,
        pr_number,
        revert_pr_number,
        branch_commit_messages,
        file_map,
    })
}

/// All `(#N)` references in a subject, in order of appearance
#[must_use]
pub fn pr_references(subject: &str) -> Vec<u64> {
    PR_REFERENCE_REGEX
        .captures_iter(subject)
        .filter_map(|caps| caps[1].parse().ok())
        .collect()
}
