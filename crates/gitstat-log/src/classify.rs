// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Line classification
//!
//! Two passes look at each line. While streaming, [`classify`] decides
//! whether a line opens a commit, sets a header field, or belongs to the
//! commit body. At finalization, [`body_line`] splits the buffered body into
//! message lines and file-change section lines.

/// Literal token that opens a commit block
pub const BOUNDARY_PREFIX: &str = "commit ";

/// Length of a full commit hash
pub const HASH_LEN: usize = 40;

/// Indent git applies to every commit message line
pub const MESSAGE_INDENT: &str = "    ";

/// Streaming classification of one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `commit <hash>`, the start of a new commit block
    Boundary {
        /// The 40-character hash
        hash: &'a str,
    },
    /// `Key: Value` header field
    Header {
        /// Text before the first `": "`
        key: &'a str,
        /// Text after the first `": "`, untrimmed
        value: &'a str,
    },
    /// Anything else; buffered for finalization
    Body,
}

/// Classify one line of log output
#[must_use]
pub fn classify(line: &str) -> LineKind<'_> {
    if let Some(hash) = boundary_hash(line) {
        LineKind::Boundary { hash }
    } else if let Some((key, value)) = header_field(line) {
        LineKind::Header { key, value }
    } else {
        LineKind::Body
    }
}

/// Extract the hash from a boundary line
///
/// Only a fixed-width `commit <40 hex>` line qualifies, so message text that
/// merely mentions "commit" never opens a new block.
#[must_use]
pub fn boundary_hash(line: &str) -> Option<&str> {
    if line.len() != BOUNDARY_PREFIX.len() + HASH_LEN {
        return None;
    }
    let hash = line.strip_prefix(BOUNDARY_PREFIX)?;
    hash.bytes().all(|b| b.is_ascii_hexdigit()).then_some(hash)
}

/// Split a `Key: Value` line on the first `": "`
///
/// Indented lines are message text and never count as headers.
#[must_use]
pub fn header_field(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(": ")?;
    if key.is_empty() || key.starts_with(char::is_whitespace) {
        return None;
    }
    Some((key, value))
}

/// Role of a buffered body line at finalization time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyLine<'a> {
    /// Empty or whitespace-only
    Blank,
    /// Commit message line with the 4-space indent removed
    Message(&'a str),
    /// Line of the file-change section (or a header trailer), left-trimmed
    FileSection(&'a str),
}

/// Classify a buffered body line by its indentation
#[must_use]
pub fn body_line(line: &str) -> BodyLine<'_> {
    if line.trim().is_empty() {
        BodyLine::Blank
    } else if let Some(text) = line.strip_prefix(MESSAGE_INDENT) {
        BodyLine::Message(text)
    } else {
        BodyLine::FileSection(line.trim_start())
    }
}
