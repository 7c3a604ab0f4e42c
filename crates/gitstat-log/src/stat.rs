// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! File-change statistics extraction
//!
//! Recognizers for the two grammars of the `--stat` section:
//!
//! - stat lines: `<path> | <N> <histogram>` or `<path> | Bin <a> -> <b> bytes`
//! - the summary line: `N files changed, X insertions(+), Y deletions(-)`
//!
//! # Insert/delete split
//!
//! A stat line only states the total number of changed lines. The histogram
//! of `+` and `-` characters is scaled down by git once the change is wider
//! than the stat width, so the split derived from it is an estimate. The
//! inserted count is the position of the first `-` scaled to the total and
//! rounded; deletions take the remainder, so the two always sum to the
//! total. [`SplitPrecision`] records whether the histogram was unscaled.

use std::sync::LazyLock;

use regex::Regex;

use crate::commit::{FileChange, SplitPrecision};

static STAT_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<path>.+?)\s+\|\s+(?:(?P<bin>Bin\b.*)|(?P<count>\d+)(?:\s+(?P<hist>[+-]*))?)\s*$",
    )
    .expect("Invalid stat line regex")
});

static SUMMARY_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?P<files>\d+) files? changed(?:, (?P<ins>\d+) insertions?\(\+\))?(?:, (?P<del>\d+) deletions?\(-\))?\s*$",
    )
    .expect("Invalid summary line regex")
});

static RENAME_BRACES_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(?P<old>[^{}]*) => (?P<new>[^{}]*)\}").expect("Invalid rename regex")
});

/// Separator git uses for renames in stat paths
const RENAME_ARROW: &str = " => ";

/// A recognized stat line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatLine {
    /// Binary change; carries no line counts and is never recorded
    Binary {
        /// Path as printed
        path: String,
    },
    /// Text change with a line count
    Text {
        /// Final path of the file
        path: String,
        /// Extracted statistics
        change: FileChange,
    },
}

/// Totals from the trailing summary line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatSummary {
    /// Number of files changed
    pub files_changed: u64,
    /// Total inserted lines
    pub insertions: u64,
    /// Total deleted lines
    pub deletions: u64,
}

/// Parse one stat line, or `None` if the line is not a stat line
#[must_use]
pub fn parse_stat_line(line: &str) -> Option<StatLine> {
    let caps = STAT_LINE_REGEX.captures(line)?;
    let raw_path = caps.name("path")?.as_str();

    if caps.name("bin").is_some() {
        return Some(StatLine::Binary {
            path: raw_path.to_string(),
        });
    }

    // Counts too large for u64 are not a stat line we can represent
    let total_changes: u64 = caps.name("count")?.as_str().parse().ok()?;
    let histogram = caps.name("hist").map_or("", |m| m.as_str());
    let (num_inserts, split) = split_changes(total_changes, histogram);
    let (path, renamed_from) = resolve_rename(raw_path);

    Some(StatLine::Text {
        path,
        change: FileChange {
            total_changes,
            num_inserts,
            num_deletes: total_changes - num_inserts,
            renamed_from,
            split,
        },
    })
}

/// Parse the summary line, or `None` if the line is not one
#[must_use]
pub fn parse_summary_line(line: &str) -> Option<StatSummary> {
    let caps = SUMMARY_LINE_REGEX.captures(line)?;
    let count = |name: &str| -> u64 {
        caps.name(name)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    Some(StatSummary {
        files_changed: count("files"),
        insertions: count("ins"),
        deletions: count("del"),
    })
}

/// Estimate the inserted line count from a histogram
///
/// Returns the number of insertions and how precise that number is.
#[must_use]
pub fn split_changes(total_changes: u64, histogram: &str) -> (u64, SplitPrecision) {
    let Some(first_dash) = histogram.find('-') else {
        return (total_changes, SplitPrecision::Exact);
    };

    let width = histogram.len() as u128;
    let first_dash = first_dash as u128;
    // Round half up: (2 * idx * total + width) / (2 * width), widened so
    // counts near u64::MAX cannot overflow
    let scaled = (2 * first_dash * u128::from(total_changes) + width) / (2 * width);
    let num_inserts = u64::try_from(scaled).unwrap_or(total_changes).min(total_changes);

    let precision = if width == u128::from(total_changes) || first_dash == 0 {
        SplitPrecision::Exact
    } else {
        SplitPrecision::Estimated
    };
    (num_inserts, precision)
}

/// Resolve rename notation in a stat path
///
/// Returns the final path and, for renames, the previous path. Handles both
/// `dir/{old => new}/file` and whole-path `old => new`.
#[must_use]
pub fn resolve_rename(path: &str) -> (String, Option<String>) {
    if RENAME_BRACES_REGEX.is_match(path) {
        let old = RENAME_BRACES_REGEX.replacen(path, 1, "${old}");
        let new = RENAME_BRACES_REGEX.replacen(path, 1, "${new}");
        // An empty side leaves `a//b`; only the first doubled separator is collapsed
        return (
            new.replacen("//", "/", 1),
            Some(old.replacen("//", "/", 1)),
        );
    }

    match path.split_once(RENAME_ARROW) {
        Some((old, new)) => (new.to_string(), Some(old.to_string())),
        None => (path.to_string(), None),
    }
}
