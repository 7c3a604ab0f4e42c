// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Streaming `git log --stat` parser
//!
//! [`LogParser`] is the push side: feed it one line at a time and it hands
//! back each commit once the next boundary line closes it. [`CommitStream`]
//! is the pull side: it wraps any fallible line iterator and yields records
//! in input order, followed by exactly one terminal signal.
//!
//! # Example
//!
//! ```
//! use gitstat_log::parser::LogParser;
//!
//! let mut parser = LogParser::new();
//! let lines = [
//!     "commit 1945ab9c752534e733c38ba0109dc3b741f0a6eb",
//!     "Author: Jane Doe <jane@example.com>",
//!     "",
//!     "    Add feature (#5)",
//! ];
//! for line in lines {
//!     assert!(parser.push_line(line).unwrap().is_none());
//! }
//! let record = parser.finish().unwrap().expect("one commit");
//! assert_eq!(record.pr_number, Some(5));
//! ```

use std::error::Error;
use std::io::BufRead;
use std::iter::FusedIterator;

use chrono::{DateTime, Utc};
use tracing::{debug, trace, warn};

use crate::classify::{LineKind, classify};
use crate::commit::{Author, CommitRecord};
use crate::error::LogError;
use crate::finalize::{PendingCommit, finalize};

/// Date formats tried in order; the first is git's default `Date:` format
const GIT_DATE_FORMATS: &[&str] = &["%a %b %e %H:%M:%S %Y %z", "%Y-%m-%d %H:%M:%S %z"];

/// Counters collected while parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Lines pushed into the parser
    pub lines: usize,
    /// Lines dropped because no commit had started yet
    pub discarded_lines: usize,
    /// Commits finalized and emitted
    pub commits: usize,
}

/// Push-based parser holding at most one in-progress commit
#[derive(Debug, Default)]
pub struct LogParser {
    current: Option<PendingCommit>,
    finished: bool,
    stats: ParseStats,
}

impl LogParser {
    /// Create a new parser with no commit in progress
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a single line of output
    ///
    /// Returns the previous commit when `line` opens a new one. A trailing
    /// `\r` is ignored.
    ///
    /// # Errors
    ///
    /// Returns `LogError::MalformedStatLine` if closing the previous commit
    /// fails, and `LogError::Finished` once the parser has finished or
    /// failed.
    pub fn push_line(&mut self, line: &str) -> Result<Option<CommitRecord>, LogError> {
        if self.finished {
            return Err(LogError::Finished);
        }
        self.stats.lines += 1;
        let line = line.strip_suffix('\r').unwrap_or(line);

        let kind = classify(line);
        if let LineKind::Boundary { hash } = kind {
            let completed = match self.current.take() {
                Some(pending) => Some(self.emit(pending)?),
                None => None,
            };
            debug!(hash, "Starting commit");
            self.current = Some(PendingCommit::new(hash));
            return Ok(completed);
        }

        let Some(current) = self.current.as_mut() else {
            trace!(line, "Discarding line before first commit");
            self.stats.discarded_lines += 1;
            return Ok(None);
        };

        match kind {
            LineKind::Header { key, value } if key.eq_ignore_ascii_case("author") => {
                current.author = Some(parse_author(value));
            }
            LineKind::Header { key, value } if key.eq_ignore_ascii_case("date") => {
                current.date = parse_date(value);
                if current.date.is_none() {
                    warn!(hash = %current.hash, date = value.trim(), "Unparseable commit date");
                }
            }
            _ => current.raw_lines.push(line.to_string()),
        }
        Ok(None)
    }

    /// Close the input and emit the last commit
    ///
    /// Only the first call can return a record; later calls return
    /// `Ok(None)`, so duplicate end-of-input notifications are harmless.
    ///
    /// # Errors
    ///
    /// Returns `LogError::MalformedStatLine` if the last commit cannot be
    /// finalized.
    pub fn finish(&mut self) -> Result<Option<CommitRecord>, LogError> {
        if self.finished {
            return Ok(None);
        }
        let completed = match self.current.take() {
            Some(pending) => Some(self.emit(pending)?),
            None => None,
        };
        self.finished = true;
        debug!(commits = self.stats.commits, "Log parse finished");
        Ok(completed)
    }

    /// Check if the parser reached its terminal state
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The commit currently being accumulated, if any
    #[must_use]
    pub fn in_progress(&self) -> Option<&PendingCommit> {
        self.current.as_ref()
    }

    /// Counters so far
    #[must_use]
    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    fn emit(&mut self, pending: PendingCommit) -> Result<CommitRecord, LogError> {
        match finalize(pending) {
            Ok(record) => {
                self.stats.commits += 1;
                debug!(
                    hash = %record.hash,
                    files = record.file_map.len(),
                    "Emitting commit"
                );
                Ok(record)
            }
            Err(err) => {
                self.finished = true;
                Err(err)
            }
        }
    }
}

/// Parse an `Author:` value of the form `Name <email>`
///
/// A value without `" <"` is taken as a bare name with an empty email.
#[must_use]
pub fn parse_author(value: &str) -> Author {
    match value.split_once(" <") {
        Some((name, email)) => Author {
            name: name.trim().to_string(),
            email: email.trim_end().trim_end_matches('>').to_string(),
        },
        None => Author {
            name: value.trim().to_string(),
            email: String::new(),
        },
    }
}

/// Parse a `Date:` value
///
/// Accepts git's default format, RFC 2822, RFC 3339 and git's ISO format.
#[must_use]
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    GIT_DATE_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc2822(value).ok())
        .or_else(|| DateTime::parse_from_rfc3339(value).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Pull-based adapter yielding commits from a fallible line source
///
/// Yields records in input order, then ends. If the source fails, the commit
/// in progress is flushed first and the source error is yielded last. The
/// stream is fused: after its terminal item it only returns `None`.
#[derive(Debug)]
pub struct CommitStream<I> {
    lines: I,
    parser: LogParser,
    pending_error: Option<LogError>,
    done: bool,
}

impl<I> CommitStream<I> {
    /// Wrap a line source
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            parser: LogParser::new(),
            pending_error: None,
            done: false,
        }
    }

    /// Counters so far
    #[must_use]
    pub fn stats(&self) -> ParseStats {
        self.parser.stats()
    }

    fn fail(&mut self, err: LogError) -> Option<Result<CommitRecord, LogError>> {
        self.done = true;
        Some(Err(err))
    }
}

impl<R: BufRead> CommitStream<std::io::Lines<R>> {
    /// Stream commits from buffered reader lines
    pub fn from_reader(reader: R) -> Self {
        Self::new(reader.lines())
    }
}

impl<I, S, E> Iterator for CommitStream<I>
where
    I: Iterator<Item = Result<S, E>>,
    S: AsRef<str>,
    E: Into<Box<dyn Error + Send + Sync>>,
{
    type Item = Result<CommitRecord, LogError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.pending_error.take() {
            return self.fail(err);
        }
        if self.done {
            return None;
        }

        loop {
            match self.lines.next() {
                Some(Ok(line)) => match self.parser.push_line(line.as_ref()) {
                    Ok(Some(record)) => return Some(Ok(record)),
                    Ok(None) => {}
                    Err(err) => return self.fail(err),
                },
                Some(Err(err)) => {
                    let err = LogError::transport(err);
                    return match self.parser.finish() {
                        Ok(Some(record)) => {
                            self.pending_error = Some(err);
                            Some(Ok(record))
                        }
                        Ok(None) => self.fail(err),
                        Err(flush_err) => {
                            warn!(error = %flush_err, "Could not flush commit after source error");
                            self.fail(err)
                        }
                    };
                }
                None => {
                    self.done = true;
                    return self.parser.finish().transpose();
                }
            }
        }
    }
}

impl<I, S, E> FusedIterator for CommitStream<I>
where
    I: Iterator<Item = Result<S, E>>,
    S: AsRef<str>,
    E: Into<Box<dyn Error + Send + Sync>>,
{
}

/// Parse a complete `git log --stat` text
///
/// # Errors
///
/// Returns the first `LogError` encountered; no records are returned in
/// that case.
pub fn parse_log(input: &str) -> Result<Vec<CommitRecord>, LogError> {
    CommitStream::new(input.lines().map(Ok::<_, std::convert::Infallible>)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use similar_asserts::assert_eq;

    const HASH_A: &str = "1945ab9c752534e733c38ba0109dc3b741f0a6eb";
    const HASH_B: &str = "c460aeb7fb2d109c17e43de0ce681faec0b7374d";

    fn commit_block(hash: &str, subject: &str) -> String {
        format!(
            "commit {hash}\n\
             Author: Jane Doe <jane@example.com>\n\
             Date:   Sat Jan 17 02:33:06 2026 +0000\n\
             \n\
             \x20   {subject}\n\
             \n\
             \x20src/lib.rs | 3 ++-\n\
             \x201 file changed, 2 insertions(+), 1 deletion(-)\n"
        )
    }

    #[test]
    fn test_push_line_emits_on_next_boundary() {
        let mut parser = LogParser::new();
        let text = format!("{}{}", commit_block(HASH_A, "First"), commit_block(HASH_B, "Second"));

        let mut emitted = Vec::new();
        for line in text.lines() {
            if let Some(record) = parser.push_line(line).expect("push") {
                emitted.push(record);
            }
        }
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].hash, HASH_A);
        assert_eq!(parser.in_progress().map(PendingCommit::hash), Some(HASH_B));

        let last = parser.finish().expect("finish").expect("last commit");
        assert_eq!(last.subject, "Second");
        assert_eq!(parser.stats().commits, 2);
    }

    #[test]
    fn test_headers_are_parsed() {
        let records = parse_log(&commit_block(HASH_A, "First")).expect("parse");
        let record = &records[0];
        assert_eq!(
            record.author,
            Some(Author {
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string()
            })
        );
        assert_eq!(
            record.date,
            Some(Utc.with_ymd_and_hms(2026, 1, 17, 2, 33, 6).unwrap())
        );
        assert_eq!(record.file_map["src/lib.rs"].num_inserts, 2);
    }

    #[test]
    fn test_finish_is_idempotent() {
        let mut parser = LogParser::new();
        for line in commit_block(HASH_A, "Only").lines() {
            parser.push_line(line).expect("push");
        }
        assert!(parser.finish().expect("first finish").is_some());
        assert!(parser.finish().expect("second finish").is_none());
        assert!(parser.is_finished());
        assert_eq!(parser.stats().commits, 1);
    }

    #[test]
    fn test_push_after_finish_is_rejected() {
        let mut parser = LogParser::new();
        parser.finish().expect("finish");
        assert!(matches!(parser.push_line("anything"), Err(LogError::Finished)));
    }

    #[test]
    fn test_lines_before_first_boundary_are_discarded() {
        let text = format!("warning: banner text\n\n{}", commit_block(HASH_A, "First"));
        let mut stream = CommitStream::new(text.lines().map(Ok::<_, std::io::Error>));
        let records: Vec<_> = stream.by_ref().collect::<Result<_, _>>().expect("parse");
        assert_eq!(records.len(), 1);
        assert_eq!(stream.stats().discarded_lines, 2);
    }

    #[test]
    fn test_missing_headers_leave_fields_absent() {
        let text = format!("commit {HASH_A}\n\n    Bare commit\n");
        let records = parse_log(&text).expect("parse");
        assert_eq!(records[0].author, None);
        assert_eq!(records[0].date, None);
        assert_eq!(records[0].subject, "Bare commit");
    }

    #[test]
    fn test_unparseable_date_is_absent() {
        let text = format!("commit {HASH_A}\nDate:   yesterday-ish\n\n    Subject\n");
        let records = parse_log(&text).expect("parse");
        assert_eq!(records[0].date, None);
    }

    #[test]
    fn test_crlf_lines() {
        let text = commit_block(HASH_A, "Windows").replace('\n', "\r\n");
        let records = parse_log(&text).expect("parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].subject, "Windows");
        assert!(records[0].file_map.contains_key("src/lib.rs"));
    }

    #[test]
    fn test_malformed_line_aborts_stream() {
        let text = format!(
            "{}{}",
            commit_block(HASH_A, "Good").replace(" src/lib.rs | 3 ++-", " garbage text"),
            commit_block(HASH_B, "Never reached")
        );
        let mut stream = CommitStream::new(text.lines().map(Ok::<_, std::io::Error>));
        match stream.next() {
            Some(Err(LogError::MalformedStatLine { hash, line })) => {
                assert_eq!(hash, HASH_A);
                assert_eq!(line, " garbage text");
            }
            other => panic!("Expected MalformedStatLine, got {other:?}"),
        }
        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_source_error_flushes_then_fails() {
        let mut lines: Vec<Result<String, std::io::Error>> = commit_block(HASH_A, "Flushed")
            .lines()
            .map(|l| Ok(l.to_string()))
            .collect();
        lines.push(Err(std::io::Error::other("pipe closed")));
        lines.push(Ok(format!("commit {HASH_B}")));

        let mut stream = CommitStream::new(lines.into_iter());
        let record = stream.next().expect("item").expect("flushed commit");
        assert_eq!(record.subject, "Flushed");
        match stream.next() {
            Some(Err(LogError::Transport(err))) => assert!(err.to_string().contains("pipe closed")),
            other => panic!("Expected transport error, got {other:?}"),
        }
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_source_error_without_commit() {
        let lines: Vec<Result<&str, std::io::Error>> = vec![Err(std::io::Error::other("boom"))];
        let mut stream = CommitStream::new(lines.into_iter());
        assert!(matches!(stream.next(), Some(Err(LogError::Transport(_)))));
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_from_reader() {
        let text = format!("{}{}", commit_block(HASH_A, "One"), commit_block(HASH_B, "Two"));
        let records: Vec<CommitRecord> = CommitStream::from_reader(text.as_bytes())
            .collect::<Result<_, _>>()
            .expect("parse");
        let subjects: Vec<&str> = records.iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(subjects, vec!["One", "Two"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_log("").expect("parse").is_empty());
    }

    #[test]
    fn test_parse_author_variants() {
        assert_eq!(
            parse_author("Jane Doe <jane@example.com>"),
            Author {
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string()
            }
        );
        assert_eq!(
            parse_author("build-bot"),
            Author {
                name: "build-bot".to_string(),
                email: String::new()
            }
        );
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 1, 17, 2, 33, 6).unwrap();
        assert_eq!(parse_date("  Sat Jan 17 02:33:06 2026 +0000"), Some(expected));
        assert_eq!(parse_date("Sat Jan 17 03:33:06 2026 +0100"), Some(expected));
        assert_eq!(parse_date("2026-01-17 02:33:06 +0000"), Some(expected));
        assert_eq!(parse_date("Sat, 17 Jan 2026 02:33:06 +0000"), Some(expected));
        assert_eq!(parse_date("2026-01-17T02:33:06Z"), Some(expected));
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_parse_date_single_digit_day() {
        let expected = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        assert_eq!(parse_date("Mon Jan 5 09:00:00 2026 +0000"), Some(expected));
    }
}
