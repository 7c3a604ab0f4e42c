// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for gitstat-log

use thiserror::Error;

/// Errors that abort a log parse
///
/// Every variant is terminal: once one is reported the parse produces no
/// further records.
#[derive(Debug, Error)]
pub enum LogError {
    /// A line in the file-change section matched neither the stat nor the
    /// summary grammar
    #[error("Malformed stat line in commit {hash}: {line:?}")]
    MalformedStatLine {
        /// Hash of the commit whose finalization failed
        hash: String,
        /// The offending line, verbatim
        line: String,
    },

    /// The upstream line source failed
    #[error("Line source error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A line was pushed after the parser reached its terminal state
    #[error("Parser already finished")]
    Finished,
}

impl LogError {
    /// Wrap an upstream error
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transport(err.into())
    }

    /// The offending line, if this error was caused by one
    #[must_use]
    pub fn offending_line(&self) -> Option<&str> {
        match self {
            Self::MalformedStatLine { line, .. } => Some(line),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LogError {
    fn from(err: std::io::Error) -> Self {
        Self::transport(err)
    }
}
