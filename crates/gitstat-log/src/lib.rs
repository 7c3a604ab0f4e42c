// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gitstat-log: streaming parser for `git log --stat` output
//!
//! This library crate turns the text of `git log --stat` into structured
//! [`CommitRecord`]s: author, date, subject, PR references, squashed branch
//! messages, and per-file change statistics.

#![warn(missing_docs)]

//! # Example
//!
//! ```
//! use gitstat_log::parse_log;
//!
//! let log = "\
//! commit 1945ab9c752534e733c38ba0109dc3b741f0a6eb
//! Author: Jane Doe <jane@example.com>
//! Date:   Sat Jan 17 02:33:06 2026 +0000
//!
//!     Fix crash (#12) (#34)
//!
//!  src/lib.rs | 12 +++++-------
//!  1 file changed, 5 insertions(+), 7 deletions(-)
//! ";
//!
//! let commits = parse_log(log).expect("parse log");
//! assert_eq!(commits[0].pr_number, Some(34));
//! assert_eq!(commits[0].revert_pr_number, Some(12));
//! assert_eq!(commits[0].file_map["src/lib.rs"].num_deletes, 7);
//! ```

pub mod classify;
pub mod commit;
pub mod error;
pub mod finalize;
pub mod parser;
pub mod stat;

pub use commit::{Author, CommitRecord, FileChange, SplitPrecision};
pub use error::LogError;
pub use parser::{CommitStream, LogParser, ParseStats, parse_log};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::commit::{Author, CommitRecord, FileChange, SplitPrecision};
    pub use crate::error::LogError;
    pub use crate::parser::{CommitStream, LogParser, parse_log};
}
