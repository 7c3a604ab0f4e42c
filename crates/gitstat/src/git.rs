// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Running `git log --stat`
//!
//! Repository discovery and revision checks go through `git2`; the log
//! itself comes from the `git` binary so the parser sees exactly the text
//! format it understands. Output is streamed line by line, never buffered
//! whole.

use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use git2::Repository;
use gitstat_log::CommitStream;
use thiserror::Error;
use tracing::{debug, warn};

/// Stat width wide enough that git never abbreviates paths
pub const DEFAULT_STAT_WIDTH: usize = 5000;

/// Errors that can occur while reading history
#[derive(Debug, Error)]
pub enum GitError {
    /// Error from git2 library
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),

    /// Repository not found at the specified path
    #[error("Repository not found: {path}")]
    RepositoryNotFound {
        /// The path that was searched for a repository
        path: String,
    },

    /// Invalid commit reference (branch, tag, or SHA)
    #[error("Invalid commit reference: {reference}")]
    InvalidReference {
        /// The reference string that could not be resolved
        reference: String,
    },

    /// The git binary could not be started or read
    #[error("Failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    /// git exited unsuccessfully
    #[error("git log failed ({status}): {stderr}")]
    CommandFailed {
        /// Exit status as reported by the OS
        status: String,
        /// Captured standard error
        stderr: String,
    },
}

/// A git repository used to validate log arguments
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Discover and open a git repository containing the given path
    ///
    /// This walks up the directory tree to find a `.git` directory.
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` if no repository is found.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        let repo = Repository::discover(path).map_err(|_| GitError::RepositoryNotFound {
            path: path.display().to_string(),
        })?;
        Ok(Self { repo })
    }

    /// Get the working directory path (None for bare repos)
    #[must_use]
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Directory `git -C` should run in
    #[must_use]
    pub fn run_dir(&self) -> &Path {
        self.workdir().unwrap_or_else(|| self.repo.path())
    }

    /// Resolve a revision to the full SHA of the commit it names
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidReference` if the reference cannot be resolved
    /// to a commit.
    pub fn resolve(&self, reference: &str) -> Result<String, GitError> {
        let invalid = || GitError::InvalidReference {
            reference: reference.to_string(),
        };
        let commit = self
            .repo
            .revparse_single(reference)
            .and_then(|obj| obj.peel_to_commit())
            .map_err(|_| invalid())?;
        Ok(commit.id().to_string())
    }
}

/// Builder for a `git log --stat` invocation
#[derive(Debug, Clone)]
pub struct GitLogCommand {
    /// Directory to run in (`git -C`)
    pub repo: PathBuf,
    /// `--after=<date>` filter
    pub after_date: Option<String>,
    /// Exclusive lower bound of the revision range
    pub after_commit: Option<String>,
    /// Inclusive upper bound of the revision range (defaults to `HEAD`)
    pub before_commit: Option<String>,
    /// Value for `--stat=<width>`
    pub stat_width: usize,
}

impl GitLogCommand {
    /// Log the full history reachable from `HEAD`
    #[must_use]
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            after_date: None,
            after_commit: None,
            before_commit: None,
            stat_width: DEFAULT_STAT_WIDTH,
        }
    }

    /// Only include commits after a date
    #[must_use]
    pub fn after_date(mut self, date: impl Into<String>) -> Self {
        self.after_date = Some(date.into());
        self
    }

    /// Only include commits after a revision
    #[must_use]
    pub fn after_commit(mut self, reference: impl Into<String>) -> Self {
        self.after_commit = Some(reference.into());
        self
    }

    /// End the revision range at this revision instead of `HEAD`
    #[must_use]
    pub fn before_commit(mut self, reference: impl Into<String>) -> Self {
        self.before_commit = Some(reference.into());
        self
    }

    /// Arguments passed to `git`
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "-C".to_string(),
            self.repo.display().to_string(),
            "log".to_string(),
            format!("--stat={}", self.stat_width),
        ];
        if let Some(ref date) = self.after_date {
            args.push(format!("--after={date}"));
        }
        if let Some(ref after) = self.after_commit {
            let before = self.before_commit.as_deref().unwrap_or("HEAD");
            args.push(format!("{after}..{before}"));
        }
        args
    }

    /// Start git with its stdout piped back
    ///
    /// # Errors
    ///
    /// Returns `GitError::Spawn` if the git binary cannot be started.
    pub fn spawn(&self) -> Result<GitLogProcess, GitError> {
        let args = self.args();
        debug!(?args, "Spawning git");
        let child = Command::new("git")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        Ok(GitLogProcess { child })
    }
}

/// Commit stream over a git child's stdout
pub type GitCommitStream = CommitStream<std::io::Lines<BufReader<ChildStdout>>>;

/// A running `git log` process
pub struct GitLogProcess {
    child: Child,
}

impl GitLogProcess {
    /// Stream commits from the process output
    ///
    /// # Errors
    ///
    /// Returns `GitError::Spawn` if stdout was already taken.
    pub fn commits(&mut self) -> Result<GitCommitStream, GitError> {
        let stdout = self.child.stdout.take().ok_or_else(|| {
            GitError::Spawn(std::io::Error::other("git stdout already taken"))
        })?;
        Ok(CommitStream::from_reader(BufReader::new(stdout)))
    }

    /// Wait for git to exit and check its status
    ///
    /// Stderr is drained while waiting, so a noisy git cannot block on a
    /// full pipe.
    ///
    /// # Errors
    ///
    /// Returns `GitError::CommandFailed` with git's stderr on a non-zero exit.
    pub fn wait(self) -> Result<(), GitError> {
        let output = self.child.wait_with_output()?;
        if output.status.success() {
            return Ok(());
        }
        Err(GitError::CommandFailed {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    /// Stop git after the parse was abandoned
    pub fn kill(mut self) {
        if let Err(err) = self.child.kill() {
            warn!(error = %err, "Failed to kill git");
        }
        // Reap the child so it does not linger as a zombie
        let _ = self.child.wait();
    }
}
