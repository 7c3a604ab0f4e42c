//! Configuration for the gitstat command
//!
//! This module provides the command-line/environment configuration:
//! where history comes from, how it is filtered, where records go, and the
//! logging level.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::export::OutputFormat;

/// Path value meaning "read standard input"
pub const STDIN_PATH: &str = "-";

/// Gitstat - per-commit and per-file change statistics from git history
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "gitstat")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Repository to read history from
    ///
    /// Any path inside the working tree works; the repository is discovered
    /// upward. Defaults to the current working directory.
    #[arg(short = 'C', long, env = "GITSTAT_REPO")]
    pub repo: Option<PathBuf>,

    /// Read captured `git log --stat` output instead of running git
    ///
    /// Use `-` for standard input.
    #[arg(
        short,
        long,
        env = "GITSTAT_INPUT",
        conflicts_with_all = ["repo", "after_date", "after_commit"]
    )]
    pub input: Option<PathBuf>,

    /// Only include commits after this date (passed to `git log --after`)
    #[arg(long)]
    pub after_date: Option<String>,

    /// Only include commits after this revision
    #[arg(long)]
    pub after_commit: Option<String>,

    /// Upper bound of the `--after-commit` range
    #[arg(long, requires = "after_commit")]
    pub before_commit: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Jsonl)]
    pub format: OutputFormat,

    /// Output file (json/jsonl) or directory (tables)
    ///
    /// Defaults to stdout for json/jsonl and the current directory for tables.
    #[arg(short, long, env = "GITSTAT_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Repository label stamped on exported commit rows
    #[arg(long, env = "GITSTAT_REPOSITORY")]
    pub repository: Option<String>,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so they never mix with exported records.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// Where log text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Run `git log` in this directory
    Git(PathBuf),
    /// Read captured output from standard input
    Stdin,
    /// Read captured output from a file
    File(PathBuf),
}

impl Config {
    /// Resolve the input source
    #[must_use]
    pub fn input_source(&self) -> InputSource {
        match &self.input {
            Some(path) if path == Path::new(STDIN_PATH) => InputSource::Stdin,
            Some(path) => InputSource::File(path.clone()),
            None => InputSource::Git(self.repo_path()),
        }
    }

    /// Get the repository path, using the current directory as default
    #[must_use]
    pub fn repo_path(&self) -> PathBuf {
        self.repo
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the tables directory, using the current directory as default
    #[must_use]
    pub fn tables_dir(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The repository path is specified but is not an existing directory
    /// - The input file is specified but doesn't exist
    /// - The tables output path exists and is not a directory
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref repo) = self.repo {
            if !repo.exists() {
                return Err(ConfigError::RepoNotFound(repo.clone()));
            }
            if !repo.is_dir() {
                return Err(ConfigError::RepoNotDirectory(repo.clone()));
            }
        }

        if let InputSource::File(ref path) = self.input_source() {
            if !path.is_file() {
                return Err(ConfigError::InputNotFound(path.clone()));
            }
        }

        if self.format == OutputFormat::Tables {
            let dir = self.tables_dir();
            if dir.exists() && !dir.is_dir() {
                return Err(ConfigError::OutputNotDirectory(dir));
            }
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Repository path not found
    #[error("Repository path not found: {0}")]
    RepoNotFound(PathBuf),

    /// Repository path is not a directory
    #[error("Repository path is not a directory: {0}")]
    RepoNotDirectory(PathBuf),

    /// Input file not found
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// Tables output path is a file
    #[error("Output path is not a directory: {0}")]
    OutputNotDirectory(PathBuf),
}
