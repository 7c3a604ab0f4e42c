// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gitstat library
//!
//! This module exports the command's building blocks (configuration, git
//! invocation, export) for use in integration tests and as a library.

pub mod config;
pub mod export;
pub mod git;
pub mod run;
