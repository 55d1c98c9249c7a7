// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Unified error types for the slurm-gpu-exporter library.
//!
//! Parsing of `sinfo`/`squeue` output never fails: malformed lines are
//! dropped and unparseable counts read as zero. Errors only come from
//! obtaining the raw output in the first place, or from registering
//! collectors whose gauge names clash.
//!
//! # Example
//!
//! ```rust,no_run
//! use slurm_gpu_exporter::source::{CommandSource, DataSource};
//! use slurm_gpu_exporter::Result;
//!
//! fn node_listing() -> Result<Vec<u8>> {
//!     CommandSource::sinfo("sinfo").fetch()
//! }
//! ```

use std::time::Duration;
use thiserror::Error;

/// The main error type for slurm-gpu-exporter operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The external command could not be started at all.
    ///
    /// Usually the binary is missing from `PATH` or is not executable.
    #[error("Failed to launch '{command}': {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The external command ran but exited unsuccessfully.
    #[error("Command failed: '{command}' (code: {code:?}) stderr: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The external command did not finish within the configured timeout.
    #[error("Command '{command}' timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    /// Two collectors tried to register a gauge with the same name.
    #[error("Duplicate metric registration: {0}")]
    DuplicateMetric(String),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for slurm-gpu-exporter operations.
pub type Result<T> = std::result::Result<T, Error>;
