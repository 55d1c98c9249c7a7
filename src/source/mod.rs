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

//! Raw data sources for the collectors.
//!
//! A data source produces the raw stdout of one Slurm listing per call.
//! Collectors only see this trait, so tests can feed canned output
//! through a closure instead of running `sinfo`/`squeue`.

pub mod command;

use std::time::Duration;

use crate::common::config::ExporterConfig;
use crate::error::Result;
pub use command::{execute_command, CommandOptions, CommandOutput};

/// Something that yields the raw bytes of a Slurm listing.
pub trait DataSource: Send + Sync {
    /// Fetch a fresh copy of the listing. Called once per scrape.
    fn fetch(&self) -> Result<Vec<u8>>;

    /// Human-readable name used in log messages.
    fn describe(&self) -> String {
        "closure".to_string()
    }
}

impl<F> DataSource for F
where
    F: Fn() -> Result<Vec<u8>> + Send + Sync,
{
    fn fetch(&self) -> Result<Vec<u8>> {
        self()
    }
}

/// A data source backed by an external command.
#[derive(Debug, Clone)]
pub struct CommandSource {
    program: String,
    args: Vec<String>,
    options: CommandOptions,
}

impl CommandSource {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|s| s.to_string()).collect(),
            options: CommandOptions::default(),
        }
    }

    /// Node listing: `nodehost gres gresused`, one row per node and partition.
    pub fn sinfo(program: impl Into<String>) -> Self {
        Self::new(program, ExporterConfig::SINFO_ARGS)
    }

    /// Job listing across all states: `jobid state tres-alloc`.
    pub fn squeue(program: impl Into<String>) -> Self {
        Self::new(program, ExporterConfig::SQUEUE_ARGS)
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.options.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl DataSource for CommandSource {
    fn fetch(&self) -> Result<Vec<u8>> {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        let output = execute_command(&self.program, &args, &self.options)?;
        Ok(output.stdout)
    }

    fn describe(&self) -> String {
        self.program.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_closure_source() {
        let source = || -> Result<Vec<u8>> { Ok(b"node1 gpu:4 gpu:1\n".to_vec()) };
        assert_eq!(source.fetch().unwrap(), b"node1 gpu:4 gpu:1\n");
        assert_eq!(source.describe(), "closure");
    }

    #[test]
    fn test_closure_source_error() {
        let source = || -> Result<Vec<u8>> { Err(Error::DuplicateMetric("x".to_string())) };
        assert!(source.fetch().is_err());
    }

    #[test]
    fn test_sinfo_arguments() {
        let source = CommandSource::sinfo("/opt/slurm/bin/sinfo");
        assert_eq!(source.program(), "/opt/slurm/bin/sinfo");
        assert_eq!(
            source.args(),
            ["-h", "--Node", "--Format=nodehost,gres,gresused"]
        );
    }

    #[test]
    fn test_squeue_arguments() {
        let source = CommandSource::squeue("squeue");
        assert_eq!(
            source.args(),
            [
                "-a",
                "-r",
                "-h",
                "--Format=jobid,state,tres-alloc:90",
                "--states=all"
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_command_source_fetch() {
        let source = CommandSource::new("printf", &["node1 gpu:2 gpu:0"]);
        assert_eq!(source.fetch().unwrap(), b"node1 gpu:2 gpu:0");
        assert_eq!(source.describe(), "printf");
    }
}
