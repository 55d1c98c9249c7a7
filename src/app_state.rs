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

use crate::api::metrics::{InventoryCollector, QueueCollector, Registry};
use crate::cli::Cli;
use crate::error::Result;
use crate::source::CommandSource;

/// What a scrape does when a data source cannot be read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FetchErrorPolicy {
    /// Log and terminate the process.
    #[default]
    Exit,
    /// Reply with HTTP 500 and keep serving.
    Respond,
}

/// Immutable state shared by all scrape requests.
pub struct AppState {
    pub registry: Registry,
    pub on_fetch_error: FetchErrorPolicy,
}

impl AppState {
    pub fn new(registry: Registry, on_fetch_error: FetchErrorPolicy) -> Self {
        Self {
            registry,
            on_fetch_error,
        }
    }

    /// Register the sinfo and squeue collectors described by the command line.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let timeout = cli.command_timeout();
        let mut registry = Registry::new();
        registry.register(InventoryCollector::new(
            CommandSource::sinfo(&cli.sinfo).with_timeout(timeout),
        ))?;
        registry.register(QueueCollector::new(
            CommandSource::squeue(&cli.squeue).with_timeout(timeout),
        ))?;

        let on_fetch_error = if cli.keep_alive_on_error {
            FetchErrorPolicy::Respond
        } else {
            FetchErrorPolicy::Exit
        };

        Ok(Self::new(registry, on_fetch_error))
    }
}
