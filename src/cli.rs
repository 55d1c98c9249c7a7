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

use std::time::Duration;

use clap::Parser;

use crate::common::config::ExporterConfig;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The port to listen on for Prometheus scrapes.
    #[arg(short, long, default_value_t = ExporterConfig::DEFAULT_PORT)]
    pub port: u16,
    /// The address to bind the HTTP listener to.
    #[arg(short, long, default_value = ExporterConfig::DEFAULT_BIND_ADDRESS)]
    pub bind: String,
    /// Path to the sinfo binary used for the node GPU inventory.
    #[arg(long, default_value = ExporterConfig::SINFO_COMMAND)]
    pub sinfo: String,
    /// Path to the squeue binary used for gres/gpu job states.
    #[arg(long, default_value = ExporterConfig::SQUEUE_COMMAND)]
    pub squeue: String,
    /// Kill the scrape if sinfo/squeue run longer than this many seconds.
    /// Without it, a hung command hangs the scrape.
    #[arg(long, value_name = "SECS")]
    pub command_timeout: Option<u64>,
    /// Answer a failed scrape with HTTP 500 instead of exiting the process.
    #[arg(long)]
    pub keep_alive_on_error: bool,
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = ExporterConfig::DEFAULT_LOG_FILTER)]
    pub log_level: String,
}

impl Cli {
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout.map(Duration::from_secs)
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
