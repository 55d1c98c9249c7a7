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

//! Prometheus exporter for Slurm GPU inventory and gres/gpu job states.
//!
//! Every scrape runs `sinfo` and `squeue`, parses their output from
//! scratch and renders a fixed set of unlabeled gauges.

pub mod api;
pub mod app_state;
pub mod cli;
pub mod error;
pub mod metrics;
pub mod parsing;
pub mod source;

pub mod common {
    pub mod config;
}

pub use error::{Error, Result};
