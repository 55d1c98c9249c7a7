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

//! Per-state counts of jobs that requested `gres/gpu`, from `squeue` output.

use crate::common::config::ExporterConfig;
use crate::parsing::three_field_rows;

/// Job state as reported by `squeue --Format=state`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Running,
    Suspended,
    Cancelled,
    Completing,
    Completed,
    Configuring,
    Failed,
    Timeout,
    Preempted,
    NodeFail,
}

impl JobState {
    /// Exact, case-sensitive match on the long state name.
    pub fn from_label(label: &str) -> Option<Self> {
        let state = match label {
            "PENDING" => JobState::Pending,
            "RUNNING" => JobState::Running,
            "SUSPENDED" => JobState::Suspended,
            "CANCELLED" => JobState::Cancelled,
            "COMPLETING" => JobState::Completing,
            "COMPLETED" => JobState::Completed,
            "CONFIGURING" => JobState::Configuring,
            "FAILED" => JobState::Failed,
            "TIMEOUT" => JobState::Timeout,
            "PREEMPTED" => JobState::Preempted,
            "NODE_FAIL" => JobState::NodeFail,
            _ => return None,
        };
        Some(state)
    }
}

/// One row of `squeue --Format=jobid,state,tres-alloc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobRecord<'a> {
    pub job_id: &'a str,
    pub state: &'a str,
    pub tres_alloc: &'a str,
}

impl<'a> JobRecord<'a> {
    pub fn from_fields([job_id, state, tres_alloc]: [&'a str; 3]) -> Self {
        Self {
            job_id,
            state,
            tres_alloc,
        }
    }

    pub fn requests_gpu(&self) -> bool {
        self.tres_alloc.contains(ExporterConfig::QUEUE_GRES_MARKER)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QueueCounters {
    pub pending: f64,
    /// Subset of `pending`, never counted on its own.
    pub pending_dependency: f64,
    pub running: f64,
    pub suspended: f64,
    pub cancelled: f64,
    pub completing: f64,
    pub completed: f64,
    pub configuring: f64,
    pub failed: f64,
    pub timeout: f64,
    pub preempted: f64,
    pub node_fail: f64,
}

impl QueueCounters {
    pub fn record(&mut self, job: &JobRecord<'_>) {
        let Some(state) = JobState::from_label(job.state) else {
            return;
        };

        match state {
            JobState::Pending => {
                self.pending += 1.0;
                // Compares the tres-alloc column, not a reason column; kept
                // as-is since it defines the published pending_dependency value.
                if job.tres_alloc == ExporterConfig::PENDING_DEPENDENCY_REASON {
                    self.pending_dependency += 1.0;
                }
            }
            JobState::Running => self.running += 1.0,
            JobState::Suspended => self.suspended += 1.0,
            JobState::Cancelled => self.cancelled += 1.0,
            JobState::Completing => self.completing += 1.0,
            JobState::Completed => self.completed += 1.0,
            JobState::Configuring => self.configuring += 1.0,
            JobState::Failed => self.failed += 1.0,
            JobState::Timeout => self.timeout += 1.0,
            JobState::Preempted => self.preempted += 1.0,
            JobState::NodeFail => self.node_fail += 1.0,
        }
    }
}

/// Parse a job listing into per-state counts of GPU-requesting jobs.
pub fn parse_queue(input: &[u8]) -> QueueCounters {
    let text = String::from_utf8_lossy(input);
    let mut counters = QueueCounters::default();

    for job in three_field_rows(&text).map(JobRecord::from_fields) {
        if !job.requests_gpu() {
            continue;
        }
        counters.record(&job);
    }

    counters
}
