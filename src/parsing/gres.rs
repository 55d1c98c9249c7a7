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

//! Generic resource (GRES) spec parsing.
//!
//! Slurm reports node GRES as a comma-separated list of
//! `name[:type][:count]` elements, optionally followed by socket or index
//! annotations, e.g. `gpu:tesla:4(S:0-1)` or `gpu:a100:2(IDX:0-1),mps:400`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::common::parse_number;
use crate::common::config::ExporterConfig;

/// `gpu:<type-or-count>[:<count>]`, not anchored at the end so trailing
/// `(S:..)`/`(IDX:..)` annotations are tolerated after a typed count.
///
/// An untyped count followed by an annotation is misread: in `gpu:4(S:0-1)`
/// the first capture swallows `4(S` and the socket range start becomes the
/// count, so it reads as 0 (and `gpu:4(S:2-3)` as 2).
static GPU_GRES_PATTERN: Lazy<Regex> = Lazy::new(|| gres_pattern(ExporterConfig::GRES_NAME));

fn gres_pattern(name: &str) -> Regex {
    let pattern = format!(r"^{}:([^:]+):?(\d+)?", regex::escape(name));
    Regex::new(&pattern).expect("GRES pattern is built from an escaped literal")
}

/// Extract the count of the tracked GPU resource from a GRES spec.
pub fn parse_gpu_gres(spec: &str) -> f64 {
    let mut value = 0.0;

    for element in spec.split(',') {
        let is_tracked = element
            .strip_prefix(ExporterConfig::GRES_NAME)
            .is_some_and(|rest| rest.starts_with(':'));
        if !is_tracked {
            continue;
        }

        // Last matching element wins; earlier values are overwritten, not summed.
        if let Some(caps) = GPU_GRES_PATTERN.captures(element) {
            value = element_count(
                caps.get(1).map(|m| m.as_str()),
                caps.get(2).map(|m| m.as_str()),
            );
        }
    }

    value
}

/// Resolve the count of a single matched element.
///
/// An explicit count wins. Without one, the first capture is used when it
/// is a bare digit run (`gpu:4`); a type name (`gpu:tesla`) reads as 0.
fn element_count(type_or_count: Option<&str>, count: Option<&str>) -> f64 {
    match (type_or_count, count) {
        (_, Some(count)) => parse_number(count).unwrap_or(0.0),
        (Some(bare), None) if is_digit_run(bare) => parse_number(bare).unwrap_or(0.0),
        _ => 0.0,
    }
}

fn is_digit_run(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
