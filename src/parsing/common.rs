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

// Common tokenization helpers shared by the sinfo and squeue parsers.

use std::str::FromStr;

/// Parse a number from a string after trimming surrounding whitespace.
/// Returns None if parsing fails.
pub fn parse_number<T: FromStr>(s: &str) -> Option<T> {
    s.trim().parse::<T>().ok()
}

/// Split a line into exactly three whitespace-delimited fields.
///
/// Blank lines, headers and truncated rows yield None.
pub fn three_fields(line: &str) -> Option<[&str; 3]> {
    let mut fields = line.split_whitespace();
    let first = fields.next()?;
    let second = fields.next()?;
    let third = fields.next()?;
    if fields.next().is_some() {
        return None;
    }
    Some([first, second, third])
}

/// Iterate over the three-field rows of raw command output.
///
/// Output is decoded as lossy UTF-8 by the caller; rows that do not split
/// into exactly three fields are skipped silently.
pub fn three_field_rows(input: &str) -> impl Iterator<Item = [&str; 3]> {
    input.lines().filter_map(three_fields)
}
