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

// Command execution for the Slurm CLI data sources.
//
// - Optional timeout (none by default: a hung sinfo hangs the scrape);
//   a timed-out child is killed and reaped
// - Optional status check
// - stdout is returned as raw bytes; stderr is decoded lossily for errors

use std::io::Read;
use std::process::{Command, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Options to control command execution behavior.
#[derive(Debug, Clone)]
pub struct CommandOptions {
    /// Optional timeout. If None, waits for the command indefinitely.
    pub timeout: Option<Duration>,
    /// If true, non-zero exit statuses will return an error.
    pub check_status: bool,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            check_status: true,
        }
    }
}

/// Raw command output.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Process exit code (or -1 if unavailable, e.g. killed by a signal)
    pub status: i32,
    pub stdout: Vec<u8>,
    /// UTF-8 (lossy) decoded stderr
    pub stderr: String,
}

/// Execute a command with the provided CommandOptions.
///
/// - Launch failures return [`Error::Launch`]
/// - If options.timeout elapses first, returns [`Error::Timeout`]
/// - When options.check_status is true and exit code != 0, returns [`Error::CommandFailed`]
pub fn execute_command(
    command: &str,
    args: &[&str],
    options: &CommandOptions,
) -> Result<CommandOutput> {
    let display = display_command(command, args);

    let output = match options.timeout {
        Some(timeout) => run_with_timeout(command, args, timeout, &display)?,
        None => Command::new(command)
            .args(args)
            .output()
            .map_err(|source| Error::Launch {
                command: display.clone(),
                source,
            })?,
    };

    let status_code = output.status.code().unwrap_or(-1);
    let out = CommandOutput {
        status: status_code,
        stdout: output.stdout,
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    };

    if options.check_status && !output.status.success() {
        return Err(Error::CommandFailed {
            command: display,
            code: output.status.code(),
            stderr: out.stderr,
        });
    }

    Ok(out)
}

/// Spawn the command and wait at most `timeout` for it to exit.
///
/// On timeout the child is killed and reaped before returning, so a hung
/// sinfo/squeue does not outlive the scrape.
fn run_with_timeout(
    command: &str,
    args: &[&str],
    timeout: Duration,
    display: &str,
) -> Result<Output> {
    let launch_error = |source| Error::Launch {
        command: display.to_string(),
        source,
    };

    let mut child = Command::new(command)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(launch_error)?;

    // Drain both pipes while polling so a chatty child cannot block on a full pipe.
    let stdout = child.stdout.take().map(drain_pipe);
    let stderr = child.stderr.take().map(drain_pipe);

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                let command_display = display;
                tracing::warn!("Killed '{command_display}' after {timeout:?}");
                return Err(Error::Timeout {
                    command: display.to_string(),
                    timeout,
                });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(launch_error(e));
            }
        }
    };

    Ok(Output {
        status,
        stdout: join_pipe(stdout),
        stderr: join_pipe(stderr),
    })
}

fn drain_pipe<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn join_pipe(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

fn display_command(command: &str, args: &[&str]) -> String {
    if args.is_empty() {
        command.to_string()
    } else {
        format!("{command} {}", args.join(" "))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_execute_command_success() {
        let out = execute_command("echo", &["hello"], &CommandOptions::default())
            .expect("echo should succeed");
        assert_eq!(out.status, 0);
        assert_eq!(out.stdout, b"hello\n");
    }

    #[test]
    fn test_execute_command_with_status_check() {
        let opts = CommandOptions {
            timeout: Some(Duration::from_secs(2)),
            check_status: true,
        };
        // `false` returns non-zero status on Unix
        let err = execute_command("false", &[], &opts).unwrap_err();
        match err {
            Error::CommandFailed { command, code, .. } => {
                assert_eq!(command, "false");
                assert_eq!(code, Some(1));
            }
            other => panic!("Expected CommandFailed error, got {other:?}"),
        }
    }

    #[test]
    fn test_execute_command_without_status_check() {
        let opts = CommandOptions {
            timeout: None,
            check_status: false,
        };
        let out = execute_command("false", &[], &opts).expect("status is not checked");
        assert_eq!(out.status, 1);
    }

    #[test]
    fn test_execute_command_missing_binary() {
        let err = execute_command(
            "/nonexistent/slurm/bin/sinfo",
            &["-h"],
            &CommandOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Launch { .. }));
    }

    #[test]
    fn test_execute_command_timeout() {
        let opts = CommandOptions {
            timeout: Some(Duration::from_millis(100)),
            check_status: true,
        };
        let err = execute_command("sleep", &["5"], &opts).unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
    }

    #[test]
    fn test_execute_command_timeout_kills_child() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pid_file = dir.path().join("pid");
        let script = format!("echo $$ > {}; exec sleep 30", pid_file.display());

        let opts = CommandOptions {
            timeout: Some(Duration::from_millis(300)),
            check_status: true,
        };
        let err = execute_command("sh", &["-c", &script], &opts).unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));

        let pid = std::fs::read_to_string(&pid_file).expect("child wrote its pid");
        let alive = Command::new("kill")
            .args(["-0", pid.trim()])
            .stderr(Stdio::null())
            .status()
            .expect("kill -0 runs");
        assert!(!alive.success(), "child {} outlived its timeout", pid.trim());
    }

    #[test]
    fn test_execute_command_timeout_returns_output() {
        let opts = CommandOptions {
            timeout: Some(Duration::from_secs(5)),
            check_status: true,
        };
        let script = "echo node1 gpu:4 gpu:1; echo warn >&2";
        let out = execute_command("sh", &["-c", script], &opts)
            .expect("finishes before the timeout");
        assert_eq!(out.stdout, b"node1 gpu:4 gpu:1\n");
        assert_eq!(out.stderr, "warn");
    }
}
