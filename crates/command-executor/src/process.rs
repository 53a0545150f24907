//! Process exit status and captured output

use serde::{Deserialize, Serialize};

/// Process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitStatus {
    /// Exit code if the process exited normally
    pub code: Option<i32>,
    /// Signal that terminated the process (Unix only, always `None` elsewhere)
    pub signal: Option<i32>,
}

impl ExitStatus {
    /// Status of a process that exited normally with `code`
    pub fn from_code(code: i32) -> Self {
        Self {
            code: Some(code),
            signal: None,
        }
    }

    /// Returns true if the process exited successfully (code 0)
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        };
        #[cfg(not(unix))]
        let signal = None;

        Self {
            code: status.code(),
            signal,
        }
    }
}

/// Result of running a command to completion with its output captured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitResult {
    /// How the process ended
    pub status: ExitStatus,
    /// Captured standard output, lossily decoded
    pub stdout: String,
    /// Captured standard error, lossily decoded
    pub stderr: String,
}

impl ExitResult {
    /// Build a result for a normal exit. Mostly useful for scripted launchers in tests.
    pub fn from_code(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            status: ExitStatus::from_code(code),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Returns true if the process exited with code 0
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Stdout followed by stderr, for diagnostics and loose output matching
    pub fn output(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
        }
    }
}
