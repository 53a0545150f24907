//! Local process execution backend

use async_process::Stdio;
use async_trait::async_trait;
use std::io;
use tracing::{debug, trace};

use crate::command::Command;
use crate::error::{Error, Result};
use crate::launcher::Launcher;
use crate::process::ExitResult;

/// Launcher for executing processes locally
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalLauncher;

#[async_trait]
impl Launcher for LocalLauncher {
    async fn execute(&self, command: Command) -> Result<ExitResult> {
        debug!(command = %command, "Launching local process");

        let mut async_cmd = command.prepare();
        // Nothing we run is interactive; a closed stdin keeps tools like
        // apt and ssh from waiting on a prompt.
        async_cmd.stdin(Stdio::null());
        async_cmd.stdout(Stdio::piped());
        async_cmd.stderr(Stdio::piped());

        let program = command.get_program().to_string_lossy().into_owned();
        let output = async_cmd.output().await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::CommandNotFound { command: program.clone() },
            _ => Error::spawn_failed(format!("Failed to spawn {}: {}", program, e)),
        })?;

        let result = ExitResult {
            status: output.status.into(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        trace!(
            program = %program,
            code = ?result.status.code,
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "Local process finished"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[smol_potat::test]
    async fn test_captures_stdout_and_code() {
        let cmd = Command::builder("sh")
            .arg("-c")
            .arg("echo hello; echo oops >&2; exit 3")
            .build();

        let result = LocalLauncher.execute(cmd).await.unwrap();

        assert_eq!(result.status.code, Some(3));
        assert_eq!(result.stdout.trim(), "hello");
        assert_eq!(result.stderr.trim(), "oops");
        assert!(!result.success());
    }

    #[smol_potat::test]
    async fn test_missing_program_is_command_not_found() {
        let cmd = Command::new("this_command_does_not_exist_12345");
        let err = LocalLauncher.execute(cmd).await.unwrap_err();
        assert!(matches!(err, Error::CommandNotFound { .. }));
    }
}
