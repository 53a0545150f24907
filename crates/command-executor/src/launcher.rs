//! Launcher trait for executing commands

use crate::command::Command;
use crate::error::Result;
use crate::process::ExitResult;
use async_trait::async_trait;
use std::sync::Arc;

/// A launcher runs a fully prepared command to completion.
///
/// Implementations decide where the process lives; wrapping for other
/// contexts (containers, remote hosts) happens before the command reaches
/// the launcher, see [`crate::layered`].
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Execute a command and wait for it to complete, capturing output
    async fn execute(&self, command: Command) -> Result<ExitResult>;
}

#[async_trait]
impl<L: Launcher + ?Sized> Launcher for Arc<L> {
    async fn execute(&self, command: Command) -> Result<ExitResult> {
        (**self).execute(command).await
    }
}

#[async_trait]
impl<L: Launcher + ?Sized> Launcher for Box<L> {
    async fn execute(&self, command: Command) -> Result<ExitResult> {
        (**self).execute(command).await
    }
}
