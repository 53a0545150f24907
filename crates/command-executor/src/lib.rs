//! Runtime-agnostic command execution library
//!
//! This crate provides a unified interface for running commands on the local
//! host and wrapping them so they run somewhere else instead: inside a
//! container via `docker exec`, or on a remote host via `ssh`.

#![warn(missing_docs)]

pub mod backends;
pub mod command;
pub mod error;
pub mod launcher;
pub mod layered;
pub mod process;

pub use command::{Command, shell_quote};
pub use error::{Error, Result};
pub use launcher::Launcher;
pub use process::{ExitResult, ExitStatus};
