//! Backend implementations for different execution contexts
//!
//! Only the local backend spawns processes. Running inside a container or on
//! a remote host is expressed by wrapping a command with execution layers
//! from [`crate::layered`] and handing the result to [`LocalLauncher`].

pub mod local;
pub use local::LocalLauncher;
