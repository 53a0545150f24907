//! Layered execution system for runtime command composition.
//!
//! Layers rewrite a command so that it runs in another context. They are
//! applied in the order they were added: the first layer wraps the original
//! command, the next layer wraps that result, and so on. The outermost command
//! is what the launcher actually spawns.
//!
//! # Example
//!
//! ```rust,no_run
//! use command_executor::layered::{DockerLayer, LayeredExecutor, SshLayer};
//! use command_executor::{backends::LocalLauncher, Command};
//!
//! # async fn example() -> command_executor::Result<()> {
//! // Inside container "git-client", ssh to the server and run `true`.
//! let executor = LayeredExecutor::new(LocalLauncher)
//!     .with_layer(SshLayer::new("gituser@172.17.0.2").with_option("BatchMode=yes"))
//!     .with_layer(DockerLayer::new("git-client"));
//!
//! let result = executor.execute(Command::new("true")).await?;
//! assert!(result.success());
//! # Ok(())
//! # }
//! ```

mod executor;
mod layers;

pub use executor::LayeredExecutor;
pub use layers::{DockerLayer, ExecutionLayer, SshLayer};
