//! # git-interop
//!
//! End-to-end interoperability suite for git over SSH between two containers.
//!
//! A server container hosts a bare repository behind an SSH daemon and a client
//! container clones, commits, pushes, pulls and fetches against it, then rides
//! out a simulated network partition. Containers are driven through the
//! [`ContainerRuntime`] seam, which [`DockerCli`] implements with the docker
//! command line via `command-executor`.
//!
//! ```no_run
//! use command_executor::backends::LocalLauncher;
//! use git_interop::{DockerCli, Plan, Stage, Suite};
//! use interop_config::SuiteConfig;
//!
//! # fn main() -> git_interop::Result<()> {
//! smol::block_on(async {
//!     let plan = Plan::select(Some(Stage::Clone), &[])?;
//!     let report = Suite::new(DockerCli::new(LocalLauncher), SuiteConfig::default())
//!         .with_plan(plan)
//!         .run()
//!         .await;
//!     assert!(report.passed());
//!     Ok(())
//! })
//! # }
//! ```

#![warn(missing_docs)]

pub mod assertions;
pub mod context;
pub mod error;
pub mod report;
pub mod runtime;
pub mod stage;
pub mod steps;
pub mod suite;
pub mod teardown;

pub use context::{ContainerIdentity, Role, SuiteContext};
pub use error::{Error, Result};
pub use report::{StageOutcome, StageRecord, SuiteReport};
pub use runtime::{ContainerRuntime, ContainerSpec, DockerCli};
pub use stage::{Plan, Stage};
pub use suite::Suite;
pub use teardown::{TeardownFailure, TeardownReport, teardown};
