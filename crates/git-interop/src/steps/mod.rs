//! Stage implementations
//!
//! Each stage takes the suite context by value and returns it, updated, on
//! success. Setup commands that fail map to [`Error::Provisioning`]; checks of
//! the behaviour under test map to [`Error::Assertion`].

mod address;
mod clone;
mod commit;
mod credentials;
mod partition;
mod provision;
mod pull;
mod repository;

use crate::context::{Role, SuiteContext};
use crate::error::{Error, Result};
use crate::runtime::ContainerRuntime;
use crate::stage::Stage;
use command_executor::ExitResult;
use interop_config::SuiteConfig;
use tracing::debug;

/// Run one stage against `runtime`
pub async fn run_stage<R>(
    stage: Stage,
    runtime: &R,
    config: &SuiteConfig,
    ctx: SuiteContext,
) -> Result<SuiteContext>
where
    R: ContainerRuntime + ?Sized,
{
    match stage {
        Stage::ProvisionServer => provision::provision(runtime, config, ctx, Role::Server).await,
        Stage::ProvisionClient => provision::provision(runtime, config, ctx, Role::Client).await,
        Stage::CreateRepository => repository::create(runtime, config, ctx).await,
        Stage::ExchangeCredentials => credentials::exchange(runtime, config, ctx).await,
        Stage::ResolveAddress => address::resolve(runtime, ctx).await,
        Stage::Clone => clone::clone(runtime, config, ctx).await,
        Stage::CommitAndPush => commit::commit_and_push(runtime, config, ctx).await,
        Stage::PullAndFetch => pull::pull_and_fetch(runtime, config, ctx).await,
        Stage::PartitionRecovery => partition::recover(runtime, config, ctx).await,
    }
}

/// Run a setup script; a non-zero exit is a provisioning failure
async fn setup<R>(runtime: &R, container: &str, what: &str, script: &str) -> Result<ExitResult>
where
    R: ContainerRuntime + ?Sized,
{
    let result = runtime.exec(container, script).await?;
    debug!(container, what, code = ?result.status.code, "setup step finished");
    if !result.success() {
        return Err(Error::provisioning(
            format!("{} in {}", what, container),
            result.output(),
        ));
    }
    Ok(result)
}

/// Run a script whose exit status is part of what is being tested
async fn check<R>(
    runtime: &R,
    container: &str,
    user: Option<&str>,
    script: &str,
    message: &str,
) -> Result<ExitResult>
where
    R: ContainerRuntime + ?Sized,
{
    let result = runtime.exec_as(container, user, script).await?;
    debug!(container, script, code = ?result.status.code, "check finished");
    if !result.success() {
        return Err(Error::assertion(message, result.output()));
    }
    Ok(result)
}
