use super::check;
use crate::assertions::PullIndicator;
use crate::context::SuiteContext;
use crate::error::{Error, Result};
use crate::runtime::ContainerRuntime;
use command_executor::{ExitResult, shell_quote};
use interop_config::SuiteConfig;
use tracing::info;

/// `git pull` of the configured branch inside the client's working copy
pub(crate) fn pull_script(config: &SuiteConfig) -> String {
    format!(
        "cd {} && git pull origin {}",
        shell_quote(&config.git.work_dir),
        shell_quote(&config.git.branch)
    )
}

/// Indicator of a successful pull, if it was one
pub(crate) fn pull_indicator(result: &ExitResult) -> Option<PullIndicator> {
    if !result.success() {
        return None;
    }
    PullIndicator::detect(&result.output())
}

pub(super) async fn pull_and_fetch<R>(
    runtime: &R,
    config: &SuiteConfig,
    ctx: SuiteContext,
) -> Result<SuiteContext>
where
    R: ContainerRuntime + ?Sized,
{
    let client = ctx.client.name.as_str();
    let pull = pull_script(config);

    let first = runtime.exec(client, &pull).await?;
    let indicator = pull_indicator(&first).ok_or_else(|| {
        Error::assertion(
            "git pull did not report up to date or updating",
            first.output(),
        )
    })?;
    info!(?indicator, "pull succeeded");

    check(
        runtime,
        client,
        None,
        &format!("git -C {} fetch origin", shell_quote(&config.git.work_dir)),
        "git fetch origin failed",
    )
    .await?;

    let second = runtime.exec(client, &pull).await?;
    if pull_indicator(&second) != Some(PullIndicator::UpToDate) {
        return Err(Error::assertion(
            "repeated git pull did not report up to date",
            second.output(),
        ));
    }
    info!("repeated pull is a no-op");

    Ok(ctx)
}
