use super::check;
use crate::assertions::lists_entry;
use crate::context::SuiteContext;
use crate::error::{Error, Result};
use crate::runtime::ContainerRuntime;
use command_executor::shell_quote;
use interop_config::SuiteConfig;
use tracing::info;

pub(super) async fn clone<R>(
    runtime: &R,
    config: &SuiteConfig,
    ctx: SuiteContext,
) -> Result<SuiteContext>
where
    R: ContainerRuntime + ?Sized,
{
    let address = ctx.server_address()?;
    let client = ctx.client.name.as_str();

    let destination = format!("{}@{}", config.git.user, address);
    let probe = runtime
        .ssh_probe(client, &destination, config.git.ssh_port)
        .await?;
    if !probe.success() {
        return Err(Error::assertion(
            format!("key-based SSH login to {} failed", destination),
            probe.output(),
        ));
    }

    let url = config.clone_url(address);
    check(
        runtime,
        client,
        None,
        &format!("git clone {} {}", shell_quote(&url), shell_quote(&config.git.work_dir)),
        &format!("git clone {} failed", url),
    )
    .await?;

    let listing = check(runtime, client, None, "ls -l", "working directory is not listable").await?;
    if !lists_entry(&listing.stdout, &config.git.work_dir) {
        return Err(Error::assertion(
            format!("clone did not create {}", config.git.work_dir),
            listing.output(),
        ));
    }
    info!(%url, dir = %config.git.work_dir, "repository cloned");

    Ok(ctx)
}
