use super::{check, setup};
use crate::assertions::lists_entry;
use crate::context::SuiteContext;
use crate::error::{Error, Result};
use crate::runtime::ContainerRuntime;
use command_executor::shell_quote;
use interop_config::SuiteConfig;
use tracing::info;

pub(super) async fn create<R>(
    runtime: &R,
    config: &SuiteConfig,
    ctx: SuiteContext,
) -> Result<SuiteContext>
where
    R: ContainerRuntime + ?Sized,
{
    let server = ctx.server.name.as_str();
    let user = shell_quote(&config.git.user);
    let home = shell_quote(&config.server_home());
    let repo = shell_quote(&config.server_repo_path());
    let keys = shell_quote(&config.authorized_keys_path());

    let script = format!(
        "useradd -m -s /bin/bash {user} && \
         git init --bare {repo} && \
         mkdir -p {home}/.ssh && chmod 700 {home}/.ssh && \
         touch {keys} && chmod 600 {keys} && \
         chown -R {user}:{user} {home}",
    );
    setup(runtime, server, "creating account and bare repository", &script).await?;

    let listing = check(
        runtime,
        server,
        None,
        &format!("ls -l {}", repo),
        "bare repository is not listable",
    )
    .await?;
    if !lists_entry(&listing.stdout, "HEAD") {
        return Err(Error::assertion(
            format!("{} has no HEAD", config.server_repo_path()),
            listing.output(),
        ));
    }
    info!(path = %config.server_repo_path(), owner = %config.git.user, "bare repository created");

    Ok(ctx)
}
