use super::{check, setup};
use crate::assertions::is_public_key;
use crate::context::SuiteContext;
use crate::error::{Error, Result};
use crate::runtime::ContainerRuntime;
use command_executor::shell_quote;
use interop_config::SuiteConfig;
use tracing::info;

const KEYGEN: &str = "mkdir -p ~/.ssh && chmod 700 ~/.ssh && \
    rm -f ~/.ssh/id_rsa ~/.ssh/id_rsa.pub && \
    ssh-keygen -q -t rsa -b 2048 -N '' -f ~/.ssh/id_rsa";

const TRUST_HOSTS: &str =
    "printf '%s\\n' 'StrictHostKeyChecking no' >> ~/.ssh/config && chmod 600 ~/.ssh/config";

pub(super) async fn exchange<R>(
    runtime: &R,
    config: &SuiteConfig,
    mut ctx: SuiteContext,
) -> Result<SuiteContext>
where
    R: ContainerRuntime + ?Sized,
{
    let client = ctx.client.name.clone();
    let server = ctx.server.name.clone();

    setup(runtime, &client, "generating key pair", KEYGEN).await?;

    let read = check(
        runtime,
        &client,
        None,
        "cat ~/.ssh/id_rsa.pub",
        "public key is not readable",
    )
    .await?;
    let key = read.stdout.trim().to_string();
    if !is_public_key(&key) {
        return Err(Error::assertion("generated public key is empty or malformed", read.output()));
    }

    let keys_path = config.authorized_keys_path();
    let keys = shell_quote(&keys_path);
    let user = shell_quote(&config.git.user);
    let quoted_key = shell_quote(&key);

    setup(
        runtime,
        &server,
        "registering client key",
        &format!(
            "printf '%s\\n' {quoted_key} >> {keys} && chown {user}:{user} {keys}"
        ),
    )
    .await?;

    check(
        runtime,
        &server,
        None,
        &format!("grep -qxF {} {}", quoted_key, keys),
        &format!("client public key is not present verbatim in {}", keys_path),
    )
    .await?;

    setup(runtime, &client, "disabling strict host key checking", TRUST_HOSTS).await?;

    info!(client = %client, server = %server, "client key authorized");
    ctx.public_key = Some(key);
    Ok(ctx)
}
