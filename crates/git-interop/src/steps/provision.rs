use super::setup;
use crate::assertions::contains_version;
use crate::context::{Role, SuiteContext};
use crate::error::{Error, Result};
use crate::runtime::{ContainerRuntime, ContainerSpec};
use interop_config::SuiteConfig;
use tracing::{debug, info, warn};

fn packages(role: Role) -> &'static str {
    match role {
        Role::Server => "git openssh-server",
        Role::Client => "git openssh-client",
    }
}

pub(super) async fn provision<R>(
    runtime: &R,
    config: &SuiteConfig,
    ctx: SuiteContext,
    role: Role,
) -> Result<SuiteContext>
where
    R: ContainerRuntime + ?Sized,
{
    let settings = match role {
        Role::Server => &config.server,
        Role::Client => &config.client,
    };
    let name = settings.name.as_str();

    // Leftovers from an earlier run
    match runtime.remove(name).await {
        Ok(result) if result.success() => debug!(container = name, "removed stale container"),
        Ok(_) => debug!(container = name, "no stale container"),
        Err(e) => warn!(container = name, error = %e, "could not remove stale container"),
    }

    let mut spec = ContainerSpec::idle(name, config.image.to_string());
    for port in &settings.ports {
        spec = spec.with_port(port.to_docker_arg());
    }
    let created = runtime.run_detached(&spec).await?;
    if !created.success() {
        return Err(Error::provisioning(
            format!("starting container {} from {}", name, spec.image),
            created.output(),
        ));
    }
    info!(container = name, image = %spec.image, %role, "container started");

    setup(
        runtime,
        name,
        "installing packages",
        &format!(
            "export DEBIAN_FRONTEND=noninteractive && apt-get update && apt-get install -y {}",
            packages(role)
        ),
    )
    .await?;

    if role == Role::Server {
        setup(runtime, name, "starting sshd", "service ssh start").await?;
        setup(runtime, name, "checking sshd", "service ssh status").await?;
    }

    let expected = &config.git.expected_version;
    let version = runtime.exec(name, "git --version").await?;
    if !version.success() || !contains_version(&version.stdout, expected) {
        return Err(Error::assertion(
            format!("git in {} does not report version {}", name, expected),
            version.output(),
        ));
    }
    info!(container = name, version = version.stdout.trim(), "git installed");

    Ok(ctx)
}
