use super::pull::{pull_indicator, pull_script};
use crate::context::SuiteContext;
use crate::error::{Error, Result};
use crate::runtime::ContainerRuntime;
use interop_config::SuiteConfig;
use smol::Timer;
use tracing::{info, warn};

async fn partition_network<R>(runtime: &R, config: &SuiteConfig) -> Result<String>
where
    R: ContainerRuntime + ?Sized,
{
    if let Some(network) = &config.partition.network {
        return Ok(network.clone());
    }

    let listed = runtime.bridge_networks().await?;
    if !listed.success() {
        return Err(Error::provisioning("listing bridge networks", listed.output()));
    }
    listed
        .stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::provisioning("finding a bridge network", listed.output()))
}

pub(super) async fn recover<R>(
    runtime: &R,
    config: &SuiteConfig,
    mut ctx: SuiteContext,
) -> Result<SuiteContext>
where
    R: ContainerRuntime + ?Sized,
{
    let client = ctx.client.name.clone();
    let network = partition_network(runtime, config).await?;
    ctx.partition_network = Some(network.clone());

    // The client may already be detached
    match runtime.network_disconnect(&network, &client).await {
        Ok(result) if result.success() => {
            info!(%network, container = %client, "client disconnected")
        }
        Ok(result) => warn!(
            %network,
            container = %client,
            output = %result.output().trim(),
            "disconnect failed, continuing"
        ),
        Err(e) => warn!(%network, container = %client, error = %e, "disconnect failed, continuing"),
    }

    let outage = config.partition.outage();
    info!(?outage, "simulating outage");
    Timer::after(outage).await;

    let reconnected = runtime.network_connect(&network, &client).await?;
    if !reconnected.success() {
        return Err(Error::provisioning(
            format!("reconnecting {} to {}", client, network),
            reconnected.output(),
        ));
    }
    info!(%network, container = %client, "client reconnected");

    let policy = config.partition.recovery;
    let attempts = policy.attempts();
    let pull = pull_script(config);
    let mut last_output = String::new();

    for attempt in 1..=attempts {
        if let Some(backoff) = policy.backoff_before(attempt) {
            Timer::after(backoff).await;
        }
        let result = runtime.exec(&client, &pull).await?;
        if let Some(indicator) = pull_indicator(&result) {
            info!(attempt, ?indicator, "pull succeeded after reconnect");
            return Ok(ctx);
        }
        warn!(attempt, attempts, "pull after reconnect failed");
        last_output = result.output();
    }

    Err(Error::assertion(
        format!("git pull did not recover after {} attempt(s)", attempts),
        last_output,
    ))
}
