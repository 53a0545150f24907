use crate::assertions::parse_ipv4;
use crate::context::SuiteContext;
use crate::error::{Error, Result};
use crate::runtime::ContainerRuntime;
use tracing::info;

pub(super) async fn resolve<R>(runtime: &R, mut ctx: SuiteContext) -> Result<SuiteContext>
where
    R: ContainerRuntime + ?Sized,
{
    let inspected = runtime.inspect_address(&ctx.server.name).await?;
    if !inspected.success() {
        return Err(Error::assertion(
            format!("could not inspect {}", ctx.server.name),
            inspected.output(),
        ));
    }

    let address = parse_ipv4(&inspected.stdout).ok_or_else(|| {
        Error::assertion(
            format!("{} has no IPv4 address", ctx.server.name),
            inspected.output(),
        )
    })?;

    info!(container = %ctx.server.name, %address, "server address resolved");
    ctx.server.address = Some(address);
    Ok(ctx)
}
