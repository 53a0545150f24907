//! Container runtime seam
//!
//! Stages never build docker command lines themselves. They go through
//! [`ContainerRuntime`], which [`DockerCli`] implements on top of a
//! `command-executor` launcher and which tests replace with a scripted fake.

use async_trait::async_trait;
use command_executor::layered::{DockerLayer, ExecutionLayer, LayeredExecutor, SshLayer};
use command_executor::{Command, ExitResult, Launcher, Result};
use std::sync::Arc;
use tracing::debug;

/// Address template for `docker inspect`; one address per attached network
const ADDRESS_TEMPLATE: &str = "{{range .NetworkSettings.Networks}}{{.IPAddress}} {{end}}";

/// Key pair written by the credentials stage; ssh expands the tilde itself
const CLIENT_IDENTITY: &str = "~/.ssh/id_rsa";

/// A detached container to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    /// Container name
    pub name: String,
    /// Image reference, `name:tag`
    pub image: String,
    /// `-p` values
    pub ports: Vec<String>,
    /// Command keeping the container alive
    pub command: Vec<String>,
}

impl ContainerSpec {
    /// A container from `image` that idles until removed
    pub fn idle(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            ports: Vec::new(),
            command: vec!["sleep".to_string(), "infinity".to_string()],
        }
    }

    /// Publish a port mapping
    pub fn with_port(mut self, mapping: impl Into<String>) -> Self {
        self.ports.push(mapping.into());
        self
    }
}

/// Operations the suite needs from a container runtime.
///
/// Every call is synchronous from the suite's point of view and reports the
/// collaborator's exit status and output; deciding whether a non-zero exit is
/// fatal is left to the caller. `Err` means the runtime could not be invoked.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Force-remove a container
    async fn remove(&self, name: &str) -> Result<ExitResult>;

    /// Create and start a detached container
    async fn run_detached(&self, spec: &ContainerSpec) -> Result<ExitResult>;

    /// Run a bash script inside a container, optionally as `user`
    async fn exec_as(
        &self,
        container: &str,
        user: Option<&str>,
        script: &str,
    ) -> Result<ExitResult>;

    /// Run a bash script inside a container as its default user
    async fn exec(&self, container: &str, script: &str) -> Result<ExitResult> {
        self.exec_as(container, None, script).await
    }

    /// From inside `container`, open a non-interactive SSH session to
    /// `destination` and run `true`
    async fn ssh_probe(
        &self,
        container: &str,
        destination: &str,
        port: u16,
    ) -> Result<ExitResult>;

    /// Addresses of a container, whitespace separated
    async fn inspect_address(&self, container: &str) -> Result<ExitResult>;

    /// Names of bridge-driver networks, one per line
    async fn bridge_networks(&self) -> Result<ExitResult>;

    /// Detach a container from a network
    async fn network_disconnect(&self, network: &str, container: &str) -> Result<ExitResult>;

    /// Attach a container to a network
    async fn network_connect(&self, network: &str, container: &str) -> Result<ExitResult>;
}

/// [`ContainerRuntime`] backed by the docker command line
#[derive(Debug)]
pub struct DockerCli<L: Launcher> {
    launcher: Arc<L>,
}

impl<L: Launcher + 'static> DockerCli<L> {
    /// Drive docker through `launcher`
    pub fn new(launcher: L) -> Self {
        Self {
            launcher: Arc::new(launcher),
        }
    }

    /// The launcher every docker command goes through
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    async fn docker<I, S>(&self, args: I) -> Result<ExitResult>
    where
        I: IntoIterator<Item = S> + Send,
        S: AsRef<std::ffi::OsStr> + Send,
    {
        let command = Command::builder("docker").args(args).build();
        debug!(command = %command, "docker");
        self.launcher.execute(command).await
    }
}

fn bash(script: &str) -> Command {
    Command::builder("bash").arg("-c").arg(script).build()
}

#[async_trait]
impl<L: Launcher + 'static> ContainerRuntime for DockerCli<L> {
    async fn remove(&self, name: &str) -> Result<ExitResult> {
        self.docker(["rm", "-f", name]).await
    }

    async fn run_detached(&self, spec: &ContainerSpec) -> Result<ExitResult> {
        let mut args = vec![
            "run".to_string(),
            "-d".to_string(),
            "--name".to_string(),
            spec.name.clone(),
        ];
        for port in &spec.ports {
            args.push("-p".to_string());
            args.push(port.clone());
        }
        args.push(spec.image.clone());
        args.extend(spec.command.iter().cloned());
        self.docker(args).await
    }

    async fn exec_as(
        &self,
        container: &str,
        user: Option<&str>,
        script: &str,
    ) -> Result<ExitResult> {
        // Pin the locale so git and apt report in the wording we match on
        let mut layer = DockerLayer::new(container).with_env("LC_ALL", "C");
        if let Some(user) = user {
            layer = layer.with_user(user);
        }
        let command = layer.wrap_command(bash(script))?;
        debug!(container, user, script, "docker exec");
        self.launcher.execute(command).await
    }

    async fn ssh_probe(&self, container: &str, destination: &str, port: u16) -> Result<ExitResult> {
        let executor = LayeredExecutor::new(Arc::clone(&self.launcher))
            .with_layer(
                SshLayer::new(destination)
                    .with_port(port)
                    .with_identity_file(CLIENT_IDENTITY)
                    .with_option("BatchMode=yes")
                    .with_option("ConnectTimeout=10"),
            )
            .with_layer(DockerLayer::new(container));
        debug!(container, destination, layers = ?executor.layer_descriptions(), "ssh probe");
        executor.execute(Command::new("true")).await
    }

    async fn inspect_address(&self, container: &str) -> Result<ExitResult> {
        self.docker(["inspect", "-f", ADDRESS_TEMPLATE, container]).await
    }

    async fn bridge_networks(&self) -> Result<ExitResult> {
        self.docker(["network", "ls", "--filter", "driver=bridge", "--format", "{{.Name}}"])
            .await
    }

    async fn network_disconnect(&self, network: &str, container: &str) -> Result<ExitResult> {
        self.docker(["network", "disconnect", network, container]).await
    }

    async fn network_connect(&self, network: &str, container: &str) -> Result<ExitResult> {
        self.docker(["network", "connect", network, container]).await
    }
}
