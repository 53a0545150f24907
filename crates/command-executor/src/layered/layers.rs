//! Execution layer implementations for common execution contexts.

use crate::Command;
use crate::command::shell_quote;
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Trait for execution layers that can wrap commands
pub trait ExecutionLayer: Send + Sync + std::fmt::Debug {
    /// Wrap a command with this layer's execution context
    fn wrap_command(&self, command: Command) -> Result<Command>;

    /// Get a description of this layer for debugging
    fn description(&self) -> String;
}

/// Layer for Docker execution - wraps commands to run in a running container
#[derive(Debug, Clone)]
pub struct DockerLayer {
    /// Container name or ID
    pub container: String,
    /// User to run as in container
    pub user: Option<String>,
    /// Environment variables to set in the container
    pub env: BTreeMap<String, String>,
}

impl DockerLayer {
    /// Create a new Docker layer
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            user: None,
            env: BTreeMap::new(),
        }
    }

    /// Set the user to run as
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Add an environment variable for the container
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

impl ExecutionLayer for DockerLayer {
    fn wrap_command(&self, command: Command) -> Result<Command> {
        if self.container.is_empty() {
            return Err(Error::layer_failed(self.description(), "empty container name"));
        }

        let mut docker_cmd = Command::new("docker");
        docker_cmd.arg("exec");

        if let Some(user) = &self.user {
            docker_cmd.arg("-u").arg(user);
        }

        if let Some(dir) = command.get_current_dir() {
            docker_cmd.arg("-w").arg(dir);
        }

        for (key, value) in command.get_envs() {
            docker_cmd
                .arg("-e")
                .arg(format!("{}={}", key.to_string_lossy(), value.to_string_lossy()));
        }
        for (key, value) in &self.env {
            docker_cmd.arg("-e").arg(format!("{}={}", key, value));
        }

        docker_cmd.arg(&self.container);

        // argv is passed straight through, no intermediate shell
        docker_cmd.arg(command.get_program());
        docker_cmd.args(command.get_args());

        Ok(docker_cmd)
    }

    fn description(&self) -> String {
        format!("Docker exec in {}", self.container)
    }
}

/// Layer for SSH execution - wraps commands to run over SSH
#[derive(Debug, Clone)]
pub struct SshLayer {
    /// SSH destination (user@host or just host)
    pub destination: String,
    /// SSH port (optional)
    pub port: Option<u16>,
    /// SSH identity file (optional)
    pub identity_file: Option<String>,
    /// `-o` options, e.g. `BatchMode=yes`
    pub options: Vec<String>,
}

impl SshLayer {
    /// Create a new SSH layer
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            port: None,
            identity_file: None,
            options: Vec::new(),
        }
    }

    /// Set the SSH port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the SSH identity file
    pub fn with_identity_file(mut self, path: impl Into<String>) -> Self {
        self.identity_file = Some(path.into());
        self
    }

    /// Add an `-o` option
    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }
}

impl ExecutionLayer for SshLayer {
    fn wrap_command(&self, command: Command) -> Result<Command> {
        if self.destination.is_empty() {
            return Err(Error::layer_failed(self.description(), "empty destination"));
        }

        let mut ssh_cmd = Command::new("ssh");

        if let Some(port) = self.port {
            ssh_cmd.arg("-p").arg(port.to_string());
        }
        if let Some(identity) = &self.identity_file {
            ssh_cmd.arg("-i").arg(identity);
        }
        for option in &self.options {
            ssh_cmd.arg("-o").arg(option);
        }

        ssh_cmd.arg(&self.destination);

        // ssh hands the remote side a single string for its login shell
        let mut remote_command = String::new();
        if let Some(dir) = command.get_current_dir() {
            remote_command.push_str(&format!("cd {} && ", shell_quote(&dir.to_string_lossy())));
        }
        for (key, value) in command.get_envs() {
            remote_command.push_str(&format!(
                "{}={} ",
                key.to_string_lossy(),
                shell_quote(&value.to_string_lossy())
            ));
        }
        remote_command.push_str(&command.to_shell_string());

        ssh_cmd.arg(remote_command);

        Ok(ssh_cmd)
    }

    fn description(&self) -> String {
        format!("SSH to {}", self.destination)
    }
}
