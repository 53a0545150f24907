//! # Interop Configuration
//!
//! Configuration for the git interop harness.
//!
//! Every field has a default, and the defaults are the fixed values the suite
//! was designed around (Ubuntu 20.04, git 2.25.1, a `gituser` account serving
//! `myrepo.git`). A YAML file may override any subset of them; see
//! [`parser::parse_file`].

#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub mod parser;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Only supported configuration version
pub const CONFIG_VERSION: &str = "1.0";

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    /// Configuration version
    pub version: String,

    /// Base image both environments are created from
    pub image: ImageSettings,

    /// The environment hosting the bare repository and SSH daemon
    pub server: ContainerSettings,

    /// The environment running the git client
    pub client: ContainerSettings,

    /// Repository, account and commit settings
    pub git: GitSettings,

    /// Network partition simulation
    pub partition: PartitionSettings,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            image: ImageSettings::default(),
            server: ContainerSettings {
                name: "git-server".to_string(),
                ports: vec![
                    PortMapping::Full("2222:22".to_string()),
                    PortMapping::Full("443:443".to_string()),
                ],
            },
            client: ContainerSettings {
                name: "git-client".to_string(),
                ports: Vec::new(),
            },
            git: GitSettings::default(),
            partition: PartitionSettings::default(),
        }
    }
}

impl SuiteConfig {
    /// Home directory of the server-side git account
    pub fn server_home(&self) -> String {
        format!("/home/{}", self.git.user)
    }

    /// Absolute path of the bare repository on the server
    pub fn server_repo_path(&self) -> String {
        format!("{}/{}", self.server_home(), self.git.repo_name)
    }

    /// Authorized-keys file of the server-side git account
    pub fn authorized_keys_path(&self) -> String {
        format!("{}/.ssh/authorized_keys", self.server_home())
    }

    /// SSH clone URL for a server reachable at `address`
    pub fn clone_url(&self, address: impl fmt::Display) -> String {
        format!(
            "ssh://{}@{}:{}{}",
            self.git.user,
            address,
            self.git.ssh_port,
            self.server_repo_path()
        )
    }
}

/// Container image settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageSettings {
    /// Image repository
    pub name: String,
    /// Image tag
    pub tag: String,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            name: "ubuntu".to_string(),
            tag: "20.04".to_string(),
        }
    }
}

impl fmt::Display for ImageSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.tag)
    }
}

/// Settings for one execution environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ContainerSettings {
    /// Container name, unique per run
    pub name: String,
    /// Published ports
    pub ports: Vec<PortMapping>,
}

/// Port mapping configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortMapping {
    /// Simple port number (container port only)
    Simple(u16),
    /// Full mapping "host:container"
    Full(String),
}

impl PortMapping {
    /// Value for docker's `-p` flag
    pub fn to_docker_arg(&self) -> String {
        match self {
            PortMapping::Simple(port) => port.to_string(),
            PortMapping::Full(mapping) => mapping.clone(),
        }
    }
}

/// Repository, account and commit settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitSettings {
    /// Substring `git --version` must contain in both environments
    pub expected_version: String,
    /// Unprivileged account owning the repository on the server
    pub user: String,
    /// Bare repository directory name, created under the account's home
    pub repo_name: String,
    /// Directory the clone lands in on the client
    pub work_dir: String,
    /// Port the server's SSH daemon listens on inside the network
    pub ssh_port: u16,
    /// Branch pushed to the remote
    pub branch: String,
    /// Commit author name
    pub author_name: String,
    /// Commit author email
    pub author_email: String,
    /// File created by the commit step
    pub test_file: String,
    /// Content written to the test file
    pub test_content: String,
    /// Message of the pushed commit
    pub commit_message: String,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            expected_version: "2.25.1".to_string(),
            user: "gituser".to_string(),
            repo_name: "myrepo.git".to_string(),
            work_dir: "myrepo".to_string(),
            ssh_port: 22,
            branch: "main".to_string(),
            author_name: "Docker Tester".to_string(),
            author_email: "tester@example.com".to_string(),
            test_file: "testfile.txt".to_string(),
            test_content: "Hello, Git!".to_string(),
            commit_message: "Initial commit".to_string(),
        }
    }
}

/// Network partition simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartitionSettings {
    /// How long the client stays disconnected, in seconds
    pub outage_secs: u64,
    /// Network to cut; the first bridge network when unset
    pub network: Option<String>,
    /// How the post-reconnect pull is judged
    pub recovery: RecoveryPolicy,
}

impl Default for PartitionSettings {
    fn default() -> Self {
        Self {
            outage_secs: 5,
            network: None,
            recovery: RecoveryPolicy::default(),
        }
    }
}

impl PartitionSettings {
    /// Outage window as a duration
    pub fn outage(&self) -> Duration {
        Duration::from_secs(self.outage_secs)
    }
}

/// Recovery policy for the pull that follows a reconnect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RecoveryPolicy {
    /// A single pull attempt after the outage
    #[default]
    Smoke,
    /// Up to `attempts` pulls, sleeping `backoff_secs` before the second and
    /// doubling the sleep each time after that
    BoundedRetry {
        /// Total attempts, including the first
        attempts: u32,
        /// Initial backoff in seconds
        backoff_secs: u64,
    },
}

impl RecoveryPolicy {
    /// Total number of pull attempts this policy allows
    pub fn attempts(&self) -> u32 {
        match self {
            RecoveryPolicy::Smoke => 1,
            RecoveryPolicy::BoundedRetry { attempts, .. } => *attempts,
        }
    }

    /// Sleep before attempt number `attempt` (1-based); `None` for the first
    pub fn backoff_before(&self, attempt: u32) -> Option<Duration> {
        match self {
            RecoveryPolicy::Smoke => None,
            RecoveryPolicy::BoundedRetry { backoff_secs, .. } if attempt > 1 => {
                let factor = 1u64 << (attempt - 2).min(16);
                Some(Duration::from_secs(backoff_secs.saturating_mul(factor)))
            }
            RecoveryPolicy::BoundedRetry { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_suite_constants() {
        let config = SuiteConfig::default();

        assert_eq!(config.server.name, "git-server");
        assert_eq!(config.client.name, "git-client");
        assert_eq!(config.image.to_string(), "ubuntu:20.04");
        assert_eq!(config.git.expected_version, "2.25.1");
        assert_eq!(config.server_repo_path(), "/home/gituser/myrepo.git");
        assert_eq!(config.authorized_keys_path(), "/home/gituser/.ssh/authorized_keys");
        assert_eq!(config.partition.outage(), Duration::from_secs(5));
        assert_eq!(
            config
                .server
                .ports
                .iter()
                .map(PortMapping::to_docker_arg)
                .collect::<Vec<_>>(),
            vec!["2222:22", "443:443"]
        );
    }

    #[test]
    fn test_clone_url() {
        let config = SuiteConfig::default();
        assert_eq!(
            config.clone_url("172.17.0.2"),
            "ssh://gituser@172.17.0.2:22/home/gituser/myrepo.git"
        );
    }

    #[test]
    fn test_smoke_policy_never_sleeps() {
        let policy = RecoveryPolicy::Smoke;
        assert_eq!(policy.attempts(), 1);
        assert_eq!(policy.backoff_before(1), None);
        assert_eq!(policy.backoff_before(2), None);
    }

    #[test]
    fn test_bounded_retry_doubles() {
        let policy = RecoveryPolicy::BoundedRetry {
            attempts: 4,
            backoff_secs: 2,
        };
        assert_eq!(policy.attempts(), 4);
        assert_eq!(policy.backoff_before(1), None);
        assert_eq!(policy.backoff_before(2), Some(Duration::from_secs(2)));
        assert_eq!(policy.backoff_before(3), Some(Duration::from_secs(4)));
        assert_eq!(policy.backoff_before(4), Some(Duration::from_secs(8)));
    }
}
