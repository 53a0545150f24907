//! Suite context threaded through the stages
//!
//! Each stage receives the context by value and hands back an updated copy.
//! Values are written by exactly one stage and only read afterwards.

use crate::error::{Error, Result};
use interop_config::SuiteConfig;
use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;

/// Which side of the test an environment plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Hosts the bare repository and SSH daemon
    Server,
    /// Runs git over SSH against the server
    Client,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Server => f.write_str("server"),
            Role::Client => f.write_str("client"),
        }
    }
}

/// One execution environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerIdentity {
    /// Container name
    pub name: String,
    /// Role in the suite
    pub role: Role,
    /// Address on the container network, once resolved
    pub address: Option<Ipv4Addr>,
}

impl ContainerIdentity {
    /// Identity with no resolved address yet
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            address: None,
        }
    }
}

/// State shared between stages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteContext {
    /// The server environment
    pub server: ContainerIdentity,
    /// The client environment
    pub client: ContainerIdentity,
    /// The client's public key, once generated
    pub public_key: Option<String>,
    /// Network the client was cut from during the partition stage
    pub partition_network: Option<String>,
}

impl SuiteContext {
    /// Fresh context for a run with `config`
    pub fn new(config: &SuiteConfig) -> Self {
        Self {
            server: ContainerIdentity::new(&config.server.name, Role::Server),
            client: ContainerIdentity::new(&config.client.name, Role::Client),
            public_key: None,
            partition_network: None,
        }
    }

    /// The server's address, required by every stage that talks to it over SSH
    pub fn server_address(&self) -> Result<Ipv4Addr> {
        self.server
            .address
            .ok_or(Error::MissingContext("server address has not been resolved"))
    }

    /// The generated public key
    pub fn public_key(&self) -> Result<&str> {
        self.public_key
            .as_deref()
            .ok_or(Error::MissingContext("client key pair has not been generated"))
    }
}
