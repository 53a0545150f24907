//! Stage catalogue and execution plans
//!
//! [`Stage::ALL`] is the canonical total order. Prerequisites are declared per
//! stage and checked when a [`Plan`] is built, so a selection that would run a
//! stage without its setup is rejected before any container is touched.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One step of the suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Fresh server container with git and a running SSH daemon
    ProvisionServer,
    /// Fresh client container with git and an SSH client
    ProvisionClient,
    /// Account, bare repository and authorized-keys file on the server
    CreateRepository,
    /// Client key pair registered with the server account
    ExchangeCredentials,
    /// Server address looked up from the container runtime
    ResolveAddress,
    /// Repository cloned over SSH on the client
    Clone,
    /// Commit created on the client and pushed to the server
    CommitAndPush,
    /// Pull and fetch against the remote
    PullAndFetch,
    /// Client cut from its network, reconnected, and pull retried
    PartitionRecovery,
}

impl Stage {
    /// Every stage in execution order
    pub const ALL: [Stage; 9] = [
        Stage::ProvisionServer,
        Stage::ProvisionClient,
        Stage::CreateRepository,
        Stage::ExchangeCredentials,
        Stage::ResolveAddress,
        Stage::Clone,
        Stage::CommitAndPush,
        Stage::PullAndFetch,
        Stage::PartitionRecovery,
    ];

    /// Stable name used on the command line and in reports
    pub fn name(self) -> &'static str {
        match self {
            Stage::ProvisionServer => "provision-server",
            Stage::ProvisionClient => "provision-client",
            Stage::CreateRepository => "create-repository",
            Stage::ExchangeCredentials => "exchange-credentials",
            Stage::ResolveAddress => "resolve-address",
            Stage::Clone => "clone",
            Stage::CommitAndPush => "commit-and-push",
            Stage::PullAndFetch => "pull-and-fetch",
            Stage::PartitionRecovery => "partition-recovery",
        }
    }

    /// One-line summary for listings
    pub fn description(self) -> &'static str {
        match self {
            Stage::ProvisionServer => "Start the server container, install git and sshd",
            Stage::ProvisionClient => "Start the client container, install git and ssh",
            Stage::CreateRepository => "Create the git account and bare repository",
            Stage::ExchangeCredentials => "Generate the client key and authorize it",
            Stage::ResolveAddress => "Look up the server's container address",
            Stage::Clone => "Clone the repository over SSH",
            Stage::CommitAndPush => "Commit a file and push it to the server",
            Stage::PullAndFetch => "Pull, fetch, and pull again",
            Stage::PartitionRecovery => "Disconnect the client, reconnect, pull",
        }
    }

    /// Stages that must have run successfully before this one
    pub fn requires(self) -> &'static [Stage] {
        match self {
            Stage::ProvisionServer | Stage::ProvisionClient => &[],
            Stage::CreateRepository => &[Stage::ProvisionServer],
            Stage::ExchangeCredentials => &[Stage::ProvisionClient, Stage::CreateRepository],
            Stage::ResolveAddress => &[Stage::ProvisionServer],
            Stage::Clone => &[Stage::ExchangeCredentials, Stage::ResolveAddress],
            Stage::CommitAndPush => &[Stage::Clone],
            Stage::PullAndFetch => &[Stage::CommitAndPush],
            Stage::PartitionRecovery => &[Stage::PullAndFetch],
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Stage::ALL.iter().map(|s| s.name()).collect();
                Error::plan(format!(
                    "unknown stage '{}', expected one of: {}",
                    s,
                    names.join(", ")
                ))
            })
    }
}

/// An ordered, prerequisite-complete selection of stages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    stages: Vec<Stage>,
}

impl Plan {
    /// Every stage
    pub fn full() -> Self {
        Self {
            stages: Stage::ALL.to_vec(),
        }
    }

    /// Build a plan from a selection in any order.
    ///
    /// Stages are put in canonical order and every prerequisite must itself
    /// be selected.
    pub fn from_stages(selected: impl IntoIterator<Item = Stage>) -> Result<Self> {
        let mut stages: Vec<Stage> = selected.into_iter().collect();
        stages.sort();
        stages.dedup();

        if stages.is_empty() {
            return Err(Error::plan("no stages selected"));
        }

        for stage in &stages {
            let missing: Vec<&str> = stage
                .requires()
                .iter()
                .filter(|req| !stages.contains(req))
                .map(|req| req.name())
                .collect();
            if !missing.is_empty() {
                return Err(Error::plan(format!(
                    "stage '{}' requires {} which is not selected",
                    stage,
                    missing.join(", ")
                )));
            }
        }

        Ok(Self { stages })
    }

    /// Every stage up to and including `until`, minus `skip`
    pub fn select(until: Option<Stage>, skip: &[Stage]) -> Result<Self> {
        let last = until.unwrap_or(Stage::PartitionRecovery);
        Self::from_stages(
            Stage::ALL
                .into_iter()
                .filter(|stage| *stage <= last && !skip.contains(stage)),
        )
    }

    /// Stages in execution order
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Whether `stage` is part of the plan
    pub fn contains(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }
}

impl Default for Plan {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order_respects_prerequisites() {
        for (index, stage) in Stage::ALL.iter().enumerate() {
            for req in stage.requires() {
                let req_index = Stage::ALL.iter().position(|s| s == req).unwrap();
                assert!(req_index < index, "{} must come before {}", req, stage);
            }
        }
    }

    #[test]
    fn test_ord_matches_canonical_order() {
        let mut sorted = Stage::ALL;
        sorted.sort();
        assert_eq!(sorted, Stage::ALL);
    }

    #[test]
    fn test_names_roundtrip() {
        for stage in Stage::ALL {
            assert_eq!(stage.name().parse::<Stage>().unwrap(), stage);
        }
        assert!("teardown".parse::<Stage>().is_err());
    }

    #[test]
    fn test_full_plan() {
        assert_eq!(Plan::full().stages(), &Stage::ALL);
        assert_eq!(Plan::select(None, &[]).unwrap(), Plan::full());
    }

    #[test]
    fn test_until_truncates() {
        let plan = Plan::select(Some(Stage::ResolveAddress), &[]).unwrap();
        assert_eq!(plan.stages().last(), Some(&Stage::ResolveAddress));
        assert!(!plan.contains(Stage::Clone));
    }

    #[test]
    fn test_skipping_a_leaf_is_allowed() {
        let plan = Plan::select(None, &[Stage::PartitionRecovery]).unwrap();
        assert_eq!(plan.stages().last(), Some(&Stage::PullAndFetch));
    }

    #[test]
    fn test_skipping_a_prerequisite_is_rejected() {
        let err = Plan::select(None, &[Stage::ExchangeCredentials]).unwrap_err();
        assert!(
            matches!(err, Error::Plan(msg) if msg.contains("'clone' requires exchange-credentials"))
        );
    }

    #[test]
    fn test_server_only_plan() {
        let plan =
            Plan::from_stages([Stage::CreateRepository, Stage::ProvisionServer]).unwrap();
        assert_eq!(plan.stages(), &[Stage::ProvisionServer, Stage::CreateRepository]);
    }

    #[test]
    fn test_empty_plan_is_rejected() {
        assert!(Plan::from_stages([]).is_err());
        assert!(Plan::select(None, &Stage::ALL).is_err());
    }
}
