//! Best-effort removal of the suite's containers

use crate::runtime::ContainerRuntime;
use interop_config::SuiteConfig;
use serde::Serialize;
use tracing::{info, warn};

/// A container that could not be removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeardownFailure {
    /// Container name
    pub container: String,
    /// Runtime output or invocation error
    pub reason: String,
}

/// Outcome of a teardown. Failures are collected here, never raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeardownReport {
    /// Containers that were removed
    pub removed: Vec<String>,
    /// Containers that did not exist
    pub absent: Vec<String>,
    /// Containers that could not be removed
    pub failures: Vec<TeardownFailure>,
}

impl TeardownReport {
    /// Whether every container is gone
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Remove the server and client containers named in `config`.
///
/// Every removal is attempted even if an earlier one fails.
pub async fn teardown<R>(runtime: &R, config: &SuiteConfig) -> TeardownReport
where
    R: ContainerRuntime + ?Sized,
{
    let mut report = TeardownReport::default();

    for name in [&config.server.name, &config.client.name] {
        match runtime.remove(name).await {
            Ok(result) if result.success() => {
                info!(container = %name, "container removed");
                report.removed.push(name.clone());
            }
            Ok(result) if result.stderr.contains("No such container") => {
                info!(container = %name, "container already gone");
                report.absent.push(name.clone());
            }
            Ok(result) => {
                let reason = result.output().trim().to_string();
                warn!(container = %name, %reason, "failed to remove container");
                report.failures.push(TeardownFailure {
                    container: name.clone(),
                    reason,
                });
            }
            Err(e) => {
                warn!(container = %name, error = %e, "failed to remove container");
                report.failures.push(TeardownFailure {
                    container: name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    report
}
