//! Per-stage results and the run report

use crate::context::SuiteContext;
use crate::error::{Error, Result};
use crate::stage::Stage;
use crate::teardown::TeardownReport;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// How a stage ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome {
    /// Ran and every check held
    Passed,
    /// Ran and failed
    Failed {
        /// Error category
        kind: String,
        /// Error message
        message: String,
        /// Captured output of the failing command
        #[serde(skip_serializing_if = "Option::is_none")]
        output: Option<String>,
    },
    /// Did not run
    Skipped {
        /// Why it did not run
        reason: String,
    },
}

impl StageOutcome {
    /// Outcome for a stage that returned `error`
    pub fn failed(error: &Error) -> Self {
        StageOutcome::Failed {
            kind: error.kind().to_string(),
            message: error.to_string(),
            output: error.output().map(str::to_string),
        }
    }

    /// Short label for tables
    pub fn label(&self) -> &'static str {
        match self {
            StageOutcome::Passed => "passed",
            StageOutcome::Failed { .. } => "failed",
            StageOutcome::Skipped { .. } => "skipped",
        }
    }
}

/// Result of one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageRecord {
    /// The stage
    pub stage: Stage,
    /// How it ended
    #[serde(flatten)]
    pub outcome: StageOutcome,
    /// Wall time spent in the stage
    pub duration_ms: u64,
}

impl StageRecord {
    /// Record for a stage that ran
    pub fn ran(stage: Stage, outcome: StageOutcome, elapsed: Duration) -> Self {
        Self {
            stage,
            outcome,
            duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Record for a stage that did not run
    pub fn skipped(stage: Stage, reason: impl Into<String>) -> Self {
        Self {
            stage,
            outcome: StageOutcome::Skipped {
                reason: reason.into(),
            },
            duration_ms: 0,
        }
    }
}

/// Everything a run produced
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    /// When the first stage started
    pub started_at: DateTime<Utc>,
    /// When teardown finished
    pub finished_at: DateTime<Utc>,
    /// Stages the plan selected
    pub selected: Vec<Stage>,
    /// One record per stage, in canonical order
    pub stages: Vec<StageRecord>,
    /// Teardown outcome; `None` when containers were kept
    pub teardown: Option<TeardownReport>,
    /// Context as the last stage left it
    pub context: SuiteContext,
}

impl SuiteReport {
    /// Whether no selected stage failed
    pub fn passed(&self) -> bool {
        self.failed_stage().is_none()
    }

    /// The stage that aborted the run, if any
    pub fn failed_stage(&self) -> Option<&StageRecord> {
        self.stages
            .iter()
            .find(|record| matches!(record.outcome, StageOutcome::Failed { .. }))
    }

    /// Number of stages that passed
    pub fn passed_count(&self) -> usize {
        self.stages
            .iter()
            .filter(|record| record.outcome == StageOutcome::Passed)
            .count()
    }

    /// Write the report as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interop_config::SuiteConfig;

    fn report(stages: Vec<StageRecord>) -> SuiteReport {
        SuiteReport {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            selected: stages.iter().map(|r| r.stage).collect(),
            stages,
            teardown: Some(TeardownReport::default()),
            context: SuiteContext::new(&SuiteConfig::default()),
        }
    }

    #[test]
    fn test_failed_outcome_carries_output() {
        let error = Error::assertion("remote main is behind", "abc123 older commit\n");
        let outcome = StageOutcome::failed(&error);

        assert_eq!(
            outcome,
            StageOutcome::Failed {
                kind: "assertion".to_string(),
                message: "assertion failed: remote main is behind".to_string(),
                output: Some("abc123 older commit\n".to_string()),
            }
        );
        assert_eq!(outcome.label(), "failed");
    }

    #[test]
    fn test_passed_and_failed_stage() {
        let ok = report(vec![
            StageRecord::ran(
                Stage::ProvisionServer,
                StageOutcome::Passed,
                Duration::from_millis(12),
            ),
            StageRecord::skipped(Stage::ProvisionClient, "not selected"),
        ]);
        assert!(ok.passed());
        assert_eq!(ok.passed_count(), 1);

        let failed = report(vec![
            StageRecord::ran(
                Stage::ProvisionServer,
                StageOutcome::failed(&Error::provisioning("starting container", "")),
                Duration::ZERO,
            ),
            StageRecord::skipped(Stage::ProvisionClient, "aborted"),
        ]);
        assert!(!failed.passed());
        assert_eq!(failed.failed_stage().map(|r| r.stage), Some(Stage::ProvisionServer));
    }

    #[test]
    fn test_json_shape() {
        let report = report(vec![
            StageRecord::ran(Stage::Clone, StageOutcome::Passed, Duration::from_millis(1500)),
            StageRecord::skipped(Stage::CommitAndPush, "not selected"),
        ]);
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["stages"][0]["stage"], "clone");
        assert_eq!(value["stages"][0]["status"], "passed");
        assert_eq!(value["stages"][0]["duration_ms"], 1500);
        assert_eq!(value["stages"][1]["status"], "skipped");
        assert_eq!(value["stages"][1]["reason"], "not selected");
        assert_eq!(value["context"]["server"]["role"], "server");
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        report(vec![]).write_json(&path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(written["started_at"].is_string());
    }
}
