//! Ordered suite runner
//!
//! Stages run one at a time in canonical order. The first failure aborts the
//! rest, which are recorded as skipped, and teardown runs afterwards no matter
//! how the stages went.

use crate::context::SuiteContext;
use crate::report::{StageOutcome, StageRecord, SuiteReport};
use crate::runtime::ContainerRuntime;
use crate::stage::{Plan, Stage};
use crate::steps::run_stage;
use crate::teardown::teardown;
use chrono::Utc;
use interop_config::SuiteConfig;
use std::time::Instant;
use tracing::{Instrument, error, info, info_span, warn};

/// A configured run of the interop suite
pub struct Suite<R> {
    runtime: R,
    config: SuiteConfig,
    plan: Plan,
    keep_containers: bool,
}

impl<R: ContainerRuntime> Suite<R> {
    /// Run every stage with `config` against `runtime`
    pub fn new(runtime: R, config: SuiteConfig) -> Self {
        Self {
            runtime,
            config,
            plan: Plan::full(),
            keep_containers: false,
        }
    }

    /// Only run the stages in `plan`
    pub fn with_plan(mut self, plan: Plan) -> Self {
        self.plan = plan;
        self
    }

    /// Leave the containers running after the suite
    pub fn keep_containers(mut self, keep: bool) -> Self {
        self.keep_containers = keep;
        self
    }

    /// The runtime stages run against
    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// The selected stages
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Run the selected stages, then tear down
    pub async fn run(&self) -> SuiteReport {
        let started_at = Utc::now();
        let mut ctx = SuiteContext::new(&self.config);
        let mut records = Vec::with_capacity(Stage::ALL.len());
        let mut aborted_by: Option<Stage> = None;

        for stage in Stage::ALL {
            if !self.plan.contains(stage) {
                records.push(StageRecord::skipped(stage, "not selected"));
                continue;
            }
            if let Some(failed) = aborted_by {
                records.push(StageRecord::skipped(stage, format!("{} failed", failed)));
                continue;
            }

            info!(%stage, "starting stage");
            let started = Instant::now();
            let span = info_span!("stage", name = stage.name());
            let result = run_stage(stage, &self.runtime, &self.config, ctx.clone())
                .instrument(span)
                .await;

            match result {
                Ok(updated) => {
                    info!(%stage, elapsed = ?started.elapsed(), "stage passed");
                    ctx = updated;
                    records.push(StageRecord::ran(stage, StageOutcome::Passed, started.elapsed()));
                }
                Err(e) => {
                    error!(%stage, error = %e, "stage failed");
                    if let Some(output) = e.output().filter(|o| !o.trim().is_empty()) {
                        error!(%stage, "captured output:\n{}", output.trim_end());
                    }
                    records.push(StageRecord::ran(
                        stage,
                        StageOutcome::failed(&e),
                        started.elapsed(),
                    ));
                    aborted_by = Some(stage);
                }
            }
        }

        let teardown = if self.keep_containers {
            warn!(
                server = %self.config.server.name,
                client = %self.config.client.name,
                "keeping containers"
            );
            None
        } else {
            Some(teardown(&self.runtime, &self.config).await)
        };

        SuiteReport {
            started_at,
            finished_at: Utc::now(),
            selected: self.plan.stages().to_vec(),
            stages: records,
            teardown,
            context: ctx,
        }
    }
}
