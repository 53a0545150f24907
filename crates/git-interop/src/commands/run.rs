use super::load_config;
use anyhow::{Context, Result};
use command_executor::backends::LocalLauncher;
use comfy_table::{Cell, Color, Table};
use git_interop::{DockerCli, Plan, Stage, StageOutcome, Suite, SuiteReport};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub until: Option<Stage>,
    pub skip: Vec<Stage>,
    pub keep_containers: bool,
    pub report: Option<PathBuf>,
}

pub async fn run(args: RunArgs) -> Result<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    // Reject bad selections before any container is touched
    let plan = Plan::select(args.until, &args.skip)?;
    info!(
        stages = ?plan.stages().iter().map(|s| s.name()).collect::<Vec<_>>(),
        image = %config.image,
        "running suite"
    );

    let suite = Suite::new(DockerCli::new(LocalLauncher), config)
        .with_plan(plan)
        .keep_containers(args.keep_containers);
    let report = suite.run().await;

    display_summary(&report);

    if let Some(path) = &args.report {
        report
            .write_json(path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    Ok(if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn display_summary(report: &SuiteReport) {
    let mut table = Table::new();
    table.set_header(vec!["STAGE", "RESULT", "TIME", "DETAIL"]);

    for record in &report.stages {
        let (color, detail) = match &record.outcome {
            StageOutcome::Passed => (Color::Green, String::new()),
            StageOutcome::Failed { message, .. } => (Color::Red, message.clone()),
            StageOutcome::Skipped { reason } => (Color::DarkGrey, reason.clone()),
        };
        let time = if record.duration_ms > 0 {
            format!("{:.1}s", record.duration_ms as f64 / 1000.0)
        } else {
            "-".to_string()
        };

        table.add_row(vec![
            Cell::new(record.stage.name()),
            Cell::new(record.outcome.label()).fg(color),
            Cell::new(time),
            Cell::new(detail),
        ]);
    }

    println!("{}", table);

    match &report.teardown {
        Some(teardown) if teardown.is_clean() => println!("✓ Containers removed"),
        Some(teardown) => {
            for failure in &teardown.failures {
                eprintln!("✗ Could not remove {}: {}", failure.container, failure.reason);
            }
        }
        None => println!(
            "Containers kept: {}, {}",
            report.context.server.name, report.context.client.name
        ),
    }

    let selected = report.selected.len();
    if report.passed() {
        println!("✓ {}/{} stages passed", report.passed_count(), selected);
    } else if let Some(failed) = report.failed_stage() {
        println!(
            "✗ {} failed ({}/{} stages passed)",
            failed.stage,
            report.passed_count(),
            selected
        );
    }
}
