use super::load_config;
use anyhow::Result;
use command_executor::backends::LocalLauncher;
use git_interop::DockerCli;
use std::path::Path;
use std::process::ExitCode;

pub async fn run(config_path: Option<&Path>) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let report = git_interop::teardown(&DockerCli::new(LocalLauncher), &config).await;

    for name in &report.removed {
        println!("✓ Removed {}", name);
    }
    for name in &report.absent {
        println!("  {} was not running", name);
    }
    for failure in &report.failures {
        eprintln!("✗ Could not remove {}: {}", failure.container, failure.reason);
    }

    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
