//! Full suite against a real docker daemon
//!
//! Pulls `ubuntu:20.04` and installs packages inside it, so it needs network
//! access and takes minutes. Run with `--features docker-tests`.

#![cfg(feature = "docker-tests")]

use command_executor::backends::LocalLauncher;
use command_executor::{Command, Launcher};
use git_interop::{DockerCli, Stage, StageOutcome, Suite};
use interop_config::SuiteConfig;

fn e2e_config() -> SuiteConfig {
    let mut config = SuiteConfig::default();
    // Avoid clashing with containers from a manual run
    config.server.name = "git-interop-e2e-server".to_string();
    config.client.name = "git-interop-e2e-client".to_string();
    config
}

/// IPv4 host bindings of a container, sorted
async fn published_ports(container: &str) -> Vec<String> {
    let command = Command::builder("docker").arg("port").arg(container).build();
    let result = LocalLauncher.execute(command).await.unwrap();
    assert!(result.success(), "{}", result.output());

    let mut ports: Vec<String> = result
        .stdout
        .lines()
        .filter(|line| line.contains("0.0.0.0:"))
        .map(str::to_string)
        .collect();
    ports.sort();
    ports
}

#[smol_potat::test]
async fn test_full_suite_against_docker() {
    let config = e2e_config();
    let docker = DockerCli::new(LocalLauncher);
    let suite = Suite::new(docker, config.clone()).keep_containers(true);
    let report = suite.run().await;

    let ports = published_ports(&config.server.name).await;
    let teardown = git_interop::teardown(suite.runtime(), &config).await;

    for record in &report.stages {
        if let StageOutcome::Failed { message, output, .. } = &record.outcome {
            panic!(
                "{} failed: {}\n{}",
                record.stage,
                message,
                output.as_deref().unwrap_or_default()
            );
        }
    }
    assert_eq!(report.passed_count(), Stage::ALL.len());
    assert!(report.context.server.address.is_some());
    assert_eq!(ports, ["22/tcp -> 0.0.0.0:2222", "443/tcp -> 0.0.0.0:443"]);
    assert!(teardown.is_clean(), "{:?}", teardown.failures);
}

#[smol_potat::test]
async fn test_teardown_of_missing_containers_is_clean() {
    let mut config = e2e_config();
    config.server.name = "git-interop-e2e-absent-server".to_string();
    config.client.name = "git-interop-e2e-absent-client".to_string();

    let report = git_interop::teardown(&DockerCli::new(LocalLauncher), &config).await;

    assert!(report.is_clean(), "{:?}", report.failures);
}
