use super::load_config;
use anyhow::Result;
use std::path::Path;
use std::process::ExitCode;

pub fn run(config_path: Option<&Path>) -> Result<ExitCode> {
    match config_path {
        Some(path) => println!("Validating {}...", path.display()),
        None => println!("No configuration file given, checking defaults..."),
    }

    let config = load_config(config_path)?;

    println!("✓ Configuration valid");
    println!("  Version: {}", config.version);
    println!("  Image: {}", config.image);
    println!(
        "  Server: {} (ports: {})",
        config.server.name,
        config
            .server
            .ports
            .iter()
            .map(|p| p.to_docker_arg())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  Client: {}", config.client.name);
    println!("  Expected git version: {}", config.git.expected_version);
    println!("  Repository: {}", config.clone_url("<server>"));
    println!("  Branch: {}", config.git.branch);
    println!(
        "  Partition: {}s outage, {} pull attempt(s)",
        config.partition.outage_secs,
        config.partition.recovery.attempts()
    );

    Ok(ExitCode::SUCCESS)
}
