use anyhow::Result;
use clap::{Parser, Subcommand};
use git_interop::Stage;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "git-interop")]
#[command(about = "Git over SSH interoperability suite between a server and a client container")]
#[command(version)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to <DIR>/git-interop.log
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the suite
    Run {
        /// YAML file overriding the default settings
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Stop after this stage
        #[arg(long, value_name = "STAGE")]
        until: Option<Stage>,

        /// Leave out a stage (repeatable)
        #[arg(long, value_name = "STAGE")]
        skip: Vec<Stage>,

        /// Do not remove the containers afterwards
        #[arg(long)]
        keep_containers: bool,

        /// Write a JSON report to this path
        #[arg(long, value_name = "PATH")]
        report: Option<PathBuf>,
    },

    /// List the stages and their prerequisites
    Stages,

    /// Check a configuration file and print the effective settings
    Validate {
        /// YAML file overriding the default settings
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Remove containers left behind by a kept or interrupted run
    Teardown {
        /// YAML file overriding the default settings
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = logging::init(cli.verbose, cli.log_dir.as_deref())?;

    smol::block_on(async {
        match cli.command {
            Commands::Run {
                config,
                until,
                skip,
                keep_containers,
                report,
            } => {
                commands::run::run(commands::run::RunArgs {
                    config,
                    until,
                    skip,
                    keep_containers,
                    report,
                })
                .await
            }
            Commands::Stages => commands::stages::run(),
            Commands::Validate { config } => commands::validate::run(config.as_deref()),
            Commands::Teardown { config } => commands::teardown::run(config.as_deref()).await,
        }
    })
}
