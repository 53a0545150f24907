use anyhow::Result;
use comfy_table::Table;
use git_interop::Stage;
use std::process::ExitCode;

pub fn run() -> Result<ExitCode> {
    let mut table = Table::new();
    table.set_header(vec!["#", "STAGE", "REQUIRES", "DESCRIPTION"]);

    for (index, stage) in Stage::ALL.iter().enumerate() {
        let requires: Vec<&str> = stage.requires().iter().map(|s| s.name()).collect();
        table.add_row(vec![
            (index + 1).to_string(),
            stage.name().to_string(),
            if requires.is_empty() {
                "-".to_string()
            } else {
                requires.join(", ")
            },
            stage.description().to_string(),
        ]);
    }

    println!("{}", table);
    Ok(ExitCode::SUCCESS)
}
