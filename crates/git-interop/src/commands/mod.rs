pub mod run;
pub mod stages;
pub mod teardown;
pub mod validate;

use anyhow::{Context, Result};
use interop_config::{SuiteConfig, parser};
use std::path::Path;

/// Settings from `path`, or the built-in defaults when no file is given
pub fn load_config(path: Option<&Path>) -> Result<SuiteConfig> {
    match path {
        Some(path) => parser::parse_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(SuiteConfig::default()),
    }
}
