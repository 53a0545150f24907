//! Configuration parser and validation

use crate::{CONFIG_VERSION, ConfigError, PortMapping, RecoveryPolicy, Result, SuiteConfig};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

// Values below end up inside shell scripts run in the containers, so they
// are restricted to characters that never need quoting.
static CONTAINER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_.-]*$").expect("valid regex"));
static ACCOUNT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_-]{0,31}$").expect("valid regex"));
static PATH_COMPONENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9._-]*$").expect("valid regex"));
static BRANCH_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9._/-]*$").expect("valid regex"));
static PORT_MAPPING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,5}):(\d{1,5})$").expect("valid regex"));

/// Parse a YAML configuration file
pub fn parse_file(path: impl AsRef<Path>) -> Result<SuiteConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parse YAML configuration from a string
pub fn parse_str(content: &str) -> Result<SuiteConfig> {
    // An empty document means "all defaults"
    let config: SuiteConfig = if content.trim().is_empty() {
        SuiteConfig::default()
    } else {
        serde_yaml::from_str(content)?
    };
    validate(&config)?;
    Ok(config)
}

/// Validate configuration
pub fn validate(config: &SuiteConfig) -> Result<()> {
    if config.version != CONFIG_VERSION {
        return Err(invalid(format!(
            "Unsupported version: {}, expected {}",
            config.version, CONFIG_VERSION
        )));
    }

    if config.image.name.is_empty() || config.image.tag.is_empty() {
        return Err(invalid("image name and tag must not be empty"));
    }

    for (role, settings) in [("server", &config.server), ("client", &config.client)] {
        if !CONTAINER_NAME.is_match(&settings.name) {
            return Err(invalid(format!(
                "{} container name '{}' is not a valid container name",
                role, settings.name
            )));
        }
        for port in &settings.ports {
            validate_port(role, port)?;
        }
    }

    if config.server.name == config.client.name {
        return Err(invalid(format!(
            "server and client must use different container names, both are '{}'",
            config.server.name
        )));
    }

    let git = &config.git;
    if !ACCOUNT_NAME.is_match(&git.user) {
        return Err(invalid(format!("'{}' is not a valid account name", git.user)));
    }
    for (field, value) in [
        ("repo_name", &git.repo_name),
        ("work_dir", &git.work_dir),
        ("test_file", &git.test_file),
    ] {
        if !PATH_COMPONENT.is_match(value) {
            return Err(invalid(format!(
                "git.{} '{}' must be a single path component",
                field, value
            )));
        }
    }
    if !BRANCH_NAME.is_match(&git.branch) || git.branch.contains("..") {
        return Err(invalid(format!("'{}' is not a valid branch name", git.branch)));
    }
    if git.ssh_port == 0 {
        return Err(invalid("git.ssh_port must not be 0"));
    }
    if git.expected_version.trim().is_empty() {
        return Err(invalid("git.expected_version must not be empty"));
    }
    for (field, value) in [
        ("author_name", &git.author_name),
        ("author_email", &git.author_email),
        ("commit_message", &git.commit_message),
    ] {
        if value.trim().is_empty() || value.contains('\n') {
            return Err(invalid(format!(
                "git.{} must be a non-empty single line",
                field
            )));
        }
    }

    if let RecoveryPolicy::BoundedRetry { attempts, .. } = config.partition.recovery {
        if attempts == 0 {
            return Err(invalid("partition.recovery.attempts must be at least 1"));
        }
    }
    if let Some(network) = &config.partition.network {
        if !CONTAINER_NAME.is_match(network) {
            return Err(invalid(format!("'{}' is not a valid network name", network)));
        }
    }

    Ok(())
}

fn validate_port(role: &str, port: &PortMapping) -> Result<()> {
    let ok = match port {
        PortMapping::Simple(p) => *p != 0,
        PortMapping::Full(mapping) => PORT_MAPPING.captures(mapping).is_some_and(|cap| {
            [&cap[1], &cap[2]]
                .iter()
                .all(|p| p.parse::<u16>().is_ok_and(|p| p != 0))
        }),
    };
    if ok {
        Ok(())
    } else {
        Err(invalid(format!(
            "{} port mapping '{}' must be PORT or HOST:CONTAINER",
            role,
            port.to_docker_arg()
        )))
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(parse_str("").unwrap(), SuiteConfig::default());
        assert_eq!(parse_str("  \n").unwrap(), SuiteConfig::default());
    }

    #[test]
    fn test_defaults_are_valid() {
        validate(&SuiteConfig::default()).unwrap();
    }

    #[test]
    fn test_rejects_same_container_names() {
        let mut config = SuiteConfig::default();
        config.client.name = config.server.name.clone();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError(msg)) if msg.contains("different container names")
        ));
    }

    #[test]
    fn test_rejects_shell_metacharacters() {
        let mut config = SuiteConfig::default();
        config.git.user = "git;rm -rf /".to_string();
        assert!(validate(&config).is_err());

        let mut config = SuiteConfig::default();
        config.git.work_dir = "../escape".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_port_mappings() {
        assert!(validate_port("server", &PortMapping::Simple(22)).is_ok());
        assert!(validate_port("server", &PortMapping::Simple(0)).is_err());
        assert!(validate_port("server", &PortMapping::Full("2222:22".into())).is_ok());
        assert!(validate_port("server", &PortMapping::Full("70000:22".into())).is_err());
        assert!(validate_port("server", &PortMapping::Full("22".into())).is_err());
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let mut config = SuiteConfig::default();
        config.partition.recovery = RecoveryPolicy::BoundedRetry {
            attempts: 0,
            backoff_secs: 1,
        };
        assert!(validate(&config).is_err());
    }
}
