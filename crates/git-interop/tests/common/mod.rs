//! Scripted container runtime for running the suite without docker

#![allow(dead_code)]

use async_trait::async_trait;
use command_executor::{ExitResult, Result};
use git_interop::{ContainerRuntime, ContainerSpec};
use interop_config::SuiteConfig;
use std::sync::Mutex;

pub const SERVER_ADDRESS: &str = "172.17.0.2";
pub const PUBLIC_KEY: &str = "ssh-rsa AAAAB3NzaC1yc2EAAAADAQABAAABAQDtest root@git-client";

/// Defaults with no outage wait, so partition tests run instantly
pub fn fast_config() -> SuiteConfig {
    let mut config = SuiteConfig::default();
    config.partition.outage_secs = 0;
    config
}

pub fn ok(stdout: &str) -> ExitResult {
    ExitResult::from_code(0, stdout, "")
}

pub fn fail(code: i32, stderr: &str) -> ExitResult {
    ExitResult::from_code(code, "", stderr)
}

struct Rule {
    pattern: String,
    response: ExitResult,
    remaining: Option<usize>,
    after: Option<String>,
}

/// Fake runtime answering from pattern rules.
///
/// Every call is recorded as a one-line description such as
/// `exec git-client: git pull origin main` or `rm git-server`. The most
/// recently added rule whose pattern is a substring of the description
/// answers; with no match the call succeeds with empty output. The
/// defaults answer the way a healthy pair of containers would.
pub struct ScriptedRuntime {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRuntime {
    pub fn healthy() -> Self {
        let runtime = Self {
            rules: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        };
        runtime.on("git --version", ok("git version 2.25.1\n"));
        runtime.on("service ssh status", ok(" * sshd is running\n"));
        runtime.on(
            "ls -l /home/gituser/myrepo.git",
            ok("total 32\n-rw-r--r-- 1 gituser gituser 23 HEAD\ndrwxr-xr-x 2 gituser gituser 4096 branches\n"),
        );
        runtime.on("cat ~/.ssh/id_rsa.pub", ok(&format!("{}\n", PUBLIC_KEY)));
        runtime.on("inspect git-server", ok(&format!("{} ", SERVER_ADDRESS)));
        runtime.on(
            "exec git-client: ls -l",
            ok("total 4\ndrwxr-xr-x 3 root root 4096 myrepo\n"),
        );
        runtime.on("log -1 --format=%s", ok("Initial commit\n"));
        runtime.on("git pull origin main", ok("Already up to date.\n"));
        runtime.on("network ls", ok("bridge\n"));
        runtime
    }

    /// Answer calls matching `pattern` with `response`
    pub fn on(&self, pattern: &str, response: ExitResult) {
        self.push(pattern, response, None, None);
    }

    /// Answer the next `times` matching calls with `response`
    pub fn on_times(&self, pattern: &str, response: ExitResult, times: usize) {
        self.push(pattern, response, Some(times), None);
    }

    /// Like [`on_times`](Self::on_times), but only once a call matching
    /// `trigger` has been made
    pub fn on_times_after(&self, trigger: &str, pattern: &str, response: ExitResult, times: usize) {
        self.push(pattern, response, Some(times), Some(trigger.to_string()));
    }

    fn push(
        &self,
        pattern: &str,
        response: ExitResult,
        remaining: Option<usize>,
        after: Option<String>,
    ) {
        self.rules.lock().unwrap().push(Rule {
            pattern: pattern.to_string(),
            response,
            remaining,
            after,
        });
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded calls containing `pattern`
    pub fn calls_matching(&self, pattern: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.contains(pattern))
            .collect()
    }

    fn answer(&self, call: String) -> Result<ExitResult> {
        let mut calls = self.calls.lock().unwrap();
        let mut rules = self.rules.lock().unwrap();

        let response = rules
            .iter_mut()
            .rev()
            .filter(|rule| call.contains(&rule.pattern))
            .filter(|rule| rule.remaining != Some(0))
            .find(|rule| match &rule.after {
                Some(trigger) => calls.iter().any(|earlier| earlier.contains(trigger)),
                None => true,
            })
            .map(|rule| {
                if let Some(remaining) = rule.remaining.as_mut() {
                    *remaining -= 1;
                }
                rule.response.clone()
            })
            .unwrap_or_else(|| ok(""));

        calls.push(call);
        Ok(response)
    }
}

#[async_trait]
impl ContainerRuntime for ScriptedRuntime {
    async fn remove(&self, name: &str) -> Result<ExitResult> {
        self.answer(format!("rm {}", name))
    }

    async fn run_detached(&self, spec: &ContainerSpec) -> Result<ExitResult> {
        self.answer(format!(
            "run {} {} ports=[{}]",
            spec.name,
            spec.image,
            spec.ports.join(",")
        ))
    }

    async fn exec_as(
        &self,
        container: &str,
        user: Option<&str>,
        script: &str,
    ) -> Result<ExitResult> {
        match user {
            Some(user) => self.answer(format!("exec {} as {}: {}", container, user, script)),
            None => self.answer(format!("exec {}: {}", container, script)),
        }
    }

    async fn ssh_probe(&self, container: &str, destination: &str, port: u16) -> Result<ExitResult> {
        self.answer(format!("probe {} {}:{}", container, destination, port))
    }

    async fn inspect_address(&self, container: &str) -> Result<ExitResult> {
        self.answer(format!("inspect {}", container))
    }

    async fn bridge_networks(&self) -> Result<ExitResult> {
        self.answer("network ls".to_string())
    }

    async fn network_disconnect(&self, network: &str, container: &str) -> Result<ExitResult> {
        self.answer(format!("network disconnect {} {}", network, container))
    }

    async fn network_connect(&self, network: &str, container: &str) -> Result<ExitResult> {
        self.answer(format!("network connect {} {}", network, container))
    }
}
