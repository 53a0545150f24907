//! Command type for building executable commands

use async_process::Command as AsyncCommand;
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

/// A command to be executed
///
/// Unlike `async_process::Command` this type is `Clone` and inspectable, so
/// execution layers can rewrite it and tests can assert on it before anything
/// is spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    program: OsString,
    args: Vec<OsString>,
    /// Sorted so wrapped commands render deterministically
    env: BTreeMap<OsString, OsString>,
    current_dir: Option<PathBuf>,
}

impl Command {
    /// Create a new command for the given program
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            args: Vec::new(),
            env: BTreeMap::new(),
            current_dir: None,
        }
    }

    /// Add an argument to the command
    pub fn arg<S: AsRef<OsStr>>(&mut self, arg: S) -> &mut Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    /// Add multiple arguments to the command
    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_owned()));
        self
    }

    /// Set an environment variable
    pub fn env<K, V>(&mut self, key: K, val: V) -> &mut Self
    where
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        self.env
            .insert(key.as_ref().to_owned(), val.as_ref().to_owned());
        self
    }

    /// Set the working directory for the command
    pub fn current_dir<P: AsRef<Path>>(&mut self, dir: P) -> &mut Self {
        self.current_dir = Some(dir.as_ref().to_owned());
        self
    }

    /// Get the program name
    pub fn get_program(&self) -> &OsStr {
        &self.program
    }

    /// Get the arguments
    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Get the environment variables
    pub fn get_envs(&self) -> &BTreeMap<OsString, OsString> {
        &self.env
    }

    /// Get the current directory
    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Render program and arguments as a single shell-quoted string.
    ///
    /// Environment and working directory are not included; layers that need
    /// them emit their own prefixes.
    pub fn to_shell_string(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| shell_quote(&part.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Prepare this command for execution by converting to an `async_process::Command`
    pub fn prepare(&self) -> AsyncCommand {
        let mut cmd = AsyncCommand::new(&self.program);
        cmd.args(&self.args);
        for (key, val) in &self.env {
            cmd.env(key, val);
        }
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_shell_string())
    }
}

/// Builder pattern helper
impl Command {
    /// Create a builder for this command (for chaining)
    pub fn builder<S: AsRef<OsStr>>(program: S) -> CommandBuilder {
        CommandBuilder(Command::new(program))
    }
}

/// Builder wrapper for more ergonomic command construction
#[derive(Debug)]
pub struct CommandBuilder(Command);

impl CommandBuilder {
    /// Add an argument
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.0.arg(arg);
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.0.args(args);
        self
    }

    /// Set an environment variable
    pub fn env<K, V>(mut self, key: K, val: V) -> Self
    where
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        self.0.env(key, val);
        self
    }

    /// Set the working directory
    pub fn current_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.0.current_dir(dir);
        self
    }

    /// Build the command
    pub fn build(self) -> Command {
        self.0
    }
}

/// Quote a string for safe inclusion in a POSIX shell command line.
///
/// Plain words pass through untouched; anything else is wrapped in single
/// quotes with embedded single quotes spliced as `'"'"'`.
pub fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    if s.contains(|c: char| c.is_whitespace() || "\"'\\$`!*?<>|&;()[]{}#~".contains(c)) {
        format!("'{}'", s.replace('\'', "'\"'\"'"))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_with_args() {
        let mut cmd = Command::new("ls");
        cmd.arg("-la").arg("/tmp");

        assert_eq!(cmd.get_program(), "ls");
        assert_eq!(cmd.get_args(), &[OsString::from("-la"), OsString::from("/tmp")]);
    }

    #[test]
    fn test_command_builder() {
        let cmd = Command::builder("git")
            .args(["log", "-1"])
            .env("LC_ALL", "C")
            .current_dir("/tmp")
            .build();

        assert_eq!(cmd.get_args().len(), 2);
        assert_eq!(
            cmd.get_envs().get(OsStr::new("LC_ALL")),
            Some(&OsString::from("C"))
        );
        assert_eq!(cmd.get_current_dir(), Some(Path::new("/tmp")));
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("simple"), "simple");
        assert_eq!(shell_quote("path/to/file"), "path/to/file");
        assert_eq!(shell_quote("with space"), "'with space'");
        assert_eq!(shell_quote("with'quote"), "'with'\"'\"'quote'");
        assert_eq!(shell_quote("$HOME"), "'$HOME'");
        assert_eq!(shell_quote("~/.ssh"), "'~/.ssh'");
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn test_to_shell_string() {
        let cmd = Command::builder("echo")
            .arg("hello world")
            .arg("$HOME")
            .build();
        assert_eq!(cmd.to_shell_string(), "echo 'hello world' '$HOME'");
        assert_eq!(cmd.to_string(), cmd.to_shell_string());
    }

    #[test]
    fn test_command_clone_is_independent() {
        let original = Command::builder("git").arg("status").build();
        let mut copy = original.clone();
        copy.arg("--short");

        assert_eq!(original.get_args().len(), 1);
        assert_eq!(copy.get_args().len(), 2);
    }
}
