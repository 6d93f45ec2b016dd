//! Host command execution
//!
//! Commands are always built argv-style; nothing here ever assembles a shell
//! string from user input.

use async_trait::async_trait;
use std::path::PathBuf;
use upkeep_errors::{Error, OpsError};

/// Host command builder
#[derive(Debug, Clone)]
pub struct HostCommand {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
}

impl HostCommand {
    /// Create a new host command
    #[must_use]
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Add an argument to the command
    pub fn arg<S: AsRef<str>>(&mut self, arg: S) -> &mut Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    /// Add multiple arguments to the command
    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_string());
        }
        self
    }

    /// Set the working directory for the command
    pub fn current_dir<P: Into<PathBuf>>(&mut self, dir: P) -> &mut Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Get the program name
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Get the arguments
    #[must_use]
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get the current directory
    #[must_use]
    pub fn get_current_dir(&self) -> Option<&PathBuf> {
        self.current_dir.as_ref()
    }

    /// Human-readable rendering for diagnostics and reports
    #[must_use]
    pub fn display(&self) -> String {
        let mut rendered = self.program.clone();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(arg);
        }
        rendered
    }
}

/// Output from command execution
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Process exit code; None when terminated by a signal
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Whether the command exited with status zero
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Captured stderr as lossy UTF-8, for diagnostics
    #[must_use]
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Trait for host command execution
#[async_trait]
pub trait CommandEffect: Send + Sync {
    /// Execute a command and return the captured output
    async fn execute(&self, cmd: HostCommand) -> Result<CommandOutput, Error>;

    /// Create a new command builder
    fn create_command(&self, program: &str) -> HostCommand {
        HostCommand::new(program)
    }
}

/// Real host-backed command effect using tokio::process.
pub struct HostCommandEffect;

impl HostCommandEffect {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for HostCommandEffect {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandEffect for HostCommandEffect {
    async fn execute(&self, cmd: HostCommand) -> Result<CommandOutput, Error> {
        let mut command = tokio::process::Command::new(cmd.program());
        command.args(cmd.get_args());
        if let Some(dir) = cmd.get_current_dir() {
            command.current_dir(dir);
        }

        let output = command
            .output()
            .await
            .map_err(|e| OpsError::CommandSpawnFailed {
                command: cmd.display(),
                message: e.to_string(),
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_builder_accumulates() {
        let mut cmd = HostCommand::new("sed");
        cmd.arg("-i").args(["s/^[^#]/#&/", "/tmp/f"]);
        assert_eq!(cmd.program(), "sed");
        assert_eq!(cmd.get_args(), ["-i", "s/^[^#]/#&/", "/tmp/f"]);
        assert_eq!(cmd.display(), "sed -i s/^[^#]/#&/ /tmp/f");
    }

    #[tokio::test]
    async fn captures_exit_code_and_output() {
        let effect = HostCommandEffect::new();

        let ok = effect.create_command("true");
        let output = effect.execute(ok).await.unwrap();
        assert!(output.success());

        let fail = effect.create_command("false");
        let output = effect.execute(fail).await.unwrap();
        assert!(!output.success());
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let effect = HostCommandEffect::new();
        let cmd = effect.create_command("upkeep-no-such-binary");
        let err = effect.execute(cmd).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Ops(OpsError::CommandSpawnFailed { .. })
        ));
    }
}
