use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::Result;
use crate::error::OperationError;
use crate::traits::CommandRunner;

/// Runs commands as child processes in the repository root.
pub struct ProcessCommandRunner {
    cwd: PathBuf,
}

impl ProcessCommandRunner {
    #[must_use]
    pub fn new(cwd: &Path) -> Self {
        Self {
            cwd: cwd.to_path_buf(),
        }
    }

    fn output(&self, command_line: &str, mut cmd: Command) -> Result<String> {
        tracing::info!(command = %command_line, "running");
        let output = cmd
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| OperationError::CommandSpawn {
                command: command_line.to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stdout.lines() {
            tracing::info!("{line}");
        }
        for line in stderr.lines() {
            tracing::debug!("{line}");
        }

        if !output.status.success() {
            return Err(OperationError::CommandFailed {
                command: command_line.to_string(),
                status: output.status.to_string(),
            });
        }
        Ok(stdout)
    }
}

impl CommandRunner for ProcessCommandRunner {
    fn run(&self, command_line: &str) -> Result<String> {
        let mut parts = command_line.split_whitespace();
        let program = parts.next().ok_or(OperationError::EmptyCommand)?;
        let mut cmd = Command::new(program);
        cmd.args(parts);
        self.output(command_line, cmd)
    }

    fn run_shell(&self, script: &str) -> Result<String> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        self.output(script, cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let runner = ProcessCommandRunner::new(dir.path());

        let stdout = runner.run("echo 🦋  pkg@1.0.0")?;

        assert_eq!(stdout.trim(), "🦋 pkg@1.0.0");
        Ok(())
    }

    #[test]
    fn shell_scripts_keep_their_spacing() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let runner = ProcessCommandRunner::new(dir.path());

        let stdout = runner.run_shell("printf 'New tag:  a@1.0.0\\n' && true")?;

        assert_eq!(stdout, "New tag:  a@1.0.0\n");
        Ok(())
    }

    #[test]
    fn failing_command_is_an_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let runner = ProcessCommandRunner::new(dir.path());

        let err = runner.run_shell("exit 3").expect_err("should fail");

        assert!(matches!(err, OperationError::CommandFailed { ref command, .. } if command == "exit 3"));
        Ok(())
    }

    #[test]
    fn missing_program_names_the_command_line() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let runner = ProcessCommandRunner::new(dir.path());

        let err = runner
            .run("definitely-not-a-real-program --flag")
            .expect_err("should fail");

        assert!(matches!(
            err,
            OperationError::CommandSpawn { ref command, .. }
                if command == "definitely-not-a-real-program --flag"
        ));
        Ok(())
    }

    #[test]
    fn empty_command_line_is_rejected() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let runner = ProcessCommandRunner::new(dir.path());

        assert!(matches!(runner.run("   "), Err(OperationError::EmptyCommand)));
        Ok(())
    }
}
