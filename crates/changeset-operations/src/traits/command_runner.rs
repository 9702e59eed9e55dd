use crate::Result;

/// Runs the user supplied scripts (`version_script`, `publish_script`,
/// `formatting_script`).
pub trait CommandRunner: Send + Sync {
    /// Runs a command line split on whitespace, without a shell, and returns
    /// its standard output.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be started or exits unsuccessfully.
    fn run(&self, command_line: &str) -> Result<String>;

    /// Runs a script through `sh -c` and returns its standard output.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell cannot be started or the script fails.
    fn run_shell(&self, script: &str) -> Result<String>;
}
