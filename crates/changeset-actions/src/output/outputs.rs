use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{CliError, Result};

const OUTPUT_FILE_VAR: &str = "GITHUB_OUTPUT";
const DELIMITER_PREFIX: &str = "CHANGESET_OUTPUT_EOF";

/// Step outputs, written to the file named by `GITHUB_OUTPUT`.
#[derive(Debug, Default)]
pub(crate) struct ActionOutputs {
    values: Vec<(String, String)>,
}

impl ActionOutputs {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.push((key.to_string(), value.into()));
    }

    pub(crate) fn set_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let encoded = serde_json::to_string(value)?;
        self.set(key, encoded);
        Ok(())
    }

    /// Outside a runner the outputs are only logged.
    pub(crate) fn write(&self) -> Result<()> {
        match std::env::var_os(OUTPUT_FILE_VAR).filter(|path| !path.is_empty()) {
            Some(path) => self.write_to(&PathBuf::from(path)),
            None => {
                for (key, value) in &self.values {
                    tracing::info!(output = %key, %value, "action output");
                }
                Ok(())
            }
        }
    }

    pub(crate) fn write_to(&self, path: &Path) -> Result<()> {
        let write_err = |source| CliError::OutputWrite {
            path: path.to_path_buf(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(write_err)?;
        file.write_all(self.render().as_bytes()).map_err(write_err)?;
        tracing::debug!(path = %path.display(), outputs = self.values.len(), "wrote action outputs");
        Ok(())
    }

    fn render(&self) -> String {
        let mut rendered = String::new();
        for (key, value) in &self.values {
            if value.contains('\n') || value.contains('\r') {
                let delimiter = delimiter_for(value);
                rendered.push_str(&format!("{key}<<{delimiter}\n{value}\n{delimiter}\n"));
            } else {
                rendered.push_str(&format!("{key}={value}\n"));
            }
        }
        rendered
    }
}

fn delimiter_for(value: &str) -> String {
    let mut delimiter = DELIMITER_PREFIX.to_string();
    let mut attempt = 0u32;
    while value.contains(&delimiter) {
        attempt += 1;
        delimiter = format!("{DELIMITER_PREFIX}_{attempt}");
    }
    delimiter
}

fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Reports a failed check through an `::error::` workflow command.
pub(crate) fn annotate_error(message: &str) {
    println!("::error::{}", escape_data(message));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_values_use_key_value_form() {
        let mut outputs = ActionOutputs::new();
        outputs.set("published", "true");
        outputs.set("pullRequestNumber", "42");

        assert_eq!(outputs.render(), "published=true\npullRequestNumber=42\n");
    }

    #[test]
    fn multi_line_values_use_heredoc() {
        let mut outputs = ActionOutputs::new();
        outputs.set("message", "- a@1.0.0\n- b@2.0.0");

        assert_eq!(
            outputs.render(),
            "message<<CHANGESET_OUTPUT_EOF\n- a@1.0.0\n- b@2.0.0\nCHANGESET_OUTPUT_EOF\n"
        );
    }

    #[test]
    fn delimiter_never_occurs_in_value() {
        let value = "first\nCHANGESET_OUTPUT_EOF\nCHANGESET_OUTPUT_EOF_1";

        assert_eq!(delimiter_for(value), "CHANGESET_OUTPUT_EOF_2");
    }

    #[test]
    fn json_values_are_compact() {
        let mut outputs = ActionOutputs::new();
        outputs
            .set_json("publishedPackages", &[("a", "1.0.0")])
            .expect("encode");

        assert_eq!(outputs.render(), "publishedPackages=[[\"a\",\"1.0.0\"]]\n");
    }

    #[test]
    fn write_to_appends_to_existing_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("output");
        std::fs::write(&path, "previous=1\n").expect("seed file");

        let mut outputs = ActionOutputs::new();
        outputs.set("published", "false");
        outputs.write_to(&path).expect("write outputs");

        let content = std::fs::read_to_string(&path).expect("read outputs");
        assert_eq!(content, "previous=1\npublished=false\n");
    }

    #[test]
    fn escapes_workflow_command_data() {
        assert_eq!(escape_data("100% done\nnext\r"), "100%25 done%0Anext%0D");
    }
}
