use std::path::Path;

use changeset_operations::operations::{StatusInput, StatusOperation};
use changeset_operations::providers::{
    FileSystemChangesetIO, FileSystemManifestStore, FileSystemWorkspaceProvider, Git2Provider,
};
use clap::Args;

use crate::config::{WorkflowArgs, WorkflowConfig};
use crate::error::Result;
use crate::output::{PlainTextStatusFormatter, StatusFormatter};

#[derive(Args)]
pub(crate) struct StatusArgs {
    #[command(flatten)]
    workflow: WorkflowArgs,

    /// Git revision to diff HEAD against for changed-package detection
    #[arg(long)]
    base: Option<String>,
}

pub(crate) fn run(args: StatusArgs, project_root: &Path) -> Result<()> {
    let config = WorkflowConfig::from_args(&args.workflow)?;

    let operation = StatusOperation::new(
        FileSystemWorkspaceProvider::new(project_root),
        FileSystemChangesetIO::new(project_root),
        Git2Provider::new(project_root),
        FileSystemManifestStore::new(project_root),
    );
    let output = operation.execute(&StatusInput {
        base: args.base,
        dirs: config.dirs,
        excludes: config.excludes,
    })?;

    let formatter = PlainTextStatusFormatter::new(config.locale);
    print!("{}", formatter.format_status(&output));

    Ok(())
}
