use std::path::Path;

use anyhow::Context;
use atlas_core::survey::{InitOutcome, Survey};
use clap::Args;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project name (default: repository directory name)
    pub name: Option<String>,

    /// Overwrite an existing survey without asking
    #[arg(short, long)]
    pub yes: bool,
}

pub fn run(args: InitArgs, root: &Path) -> anyhow::Result<()> {
    let root_abs = std::fs::canonicalize(root)
        .with_context(|| format!("Cannot resolve path: {}", root.display()))?;
    let name = args.name.unwrap_or_else(|| {
        root_abs
            .file_name()
            .map_or_else(|| "project".to_string(), |n| n.to_string_lossy().into_owned())
    });
    let config = super::load_config(&root_abs)?;

    let mut outcome = Survey::init(&root_abs, &config, &name, args.yes)?;
    if outcome == InitOutcome::WouldOverwrite {
        if !super::confirm("A survey already exists here. Overwrite it?")? {
            println!("Keeping the existing survey.");
            return Ok(());
        }
        outcome = Survey::init(&root_abs, &config, &name, true)?;
    }

    if let InitOutcome::Created { project_type } = outcome {
        println!("Initialized survey for {name} ({project_type})");
    }
    Ok(())
}
