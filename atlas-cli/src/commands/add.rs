use std::path::Path;

use atlas_core::survey::AddOutcome;
use clap::Args;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// System name
    pub name: String,
}

pub fn run(args: &AddArgs, root: &Path) -> anyhow::Result<()> {
    let mut survey = super::open_survey(root)?;
    match survey.add_system(&args.name)? {
        AddOutcome::Added => println!("Added system: {}", args.name.trim()),
        AddOutcome::AlreadyExists => println!("System '{}' already exists", args.name.trim()),
    }
    Ok(())
}
