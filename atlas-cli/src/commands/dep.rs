use std::path::Path;

use atlas_core::survey::DependencyOutcome;
use clap::Args;

#[derive(Args, Debug)]
pub struct DepArgs {
    /// Depending system
    pub system: String,

    /// System depended upon
    pub target: String,

    /// Why the dependency exists
    pub reason: String,

    /// Create a missing target system without asking
    #[arg(short, long)]
    pub yes: bool,
}

pub fn run(args: &DepArgs, root: &Path) -> anyhow::Result<()> {
    let mut survey = super::open_survey(root)?;
    let mut outcome = survey.add_dependency(&args.system, &args.target, &args.reason, args.yes)?;

    let target = args.target.trim();
    if outcome == DependencyOutcome::TargetMissing {
        println!("Target system '{target}' doesn't exist yet.");
        if !super::confirm("Create it now?")? {
            println!("Dependency not recorded.");
            return Ok(());
        }
        outcome = survey.add_dependency(&args.system, &args.target, &args.reason, true)?;
    }

    if let DependencyOutcome::Linked { created_target } = outcome {
        if created_target {
            println!("Added system: {target}");
        }
        println!("Linked {} -> {target}", args.system);
    }
    Ok(())
}
