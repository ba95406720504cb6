use std::path::Path;

use clap::Args;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// System to update
    pub system: String,

    /// New single-line description
    #[arg(long)]
    pub desc: Option<String>,
}

pub fn run(args: &UpdateArgs, root: &Path) -> anyhow::Result<()> {
    let mut survey = super::open_survey(root)?;
    survey.update_description(&args.system, args.desc.as_deref())?;
    let system = survey.system(&args.system)?;
    println!(
        "Updated {}: {}% complete, clarity {}",
        args.system, system.completeness, system.clarity
    );
    Ok(())
}
