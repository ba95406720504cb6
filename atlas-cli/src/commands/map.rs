use std::path::Path;

use clap::Args;

#[derive(Args, Debug)]
pub struct MapArgs {
    /// System to map files to
    pub system: String,

    /// Repository-relative file paths
    #[arg(required = true)]
    pub files: Vec<String>,
}

pub fn run(args: &MapArgs, root: &Path) -> anyhow::Result<()> {
    let mut survey = super::open_survey(root)?;
    let added = survey.map_files(&args.system, &args.files)?;
    let system = survey.system(&args.system)?;
    println!(
        "Mapped {added} new file{} to {} ({} total, {}% complete)",
        if added == 1 { "" } else { "s" },
        args.system,
        system.key_files.len(),
        system.completeness
    );
    Ok(())
}
