use std::path::Path;

use atlas_core::survey::InsightOutcome;
use clap::Args;

#[derive(Args, Debug)]
pub struct InsightArgs {
    /// System the insight belongs to
    pub system: String,

    /// Insight text: "[WHAT] using [HOW], which [WHY/IMPACT]"
    pub text: String,

    /// Skip the quality check (near-duplicates are still skipped)
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InsightArgs, root: &Path) -> anyhow::Result<()> {
    let mut survey = super::open_survey(root)?;
    match survey.add_insight(&args.system, &args.text, args.force)? {
        InsightOutcome::Added => println!("Added insight to: {}", args.system),
        InsightOutcome::Duplicate(_) => println!("Similar insight already exists. Skipping."),
        InsightOutcome::Rejected(reasons) => {
            eprintln!("Insight quality issues:");
            for reason in &reasons {
                eprintln!("  - {reason}");
            }
            eprintln!();
            eprintln!("Quality template: [WHAT] using [HOW], which [WHY/IMPACT]");
            eprintln!(
                "Example: 'Implements token refresh using Redis cache, which reduces DB load'"
            );
            anyhow::bail!(
                "Insight rejected ({} issue{}); rewrite it or pass --force",
                reasons.len(),
                if reasons.len() == 1 { "" } else { "s" }
            );
        }
    }
    Ok(())
}
