use std::path::Path;

use atlas_core::types::SystemRecord;
use clap::Args;

/// Insights included in `--summary` output.
const SUMMARY_INSIGHTS: usize = 3;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// System to print
    pub system: String,

    /// Print only description, completeness, dependencies and top insights
    #[arg(long)]
    pub summary: bool,
}

pub fn run(args: &ShowArgs, root: &Path) -> anyhow::Result<()> {
    let survey = super::open_survey(root)?;
    let system = survey.system(&args.system)?;
    let json = if args.summary {
        summary(system)
    } else {
        serde_json::to_value(system)?
    };
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn summary(system: &SystemRecord) -> serde_json::Value {
    let dependencies: Vec<&str> = system
        .dependencies
        .iter()
        .map(|d| d.system.as_str())
        .collect();
    let top_insights: Vec<&String> = system.insights.iter().take(SUMMARY_INSIGHTS).collect();
    serde_json::json!({
        "description": system.description,
        "completeness": system.completeness,
        "dependencies": dependencies,
        "top_insights": top_insights,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::types::Dependency;

    #[test]
    fn summary_keeps_first_three_insights() {
        let system = SystemRecord {
            description: "Auth".into(),
            completeness: 42,
            insights: (0..5).map(|i| format!("insight {i}")).collect(),
            dependencies: vec![Dependency {
                system: "Storage".into(),
                reason: "persists tokens".into(),
            }],
            ..SystemRecord::default()
        };
        let json = summary(&system);
        assert_eq!(json["completeness"], 42);
        assert_eq!(json["dependencies"], serde_json::json!(["Storage"]));
        assert_eq!(
            json["top_insights"],
            serde_json::json!(["insight 0", "insight 1", "insight 2"])
        );
    }
}
