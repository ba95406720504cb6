use std::path::Path;

use clap::Args;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print machine-readable JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &StatusArgs, root: &Path) -> anyhow::Result<()> {
    let mut survey = super::open_survey(root)?;
    let report = survey.status()?;
    let state = survey.state();
    let meta = &state.metadata;
    let stats = &meta.scan_stats;
    let gates_config = &survey.config().gates;

    if args.json {
        let json = serde_json::json!({
            "project_name": meta.project_name,
            "project_type": meta.project_type,
            "phase": meta.phase,
            "total_sessions": meta.total_sessions,
            "scan_stats": stats,
            "progress": state.progress,
            "unreadable_files": report.scan.unreadable,
            "gates": {
                "coverage_met": report.gates.coverage_met,
                "diminishing_returns": report.gates.diminishing_returns,
            },
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    println!("=== PROJECT STATE ===");
    println!("Project:  {} ({})", meta.project_name, meta.project_type);
    println!("Phase:    {}", meta.phase);
    println!("Sessions: {}", meta.total_sessions);
    println!(
        "Coverage: {}% ({}/{} significant files)",
        stats.coverage_percentage, stats.mapped_files_count, stats.significant_files_total
    );
    println!(
        "Systems:  {} identified, {} complete ({}% overall)",
        state.progress.systems_identified,
        state.progress.systems_complete,
        state.progress.estimated_overall_completeness
    );
    if report.scan.unreadable > 0 {
        println!("Skipped:  {} unreadable files", report.scan.unreadable);
    }

    if report.gates.coverage_met {
        println!();
        println!(
            "Gate A: Coverage threshold met ({}%+)",
            gates_config.coverage_target
        );
    }
    if report.gates.diminishing_returns {
        println!();
        println!(
            "Gate B: Diminishing returns detected ({} low-yield sessions)",
            gates_config.stall_window
        );
    }
    Ok(())
}
