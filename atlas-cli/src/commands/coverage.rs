use std::path::Path;

use atlas_core::coverage::CoverageDetail;
use clap::Args;

const BAR_WIDTH: usize = 10;

#[derive(Args, Debug)]
pub struct CoverageArgs {
    /// Print machine-readable JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &CoverageArgs, root: &Path) -> anyhow::Result<()> {
    let survey = super::open_survey(root)?;
    let detail = survey.coverage_detail()?;

    if args.json {
        print_json(&detail)
    } else {
        print_text(&detail);
        Ok(())
    }
}

fn print_text(detail: &CoverageDetail) {
    println!("=== COVERAGE BY DIRECTORY ===");
    for (dir, cov) in &detail.directories {
        let pct = cov.percentage();
        let marker = if pct >= 90.0 {
            "ok  "
        } else if pct >= 60.0 {
            "warn"
        } else {
            "miss"
        };
        println!(
            "{marker} {dir:<30} [{}] {pct:>3.0}% ({}/{})",
            bar(pct),
            cov.mapped,
            cov.total
        );
    }

    if !detail.largest_unmapped.is_empty() {
        println!();
        println!("=== TOP UNMAPPED FILES ===");
        for (i, (path, size)) in detail.largest_unmapped.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let kb = *size as f64 / 1024.0;
            println!("  {}. {path:<50} ({kb:.1} KB)", i + 1);
        }
    }
}

fn print_json(detail: &CoverageDetail) -> anyhow::Result<()> {
    let directories: Vec<_> = detail
        .directories
        .iter()
        .map(|(dir, cov)| {
            serde_json::json!({
                "directory": dir,
                "mapped": cov.mapped,
                "total": cov.total,
                "percentage": cov.percentage(),
                "unmapped": cov.unmapped,
            })
        })
        .collect();
    let largest: Vec<_> = detail
        .largest_unmapped
        .iter()
        .map(|(path, size)| serde_json::json!({ "path": path, "size_bytes": size }))
        .collect();
    let json = serde_json::json!({
        "directories": directories,
        "largest_unmapped": largest,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn bar(pct: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = ((pct / 10.0) as usize).min(BAR_WIDTH);
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fills_by_tenths() {
        assert_eq!(bar(0.0), "..........");
        assert_eq!(bar(59.9), "#####.....");
        assert_eq!(bar(100.0), "##########");
    }
}
