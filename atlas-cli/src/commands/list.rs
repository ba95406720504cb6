use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let survey = super::open_survey(root)?;
    let mut systems: Vec<_> = survey.state().systems.iter().collect();
    // Stable sort keeps name order among equal scores.
    systems.sort_by(|a, b| b.1.completeness.cmp(&a.1.completeness));

    println!("=== SYSTEMS ===");
    for (name, s) in systems {
        println!(
            "{name:<30} | {:>3}% | {:<6} | {:>2} files | {:>2} insights",
            s.completeness,
            s.clarity.as_str(),
            s.key_files.len(),
            s.insights.len()
        );
    }
    Ok(())
}
