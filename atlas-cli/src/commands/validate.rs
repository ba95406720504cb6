use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let survey = super::open_survey(root)?;
    let issues = survey.validate()?;
    if issues.is_empty() {
        println!("Survey is valid. Ready for the next phase.");
        return Ok(());
    }

    println!("Validation issues:");
    for issue in &issues {
        println!("  - {issue}");
    }
    anyhow::bail!(
        "Validation found {} issue{}",
        issues.len(),
        if issues.len() == 1 { "" } else { "s" }
    )
}
