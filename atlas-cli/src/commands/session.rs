use std::path::Path;

use atlas_core::session::SessionEnd;

pub fn start(root: &Path) -> anyhow::Result<()> {
    let mut survey = super::open_survey(root)?;
    let id = survey.start_session()?;
    println!("Session {id} started");
    Ok(())
}

pub fn end(root: &Path) -> anyhow::Result<()> {
    let mut survey = super::open_survey(root)?;
    match survey.end_session()? {
        SessionEnd::NoActiveSession => println!("No active session."),
        SessionEnd::Recorded(record) => {
            println!("Session {} recorded:", record.session_id);
            println!("  New systems:  {}", record.new_systems_found);
            println!("  Files mapped: {}", record.new_files_mapped);
            println!("  Insights:     {}", record.insights_added);

            let report = survey.status()?;
            if report.gates.coverage_met {
                println!("Gate A reached: coverage target met");
            }
            if report.gates.diminishing_returns {
                println!("Gate B reached: diminishing returns");
            }
        }
    }
    Ok(())
}
