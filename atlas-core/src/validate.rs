use std::collections::BTreeSet;

use crate::types::ProjectState;

/// Orphan paths containing any of these are not expected to be mapped.
const ORPHAN_EXEMPT_MARKERS: &[&str] = &["test", "doc", "example", "spec"];
/// Orphans are reported once there are more than this many.
const ORPHAN_TOLERANCE: usize = 5;
const ORPHAN_SAMPLE: usize = 5;

/// Check the recorded survey for gaps and inconsistencies.
///
/// `significant` is the significant-path set of a fresh scan. Returns an
/// itemised list; empty means the survey is ready for the next phase.
pub fn validate(state: &ProjectState, significant: &BTreeSet<String>) -> Vec<String> {
    let mut issues = Vec::new();

    for (name, system) in &state.systems {
        if system.has_placeholder_description() {
            issues.push(format!("{name}: Missing or placeholder description"));
        }
        if system.key_files.is_empty() {
            issues.push(format!("{name}: No key_files listed"));
        }
        if system.insights.is_empty() {
            issues.push(format!("{name}: No insights recorded"));
        }

        let insights = system.insights.len();
        let completeness = system.completeness;
        if completeness >= 50 && insights < 3 {
            issues.push(format!(
                "{name}: {completeness}% complete but only {insights} insights (need 3+ for 50%+ completeness)"
            ));
        }
        if completeness >= 80 && insights < 5 {
            issues.push(format!(
                "{name}: {completeness}% complete but only {insights} insights (need 5+ for 80%+ completeness)"
            ));
        }
    }

    for (name, system) in &state.systems {
        for dep in &system.dependencies {
            if !state.systems.contains_key(&dep.system) {
                issues.push(format!(
                    "{name}: References non-existent system '{}'",
                    dep.system
                ));
            }
        }
    }

    let mapped = state.mapped_files();
    let core_orphans: Vec<&String> = significant
        .difference(&mapped)
        .filter(|path| {
            let lower = path.to_lowercase();
            !ORPHAN_EXEMPT_MARKERS.iter().any(|m| lower.contains(m))
        })
        .collect();
    if core_orphans.len() > ORPHAN_TOLERANCE {
        let sample: Vec<&str> = core_orphans
            .iter()
            .take(ORPHAN_SAMPLE)
            .map(|s| s.as_str())
            .collect();
        issues.push(format!(
            "Found {} unmapped significant files (sample: {})",
            core_orphans.len(),
            sample.join(", ")
        ));
    }

    issues
}
