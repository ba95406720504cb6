use std::collections::{BTreeMap, BTreeSet};

use crate::scan::ScanReport;
use crate::types::round1;

/// Share of significant files that are mapped, in `[0, 100]`.
///
/// Only the intersection counts: mapped paths outside the significant set
/// (stale, moved, reclassified) never push the result above 100.
#[allow(clippy::cast_precision_loss)]
pub fn coverage_quality(significant: &BTreeSet<String>, mapped: &BTreeSet<String>) -> f64 {
    if significant.is_empty() {
        return 0.0;
    }
    let covered = significant.intersection(mapped).count();
    round1(covered as f64 / significant.len() as f64 * 100.0)
}

/// Coverage of one directory's significant files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryCoverage {
    pub total: usize,
    pub mapped: usize,
    pub unmapped: Vec<String>,
}

impl DirectoryCoverage {
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.mapped as f64 / self.total as f64 * 100.0
        }
    }
}

/// Per-directory breakdown plus the largest unmapped files.
#[derive(Debug, Clone, Default)]
pub struct CoverageDetail {
    /// Keyed by parent directory, `.` for the root.
    pub directories: BTreeMap<String, DirectoryCoverage>,
    /// Largest unmapped significant files, descending by size.
    pub largest_unmapped: Vec<(String, u64)>,
}

impl CoverageDetail {
    pub fn compute(report: &ScanReport, mapped: &BTreeSet<String>, top: usize) -> Self {
        let mut directories: BTreeMap<String, DirectoryCoverage> = BTreeMap::new();
        let mut unmapped: Vec<(String, u64)> = Vec::new();

        for (path, size) in &report.significant {
            let dir = match path.rfind('/') {
                Some(i) => path[..i].to_string(),
                None => ".".to_string(),
            };
            let entry = directories.entry(dir).or_default();
            entry.total += 1;
            if mapped.contains(path) {
                entry.mapped += 1;
            } else {
                entry.unmapped.push(path.clone());
                unmapped.push((path.clone(), *size));
            }
        }

        unmapped.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        unmapped.truncate(top);

        Self {
            directories,
            largest_unmapped: unmapped,
        }
    }
}
