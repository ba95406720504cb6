//! Completeness and clarity scoring for a system.
//!
//! Clarity thresholds read the *base* score, which has no clarity term;
//! completeness then adds the clarity bonus on top. Evaluation order is
//! fixed: base → clarity → bonus → completeness.

use crate::types::{Clarity, SystemRecord};

/// Points for key files, saturating at ten files.
pub const FILE_POINTS: u32 = 40;
/// Points for insights, saturating at five insights.
pub const INSIGHT_POINTS: u32 = 35;
/// Points for having at least one dependency.
pub const DEPENDENCY_POINTS: u32 = 15;

const FILES_FOR_FULL_SCORE: usize = 10;
const INSIGHTS_FOR_FULL_SCORE: usize = 5;

/// Every intermediate of one scoring pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub file_score: u32,
    pub insight_score: u32,
    pub dep_score: u32,
    /// 0-90, no clarity term.
    pub base: u32,
    pub clarity: Clarity,
    pub completeness: u32,
}

impl ScoreBreakdown {
    pub fn compute(files: usize, insights: usize, has_dependencies: bool) -> Self {
        // min(n / 10, 1) * 40 == min(n, 10) * 4, exact in integers.
        let file_score = saturating_share(files, FILES_FOR_FULL_SCORE, FILE_POINTS);
        let insight_score = saturating_share(insights, INSIGHTS_FOR_FULL_SCORE, INSIGHT_POINTS);
        let dep_score = if has_dependencies { DEPENDENCY_POINTS } else { 0 };
        let base = file_score + insight_score + dep_score;

        let clarity = if insights >= 5 && base >= 70 && has_dependencies {
            Clarity::High
        } else if insights >= 3 && base >= 40 {
            Clarity::Medium
        } else {
            Clarity::Low
        };

        Self {
            file_score,
            insight_score,
            dep_score,
            base,
            clarity,
            completeness: (base + clarity.bonus()).min(100),
        }
    }

    pub fn of(system: &SystemRecord) -> Self {
        Self::compute(
            system.key_files.len(),
            system.insights.len(),
            !system.dependencies.is_empty(),
        )
    }
}

fn saturating_share(count: usize, full_at: usize, points: u32) -> u32 {
    let capped = u32::try_from(count.min(full_at)).unwrap_or(u32::MAX);
    // full_at divides points for every scored component
    capped * (points / u32::try_from(full_at).unwrap_or(1))
}

/// Recompute `clarity` and `completeness` in place.
///
/// Must run after any change to key files, insights or dependencies.
pub fn rescore(system: &mut SystemRecord) -> ScoreBreakdown {
    let breakdown = ScoreBreakdown::of(system);
    system.clarity = breakdown.clarity;
    system.completeness = breakdown.completeness;
    breakdown
}
