use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Schema version stamped into new documents.
pub const SCHEMA_VERSION: &str = "2.2";
/// Placeholder description for freshly added systems.
pub const PLACEHOLDER_DESCRIPTION: &str = "TODO";
/// Systems at or above this completeness count as complete.
pub const COMPLETE_THRESHOLD: u32 = 85;

// ── Root document ──────────────────────────────────────────────────

/// The persisted survey document, one per repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectState {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub systems: BTreeMap<String, SystemRecord>,
    /// Derived from `systems`; recomputed before every save.
    #[serde(default)]
    pub progress: Progress,
}

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

impl Default for ProjectState {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            metadata: Metadata::default(),
            systems: BTreeMap::new(),
            progress: Progress::default(),
        }
    }
}

impl ProjectState {
    pub fn new(project_name: &str, project_type: &str) -> Self {
        let mut state = Self::default();
        state.metadata.project_name = project_name.to_string();
        state.metadata.project_type = project_type.to_string();
        state
    }

    /// Union of `key_files` across every system.
    pub fn mapped_files(&self) -> BTreeSet<String> {
        self.systems
            .values()
            .flat_map(|s| s.key_files.iter().cloned())
            .collect()
    }

    pub fn total_insights(&self) -> usize {
        self.systems.values().map(|s| s.insights.len()).sum()
    }

    /// Recompute the derived `progress` block from `systems`.
    pub fn refresh_progress(&mut self) {
        self.progress = Progress::from_systems(&self.systems);
    }
}

// ── Metadata ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub project_name: String,
    #[serde(default = "default_project_type")]
    pub project_type: String,
    /// ISO-8601 timestamp of the last save.
    #[serde(default)]
    pub last_updated: String,
    #[serde(default = "default_phase")]
    pub phase: String,
    #[serde(default)]
    pub total_sessions: u64,
    #[serde(default)]
    pub scan_stats: ScanStats,
    #[serde(default)]
    pub session_history: Vec<SessionRecord>,
}

fn default_project_type() -> String {
    "Unknown".to_string()
}

fn default_phase() -> String {
    "survey".to_string()
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            project_type: default_project_type(),
            last_updated: String::new(),
            phase: default_phase(),
            total_sessions: 0,
            scan_stats: ScanStats::default(),
            session_history: Vec::new(),
        }
    }
}

/// Point-in-time scan snapshot, overwritten on every scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanStats {
    pub total_files_scanned: usize,
    pub significant_files_total: usize,
    pub mapped_files_count: usize,
    pub coverage_percentage: f64,
    pub coverage_quality: f64,
}

/// Deltas recorded when a session closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: u64,
    pub timestamp: String,
    pub new_systems_found: usize,
    pub new_files_mapped: usize,
    pub insights_added: usize,
}

// ── Systems ────────────────────────────────────────────────────────

/// Qualitative confidence label derived alongside completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clarity {
    #[default]
    Low,
    Medium,
    High,
}

impl Clarity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Completeness points awarded for this clarity level.
    pub fn bonus(self) -> u32 {
        match self {
            Self::Low => 0,
            Self::Medium => 5,
            Self::High => 10,
        }
    }
}

impl std::fmt::Display for Clarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed, annotated link from one system to another.
///
/// `system` is a soft reference: it should name a key of
/// [`ProjectState::systems`] but violations are only reported by validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub system: String,
    pub reason: String,
}

/// One architectural subsystem under documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemRecord {
    #[serde(default = "default_description")]
    pub description: String,
    /// Derived, 0-100.
    #[serde(default)]
    pub completeness: u32,
    /// Derived.
    #[serde(default)]
    pub clarity: Clarity,
    #[serde(default)]
    pub key_files: BTreeSet<String>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    #[serde(default)]
    pub insights: Vec<String>,
    /// Informational only; never scored.
    #[serde(default)]
    pub complexities: Vec<String>,
}

fn default_description() -> String {
    PLACEHOLDER_DESCRIPTION.to_string()
}

impl Default for SystemRecord {
    fn default() -> Self {
        Self {
            description: default_description(),
            completeness: 0,
            clarity: Clarity::Low,
            key_files: BTreeSet::new(),
            dependencies: Vec::new(),
            insights: Vec::new(),
            complexities: Vec::new(),
        }
    }
}

impl SystemRecord {
    pub fn has_placeholder_description(&self) -> bool {
        self.description.trim().is_empty() || self.description == PLACEHOLDER_DESCRIPTION
    }
}

// ── Progress ───────────────────────────────────────────────────────

/// Aggregate over all systems; never hand-edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    pub systems_identified: usize,
    pub systems_complete: usize,
    /// Mean completeness rounded to one decimal, 0 without systems.
    pub estimated_overall_completeness: f64,
}

impl Progress {
    #[allow(clippy::cast_precision_loss)]
    pub fn from_systems(systems: &BTreeMap<String, SystemRecord>) -> Self {
        let identified = systems.len();
        let complete = systems
            .values()
            .filter(|s| s.completeness >= COMPLETE_THRESHOLD)
            .count();
        let mean = if identified == 0 {
            0.0
        } else {
            let total: u32 = systems.values().map(|s| s.completeness).sum();
            round1(f64::from(total) / identified as f64)
        };
        Self {
            systems_identified: identified,
            systems_complete: complete,
            estimated_overall_completeness: mean,
        }
    }
}

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system(completeness: u32) -> SystemRecord {
        SystemRecord {
            completeness,
            ..SystemRecord::default()
        }
    }

    #[test]
    fn progress_counts_complete_systems() {
        let mut systems = BTreeMap::new();
        systems.insert("a".to_string(), system(85));
        systems.insert("b".to_string(), system(84));
        systems.insert("c".to_string(), system(100));
        let progress = Progress::from_systems(&systems);
        assert_eq!(progress.systems_identified, 3);
        assert_eq!(progress.systems_complete, 2);
        assert!((progress.estimated_overall_completeness - 89.7).abs() < 1e-9);
    }

    #[test]
    fn progress_empty_is_zero() {
        let progress = Progress::from_systems(&BTreeMap::new());
        assert_eq!(progress.systems_identified, 0);
        assert!(progress.estimated_overall_completeness.abs() < f64::EPSILON);
    }

    #[test]
    fn clarity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Clarity::Medium).unwrap(), "\"medium\"");
        let back: Clarity = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(back, Clarity::High);
    }

    #[test]
    fn sparse_document_fills_defaults() {
        let json = r#"{
            "schema_version": "2.2",
            "metadata": {"project_name": "test", "total_sessions": 1},
            "systems": {"Auth": {"key_files": ["a.py", "a.py"], "insights": []}}
        }"#;
        let state: ProjectState = serde_json::from_str(json).unwrap();
        assert_eq!(state.metadata.phase, "survey");
        assert_eq!(state.metadata.project_type, "Unknown");
        let auth = &state.systems["Auth"];
        assert_eq!(auth.description, PLACEHOLDER_DESCRIPTION);
        assert_eq!(auth.key_files.len(), 1);
        assert_eq!(auth.clarity, Clarity::Low);
    }

    #[test]
    fn mapped_files_unions_systems() {
        let mut state = ProjectState::new("p", "Unknown");
        let mut a = SystemRecord::default();
        a.key_files.extend(["x.rs".to_string(), "y.rs".to_string()]);
        let mut b = SystemRecord::default();
        b.key_files.extend(["y.rs".to_string(), "z.rs".to_string()]);
        state.systems.insert("a".into(), a);
        state.systems.insert("b".into(), b);
        assert_eq!(state.mapped_files().len(), 3);
    }
}
