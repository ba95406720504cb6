//! Intake operations over a loaded [`ProjectState`].
//!
//! Every mutation rescores the touched system, rescans the repository to
//! refresh `scan_stats`, recomputes `progress`, and then saves. Decisions
//! that need a human ("overwrite?", "create missing target?", "keep a
//! low-quality insight?") come back as outcomes; nothing here blocks on
//! input.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::AtlasConfig;
use crate::coverage::{CoverageDetail, coverage_quality};
use crate::detect::detect_project_type;
use crate::error::{IntakeError, Result, StateError};
use crate::insight::{check_quality, find_duplicate};
use crate::scan::{RepositoryScanner, ScanReport};
use crate::score::rescore;
use crate::session::{SessionEnd, SessionTracker, StoppingGates};
use crate::store::{Loaded, StateStore};
use crate::types::{Dependency, ProjectState, SystemRecord};
use crate::validate::validate;

/// Number of unmapped files listed in a coverage detail.
const TOP_UNMAPPED: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Created { project_type: String },
    /// A document exists; call again with `overwrite` to replace it.
    WouldOverwrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyExists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightOutcome {
    Added,
    /// Quality check failed; nothing was stored.
    Rejected(Vec<String>),
    /// A near-identical insight already exists; nothing was stored.
    Duplicate(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyOutcome {
    Linked { created_target: bool },
    /// The target system does not exist; call again with `create_missing`.
    TargetMissing,
}

/// Status view: refreshed state plus gate evaluation.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub gates: StoppingGates,
    pub scan: ScanReport,
}

/// A survey rooted at a repository directory.
#[derive(Debug)]
pub struct Survey {
    root: PathBuf,
    config: AtlasConfig,
    store: StateStore,
    state: ProjectState,
    restored_from_backup: bool,
}

impl Survey {
    /// Create (or, with `overwrite`, replace) the state document.
    pub fn init(root: &Path, config: &AtlasConfig, name: &str, overwrite: bool) -> Result<InitOutcome> {
        let store = StateStore::new(root);
        if store.exists() && !overwrite {
            return Ok(InitOutcome::WouldOverwrite);
        }
        let project_type = detect_project_type(root);
        if overwrite {
            store.clear_session_snapshot()?;
        }
        let mut survey = Self {
            root: root.to_path_buf(),
            config: config.clone(),
            store,
            state: ProjectState::new(name, project_type),
            restored_from_backup: false,
        };
        survey.persist()?;
        info!(project = name, project_type, "Initialized survey");
        Ok(InitOutcome::Created {
            project_type: project_type.to_string(),
        })
    }

    /// Load an existing survey. Missing state is [`StateError::NotInitialized`].
    pub fn open(root: &Path, config: &AtlasConfig) -> Result<Self> {
        let store = StateStore::new(root);
        let (state, restored_from_backup) = match store.load()? {
            Loaded::Missing => return Err(StateError::NotInitialized(store.state_path()).into()),
            Loaded::Current(state) => (state, false),
            Loaded::Restored(state) => (state, true),
        };
        Ok(Self {
            root: root.to_path_buf(),
            config: config.clone(),
            store,
            state,
            restored_from_backup,
        })
    }

    pub fn state(&self) -> &ProjectState {
        &self.state
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Whether `open` fell back to the backup document.
    pub fn restored_from_backup(&self) -> bool {
        self.restored_from_backup
    }

    pub fn system(&self, name: &str) -> Result<&SystemRecord> {
        self.state
            .systems
            .get(name)
            .ok_or_else(|| IntakeError::UnknownSystem(name.to_string()).into())
    }

    // ── Derived data ───────────────────────────────────────────────

    pub fn scan(&self) -> Result<ScanReport> {
        Ok(RepositoryScanner::from_config(&self.root, &self.config).scan()?)
    }

    /// Overwrite `scan_stats` and `progress` from a fresh scan.
    fn refresh_derived(&mut self) -> Result<ScanReport> {
        let report = self.scan()?;
        let significant = report.significant_paths();
        let mapped = self.state.mapped_files();
        let quality = coverage_quality(&significant, &mapped);

        let stats = &mut self.state.metadata.scan_stats;
        stats.total_files_scanned = report.total_files;
        stats.significant_files_total = report.significant_count();
        stats.mapped_files_count = significant.intersection(&mapped).count();
        stats.coverage_percentage = quality;
        stats.coverage_quality = quality;

        self.state.refresh_progress();
        Ok(report)
    }

    fn persist(&mut self) -> Result<ScanReport> {
        let report = self.refresh_derived()?;
        self.store.save(&mut self.state)?;
        Ok(report)
    }

    // ── Intake ─────────────────────────────────────────────────────

    pub fn add_system(&mut self, name: &str) -> Result<AddOutcome> {
        let name = system_name(name)?;
        if self.state.systems.contains_key(name) {
            return Ok(AddOutcome::AlreadyExists);
        }
        self.state
            .systems
            .insert(name.to_string(), SystemRecord::default());
        self.persist()?;
        info!(system = name, "Added system");
        Ok(AddOutcome::Added)
    }

    /// Set the description (when given) and rescore.
    pub fn update_description(&mut self, name: &str, description: Option<&str>) -> Result<()> {
        let system = self.system_mut(name)?;
        if let Some(desc) = description.filter(|d| !d.trim().is_empty()) {
            if desc.contains('\n') || desc.contains('\r') {
                return Err(IntakeError::MultilineDescription(name.to_string()).into());
            }
            system.description = desc.to_string();
        }
        rescore(system);
        self.persist()?;
        Ok(())
    }

    /// Add files to a system's key files. Returns how many were new.
    pub fn map_files<S: AsRef<str>>(&mut self, name: &str, files: &[S]) -> Result<usize> {
        let system = self.system_mut(name)?;
        let before = system.key_files.len();
        system
            .key_files
            .extend(files.iter().map(|f| normalize_path(f.as_ref())));
        let added = system.key_files.len() - before;
        rescore(system);
        self.persist()?;
        info!(system = name, added, "Mapped files");
        Ok(added)
    }

    /// Quality-check (unless `force`), deduplicate, then append.
    ///
    /// Near-duplicates are skipped even when forced.
    pub fn add_insight(&mut self, name: &str, text: &str, force: bool) -> Result<InsightOutcome> {
        let strictness = self.config.insights.strictness;
        let threshold = self.config.insights.duplicate_threshold;
        let system = self.system_mut(name)?;

        if !force {
            let reasons = check_quality(text, strictness);
            if !reasons.is_empty() {
                return Ok(InsightOutcome::Rejected(reasons));
            }
        }
        if let Some(existing) = find_duplicate(text, &system.insights, threshold) {
            warn!(system = name, "Similar insight already exists, skipping");
            return Ok(InsightOutcome::Duplicate(existing.to_string()));
        }

        system.insights.push(text.trim().to_string());
        rescore(system);
        self.persist()?;
        Ok(InsightOutcome::Added)
    }

    /// Link `name` → `target`. A missing target is created only when
    /// `create_missing` is set.
    pub fn add_dependency(
        &mut self,
        name: &str,
        target: &str,
        reason: &str,
        create_missing: bool,
    ) -> Result<DependencyOutcome> {
        self.system(name)?;
        let target = system_name(target)?;
        let created_target = !self.state.systems.contains_key(target);
        if created_target {
            if !create_missing {
                return Ok(DependencyOutcome::TargetMissing);
            }
            self.state
                .systems
                .insert(target.to_string(), SystemRecord::default());
            info!(system = target, "Created missing dependency target");
        }

        let system = self.system_mut(name)?;
        system.dependencies.push(Dependency {
            system: target.to_string(),
            reason: reason.to_string(),
        });
        rescore(system);
        self.persist()?;
        Ok(DependencyOutcome::Linked { created_target })
    }

    fn system_mut(&mut self, name: &str) -> Result<&mut SystemRecord> {
        self.state
            .systems
            .get_mut(name)
            .ok_or_else(|| IntakeError::UnknownSystem(name.to_string()).into())
    }

    // ── Reporting ──────────────────────────────────────────────────

    /// Rescan, persist the refreshed stats, and evaluate stopping gates.
    pub fn status(&mut self) -> Result<StatusReport> {
        let scan = self.persist()?;
        let gates = StoppingGates::evaluate(&self.state, &self.config.gates);
        Ok(StatusReport { gates, scan })
    }

    pub fn coverage_detail(&self) -> Result<CoverageDetail> {
        let report = self.scan()?;
        Ok(CoverageDetail::compute(
            &report,
            &self.state.mapped_files(),
            TOP_UNMAPPED,
        ))
    }

    pub fn validate(&self) -> Result<Vec<String>> {
        let report = self.scan()?;
        Ok(validate(&self.state, &report.significant_paths()))
    }

    // ── Sessions ───────────────────────────────────────────────────

    pub fn start_session(&mut self) -> Result<u64> {
        let id = SessionTracker::new(&self.store).start(&mut self.state)?;
        self.persist()?;
        Ok(id)
    }

    pub fn end_session(&mut self) -> Result<SessionEnd> {
        let outcome = SessionTracker::new(&self.store).end(&mut self.state)?;
        if matches!(outcome, SessionEnd::Recorded(_)) {
            self.persist()?;
        }
        Ok(outcome)
    }
}

/// Trimmed system name; empty names are rejected.
fn system_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(IntakeError::EmptyName.into());
    }
    Ok(name)
}

/// Forward slashes, no leading `./`.
fn normalize_path(path: &str) -> String {
    let path = path.trim().replace('\\', "/");
    path.strip_prefix("./").unwrap_or(&path).to_string()
}
