//! Session accounting and stopping gates.
//!
//! A session is bracketed by `start` and `end`, which may run in separate
//! processes: the baseline is held in memory and mirrored to a side file
//! so `end` can recover it after a restart.

use chrono::Local;
use tracing::info;

use crate::config::GateSection;
use crate::error::StateError;
use crate::store::StateStore;
use crate::types::{ProjectState, SessionRecord};

/// Differences between a session baseline and the current state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionDelta {
    pub new_systems_found: usize,
    /// Distinct key files absent from the baseline's union.
    pub new_files_mapped: usize,
    pub insights_added: usize,
}

impl SessionDelta {
    pub fn between(baseline: &ProjectState, current: &ProjectState) -> Self {
        let new_systems_found = current
            .systems
            .keys()
            .filter(|name| !baseline.systems.contains_key(*name))
            .count();
        let old_files = baseline.mapped_files();
        let new_files_mapped = current.mapped_files().difference(&old_files).count();
        let insights_added = current
            .total_insights()
            .saturating_sub(baseline.total_insights());
        Self {
            new_systems_found,
            new_files_mapped,
            insights_added,
        }
    }
}

/// Result of [`SessionTracker::end`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    Recorded(SessionRecord),
    NoActiveSession,
}

/// Two-state machine: idle, or in-session with a baseline.
#[derive(Debug)]
pub struct SessionTracker<'a> {
    store: &'a StateStore,
    baseline: Option<ProjectState>,
}

impl<'a> SessionTracker<'a> {
    pub fn new(store: &'a StateStore) -> Self {
        Self {
            store,
            baseline: None,
        }
    }

    pub fn in_session(&self) -> bool {
        self.baseline.is_some() || self.store.session_path().exists()
    }

    /// Snapshot `state` as the baseline and bump `total_sessions`.
    ///
    /// The caller persists `state` afterwards.
    pub fn start(&mut self, state: &mut ProjectState) -> Result<u64, StateError> {
        self.store.write_session_snapshot(state)?;
        self.baseline = Some(state.clone());
        state.metadata.total_sessions += 1;
        info!(session = state.metadata.total_sessions, "Session started");
        Ok(state.metadata.total_sessions)
    }

    /// Diff against the baseline and append a [`SessionRecord`].
    ///
    /// Without a baseline (in memory or on disk) this is a no-op. The
    /// caller persists `state` afterwards.
    pub fn end(&mut self, state: &mut ProjectState) -> Result<SessionEnd, StateError> {
        let baseline = match self.baseline.take() {
            Some(b) => Some(b),
            None => self.store.read_session_snapshot()?,
        };
        let Some(baseline) = baseline else {
            return Ok(SessionEnd::NoActiveSession);
        };

        let delta = SessionDelta::between(&baseline, state);
        let record = SessionRecord {
            session_id: state.metadata.total_sessions,
            timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            new_systems_found: delta.new_systems_found,
            new_files_mapped: delta.new_files_mapped,
            insights_added: delta.insights_added,
        };
        state.metadata.session_history.push(record.clone());
        self.store.clear_session_snapshot()?;
        info!(
            session = record.session_id,
            systems = record.new_systems_found,
            files = record.new_files_mapped,
            insights = record.insights_added,
            "Session recorded"
        );
        Ok(SessionEnd::Recorded(record))
    }
}

/// Stopping conditions, each evaluated independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoppingGates {
    /// Gate A: coverage reached the target.
    pub coverage_met: bool,
    /// Gate B: the trailing sessions found nothing new.
    pub diminishing_returns: bool,
}

impl StoppingGates {
    pub fn evaluate(state: &ProjectState, gates: &GateSection) -> Self {
        let coverage_met = state.metadata.scan_stats.coverage_percentage >= gates.coverage_target;

        let history = &state.metadata.session_history;
        let diminishing_returns = history.len() >= gates.stall_window
            && history[history.len() - gates.stall_window..].iter().all(|s| {
                s.new_systems_found == 0 && s.new_files_mapped < gates.stall_max_new_files
            });

        Self {
            coverage_met,
            diminishing_returns,
        }
    }

    pub fn any(self) -> bool {
        self.coverage_met || self.diminishing_returns
    }
}
