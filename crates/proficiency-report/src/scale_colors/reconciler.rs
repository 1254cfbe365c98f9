use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{reachable_scales, FrameworkId, ScaleId};
use super::repository::{CompetencyCatalog, RepositoryError, ScaleColorStore};

/// Keeps scale-color rows aligned with the scales their framework still references.
pub struct ScaleColorReconciler<C, S> {
    catalog: Arc<C>,
    store: Arc<S>,
    dry_run: bool,
}

impl<C, S> ScaleColorReconciler<C, S>
where
    C: CompetencyCatalog + 'static,
    S: ScaleColorStore + 'static,
{
    pub fn new(catalog: Arc<C>, store: Arc<S>) -> Self {
        Self {
            catalog,
            store,
            dry_run: false,
        }
    }

    /// Report deletions without applying them.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Work out which rows of `framework_id` are unreachable without touching the store.
    ///
    /// Rows keyed by `exempt` are never candidates for deletion, even when nothing
    /// references that scale.
    pub fn plan(
        &self,
        framework_id: FrameworkId,
        exempt: Option<ScaleId>,
    ) -> Result<ReconcileReport, ReconcileError> {
        let framework = match self.catalog.lookup_framework(framework_id) {
            Ok(framework) => framework,
            Err(RepositoryError::NotFound) => {
                warn!(%framework_id, "framework missing; skipping scale color cleanup");
                return Err(ReconcileError::NotFound(framework_id));
            }
            Err(other) => return Err(other.into()),
        };
        let competencies = self.catalog.list_competencies(framework_id)?;

        let mut reachable = reachable_scales(&framework, &competencies);
        if let Some(scale_id) = exempt {
            reachable.remove(&scale_id);
        }
        debug!(%framework_id, ?reachable, ?exempt, "computed reachable scales");

        let mut report = ReconcileReport::empty(framework_id, exempt);
        for configuration in self.store.list_for_framework(framework_id)? {
            let scale_id = configuration.scale_id;
            if reachable.contains(&scale_id) || Some(scale_id) == exempt {
                report.retained.push(scale_id);
            } else {
                report.deleted.push(scale_id);
            }
        }
        report.reachable = reachable;

        Ok(report)
    }

    /// Delete every row whose scale is no longer reachable from the framework.
    pub fn reconcile(
        &self,
        framework_id: FrameworkId,
        exempt: Option<ScaleId>,
    ) -> Result<ReconcileReport, ReconcileError> {
        let report = self.plan(framework_id, exempt)?;
        if self.dry_run {
            return Ok(report);
        }

        for scale_id in &report.deleted {
            self.store.delete(framework_id, Some(*scale_id))?;
            info!(%framework_id, %scale_id, "removed unreachable scale color configuration");
        }

        Ok(report)
    }

    /// Drop every row of a framework that no longer exists.
    pub fn purge(&self, framework_id: FrameworkId) -> Result<ReconcileReport, ReconcileError> {
        let mut report = ReconcileReport::empty(framework_id, None);
        report.deleted = self
            .store
            .list_for_framework(framework_id)?
            .into_iter()
            .map(|configuration| configuration.scale_id)
            .collect();

        if !self.dry_run {
            let removed = self.store.delete(framework_id, None)?;
            info!(%framework_id, removed, "purged scale color configurations");
        }

        Ok(report)
    }
}

/// Outcome of a single reconciliation, listing rows kept and rows removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub framework_id: FrameworkId,
    pub reachable: BTreeSet<ScaleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exempt: Option<ScaleId>,
    pub retained: Vec<ScaleId>,
    pub deleted: Vec<ScaleId>,
}

impl ReconcileReport {
    fn empty(framework_id: FrameworkId, exempt: Option<ScaleId>) -> Self {
        Self {
            framework_id,
            reachable: BTreeSet::new(),
            exempt,
            retained: Vec::new(),
            deleted: Vec::new(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.deleted.is_empty()
    }
}

/// Error raised while reconciling scale color configurations.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("competency framework {0} not found")]
    NotFound(FrameworkId),
    #[error(transparent)]
    Store(#[from] RepositoryError),
}
