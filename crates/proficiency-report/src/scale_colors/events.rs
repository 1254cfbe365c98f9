//! Competency lifecycle events and the observer seam the scale-color reconciler plugs into.
//!
//! The host platform owns the event bus; it hands each event to an [`EventDispatcher`],
//! which routes it to the matching method of every registered observer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info_span};

use super::domain::{CompetencyId, FrameworkId, ScaleId};
use super::reconciler::{ReconcileError, ReconcileReport, ScaleColorReconciler};
use super::repository::{CompetencyCatalog, ScaleColorStore};

/// Framework record as captured by the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkSnapshot {
    pub id: FrameworkId,
    pub scale_id: ScaleId,
}

/// Competency record as it was right after the update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetencySnapshot {
    pub id: CompetencyId,
    pub competency_framework_id: FrameworkId,
    #[serde(default)]
    pub scale_id: Option<ScaleId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CompetencyEvent {
    FrameworkUpdated { framework: FrameworkSnapshot },
    FrameworkDeleted { framework: FrameworkSnapshot },
    CompetencyUpdated { competency: CompetencySnapshot },
}

impl CompetencyEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FrameworkUpdated { .. } => "framework_updated",
            Self::FrameworkDeleted { .. } => "framework_deleted",
            Self::CompetencyUpdated { .. } => "competency_updated",
        }
    }

    pub fn framework_id(&self) -> FrameworkId {
        match self {
            Self::FrameworkUpdated { framework } | Self::FrameworkDeleted { framework } => {
                framework.id
            }
            Self::CompetencyUpdated { competency } => competency.competency_framework_id,
        }
    }
}

/// Event as delivered by the host, stamped with its creation time when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    #[serde(flatten)]
    pub event: CompetencyEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<DateTime<Utc>>,
}

impl From<CompetencyEvent> for EventEnvelope {
    fn from(event: CompetencyEvent) -> Self {
        Self {
            event,
            occurred_at: None,
        }
    }
}

/// Reactions to the competency subsystem's lifecycle events.
pub trait CompetencyEventObserver: Send + Sync {
    fn framework_updated(
        &self,
        framework: &FrameworkSnapshot,
    ) -> Result<ReconcileReport, ReconcileError>;
    fn framework_deleted(
        &self,
        framework: &FrameworkSnapshot,
    ) -> Result<ReconcileReport, ReconcileError>;
    fn competency_updated(
        &self,
        competency: &CompetencySnapshot,
    ) -> Result<ReconcileReport, ReconcileError>;
}

impl<C, S> CompetencyEventObserver for ScaleColorReconciler<C, S>
where
    C: CompetencyCatalog + 'static,
    S: ScaleColorStore + 'static,
{
    fn framework_updated(
        &self,
        framework: &FrameworkSnapshot,
    ) -> Result<ReconcileReport, ReconcileError> {
        self.reconcile(framework.id, Some(framework.scale_id))
    }

    fn framework_deleted(
        &self,
        framework: &FrameworkSnapshot,
    ) -> Result<ReconcileReport, ReconcileError> {
        self.purge(framework.id)
    }

    fn competency_updated(
        &self,
        competency: &CompetencySnapshot,
    ) -> Result<ReconcileReport, ReconcileError> {
        self.reconcile(competency.competency_framework_id, None)
    }
}

/// Routes host events to registered observers.
#[derive(Default, Clone)]
pub struct EventDispatcher {
    observers: Vec<Arc<dyn CompetencyEventObserver>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_observer(mut self, observer: Arc<dyn CompetencyEventObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Deliver one event to every observer, collecting their reports.
    ///
    /// Every observer sees the event even when an earlier one fails; the first
    /// failure is returned after all observers ran.
    pub fn dispatch(
        &self,
        envelope: &EventEnvelope,
    ) -> Result<Vec<ReconcileReport>, ReconcileError> {
        let event = &envelope.event;
        let span = info_span!(
            "competency_event",
            event = event.name(),
            framework_id = %event.framework_id(),
            occurred_at = ?envelope.occurred_at,
        );
        let _entered = span.enter();

        let mut reports = Vec::with_capacity(self.observers.len());
        let mut first_error = None;

        for observer in &self.observers {
            let outcome = match event {
                CompetencyEvent::FrameworkUpdated { framework } => {
                    observer.framework_updated(framework)
                }
                CompetencyEvent::FrameworkDeleted { framework } => {
                    observer.framework_deleted(framework)
                }
                CompetencyEvent::CompetencyUpdated { competency } => {
                    observer.competency_updated(competency)
                }
            };

            match outcome {
                Ok(report) => reports.push(report),
                Err(err) => {
                    error!(error = %err, "competency event observer failed");
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(reports),
        }
    }
}
