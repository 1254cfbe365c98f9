//! Scale color configuration upkeep for competency proficiency reports.
//!
//! Administrators pick a display color for each value of a rating scale, per competency
//! framework. Those rows must follow the framework's structure: once a scale is no longer
//! used by the framework or any of its competencies, its colors are dropped.

pub mod domain;
pub mod events;
pub mod reconciler;
pub mod repository;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    reachable_scales, ColorError, Competency, CompetencyId, Framework, FrameworkId, ScaleColor,
    ScaleColorConfiguration, ScaleId, ScaleValueId,
};
pub use events::{
    CompetencyEvent, CompetencyEventObserver, CompetencySnapshot, EventDispatcher, EventEnvelope,
    FrameworkSnapshot,
};
pub use reconciler::{ReconcileError, ReconcileReport, ScaleColorReconciler};
pub use repository::{CompetencyCatalog, RepositoryError, ScaleColorStore};
pub use service::{ScaleColorService, ScaleColorServiceError};
