use super::domain::{Competency, Framework, FrameworkId, ScaleColorConfiguration, ScaleId};

/// Read access to the competency subsystem's frameworks and competencies.
pub trait CompetencyCatalog: Send + Sync {
    /// Fails with [`RepositoryError::NotFound`] when the framework does not exist.
    fn lookup_framework(&self, id: FrameworkId) -> Result<Framework, RepositoryError>;
    fn list_competencies(&self, id: FrameworkId) -> Result<Vec<Competency>, RepositoryError>;
}

/// Storage abstraction for the scale-color table so the reconciler can be exercised in isolation.
pub trait ScaleColorStore: Send + Sync {
    fn list_for_framework(
        &self,
        id: FrameworkId,
    ) -> Result<Vec<ScaleColorConfiguration>, RepositoryError>;
    fn fetch(
        &self,
        id: FrameworkId,
        scale_id: ScaleId,
    ) -> Result<Option<ScaleColorConfiguration>, RepositoryError>;
    /// Insert or replace the row keyed by `(framework, scale)`.
    fn save(&self, configuration: ScaleColorConfiguration) -> Result<(), RepositoryError>;
    /// Delete one row when `scale_id` is given, otherwise every row of the framework.
    /// Returns the number of rows removed.
    fn delete(&self, id: FrameworkId, scale_id: Option<ScaleId>) -> Result<usize, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
