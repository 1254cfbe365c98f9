use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use super::domain::{
    reachable_scales, FrameworkId, ScaleColor, ScaleColorConfiguration, ScaleId, ScaleValueId,
};
use super::repository::{CompetencyCatalog, RepositoryError, ScaleColorStore};

/// Data-level operations behind the administrator's scale color settings.
pub struct ScaleColorService<C, S> {
    catalog: Arc<C>,
    store: Arc<S>,
}

impl<C, S> ScaleColorService<C, S>
where
    C: CompetencyCatalog + 'static,
    S: ScaleColorStore + 'static,
{
    pub fn new(catalog: Arc<C>, store: Arc<S>) -> Self {
        Self { catalog, store }
    }

    /// Store the colors for one scale of a framework, replacing any earlier mapping.
    pub fn configure(
        &self,
        framework_id: FrameworkId,
        scale_id: ScaleId,
        colors: BTreeMap<ScaleValueId, ScaleColor>,
    ) -> Result<ScaleColorConfiguration, ScaleColorServiceError> {
        if colors.is_empty() {
            return Err(ScaleColorServiceError::EmptyConfiguration);
        }

        let framework = self
            .catalog
            .lookup_framework(framework_id)
            .map_err(|err| not_found_or(err, framework_id))?;
        let competencies = self.catalog.list_competencies(framework_id)?;

        if !reachable_scales(&framework, &competencies).contains(&scale_id) {
            return Err(ScaleColorServiceError::UnreachableScale {
                framework_id,
                scale_id,
            });
        }

        let configuration = ScaleColorConfiguration {
            competency_framework_id: framework_id,
            scale_id,
            colors,
        };
        self.store.save(configuration.clone())?;
        info!(%framework_id, %scale_id, values = configuration.colors.len(), "saved scale colors");

        Ok(configuration)
    }

    pub fn configuration(
        &self,
        framework_id: FrameworkId,
        scale_id: ScaleId,
    ) -> Result<ScaleColorConfiguration, ScaleColorServiceError> {
        self.store
            .fetch(framework_id, scale_id)?
            .ok_or(ScaleColorServiceError::NotConfigured {
                framework_id,
                scale_id,
            })
    }

    /// Color to paint a rating value with, if the administrator picked one.
    pub fn color_for(
        &self,
        framework_id: FrameworkId,
        scale_id: ScaleId,
        value: ScaleValueId,
    ) -> Result<Option<ScaleColor>, ScaleColorServiceError> {
        let configuration = self.store.fetch(framework_id, scale_id)?;
        Ok(configuration.and_then(|configuration| configuration.color_for(value).cloned()))
    }
}

fn not_found_or(err: RepositoryError, framework_id: FrameworkId) -> ScaleColorServiceError {
    match err {
        RepositoryError::NotFound => ScaleColorServiceError::FrameworkNotFound(framework_id),
        other => ScaleColorServiceError::Repository(other),
    }
}

/// Error raised by the scale color service.
#[derive(Debug, thiserror::Error)]
pub enum ScaleColorServiceError {
    #[error("a scale color configuration needs at least one value")]
    EmptyConfiguration,
    #[error("competency framework {0} not found")]
    FrameworkNotFound(FrameworkId),
    #[error("scale {scale_id} is not used by competency framework {framework_id}")]
    UnreachableScale {
        framework_id: FrameworkId,
        scale_id: ScaleId,
    },
    #[error("no colors configured for scale {scale_id} of competency framework {framework_id}")]
    NotConfigured {
        framework_id: FrameworkId,
        scale_id: ScaleId,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
