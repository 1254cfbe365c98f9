use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use proficiency_report::error::AppError;
use proficiency_report::scale_colors::{
    Competency, CompetencyCatalog, CompetencyEvent, CompetencyId, EventEnvelope, Framework,
    FrameworkId, RepositoryError, ScaleColorConfiguration, ScaleColorStore, ScaleId,
};
use serde::{Deserialize, Serialize};

/// Snapshot of the host tables the CLI works against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Fixture {
    #[serde(default)]
    pub(crate) frameworks: Vec<Framework>,
    #[serde(default)]
    pub(crate) competencies: Vec<Competency>,
    #[serde(default)]
    pub(crate) configurations: Vec<ScaleColorConfiguration>,
}

impl Fixture {
    pub(crate) fn load(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

pub(crate) fn load_events(path: &Path) -> Result<Vec<EventEnvelope>, AppError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCompetencyCatalog {
    frameworks: Arc<Mutex<HashMap<FrameworkId, Framework>>>,
    competencies: Arc<Mutex<HashMap<CompetencyId, Competency>>>,
}

impl InMemoryCompetencyCatalog {
    pub(crate) fn from_fixture(fixture: &Fixture) -> Self {
        let catalog = Self::default();
        {
            let mut frameworks = catalog.frameworks.lock().expect("catalog mutex poisoned");
            for framework in &fixture.frameworks {
                frameworks.insert(framework.id, *framework);
            }
            let mut competencies = catalog.competencies.lock().expect("catalog mutex poisoned");
            for competency in &fixture.competencies {
                competencies.insert(competency.id, *competency);
            }
        }
        catalog
    }

    /// Mirror the change the competency subsystem made before firing `event`.
    pub(crate) fn apply(&self, event: &CompetencyEvent) {
        match event {
            CompetencyEvent::FrameworkUpdated { framework } => {
                self.frameworks
                    .lock()
                    .expect("catalog mutex poisoned")
                    .insert(
                        framework.id,
                        Framework {
                            id: framework.id,
                            scale_id: framework.scale_id,
                        },
                    );
            }
            CompetencyEvent::FrameworkDeleted { framework } => {
                self.frameworks
                    .lock()
                    .expect("catalog mutex poisoned")
                    .remove(&framework.id);
                self.competencies
                    .lock()
                    .expect("catalog mutex poisoned")
                    .retain(|_, competency| competency.competency_framework_id != framework.id);
            }
            CompetencyEvent::CompetencyUpdated { competency } => {
                self.competencies
                    .lock()
                    .expect("catalog mutex poisoned")
                    .insert(
                        competency.id,
                        Competency {
                            id: competency.id,
                            competency_framework_id: competency.competency_framework_id,
                            scale_id: competency.scale_id,
                        },
                    );
            }
        }
    }
}

impl CompetencyCatalog for InMemoryCompetencyCatalog {
    fn lookup_framework(&self, id: FrameworkId) -> Result<Framework, RepositoryError> {
        let guard = self.frameworks.lock().expect("catalog mutex poisoned");
        guard.get(&id).copied().ok_or(RepositoryError::NotFound)
    }

    fn list_competencies(&self, id: FrameworkId) -> Result<Vec<Competency>, RepositoryError> {
        let guard = self.competencies.lock().expect("catalog mutex poisoned");
        let mut competencies: Vec<Competency> = guard
            .values()
            .filter(|competency| competency.competency_framework_id == id)
            .copied()
            .collect();
        competencies.sort_by_key(|competency| competency.id);
        Ok(competencies)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryScaleColorStore {
    rows: Arc<Mutex<BTreeMap<(FrameworkId, ScaleId), ScaleColorConfiguration>>>,
}

impl InMemoryScaleColorStore {
    pub(crate) fn from_fixture(fixture: &Fixture) -> Self {
        let store = Self::default();
        {
            let mut rows = store.rows.lock().expect("store mutex poisoned");
            for configuration in &fixture.configurations {
                rows.insert(configuration.key(), configuration.clone());
            }
        }
        store
    }

    pub(crate) fn rows(&self) -> Vec<ScaleColorConfiguration> {
        self.rows
            .lock()
            .expect("store mutex poisoned")
            .values()
            .cloned()
            .collect()
    }
}

impl ScaleColorStore for InMemoryScaleColorStore {
    fn list_for_framework(
        &self,
        id: FrameworkId,
    ) -> Result<Vec<ScaleColorConfiguration>, RepositoryError> {
        let guard = self.rows.lock().expect("store mutex poisoned");
        Ok(guard
            .values()
            .filter(|row| row.competency_framework_id == id)
            .cloned()
            .collect())
    }

    fn fetch(
        &self,
        id: FrameworkId,
        scale_id: ScaleId,
    ) -> Result<Option<ScaleColorConfiguration>, RepositoryError> {
        let guard = self.rows.lock().expect("store mutex poisoned");
        Ok(guard.get(&(id, scale_id)).cloned())
    }

    fn save(&self, configuration: ScaleColorConfiguration) -> Result<(), RepositoryError> {
        let mut guard = self.rows.lock().expect("store mutex poisoned");
        guard.insert(configuration.key(), configuration);
        Ok(())
    }

    fn delete(&self, id: FrameworkId, scale_id: Option<ScaleId>) -> Result<usize, RepositoryError> {
        let mut guard = self.rows.lock().expect("store mutex poisoned");
        let before = guard.len();
        match scale_id {
            Some(scale_id) => {
                guard.remove(&(id, scale_id));
            }
            None => guard.retain(|(framework_id, _), _| *framework_id != id),
        }
        Ok(before - guard.len())
    }
}
