use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::scale_colors::domain::{
    Competency, CompetencyId, Framework, FrameworkId, ScaleColor, ScaleColorConfiguration,
    ScaleId, ScaleValueId,
};
use crate::scale_colors::repository::{CompetencyCatalog, RepositoryError, ScaleColorStore};

#[derive(Default)]
pub(super) struct MemoryCatalog {
    frameworks: Mutex<HashMap<FrameworkId, Framework>>,
    competencies: Mutex<Vec<Competency>>,
}

impl MemoryCatalog {
    pub(super) fn with_framework(self, id: i64, scale_id: i64) -> Self {
        self.put_framework(id, scale_id);
        self
    }

    pub(super) fn with_competency(self, id: i64, framework_id: i64, scale_id: Option<i64>) -> Self {
        self.put_competency(id, framework_id, scale_id);
        self
    }

    pub(super) fn put_framework(&self, id: i64, scale_id: i64) {
        let framework = Framework {
            id: FrameworkId(id),
            scale_id: ScaleId(scale_id),
        };
        self.frameworks
            .lock()
            .expect("catalog mutex poisoned")
            .insert(framework.id, framework);
    }

    pub(super) fn put_competency(&self, id: i64, framework_id: i64, scale_id: Option<i64>) {
        let competency = Competency {
            id: CompetencyId(id),
            competency_framework_id: FrameworkId(framework_id),
            scale_id: scale_id.map(ScaleId),
        };
        let mut guard = self.competencies.lock().expect("catalog mutex poisoned");
        guard.retain(|existing| existing.id != competency.id);
        guard.push(competency);
    }

    pub(super) fn remove_framework(&self, id: i64) {
        self.frameworks
            .lock()
            .expect("catalog mutex poisoned")
            .remove(&FrameworkId(id));
        self.competencies
            .lock()
            .expect("catalog mutex poisoned")
            .retain(|competency| competency.competency_framework_id != FrameworkId(id));
    }
}

impl CompetencyCatalog for MemoryCatalog {
    fn lookup_framework(&self, id: FrameworkId) -> Result<Framework, RepositoryError> {
        self.frameworks
            .lock()
            .expect("catalog mutex poisoned")
            .get(&id)
            .copied()
            .ok_or(RepositoryError::NotFound)
    }

    fn list_competencies(&self, id: FrameworkId) -> Result<Vec<Competency>, RepositoryError> {
        Ok(self
            .competencies
            .lock()
            .expect("catalog mutex poisoned")
            .iter()
            .filter(|competency| competency.competency_framework_id == id)
            .copied()
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryStore {
    rows: Mutex<BTreeMap<(FrameworkId, ScaleId), ScaleColorConfiguration>>,
    failing_deletes: Mutex<HashSet<ScaleId>>,
    deletes: Mutex<Vec<(FrameworkId, Option<ScaleId>)>>,
}

impl MemoryStore {
    pub(super) fn with_row(self, framework_id: i64, scale_id: i64) -> Self {
        self.save(configuration(framework_id, scale_id))
            .expect("memory save succeeds");
        self
    }

    pub(super) fn fail_delete_of(&self, scale_id: i64) {
        self.failing_deletes
            .lock()
            .expect("store mutex poisoned")
            .insert(ScaleId(scale_id));
    }

    pub(super) fn keys(&self) -> Vec<(i64, i64)> {
        self.rows
            .lock()
            .expect("store mutex poisoned")
            .keys()
            .map(|(framework_id, scale_id)| (framework_id.0, scale_id.0))
            .collect()
    }

    pub(super) fn delete_calls(&self) -> Vec<(FrameworkId, Option<ScaleId>)> {
        self.deletes.lock().expect("store mutex poisoned").clone()
    }
}

impl ScaleColorStore for MemoryStore {
    fn list_for_framework(
        &self,
        id: FrameworkId,
    ) -> Result<Vec<ScaleColorConfiguration>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("store mutex poisoned")
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
        Ok(self
            .rows
            .lock()
            .expect("store mutex poisoned")
            .get(&(id, scale_id))
            .cloned())
    }

    fn save(&self, configuration: ScaleColorConfiguration) -> Result<(), RepositoryError> {
        self.rows
            .lock()
            .expect("store mutex poisoned")
            .insert(configuration.key(), configuration);
        Ok(())
    }

    fn delete(&self, id: FrameworkId, scale_id: Option<ScaleId>) -> Result<usize, RepositoryError> {
        self.deletes
            .lock()
            .expect("store mutex poisoned")
            .push((id, scale_id));

        if let Some(scale_id) = scale_id {
            if self
                .failing_deletes
                .lock()
                .expect("store mutex poisoned")
                .contains(&scale_id)
            {
                return Err(RepositoryError::Unavailable(format!(
                    "delete of scale {scale_id} rejected"
                )));
            }
        }

        let mut guard = self.rows.lock().expect("store mutex poisoned");
        let before = guard.len();
        guard.retain(|(framework_id, row_scale), _| {
            *framework_id != id || scale_id.is_some_and(|scale_id| *row_scale != scale_id)
        });
        Ok(before - guard.len())
    }
}

pub(super) fn configuration(framework_id: i64, scale_id: i64) -> ScaleColorConfiguration {
    ScaleColorConfiguration {
        competency_framework_id: FrameworkId(framework_id),
        scale_id: ScaleId(scale_id),
        colors: palette(),
    }
}

pub(super) fn palette() -> BTreeMap<ScaleValueId, ScaleColor> {
    let mut colors = BTreeMap::new();
    colors.insert(ScaleValueId(1), "#d9534f".parse().expect("valid color"));
    colors.insert(ScaleValueId(2), "#5cb85c".parse().expect("valid color"));
    colors
}

pub(super) fn stores(
    catalog: MemoryCatalog,
    store: MemoryStore,
) -> (Arc<MemoryCatalog>, Arc<MemoryStore>) {
    (Arc::new(catalog), Arc::new(store))
}
