use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::Args;
use proficiency_report::config::AppConfig;
use proficiency_report::error::AppError;
use proficiency_report::scale_colors::{
    EventDispatcher, EventEnvelope, ReconcileReport, ScaleColorConfiguration,
    ScaleColorReconciler,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::infra::{load_events, Fixture, InMemoryCompetencyCatalog, InMemoryScaleColorStore};

#[derive(Args, Debug)]
pub(crate) struct ReplayArgs {
    /// JSON fixture with frameworks, competencies and configurations (defaults to APP_FIXTURE)
    #[arg(long)]
    pub(crate) fixture: Option<PathBuf>,
    /// JSON array of competency events to replay in order
    #[arg(long)]
    pub(crate) events: PathBuf,
    /// Report deletions without applying them (also enabled by APP_DRY_RUN)
    #[arg(long)]
    pub(crate) dry_run: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ShowArgs {
    /// JSON fixture to validate and print (defaults to APP_FIXTURE)
    #[arg(long)]
    pub(crate) fixture: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EventOutcome {
    pub(crate) event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) occurred_at: Option<DateTime<Utc>>,
    pub(crate) reports: Vec<ReconcileReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReplaySummary {
    pub(crate) dry_run: bool,
    pub(crate) outcomes: Vec<EventOutcome>,
    pub(crate) configurations: Vec<ScaleColorConfiguration>,
}

impl ReplaySummary {
    pub(crate) fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.error.is_some())
            .count()
    }
}

/// Play `events` against the fixture, the way the host would fire them one after another.
///
/// The catalog is updated before each dispatch so observers see the post-change state.
/// A failed event is recorded and the replay moves on to the next one.
pub(crate) fn replay(fixture: &Fixture, events: &[EventEnvelope], dry_run: bool) -> ReplaySummary {
    let catalog = Arc::new(InMemoryCompetencyCatalog::from_fixture(fixture));
    let store = Arc::new(InMemoryScaleColorStore::from_fixture(fixture));
    let reconciler =
        ScaleColorReconciler::new(catalog.clone(), store.clone()).with_dry_run(dry_run);
    let dispatcher = EventDispatcher::new().with_observer(Arc::new(reconciler));

    let mut outcomes = Vec::with_capacity(events.len());
    for envelope in events {
        catalog.apply(&envelope.event);
        let (reports, error) = match dispatcher.dispatch(envelope) {
            Ok(reports) => (reports, None),
            Err(err) => (Vec::new(), Some(err.to_string())),
        };
        outcomes.push(EventOutcome {
            event: envelope.event.name(),
            occurred_at: envelope.occurred_at,
            reports,
            error,
        });
    }

    ReplaySummary {
        dry_run,
        outcomes,
        configurations: store.rows(),
    }
}

fn resolve_fixture(explicit: Option<PathBuf>, config: &AppConfig) -> Result<PathBuf, AppError> {
    explicit
        .or_else(|| config.reconcile.fixture.clone())
        .ok_or_else(|| AppError::Usage("pass --fixture or set APP_FIXTURE".to_string()))
}

pub(crate) fn run_replay(args: ReplayArgs, config: &AppConfig) -> Result<(), AppError> {
    let fixture_path = resolve_fixture(args.fixture, config)?;
    let fixture = Fixture::load(&fixture_path)?;
    let events = load_events(&args.events)?;
    let dry_run = args.dry_run || config.reconcile.dry_run;

    info!(
        fixture = %fixture_path.display(),
        events = events.len(),
        dry_run,
        "replaying competency events"
    );
    let summary = replay(&fixture, &events, dry_run);
    if summary.failures() > 0 {
        warn!(failures = summary.failures(), "some events could not be handled");
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

pub(crate) fn run_show(args: ShowArgs, config: &AppConfig) -> Result<(), AppError> {
    let fixture_path = resolve_fixture(args.fixture, config)?;
    let fixture = Fixture::load(&fixture_path)?;
    println!("{}", serde_json::to_string_pretty(&fixture)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proficiency_report::scale_colors::{
        CompetencyEvent, FrameworkId, FrameworkSnapshot, ScaleId,
    };

    #[test]
    fn replay_records_failures_and_keeps_going() {
        let fixture: Fixture = serde_json::from_str(
            r##"{
                "frameworks": [{"id": 1, "scale_id": 1}],
                "configurations": [
                    {"competency_framework_id": 1, "scale_id": 1, "colors": {"1": "#f00"}},
                    {"competency_framework_id": 1, "scale_id": 3, "colors": {"1": "#0f0"}}
                ]
            }"##,
        )
        .expect("fixture parses");
        let events: Vec<EventEnvelope> = serde_json::from_str(
            r#"[
                {"event": "competency_updated", "competency": {"id": 4, "competency_framework_id": 9}},
                {"event": "competency_updated", "competency": {"id": 5, "competency_framework_id": 1}}
            ]"#,
        )
        .expect("events parse");

        let summary = replay(&fixture, &events, false);

        assert_eq!(summary.failures(), 1);
        assert!(summary.outcomes[0]
            .error
            .as_deref()
            .is_some_and(|message| message.contains("not found")));
        assert_eq!(summary.outcomes[1].reports[0].deleted, vec![ScaleId(3)]);
        assert_eq!(summary.configurations.len(), 1);
    }

    #[test]
    fn dry_run_leaves_configurations_in_place() {
        let fixture: Fixture = serde_json::from_str(
            r##"{
                "frameworks": [{"id": 1, "scale_id": 1}],
                "configurations": [
                    {"competency_framework_id": 1, "scale_id": 1, "colors": {"1": "#f00"}}
                ]
            }"##,
        )
        .expect("fixture parses");
        let events = vec![EventEnvelope::from(CompetencyEvent::FrameworkDeleted {
            framework: FrameworkSnapshot {
                id: FrameworkId(1),
                scale_id: ScaleId(1),
            },
        })];

        let summary = replay(&fixture, &events, true);

        assert!(summary.dry_run);
        assert_eq!(summary.outcomes[0].reports[0].deleted, vec![ScaleId(1)]);
        assert_eq!(summary.configurations.len(), 1);
    }
}
