use clap::Args;
use proficiency_report::error::AppError;
use proficiency_report::scale_colors::EventEnvelope;
use serde::Serialize;
use serde_json::json;

use crate::infra::Fixture;
use crate::replay::{replay, ReplaySummary};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Only print the summary line for each scenario
    #[arg(long)]
    pub(crate) brief: bool,
}

#[derive(Debug, Serialize)]
struct ScenarioResult {
    name: &'static str,
    summary: ReplaySummary,
}

struct Scenario {
    name: &'static str,
    fixture: serde_json::Value,
    events: serde_json::Value,
}

fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "competency override moves to a new scale",
            fixture: json!({
                "frameworks": [{"id": 1, "scale_id": 1}],
                "competencies": [{"id": 1, "competency_framework_id": 1, "scale_id": 2}],
                "configurations": [
                    {"competency_framework_id": 1, "scale_id": 1,
                     "colors": {"1": "#d9534f", "2": "#5cb85c"}},
                    {"competency_framework_id": 1, "scale_id": 2,
                     "colors": {"1": "#f0ad4e", "2": "#0275d8"}}
                ]
            }),
            events: json!([
                {"event": "competency_updated",
                 "competency": {"id": 1, "competency_framework_id": 1, "scale_id": 3}}
            ]),
        },
        Scenario {
            name: "framework deleted",
            fixture: json!({
                "frameworks": [{"id": 2, "scale_id": 1}],
                "configurations": [
                    {"competency_framework_id": 2, "scale_id": 1, "colors": {"1": "#d9534f"}},
                    {"competency_framework_id": 2, "scale_id": 4, "colors": {"1": "#5cb85c"}}
                ]
            }),
            events: json!([
                {"event": "framework_deleted", "framework": {"id": 2, "scale_id": 1},
                 "occurred_at": "2026-01-15T09:00:00Z"}
            ]),
        },
        Scenario {
            name: "framework switches scale",
            fixture: json!({
                "frameworks": [{"id": 3, "scale_id": 1}],
                "configurations": [
                    {"competency_framework_id": 3, "scale_id": 1, "colors": {"1": "#d9534f"}},
                    {"competency_framework_id": 3, "scale_id": 2, "colors": {"1": "#5cb85c"}}
                ]
            }),
            events: json!([
                {"event": "framework_updated", "framework": {"id": 3, "scale_id": 2}}
            ]),
        },
    ]
}

fn run_scenario(scenario: Scenario) -> Result<ScenarioResult, AppError> {
    let fixture: Fixture = serde_json::from_value(scenario.fixture)?;
    let events: Vec<EventEnvelope> = serde_json::from_value(scenario.events)?;
    Ok(ScenarioResult {
        name: scenario.name,
        summary: replay(&fixture, &events, false),
    })
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    for scenario in scenarios() {
        let result = run_scenario(scenario)?;
        if args.brief {
            let deleted: usize = result
                .summary
                .outcomes
                .iter()
                .flat_map(|outcome| &outcome.reports)
                .map(|report| report.deleted.len())
                .sum();
            println!(
                "{}: {} deleted, {} remaining",
                result.name,
                deleted,
                result.summary.configurations.len()
            );
        } else {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}
