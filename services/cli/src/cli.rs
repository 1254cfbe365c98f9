use crate::demo::{run_demo, DemoArgs};
use crate::replay::{run_replay, run_show, ReplayArgs, ShowArgs};
use clap::{Parser, Subcommand};
use proficiency_report::config::AppConfig;
use proficiency_report::error::AppError;
use proficiency_report::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "proficiency-report",
    about = "Keep competency report scale colors in step with framework changes",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay competency lifecycle events against a fixture and print the outcome
    Replay(ReplayArgs),
    /// Validate a fixture and print the configuration table it describes
    Show(ShowArgs),
    /// Run the built-in scenarios (default command)
    Demo(DemoArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, config.environment)?;
    debug!(?config.environment, "configuration loaded");

    let command = cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()));

    match command {
        Command::Replay(args) => run_replay(args, &config),
        Command::Show(args) => run_show(args, &config),
        Command::Demo(args) => run_demo(args),
    }
}
