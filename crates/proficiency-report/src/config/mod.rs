use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub reconcile: ReconcileConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let fixture = env::var("APP_FIXTURE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let dry_run = match env::var("APP_DRY_RUN") {
            Ok(value) => parse_flag(&value).ok_or(ConfigError::InvalidDryRun { value })?,
            Err(_) => false,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            reconcile: ReconcileConfig { fixture, dry_run },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Settings for replaying competency events against a fixture.
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Fixture used when the command line does not name one.
    pub fixture: Option<PathBuf>,
    /// Report deletions without applying them.
    pub dry_run: bool,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidDryRun { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDryRun { value } => {
                write!(f, "APP_DRY_RUN must be a boolean flag, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_FIXTURE");
        env::remove_var("APP_DRY_RUN");
        env::remove_var("APP_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.reconcile.fixture, None);
        assert!(!config.reconcile.dry_run);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn reads_fixture_and_dry_run_flag() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "ci");
        env::set_var("APP_FIXTURE", "fixtures/state.json");
        env::set_var("APP_DRY_RUN", "Yes");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Test);
        assert_eq!(
            config.reconcile.fixture,
            Some(PathBuf::from("fixtures/state.json"))
        );
        assert!(config.reconcile.dry_run);
        reset_env();
    }

    #[test]
    fn rejects_unparseable_dry_run_flag() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_DRY_RUN", "maybe");
        match AppConfig::load() {
            Err(ConfigError::InvalidDryRun { value }) => assert_eq!(value, "maybe"),
            other => panic!("expected invalid dry run error, got {other:?}"),
        }
        reset_env();
    }
}
