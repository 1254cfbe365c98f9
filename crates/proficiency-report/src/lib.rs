pub mod config;
pub mod error;
pub mod scale_colors;
pub mod telemetry;
