pub mod config;
pub mod error;
pub mod interview;
pub mod telemetry;
