pub mod config;
pub mod error;
pub mod estimate;
pub mod telemetry;
