pub mod api;
pub mod config;
pub mod counter;
pub mod telemetry;
pub mod visitor;
