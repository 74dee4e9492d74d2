//! Tooth-tone impression diagnosis: a configurable scoring engine plus the configuration,
//! telemetry, and error plumbing shared by its command-line front end.

pub mod config;
pub mod diagnosis;
pub mod error;
pub mod telemetry;
