pub mod config;
pub mod error;
pub mod remote;
pub mod search;
pub mod session;
pub mod telemetry;
