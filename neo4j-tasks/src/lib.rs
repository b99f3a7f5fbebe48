//! neo4j-tasks Library
//!
//! Configuration, logging setup and subcommand dispatch for the `neo4j-tasks`
//! binary. The lifecycle itself lives in the `installer` crate.

pub mod commands;
pub mod config;
pub mod setup;
pub mod telemetry;

pub use commands::{describe, dispatch, LifecycleCommand};
pub use config::Config;
pub use setup::{build_context, create_control};
pub use telemetry::init_telemetry;
