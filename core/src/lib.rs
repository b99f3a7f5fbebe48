//! Neo4j Server Core Library
//!
//! This crate provides the domain types, naming policy and trait interfaces
//! for managing a local Neo4j server install. The platform implementations
//! in the `installer` crate and the `neo4j-tasks` binary build on the types
//! defined here.
//!
//! # Architecture
//!
//! - [`models`] - Environment, distribution, platform and install layout types
//! - [`resolver`] - Install directory and port prefix resolution
//! - [`error`] - Error types and result handling
//! - [`command`] - External command abstraction
//! - [`download`] - Archive download abstraction
//! - [`control`] - Lifecycle trait implemented per platform
//! - [`validation`] - Validation of names that end up in paths and URLs
//!
//! # Example
//!
//! ```rust
//! use neo4j_core::{
//!     models::Environment,
//!     resolver::{resolve_install_directory, resolve_port_prefix},
//! };
//!
//! let env: Environment = "test".parse().unwrap();
//! assert_eq!(resolve_install_directory(Some(&env)), "neo4j_test");
//! assert_eq!(resolve_port_prefix(&env).unwrap().value(), 75);
//! ```

pub mod command;
pub mod control;
pub mod download;
pub mod error;
pub mod models;
pub mod resolver;
pub mod validation;

// Re-export commonly used types at the crate root for convenience
pub use command::{CommandOutput, CommandRunner, CommandSpec};
pub use control::{InstallContext, ServerControl, DEFAULT_DOWNLOAD_URL};
pub use download::Downloader;
pub use error::{Result, ServerError};
pub use models::{
    Distribution, Environment, InstallLayout, LifecycleOutcome, PlatformKind, PortPrefix,
};
pub use resolver::{resolve_install_directory, resolve_port_prefix, rewrite_port_prefix};
pub use validation::EnvironmentValidator;

/// Current version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Current crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_crate_constants() {
        assert!(!VERSION.is_empty());
        assert_eq!(CRATE_NAME, "neo4j-core");
    }

    #[test]
    fn test_re_exports() {
        let env = Environment::Development;
        assert_eq!(format!("{env}"), "development");

        let error = ServerError::UnknownEnvironment("qa".to_string());
        assert_eq!(error.exit_code(), 1);
    }
}
