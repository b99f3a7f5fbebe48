//! Environment-specific install directory and port resolution.
//!
//! These are the only pieces of naming policy in the system: every lifecycle
//! operation goes through them before touching the filesystem.

use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Result, ServerError};
use crate::models::{Environment, PortPrefix};

/// Directory name used when no environment is selected
pub const DEFAULT_INSTALL_DIR: &str = "neo4j";

/// Resolve the install directory name for an optional environment.
///
/// ```rust
/// use neo4j_core::{models::Environment, resolver::resolve_install_directory};
///
/// assert_eq!(resolve_install_directory(Some(&Environment::Test)), "neo4j_test");
/// assert_eq!(resolve_install_directory(None), "neo4j");
/// ```
pub fn resolve_install_directory(env: Option<&Environment>) -> String {
    match env {
        Some(env) => {
            let install_dir = format!("{DEFAULT_INSTALL_DIR}_{env}");
            debug!(environment = %env, install_dir = %install_dir, "Environment selected");
            install_dir
        }
        None => {
            debug!(install_dir = DEFAULT_INSTALL_DIR, "No environment selected");
            DEFAULT_INSTALL_DIR.to_string()
        }
    }
}

/// Resolve the port prefix for an environment.
///
/// Only `development` (74) and `test` (75) have a prefix. Any other
/// environment is an error rather than a silent guess.
pub fn resolve_port_prefix(env: &Environment) -> Result<PortPrefix> {
    match env {
        Environment::Development => PortPrefix::new(74),
        Environment::Test => PortPrefix::new(75),
        Environment::Custom(name) => Err(ServerError::UnknownEnvironment(name.clone())),
    }
}

/// Replace every `port=74` in `config_file` with `port=<prefix>`.
///
/// Returns the number of replacements. The file is left untouched when
/// there is nothing to replace, so repeated runs are no-ops.
pub fn rewrite_port_prefix(prefix: PortPrefix, config_file: &Path) -> Result<usize> {
    let pattern = format!("port={}", PortPrefix::DEFAULT);
    let replacement = format!("port={prefix}");

    let contents =
        fs::read_to_string(config_file).map_err(|e| ServerError::io(config_file, e))?;

    let occurrences = contents.matches(&pattern).count();
    if occurrences == 0 || pattern == replacement {
        debug!(file = %config_file.display(), "No port prefix to replace");
        return Ok(0);
    }

    info!(
        file = %config_file.display(),
        prefix = %prefix,
        occurrences,
        "Replacing port prefix {} with {}",
        PortPrefix::DEFAULT,
        prefix
    );

    let rewritten = contents.replace(&pattern, &replacement);
    fs::write(config_file, rewritten).map_err(|e| ServerError::io(config_file, e))?;

    Ok(occurrences)
}
