use neo4j_core::{
    command::{CommandRunner, CommandSpec},
    control::InstallContext,
    error::{Result, ServerError},
    models::{InstallLayout, PortPrefix},
    resolver::{resolve_port_prefix, rewrite_port_prefix},
};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Resolve the port prefix before any side effects happen
pub fn port_prefix_for(context: &InstallContext) -> Result<Option<PortPrefix>> {
    context.environment.as_ref().map(resolve_port_prefix).transpose()
}

/// Fail unless the install directory is present
pub fn require_installed(layout: &InstallLayout) -> Result<()> {
    if layout.exists() {
        Ok(())
    } else {
        Err(ServerError::NotInstalled(layout.root().display().to_string()))
    }
}

pub fn ensure_base_dir(base_dir: &Path) -> Result<()> {
    fs::create_dir_all(base_dir).map_err(|e| ServerError::io(base_dir, e))
}

/// Rename the freshly extracted package directory to the install directory
pub fn move_into_place(extracted: &Path, layout: &InstallLayout) -> Result<()> {
    info!(
        from = %extracted.display(),
        to = %layout.root().display(),
        "Moving distribution into install directory"
    );
    fs::rename(extracted, layout.root()).map_err(|e| ServerError::io(extracted, e))
}

/// Rewrite the server config for the environment's ports, if one is selected
pub fn configure_ports(layout: &InstallLayout, prefix: Option<PortPrefix>) -> Result<usize> {
    match prefix {
        Some(prefix) => rewrite_port_prefix(prefix, &layout.server_config()),
        None => Ok(0),
    }
}

/// Delete and recreate a directory so it exists and is empty
pub fn recreate_dir(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path).map_err(|e| ServerError::io(path, e))?;
    }
    fs::create_dir_all(path).map_err(|e| ServerError::io(path, e))
}

/// Clear the database store, then the logs
pub fn clear_data_dirs(layout: &InstallLayout) -> Result<()> {
    info!(install_dir = %layout.root().display(), "Resetting database and logs");
    recreate_dir(&layout.database_dir())?;
    recreate_dir(&layout.log_dir())
}

/// Stop step of a reset: failures are logged, never fatal.
///
/// A server that is not running refuses to stop, which must not prevent
/// its data from being cleared.
pub async fn stop_for_reset<R: CommandRunner + ?Sized>(runner: &R, spec: &CommandSpec) {
    match runner.run_checked(spec).await {
        Ok(_) => info!(command = %spec.display(), "Server stopped"),
        Err(e) => warn!(command = %spec.display(), error = %e, "Stop failed, continuing with reset"),
    }
}
