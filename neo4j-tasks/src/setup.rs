use anyhow::{Context, Result};
use installer::{create_server_control, HttpDownloader, SystemCommandRunner};
use neo4j_core::{InstallContext, PlatformKind, ServerControl};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Config;

/// Resolve the configured base directory against the working directory
pub fn resolve_base_dir(base_dir: &Path) -> Result<PathBuf> {
    if base_dir.is_absolute() {
        return Ok(base_dir.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    Ok(cwd.join(base_dir))
}

/// Build the install context operations run against
pub fn build_context(config: &Config) -> Result<InstallContext> {
    let environment = config
        .environment()
        .context("Invalid environment configuration")?;
    let base_dir = resolve_base_dir(&config.install.base_dir)?;

    let context = InstallContext::new(base_dir, environment)
        .with_download_url(config.install.download_url.clone());

    debug!(
        base_dir = %context.base_dir().display(),
        install_dir = %context.install_dir_name(),
        "Install context resolved"
    );
    Ok(context)
}

/// Create the server control for the current platform
pub fn create_control(config: &Config) -> Result<Box<dyn ServerControl>> {
    let context = build_context(config)?;
    let platform = PlatformKind::current();

    let runner = Arc::new(SystemCommandRunner::new());
    let downloader = Arc::new(HttpDownloader::new().context("Failed to create HTTP client")?);

    info!(platform = %platform, "Server control created");
    Ok(create_server_control(platform, context, runner, downloader))
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo4j_core::Environment;

    #[test]
    fn test_relative_base_dir_is_made_absolute() {
        let resolved = resolve_base_dir(Path::new("work")).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("work"));

        let absolute = std::env::temp_dir();
        assert_eq!(resolve_base_dir(&absolute).unwrap(), absolute);
    }

    #[test]
    fn test_build_context_from_config() {
        let mut config = Config::default();
        config.environment = Some("test".to_string());
        config.install.base_dir = std::env::temp_dir();
        config.install.download_url = "http://mirror.local".to_string();

        let context = build_context(&config).unwrap();
        assert_eq!(context.environment, Some(Environment::Test));
        assert_eq!(context.install_dir_name(), "neo4j_test");
        assert_eq!(context.download_url, "http://mirror.local");
    }

    #[test]
    fn test_build_context_rejects_bad_environment() {
        let mut config = Config::default();
        config.environment = Some("a/b".to_string());
        assert!(build_context(&config).is_err());
    }
}
