use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::{Distribution, Environment, InstallLayout, LifecycleOutcome, PlatformKind};
use crate::resolver::resolve_install_directory;

/// Default host serving distribution archives
pub const DEFAULT_DOWNLOAD_URL: &str = "http://dist.neo4j.org";

/// Everything an operation needs to know about where the server lives.
///
/// The environment is carried explicitly instead of being read from the
/// process environment at each call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallContext {
    /// Directory under which install directories and archives are placed
    pub base_dir: PathBuf,
    /// Selected environment, if any
    pub environment: Option<Environment>,
    /// Base URL the distribution archive is downloaded from
    pub download_url: String,
}

impl InstallContext {
    pub fn new(base_dir: impl Into<PathBuf>, environment: Option<Environment>) -> Self {
        Self {
            base_dir: base_dir.into(),
            environment,
            download_url: DEFAULT_DOWNLOAD_URL.to_string(),
        }
    }

    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = url.into();
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Install directory name, e.g. `neo4j_test`
    pub fn install_dir_name(&self) -> String {
        resolve_install_directory(self.environment.as_ref())
    }

    /// Paths inside the resolved install directory
    pub fn layout(&self) -> InstallLayout {
        InstallLayout::new(self.base_dir.join(self.install_dir_name()))
    }
}

/// Lifecycle operations on a local server install.
///
/// There is one implementation per [`PlatformKind`]. Operations either
/// complete, return [`LifecycleOutcome::Skipped`] when the platform refuses
/// the action for a non-fatal reason (missing administrative rights), or fail.
#[async_trait]
pub trait ServerControl: Send + Sync {
    /// Platform this implementation drives
    fn platform(&self) -> PlatformKind;

    /// Context the operations run against
    fn context(&self) -> &InstallContext;

    /// Download, extract and configure a distribution
    ///
    /// # Returns
    /// * `Ok(LifecycleOutcome::Completed)` - Files are in place and configured
    /// * `Err(ServerError::UnknownEnvironment)` - No port prefix for the environment; nothing was changed
    /// * `Err(ServerError::Download)` - The archive could not be fetched
    /// * `Err(ServerError::CommandFailed)` - Extraction or another step failed
    async fn install(&self, distribution: &Distribution) -> Result<LifecycleOutcome>;

    /// Start the server
    async fn start(&self) -> Result<LifecycleOutcome>;

    /// Stop the server
    async fn stop(&self) -> Result<LifecycleOutcome>;

    /// Restart the server
    async fn restart(&self) -> Result<LifecycleOutcome>;

    /// Stop the server, clear database and log directories, start it again
    async fn reset(&self) -> Result<LifecycleOutcome>;
}
