use async_trait::async_trait;
use neo4j_core::{
    command::{CommandRunner, CommandSpec},
    control::{InstallContext, ServerControl},
    download::Downloader,
    error::{Result, ServerError},
    models::{Distribution, InstallLayout, LifecycleOutcome, PlatformKind},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::common;
use crate::extract::extract_zip;

/// Archive name the Windows distribution is cached under
pub const WINDOWS_ARCHIVE: &str = "neo4j.zip";

/// Registry key only readable by elevated processes
const ELEVATION_PROBE_KEY: &str = r"HKU\S-1-5-19";

/// Notice shown before the server is run in the foreground
pub const DIRECT_START_NOTICE: &str = "Starting Neo4j directly, not as a service.";

/// Receives operator-facing lines that must appear before a blocking step
pub type ProgressSink = Arc<dyn Fn(&str) + Send + Sync>;

fn print_progress(line: &str) {
    println!("{line}");
}

/// Server control for Windows.
///
/// Service operations need administrative rights. Without them, `start`
/// runs the server in the foreground and every other service action is
/// skipped with a notice.
pub struct WindowsServer<R: CommandRunner, D: Downloader> {
    context: InstallContext,
    runner: Arc<R>,
    downloader: Arc<D>,
    progress: ProgressSink,
}

impl<R: CommandRunner, D: Downloader> WindowsServer<R, D> {
    pub fn new(context: InstallContext, runner: Arc<R>, downloader: Arc<D>) -> Self {
        Self {
            context,
            runner,
            downloader,
            progress: Arc::new(print_progress),
        }
    }

    /// Send progress lines to `sink` instead of stdout
    pub fn with_progress(mut self, sink: ProgressSink) -> Self {
        self.progress = sink;
        self
    }

    /// `reg query HKU\S-1-5-19` prints the key only when elevated
    pub fn elevation_probe() -> CommandSpec {
        CommandSpec::new("reg").args(["query", ELEVATION_PROBE_KEY])
    }

    /// Whether the current process has administrative rights.
    ///
    /// A probe that cannot run counts as "not elevated".
    pub async fn is_elevated(&self) -> bool {
        match self.runner.run(&Self::elevation_probe()).await {
            Ok(output) => {
                let elevated = output.is_success() && !output.stdout.trim().is_empty();
                debug!(elevated, "Privilege probe finished");
                elevated
            }
            Err(e) => {
                debug!(error = %e, "Privilege probe could not run");
                false
            }
        }
    }

    fn service(layout: &InstallLayout, action: &str) -> CommandSpec {
        CommandSpec::new(layout.windows_launcher()).arg(action)
    }

    fn archive_path(&self) -> PathBuf {
        self.context.base_dir().join(WINDOWS_ARCHIVE)
    }

    fn denied(action: &str) -> LifecycleOutcome {
        let err = ServerError::PrivilegeDenied(action.to_string());
        warn!(error = %err, "Skipping service action");
        LifecycleOutcome::skipped(format!(
            "You do not have administrative rights to {action} the Neo4j Service"
        ))
    }

    async fn place_files(&self, distribution: &Distribution, layout: &InstallLayout) -> Result<()> {
        let archive = self.archive_path();
        if archive.exists() {
            info!(archive = %archive.display(), "Using previously downloaded archive");
        } else {
            let url = distribution.download_url(&self.context.download_url, PlatformKind::Windows);
            self.downloader.download(&url, &archive).await?;
        }

        if layout.exists() {
            info!(install_dir = %layout.root().display(), "Install directory exists, skipping extraction");
            return Ok(());
        }

        let report = extract_zip(&archive, self.context.base_dir())?;
        if !report.is_complete() {
            warn!(
                failed = report.failed.len(),
                entries = ?report.failed,
                "Some archive entries failed to extract"
            );
        }
        common::move_into_place(&self.context.base_dir().join(distribution.package_name()), layout)
    }

    async fn service_action(&self, action: &str, summary: &str) -> Result<LifecycleOutcome> {
        let layout = self.context.layout();
        common::require_installed(&layout)?;

        if !self.is_elevated().await {
            return Ok(Self::denied(action));
        }

        self.runner.run_checked(&Self::service(&layout, action)).await?;
        Ok(LifecycleOutcome::completed(summary))
    }
}

#[async_trait]
impl<R: CommandRunner, D: Downloader> ServerControl for WindowsServer<R, D> {
    fn platform(&self) -> PlatformKind {
        PlatformKind::Windows
    }

    fn context(&self) -> &InstallContext {
        &self.context
    }

    async fn install(&self, distribution: &Distribution) -> Result<LifecycleOutcome> {
        let prefix = common::port_prefix_for(&self.context)?;
        let layout = self.context.layout();
        common::ensure_base_dir(self.context.base_dir())?;

        self.place_files(distribution, &layout).await?;

        let mut summary = format!(
            "Neo4j Installed in to {} directory.",
            self.context.install_dir_name()
        );
        if self.is_elevated().await {
            self.runner
                .run_checked(&CommandSpec::new(layout.unix_launcher()).arg("install"))
                .await?;
            summary.push_str(" Neo4j Installed as a service.");
        }

        let replaced = common::configure_ports(&layout, prefix)?;
        info!(install_dir = %layout.root().display(), ports_rewritten = replaced, "Install finished");

        Ok(LifecycleOutcome::completed(summary))
    }

    async fn start(&self) -> Result<LifecycleOutcome> {
        let layout = self.context.layout();
        common::require_installed(&layout)?;

        if self.is_elevated().await {
            self.runner.run_checked(&Self::service(&layout, "start")).await?;
            return Ok(LifecycleOutcome::completed("Neo4j service started."));
        }

        // The launcher blocks until the server exits
        (self.progress)(DIRECT_START_NOTICE);
        self.runner
            .run_checked(&CommandSpec::new(layout.windows_launcher()))
            .await?;
        Ok(LifecycleOutcome::completed(
            "Started Neo4j directly, not as a service.",
        ))
    }

    async fn stop(&self) -> Result<LifecycleOutcome> {
        self.service_action("stop", "Neo4j service stopped.").await
    }

    async fn restart(&self) -> Result<LifecycleOutcome> {
        self.service_action("restart", "Neo4j service restarted.").await
    }

    async fn reset(&self) -> Result<LifecycleOutcome> {
        let layout = self.context.layout();
        common::require_installed(&layout)?;

        if !self.is_elevated().await {
            return Ok(Self::denied("reset"));
        }

        common::stop_for_reset(self.runner.as_ref(), &Self::service(&layout, "stop")).await;
        common::clear_data_dirs(&layout)?;
        self.runner.run_checked(&Self::service(&layout, "start")).await?;

        Ok(LifecycleOutcome::completed(
            "Neo4j reset: database and logs cleared, service started.",
        ))
    }
}
