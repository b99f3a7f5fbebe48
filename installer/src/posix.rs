use async_trait::async_trait;
use neo4j_core::{
    command::{CommandRunner, CommandSpec},
    control::{InstallContext, ServerControl},
    download::Downloader,
    error::{Result, ServerError},
    models::{Distribution, InstallLayout, LifecycleOutcome, PlatformKind},
};
use std::fs;
use std::sync::Arc;
use tracing::info;

use crate::common;
use crate::extract::untar_command;

/// Server control for Linux, macOS and other POSIX systems.
///
/// Everything is driven through the distribution's `bin/neo4j` script.
pub struct PosixServer<R: CommandRunner, D: Downloader> {
    context: InstallContext,
    runner: Arc<R>,
    downloader: Arc<D>,
}

impl<R: CommandRunner, D: Downloader> PosixServer<R, D> {
    pub fn new(context: InstallContext, runner: Arc<R>, downloader: Arc<D>) -> Self {
        Self {
            context,
            runner,
            downloader,
        }
    }

    fn launcher(layout: &InstallLayout, action: &str) -> CommandSpec {
        CommandSpec::new(layout.unix_launcher()).arg(action)
    }

    async fn launch(&self, action: &str) -> Result<()> {
        let layout = self.context.layout();
        common::require_installed(&layout)?;
        self.runner
            .run_checked(&Self::launcher(&layout, action))
            .await?;
        Ok(())
    }

    async fn place_files(&self, distribution: &Distribution, layout: &InstallLayout) -> Result<()> {
        let base_dir = self.context.base_dir();
        let archive = base_dir.join(distribution.archive_name(PlatformKind::Posix));
        let url = distribution.download_url(&self.context.download_url, PlatformKind::Posix);

        self.downloader.download(&url, &archive).await?;
        self.runner
            .run_checked(&untar_command(&archive, base_dir))
            .await?;
        common::move_into_place(&base_dir.join(distribution.package_name()), layout)?;
        fs::remove_file(&archive).map_err(|e| ServerError::io(&archive, e))?;
        Ok(())
    }
}

#[async_trait]
impl<R: CommandRunner, D: Downloader> ServerControl for PosixServer<R, D> {
    fn platform(&self) -> PlatformKind {
        PlatformKind::Posix
    }

    fn context(&self) -> &InstallContext {
        &self.context
    }

    async fn install(&self, distribution: &Distribution) -> Result<LifecycleOutcome> {
        let prefix = common::port_prefix_for(&self.context)?;
        let layout = self.context.layout();
        common::ensure_base_dir(self.context.base_dir())?;

        if layout.exists() {
            info!(install_dir = %layout.root().display(), "Install directory exists, keeping files");
        } else {
            self.place_files(distribution, &layout).await?;
        }

        let replaced = common::configure_ports(&layout, prefix)?;
        info!(install_dir = %layout.root().display(), ports_rewritten = replaced, "Install finished");

        Ok(LifecycleOutcome::completed(format!(
            "Neo4j Installed in to {} directory.",
            self.context.install_dir_name()
        )))
    }

    async fn start(&self) -> Result<LifecycleOutcome> {
        self.launch("start").await?;
        Ok(LifecycleOutcome::completed("Neo4j started."))
    }

    async fn stop(&self) -> Result<LifecycleOutcome> {
        self.launch("stop").await?;
        Ok(LifecycleOutcome::completed("Neo4j stopped."))
    }

    async fn restart(&self) -> Result<LifecycleOutcome> {
        self.launch("restart").await?;
        Ok(LifecycleOutcome::completed("Neo4j restarted."))
    }

    async fn reset(&self) -> Result<LifecycleOutcome> {
        let layout = self.context.layout();
        common::require_installed(&layout)?;

        common::stop_for_reset(self.runner.as_ref(), &Self::launcher(&layout, "stop")).await;
        common::clear_data_dirs(&layout)?;
        self.runner
            .run_checked(&Self::launcher(&layout, "start"))
            .await?;

        Ok(LifecycleOutcome::completed(
            "Neo4j reset: database and logs cleared, server started.",
        ))
    }
}
