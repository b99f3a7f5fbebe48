//! Platform implementations of the Neo4j server lifecycle
//!
//! This crate provides the POSIX and Windows implementations of the
//! [`ServerControl`] trait, together with the system command runner, the
//! HTTP downloader and archive extraction they are built from.
//!
//! # Usage
//!
//! ```rust,no_run
//! use installer::{create_server_control, HttpDownloader, SystemCommandRunner};
//! use neo4j_core::{Environment, InstallContext, PlatformKind};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = InstallContext::new(".", Some(Environment::Test));
//!     let control = create_server_control(
//!         PlatformKind::current(),
//!         context,
//!         Arc::new(SystemCommandRunner::new()),
//!         Arc::new(HttpDownloader::new()?),
//!     );
//!
//!     let outcome = control.start().await?;
//!     println!("{}", outcome.message());
//!     Ok(())
//! }
//! ```

mod common;
pub mod download;
pub mod extract;
mod posix;
mod process;
mod windows;

pub use download::HttpDownloader;
pub use extract::{extract_zip, ExtractionReport};
pub use posix::PosixServer;
pub use process::SystemCommandRunner;
pub use windows::{ProgressSink, WindowsServer, DIRECT_START_NOTICE, WINDOWS_ARCHIVE};

// Re-export commonly used types from neo4j-core for convenience
pub use neo4j_core::{
    command::{CommandOutput, CommandRunner, CommandSpec},
    control::{InstallContext, ServerControl},
    download::Downloader,
    error::{Result, ServerError},
    models::{Distribution, Environment, InstallLayout, LifecycleOutcome, PlatformKind},
};

/// Build the lifecycle implementation for `platform`
pub fn create_server_control<R, D>(
    platform: PlatformKind,
    context: InstallContext,
    runner: std::sync::Arc<R>,
    downloader: std::sync::Arc<D>,
) -> Box<dyn ServerControl>
where
    R: CommandRunner + 'static,
    D: Downloader + 'static,
{
    match platform {
        PlatformKind::Posix => Box::new(PosixServer::new(context, runner, downloader)),
        PlatformKind::Windows => Box::new(WindowsServer::new(context, runner, downloader)),
    }
}
