//! Subcommand dispatch onto [`ServerControl`].

use neo4j_core::{
    resolve_port_prefix, Distribution, InstallContext, LifecycleOutcome, PlatformKind, Result,
    ServerControl, ServerError,
};
use tracing::{info, Instrument};

use crate::lifecycle_span;

/// One lifecycle operation requested on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleCommand {
    Install(Distribution),
    Start,
    Stop,
    Restart,
    Reset,
}

impl LifecycleCommand {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleCommand::Install(_) => "install",
            LifecycleCommand::Start => "start",
            LifecycleCommand::Stop => "stop",
            LifecycleCommand::Restart => "restart",
            LifecycleCommand::Reset => "reset",
        }
    }

    /// Progress line printed before the operation runs
    pub fn announcement(&self, context: &InstallContext) -> String {
        match self {
            LifecycleCommand::Install(distribution) => match &context.environment {
                Some(env) => format!("Installing {distribution} with environment {env}"),
                None => format!("Installing {distribution} without environment"),
            },
            LifecycleCommand::Start => "Starting Neo4j...".to_string(),
            LifecycleCommand::Stop => "Stopping Neo4j...".to_string(),
            LifecycleCommand::Restart => "Restarting Neo4j...".to_string(),
            LifecycleCommand::Reset => "Resetting Neo4j...".to_string(),
        }
    }

    /// Hint printed after a completed operation, if any
    pub fn follow_up(&self, context: &InstallContext, outcome: &LifecycleOutcome) -> Option<String> {
        match (self, outcome) {
            (LifecycleCommand::Install(_), LifecycleOutcome::Completed { .. }) => {
                Some(match &context.environment {
                    Some(env) => format!("Type 'neo4j-tasks --env {env} start' to start it"),
                    None => "Type 'neo4j-tasks start' to start it".to_string(),
                })
            }
            _ => None,
        }
    }
}

/// Run `command` against `control`
pub async fn dispatch(
    control: &dyn ServerControl,
    command: &LifecycleCommand,
) -> Result<LifecycleOutcome> {
    let install_dir = control.context().install_dir_name();
    let span = lifecycle_span!(command.name(), install_dir = install_dir.as_str());

    async {
        let outcome = match command {
            LifecycleCommand::Install(distribution) => control.install(distribution).await?,
            LifecycleCommand::Start => control.start().await?,
            LifecycleCommand::Stop => control.stop().await?,
            LifecycleCommand::Restart => control.restart().await?,
            LifecycleCommand::Reset => control.reset().await?,
        };
        info!(skipped = outcome.is_skipped(), "Operation finished");
        Ok::<_, ServerError>(outcome)
    }
    .instrument(span)
    .await
}

/// Lines printed by the `info` subcommand
pub fn describe(context: &InstallContext, platform: PlatformKind) -> Vec<String> {
    let layout = context.layout();

    let environment = context
        .environment
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "(none)".to_string());

    let port_prefix = match &context.environment {
        Some(env) => match resolve_port_prefix(env) {
            Ok(prefix) => prefix.to_string(),
            Err(e) => format!("unavailable ({e})"),
        },
        None => "unchanged (no environment)".to_string(),
    };

    vec![
        format!("Environment:       {environment}"),
        format!("Install directory: {}", layout.root().display()),
        format!("Port prefix:       {port_prefix}"),
        format!("Platform:          {platform}"),
        format!("Installed:         {}", if layout.exists() { "yes" } else { "no" }),
    ]
}
