use async_trait::async_trait;
use neo4j_core::{
    command::{CommandOutput, CommandRunner, CommandSpec},
    error::{Result, ServerError},
};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Runs commands as child processes of the current process
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        let mut command = Command::new(&spec.program);
        command.args(&spec.args).stdin(Stdio::null());
        if let Some(dir) = &spec.current_dir {
            command.current_dir(dir);
        }

        debug!(command = %spec.display(), "Running command");
        let output = command
            .output()
            .await
            .map_err(|e| ServerError::command_spawn(spec.display(), e))?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(command = %spec.display(), code = ?result.code, "Command finished");

        Ok(result)
    }
}
