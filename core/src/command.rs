use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::{Result, ServerError};

/// An external program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// File name of the program, e.g. `neo4j` for `neo4j_test/bin/neo4j`
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    /// Whether this invocation runs `program` (matched on file name)
    pub fn runs(&self, program: &str) -> bool {
        self.program_name() == program || self.program == Path::new(program)
    }

    /// Shell-like rendering for logs and error messages
    pub fn display(&self) -> String {
        let mut rendered = self.program.display().to_string();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(arg);
        }
        rendered
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turn a non-zero exit into [`ServerError::CommandFailed`]
    pub fn check(self, spec: &CommandSpec) -> Result<CommandOutput> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ServerError::command_failed(spec.display(), self.code, self.stderr))
        }
    }
}

/// Runs external programs to completion.
///
/// Implementations must not interpret the exit status: a non-zero exit is a
/// successful `run` returning an unsuccessful [`CommandOutput`]. Only failure
/// to launch the program is an error.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command and wait for it to finish
    ///
    /// # Returns
    /// * `Ok(CommandOutput)` - The command ran, whatever its exit code
    /// * `Err(ServerError::CommandSpawn)` - The program could not be started
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput>;

    /// Run the command and require a zero exit code
    async fn run_checked(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        self.run(spec).await?.check(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_builder_and_display() {
        let spec = CommandSpec::new("neo4j_test/bin/neo4j")
            .arg("start")
            .current_dir("/srv");
        assert_eq!(spec.program_name(), "neo4j");
        assert!(spec.runs("neo4j"));
        assert!(!spec.runs("tar"));
        assert_eq!(spec.display(), "neo4j_test/bin/neo4j start");
        assert_eq!(spec.current_dir.as_deref(), Some(Path::new("/srv")));
    }

    #[test]
    fn test_check_output() {
        let spec = CommandSpec::new("tar").args(["-xzf", "neo4j.tar.gz"]);

        assert!(CommandOutput::success("ok").check(&spec).is_ok());

        let err = CommandOutput::failure(2, "gzip: stdin: not in gzip format")
            .check(&spec)
            .unwrap_err();
        assert_eq!(
            err,
            ServerError::command_failed("tar -xzf neo4j.tar.gz", Some(2), "gzip: stdin: not in gzip format")
        );
    }
}
