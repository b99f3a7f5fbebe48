use thiserror::Error;

/// Result type alias for server lifecycle operations
pub type Result<T> = std::result::Result<T, ServerError>;

/// Error types for installing and controlling a local Neo4j server.
///
/// Privilege problems are reported as [`ServerError::PrivilegeDenied`] but are
/// normally turned into a skipped outcome by the platform implementations
/// rather than surfaced to the operator as a failure.
///
/// # Examples
///
/// ```rust
/// use neo4j_core::error::ServerError;
///
/// let unknown = ServerError::UnknownEnvironment("staging".to_string());
/// assert_eq!(unknown.exit_code(), 1);
///
/// let failed = ServerError::command_failed("neo4j start", Some(1), "not installed");
/// assert!(failed.is_command_failure());
/// assert_eq!(failed.exit_code(), 2);
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServerError {
    /// No port prefix is defined for the environment
    #[error("No port prefix defined for environment '{0}'")]
    UnknownEnvironment(String),

    /// Environment name cannot be used as part of a directory name
    #[error("Invalid environment name: {0}")]
    InvalidEnvironment(String),

    /// No install directory exists for the selected environment
    #[error("Neo4j is not installed in {0}; run install first")]
    NotInstalled(String),

    /// Administrative rights are required for the requested action
    #[error("Administrative rights required: {0}")]
    PrivilegeDenied(String),

    /// Archive could not be opened or read
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// External command exited unsuccessfully
    #[error("Command `{command}` failed with {}: {stderr}", describe_code(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// External command could not be launched at all
    #[error("Failed to launch `{command}`: {reason}")]
    CommandSpawn { command: String, reason: String },

    /// Distribution download failed
    #[error("Download error: {0}")]
    Download(String),

    /// Filesystem operation failed
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl ServerError {
    /// Create a command failure error
    pub fn command_failed(command: impl Into<String>, code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            code,
            stderr: stderr.into().trim().to_string(),
        }
    }

    /// Create a spawn error for a command that never started
    pub fn command_spawn(command: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::CommandSpawn {
            command: command.into(),
            reason: reason.to_string(),
        }
    }

    /// Wrap an IO error together with the path it concerns
    pub fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        Self::Io(format!("{}: {err}", path.display()))
    }

    /// Check if this error indicates missing administrative rights
    pub fn is_privilege_denied(&self) -> bool {
        matches!(self, ServerError::PrivilegeDenied(_))
    }

    /// Check if this error came from an external command
    pub fn is_command_failure(&self) -> bool {
        matches!(
            self,
            ServerError::CommandFailed { .. } | ServerError::CommandSpawn { .. }
        )
    }

    /// Check if this error means the install directory is missing
    pub fn is_not_installed(&self) -> bool {
        matches!(self, ServerError::NotInstalled(_))
    }

    /// Check if this error is a filesystem problem
    pub fn is_io(&self) -> bool {
        matches!(self, ServerError::Io(_))
    }

    /// Map to the process exit code used by the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            ServerError::UnknownEnvironment(_) => 1,
            ServerError::InvalidEnvironment(_) => 1,
            ServerError::Configuration(_) => 1,
            ServerError::NotInstalled(_) => 1,
            ServerError::PrivilegeDenied(_) => 0,
            ServerError::Extraction(_) => 2,
            ServerError::CommandFailed { .. } => 2,
            ServerError::CommandSpawn { .. } => 2,
            ServerError::Download(_) => 2,
            ServerError::Io(_) => 2,
        }
    }
}
