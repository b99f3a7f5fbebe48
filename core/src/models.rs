use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Result, ServerError};
use crate::validation::EnvironmentValidator;

/// Named environment an install belongs to.
///
/// Each environment gets its own install directory so that a development
/// and a test server can live side by side. `development` and `test` are
/// recognised regardless of case; any other safe name is kept verbatim as
/// [`Environment::Custom`].
///
/// # Examples
///
/// ```rust
/// use neo4j_core::models::Environment;
///
/// let env: Environment = "Test".parse().unwrap();
/// assert_eq!(env, Environment::Test);
/// assert_eq!(env.as_str(), "test");
///
/// let custom: Environment = "staging".parse().unwrap();
/// assert_eq!(custom, Environment::Custom("staging".to_string()));
///
/// assert!("../etc".parse::<Environment>().is_err());
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Environment {
    /// Local development server
    Development,
    /// Server used by automated test suites
    Test,
    /// Any other environment name.
    ///
    /// Building this variant directly skips name validation, and the name
    /// ends up in a directory path. Use [`Environment::custom`] or `parse`
    /// for names that come from outside the program.
    Custom(String),
}

impl Environment {
    /// Environment for `name`, rejecting names that are unsafe in a path
    pub fn custom(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        EnvironmentValidator::validate_name(&name)?;
        Ok(Environment::Custom(name))
    }

    /// Name used for directory naming and display
    pub fn as_str(&self) -> &str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Custom(name) => name,
        }
    }
}

impl FromStr for Environment {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            _ => Environment::custom(trimmed),
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = ServerError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Environment> for String {
    fn from(env: Environment) -> Self {
        env.as_str().to_string()
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Two-digit prefix of the server's network ports (e.g. `74` in `7474`).
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PortPrefix(u8);

impl PortPrefix {
    /// Prefix shipped in the stock distribution's configuration
    pub const DEFAULT: PortPrefix = PortPrefix(74);

    /// Create a prefix, rejecting anything that is not two digits
    pub fn new(value: u8) -> Result<Self> {
        if !(10..=99).contains(&value) {
            return Err(ServerError::Configuration(format!(
                "Port prefix must be two digits, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for PortPrefix {
    type Error = ServerError;

    fn try_from(value: u8) -> Result<Self> {
        PortPrefix::new(value)
    }
}

impl From<PortPrefix> for u8 {
    fn from(prefix: PortPrefix) -> Self {
        prefix.0
    }
}

impl std::fmt::Display for PortPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Edition and version of the distribution to install.
///
/// Neither field is validated: both are substituted into the download URL
/// and the name of the extracted directory as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub edition: String,
    pub version: String,
}

impl Distribution {
    pub const DEFAULT_EDITION: &'static str = "community";
    pub const DEFAULT_VERSION: &'static str = "1.7.M02";

    pub fn new(edition: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            edition: edition.into(),
            version: version.into(),
        }
    }

    /// Top-level directory name inside the archive, e.g. `neo4j-community-1.7.M02`
    pub fn package_name(&self) -> String {
        format!("neo4j-{}-{}", self.edition, self.version)
    }

    /// Archive file name published for the given platform
    pub fn archive_name(&self, platform: PlatformKind) -> String {
        format!(
            "{}-{}.{}",
            self.package_name(),
            platform.archive_suffix(),
            platform.archive_extension()
        )
    }

    /// Full download URL below `base_url`
    pub fn download_url(&self, base_url: &str, platform: PlatformKind) -> String {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.archive_name(platform)
        )
    }
}

impl Default for Distribution {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EDITION, Self::DEFAULT_VERSION)
    }
}

impl std::fmt::Display for Distribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Neo4j-{}-{}", self.edition, self.version)
    }
}

/// Operating system family the server is managed on
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Windows,
    Posix,
}

impl PlatformKind {
    /// Platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(windows) {
            PlatformKind::Windows
        } else {
            PlatformKind::Posix
        }
    }

    /// Suffix used in distribution archive names
    pub fn archive_suffix(self) -> &'static str {
        match self {
            PlatformKind::Windows => "windows",
            PlatformKind::Posix => "unix",
        }
    }

    pub fn archive_extension(self) -> &'static str {
        match self {
            PlatformKind::Windows => "zip",
            PlatformKind::Posix => "tar.gz",
        }
    }
}

impl std::fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformKind::Windows => write!(f, "windows"),
            PlatformKind::Posix => write!(f, "posix"),
        }
    }
}

/// Well-known paths inside an install directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    root: PathBuf,
}

impl InstallLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// POSIX launcher script; on Windows also used for service registration
    pub fn unix_launcher(&self) -> PathBuf {
        self.bin_dir().join("neo4j")
    }

    pub fn windows_launcher(&self) -> PathBuf {
        self.bin_dir().join("Neo4j.bat")
    }

    pub fn server_config(&self) -> PathBuf {
        self.root.join("conf").join("neo4j-server.properties")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    /// Database storage directory, cleared on reset
    pub fn database_dir(&self) -> PathBuf {
        self.data_dir().join("graph.db")
    }

    /// Log directory, cleared on reset
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir().join("log")
    }
}

/// Result of a lifecycle operation that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleOutcome {
    /// The operation ran all of its steps
    Completed { summary: String },
    /// The operation was deliberately not carried out
    Skipped { notice: String },
}

impl LifecycleOutcome {
    pub fn completed(summary: impl Into<String>) -> Self {
        Self::Completed {
            summary: summary.into(),
        }
    }

    pub fn skipped(notice: impl Into<String>) -> Self {
        Self::Skipped {
            notice: notice.into(),
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, LifecycleOutcome::Skipped { .. })
    }

    /// Text to show the operator
    pub fn message(&self) -> &str {
        match self {
            LifecycleOutcome::Completed { summary } => summary,
            LifecycleOutcome::Skipped { notice } => notice,
        }
    }
}
