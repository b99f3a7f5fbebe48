use regex::Regex;
use std::sync::OnceLock;

use crate::error::{Result, ServerError};

fn environment_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("static pattern is valid"))
}

/// Validation utilities for values that end up in paths and URLs
pub struct EnvironmentValidator;

impl EnvironmentValidator {
    /// Validate an environment name
    ///
    /// Environment names must:
    /// - Be 1-64 characters long
    /// - Contain only ASCII letters, numbers, hyphens, and underscores
    ///
    /// The name becomes part of the install directory, so separators and
    /// dots are rejected.
    pub fn validate_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(ServerError::InvalidEnvironment(
                "Environment name cannot be empty".to_string(),
            ));
        }

        if !environment_name_pattern().is_match(name) {
            return Err(ServerError::InvalidEnvironment(format!(
                "'{name}' may only contain letters, numbers, hyphens, and underscores (max 64)"
            )));
        }

        Ok(())
    }

    /// Validate a distribution base URL
    pub fn validate_download_url(url: &str) -> Result<()> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ServerError::Configuration(format!(
                "Download URL must start with http:// or https://. Got: {url}"
            )));
        }
        Ok(())
    }
}
