use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;

/// Fetches a distribution archive to a local file
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download `url` into `destination`, replacing any existing file
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of bytes written
    /// * `Err(ServerError::Download)` - If the request fails or returns a non-success status
    /// * `Err(ServerError::Io)` - If the destination cannot be written
    async fn download(&self, url: &str, destination: &Path) -> Result<u64>;
}
