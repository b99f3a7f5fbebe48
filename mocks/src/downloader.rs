//! Mock implementation of the Downloader trait

use async_trait::async_trait;
use neo4j_core::{
    download::Downloader,
    error::{Result, ServerError},
};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Downloader that writes a fixed payload and records every request
#[derive(Clone, Default)]
pub struct MockDownloader {
    payload: Arc<Mutex<Vec<u8>>>,
    error_injection: Arc<Mutex<Option<ServerError>>>,
    requests: Arc<Mutex<Vec<(String, PathBuf)>>>,
}

impl MockDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Downloader serving `payload` for every URL
    pub fn with_payload(payload: Vec<u8>) -> Self {
        let downloader = Self::new();
        *downloader.payload.lock() = payload;
        downloader
    }

    /// Make the next download fail with `error`
    pub fn inject_error(&self, error: ServerError) {
        *self.error_injection.lock() = Some(error);
    }

    /// `(url, destination)` of every download requested so far
    pub fn requests(&self) -> Vec<(String, PathBuf)> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Downloader for MockDownloader {
    async fn download(&self, url: &str, destination: &Path) -> Result<u64> {
        self.requests
            .lock()
            .push((url.to_string(), destination.to_path_buf()));

        if let Some(error) = self.error_injection.lock().take() {
            return Err(error);
        }

        let payload = self.payload.lock().clone();
        fs::write(destination, &payload).map_err(|e| ServerError::io(destination, e))?;
        Ok(payload.len() as u64)
    }
}
