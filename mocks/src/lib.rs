//! Mock implementations and test utilities for the Neo4j lifecycle tasks
//!
//! This crate provides testing infrastructure including:
//! - A scripted, call-recording implementation of `CommandRunner`
//! - A downloader that serves canned bytes instead of touching the network
//! - Fixture distribution trees and archives
//! - Assertion helpers for command history

pub mod assertions;
pub mod downloader;
pub mod fixtures;
pub mod runner;

pub use assertions::*;
pub use downloader::MockDownloader;
pub use runner::MockCommandRunner;
