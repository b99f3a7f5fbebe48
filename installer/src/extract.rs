//! Archive extraction.
//!
//! ZIP archives are unpacked in-process one entry at a time so that a single
//! bad entry does not abort the install. Gzipped tarballs are handed to the
//! system `tar` through the command runner.

use neo4j_core::{
    command::CommandSpec,
    error::{Result, ServerError},
};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, warn};
use zip::ZipArchive;

/// Per-entry tally of a ZIP extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Files written to disk
    pub extracted: usize,
    /// Files left alone because they already existed
    pub skipped: usize,
    /// Names of entries that could not be extracted
    pub failed: Vec<String>,
}

impl ExtractionReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Extract every entry of `archive_path` below `destination`.
///
/// Existing files are never overwritten. Entry failures are logged and
/// recorded in the report; only an unreadable archive is an error.
pub fn extract_zip(archive_path: &Path, destination: &Path) -> Result<ExtractionReport> {
    let file = fs::File::open(archive_path).map_err(|e| ServerError::io(archive_path, e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| {
        ServerError::Extraction(format!("{}: {e}", archive_path.display()))
    })?;

    let mut report = ExtractionReport::default();

    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(index, error = %e, "Entry #{index} failed to extract.");
                report.failed.push(format!("#{index}"));
                continue;
            }
        };

        let name = entry.name().to_string();
        let Some(relative) = entry.enclosed_name() else {
            warn!(entry = %name, "Refusing to extract entry outside the destination");
            report.failed.push(name);
            continue;
        };
        let target = destination.join(relative);
        let is_dir = entry.is_dir();

        match write_entry(&mut entry, is_dir, &target) {
            Ok(EntryResult::Written) => report.extracted += 1,
            Ok(EntryResult::AlreadyPresent) => report.skipped += 1,
            Ok(EntryResult::Directory) => {}
            Err(e) => {
                warn!(entry = %name, error = %e, "{name} failed to extract.");
                report.failed.push(name);
            }
        }
    }

    debug!(
        extracted = report.extracted,
        skipped = report.skipped,
        failed = report.failed.len(),
        "ZIP extraction finished"
    );
    Ok(report)
}

enum EntryResult {
    Written,
    AlreadyPresent,
    Directory,
}

fn write_entry(reader: &mut impl Read, is_dir: bool, target: &Path) -> io::Result<EntryResult> {
    if is_dir {
        fs::create_dir_all(target)?;
        return Ok(EntryResult::Directory);
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    if target.exists() {
        return Ok(EntryResult::AlreadyPresent);
    }

    let mut out = fs::File::create(target)?;
    io::copy(reader, &mut out)?;
    Ok(EntryResult::Written)
}

/// `tar -xzf <archive>` run inside `destination`
pub fn untar_command(archive_path: &Path, destination: &Path) -> CommandSpec {
    CommandSpec::new("tar")
        .args(["-xzf".to_string(), archive_path.to_string_lossy().into_owned()])
        .current_dir(destination)
}
