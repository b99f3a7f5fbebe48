//! Standard test fixtures for consistent testing
//!
//! Provides a miniature Neo4j distribution:
//! - As a directory tree written to disk
//! - As an in-memory ZIP archive, laid out like the Windows download
//! - As a side effect standing in for `tar -xzf` on the POSIX download

use neo4j_core::command::CommandSpec;
use std::fs;
use std::io::{self, Cursor, Write};
use std::path::Path;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Server configuration as shipped, with the stock `74` port prefix
pub const SERVER_PROPERTIES: &str = "\
org.neo4j.server.database.location=data/graph.db
org.neo4j.server.webserver.address=0.0.0.0
org.neo4j.server.webserver.port=7474
org.neo4j.server.webserver.https.enabled=true
org.neo4j.server.webserver.https.port=7473
org.neo4j.server.webadmin.rrdb.location=data/rrd
org.neo4j.server.webadmin.data.uri=/db/data/
";

/// Files of the fixture distribution, relative to its root
pub fn distribution_files() -> Vec<(&'static str, &'static str)> {
    vec![
        ("bin/neo4j", "#!/bin/sh\necho \"neo4j $1\"\n"),
        ("bin/Neo4j.bat", "@echo off\r\necho Neo4j %1\r\n"),
        ("conf/neo4j-server.properties", SERVER_PROPERTIES),
        ("conf/neo4j.properties", "neostore.nodestore.db.mapped_memory=25M\n"),
        ("data/graph.db/neostore", "store"),
        ("data/log/console.log", "INFO: Server started\n"),
        ("README.txt", "Neo4j community edition\n"),
    ]
}

/// Write the fixture distribution below `root`
pub fn write_distribution_tree(root: &Path) -> io::Result<()> {
    for (relative, contents) in distribution_files() {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
    }
    Ok(())
}

/// ZIP archive with the fixture distribution under `<package_name>/`
pub fn distribution_zip(package_name: &str) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    writer
        .add_directory(format!("{package_name}/"), options)
        .expect("add directory entry");
    for (relative, contents) in distribution_files() {
        writer
            .start_file(format!("{package_name}/{relative}"), options)
            .expect("start zip entry");
        writer
            .write_all(contents.as_bytes())
            .expect("write zip entry");
    }

    writer.finish().expect("finish zip archive").into_inner()
}

/// Side effect for a mocked `tar`: materialise the fixture distribution as
/// `<current_dir>/<package_name>`, the way extracting the real tarball would
pub fn tar_extraction(package_name: &str) -> impl Fn(&CommandSpec) + Send + Sync + 'static {
    let package_name = package_name.to_string();
    move |spec: &CommandSpec| {
        let base = spec
            .current_dir
            .clone()
            .unwrap_or_else(|| Path::new(".").to_path_buf());
        write_distribution_tree(&base.join(&package_name)).expect("write extracted distribution");
    }
}
