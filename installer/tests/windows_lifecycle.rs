use installer::{
    CommandOutput, Distribution, Environment, InstallContext, InstallLayout, ServerControl,
    WindowsServer, DIRECT_START_NOTICE, WINDOWS_ARCHIVE,
};
use mocks::{assert_call_order, assert_empty_dir, assert_never_ran, assert_ran, fixtures, MockCommandRunner, MockDownloader};
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const PACKAGE: &str = "neo4j-community-1.7.M02";

fn server(
    dir: &TempDir,
    environment: Option<Environment>,
    runner: &MockCommandRunner,
) -> (WindowsServer<MockCommandRunner, MockDownloader>, MockDownloader) {
    let downloader = MockDownloader::with_payload(fixtures::distribution_zip(PACKAGE));
    let context = InstallContext::new(dir.path(), environment);
    let server = WindowsServer::new(context, Arc::new(runner.clone()), Arc::new(downloader.clone()));
    (server, downloader)
}

fn installed(dir: &TempDir, name: &str) -> InstallLayout {
    let layout = InstallLayout::new(dir.path().join(name));
    fixtures::write_distribution_tree(layout.root()).unwrap();
    layout
}

#[tokio::test]
async fn test_install_as_admin_registers_service() {
    let dir = TempDir::new().unwrap();
    let runner = MockCommandRunner::elevated();
    let (server, downloader) = server(&dir, Some(Environment::Test), &runner);

    let outcome = server.install(&Distribution::default()).await.unwrap();
    assert!(outcome.message().contains("Neo4j Installed as a service."));

    assert_eq!(
        downloader.requests()[0].0,
        "http://dist.neo4j.org/neo4j-community-1.7.M02-windows.zip"
    );
    assert!(dir.path().join(WINDOWS_ARCHIVE).is_file(), "archive is kept as a cache");

    let layout = InstallLayout::new(dir.path().join("neo4j_test"));
    assert!(layout.windows_launcher().is_file());
    assert!(!dir.path().join(PACKAGE).exists());
    assert!(fs::read_to_string(layout.server_config())
        .unwrap()
        .contains("org.neo4j.server.webserver.port=7574"));

    assert_call_order(&runner, &["reg query HKU\\S-1-5-19", "neo4j install"]);
    assert_eq!(runner.calls().last().unwrap().program, layout.unix_launcher());
}

#[tokio::test]
async fn test_install_without_admin_skips_service_registration() {
    let dir = TempDir::new().unwrap();
    let runner = MockCommandRunner::new();
    runner.set_elevated(false);
    let (server, _) = server(&dir, None, &runner);

    let outcome = server.install(&Distribution::default()).await.unwrap();
    assert_eq!(outcome.message(), "Neo4j Installed in to neo4j directory.");
    assert!(!runner.call_log().iter().any(|call| call == "neo4j install"));
    assert_eq!(
        fs::read_to_string(dir.path().join("neo4j/conf/neo4j-server.properties")).unwrap(),
        fixtures::SERVER_PROPERTIES
    );
}

#[tokio::test]
async fn test_install_reuses_cached_archive() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(WINDOWS_ARCHIVE), fixtures::distribution_zip(PACKAGE)).unwrap();
    let runner = MockCommandRunner::new();
    let (server, downloader) = server(&dir, Some(Environment::Development), &runner);

    server.install(&Distribution::default()).await.unwrap();

    assert_eq!(downloader.request_count(), 0);
    assert!(dir.path().join("neo4j_development/bin/Neo4j.bat").is_file());
}

#[tokio::test]
async fn test_install_keeps_existing_install_directory() {
    let dir = TempDir::new().unwrap();
    let layout = installed(&dir, "neo4j_test");
    fs::write(layout.root().join("README.txt"), "local notes").unwrap();
    let runner = MockCommandRunner::new();
    let (server, _) = server(&dir, Some(Environment::Test), &runner);

    server.install(&Distribution::default()).await.unwrap();

    assert_eq!(fs::read_to_string(layout.root().join("README.txt")).unwrap(), "local notes");
    assert!(!dir.path().join(PACKAGE).exists(), "nothing should be extracted");
    assert!(fs::read_to_string(layout.server_config()).unwrap().contains("port=7573"));
}

#[tokio::test]
async fn test_stop_without_admin_is_skipped() {
    let dir = TempDir::new().unwrap();
    installed(&dir, "neo4j_test");
    let runner = MockCommandRunner::new();
    runner.set_elevated(false);
    let (server, _) = server(&dir, Some(Environment::Test), &runner);

    let outcome = server.stop().await.unwrap();

    assert!(outcome.is_skipped());
    assert_eq!(
        outcome.message(),
        "You do not have administrative rights to stop the Neo4j Service"
    );
    assert_never_ran(&runner, "Neo4j.bat");
}

#[tokio::test]
async fn test_restart_without_admin_is_skipped() {
    let dir = TempDir::new().unwrap();
    installed(&dir, "neo4j");
    let runner = MockCommandRunner::new();
    let (server, _) = server(&dir, None, &runner);

    let outcome = server.restart().await.unwrap();
    assert!(outcome.is_skipped());
    assert!(outcome.message().contains("restart"));
    assert_never_ran(&runner, "Neo4j.bat");
}

#[tokio::test]
async fn test_service_actions_as_admin() {
    let dir = TempDir::new().unwrap();
    installed(&dir, "neo4j");
    let runner = MockCommandRunner::elevated();
    let (server, _) = server(&dir, None, &runner);

    server.start().await.unwrap();
    server.stop().await.unwrap();
    server.restart().await.unwrap();

    assert_call_order(&runner, &["Neo4j.bat start", "Neo4j.bat stop", "Neo4j.bat restart"]);
}

#[tokio::test]
async fn test_start_without_admin_runs_directly() {
    let dir = TempDir::new().unwrap();
    installed(&dir, "neo4j");
    let runner = MockCommandRunner::new();
    let (server, _) = server(&dir, None, &runner);

    let outcome = server.start().await.unwrap();

    assert_eq!(outcome.message(), "Started Neo4j directly, not as a service.");
    assert_ran(&runner, "Neo4j.bat");
    assert!(!runner.call_log().iter().any(|call| call == "Neo4j.bat start"));
}

#[tokio::test]
async fn test_direct_start_notice_precedes_blocking_launch() {
    let dir = TempDir::new().unwrap();
    installed(&dir, "neo4j");
    let runner = MockCommandRunner::new();
    let (server, _) = server(&dir, None, &runner);

    // Record each line together with the commands already run at that point
    let printed: Arc<Mutex<Vec<(String, Vec<String>)>>> = Arc::default();
    let sink = printed.clone();
    let observer = runner.clone();
    let server = server.with_progress(Arc::new(move |line: &str| {
        sink.lock().unwrap().push((line.to_string(), observer.call_log()));
    }));

    server.start().await.unwrap();

    let printed = printed.lock().unwrap();
    assert_eq!(printed.len(), 1);
    let (line, history) = &printed[0];
    assert_eq!(line, DIRECT_START_NOTICE);
    assert!(!history.iter().any(|call| call == "Neo4j.bat"), "launcher ran before the notice: {history:?}");
    assert_ran(&runner, "Neo4j.bat");
}

#[tokio::test]
async fn test_service_start_prints_no_direct_notice() {
    let dir = TempDir::new().unwrap();
    installed(&dir, "neo4j");
    let runner = MockCommandRunner::elevated();
    let (server, _) = server(&dir, None, &runner);

    let printed: Arc<Mutex<Vec<String>>> = Arc::default();
    let sink = printed.clone();
    let server = server.with_progress(Arc::new(move |line: &str| {
        sink.lock().unwrap().push(line.to_string());
    }));

    server.start().await.unwrap();

    assert!(printed.lock().unwrap().is_empty());
    assert_ran(&runner, "Neo4j.bat start");
}

#[tokio::test]
async fn test_install_continues_past_entries_that_fail_to_extract() {
    let dir = TempDir::new().unwrap();
    // A plain file where the archive expects the conf directory
    fs::create_dir_all(dir.path().join(PACKAGE)).unwrap();
    fs::write(dir.path().join(PACKAGE).join("conf"), "not a directory").unwrap();
    let runner = MockCommandRunner::new();
    let (server, _) = server(&dir, None, &runner);

    let outcome = server.install(&Distribution::default()).await.unwrap();

    assert_eq!(outcome.message(), "Neo4j Installed in to neo4j directory.");
    let layout = InstallLayout::new(dir.path().join("neo4j"));
    assert!(layout.windows_launcher().is_file());
    assert!(layout.database_dir().join("neostore").is_file());
    assert!(!layout.server_config().exists());
}

#[tokio::test]
async fn test_probe_that_cannot_run_counts_as_not_elevated() {
    let dir = TempDir::new().unwrap();
    installed(&dir, "neo4j");
    let runner = MockCommandRunner::new();
    runner.inject_error(installer::ServerError::command_spawn("reg", "program not found"));
    let (server, _) = server(&dir, None, &runner);

    assert!(server.stop().await.unwrap().is_skipped());
}

#[tokio::test]
async fn test_reset_as_admin() {
    let dir = TempDir::new().unwrap();
    let layout = installed(&dir, "neo4j_test");
    let runner = MockCommandRunner::elevated();
    runner.respond_to_action("Neo4j.bat", "stop", CommandOutput::failure(2, "service not started"));
    let (server, _) = server(&dir, Some(Environment::Test), &runner);

    let outcome = server.reset().await.unwrap();

    assert!(!outcome.is_skipped());
    assert_call_order(&runner, &["Neo4j.bat stop", "Neo4j.bat start"]);
    assert_empty_dir(&layout.database_dir());
    assert_empty_dir(&layout.log_dir());
}

#[tokio::test]
async fn test_reset_without_admin_leaves_data() {
    let dir = TempDir::new().unwrap();
    let layout = installed(&dir, "neo4j_test");
    let runner = MockCommandRunner::new();
    let (server, _) = server(&dir, Some(Environment::Test), &runner);

    let outcome = server.reset().await.unwrap();

    assert!(outcome.is_skipped());
    assert!(layout.database_dir().join("neostore").is_file());
    assert_never_ran(&runner, "Neo4j.bat");
}
