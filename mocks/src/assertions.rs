//! Custom assertion helpers for testing
//!
//! Provides specialized assertions for:
//! - Which commands a mocked runner saw, and in what order
//! - Directory state after a reset

use std::fs;
use std::path::Path;

use crate::runner::MockCommandRunner;

/// Assert a command was run, matched on its rendered form (`neo4j start`)
pub fn assert_ran(runner: &MockCommandRunner, command: &str) {
    let log = runner.call_log();
    assert!(
        log.iter().any(|call| call == command),
        "Expected `{command}` to have run, history: {log:?}"
    );
}

/// Assert no invocation of `program` happened at all
pub fn assert_never_ran(runner: &MockCommandRunner, program: &str) {
    let offending: Vec<String> = runner
        .calls()
        .iter()
        .filter(|spec| spec.runs(program))
        .map(|spec| spec.display())
        .collect();
    assert!(
        offending.is_empty(),
        "Expected `{program}` never to run, but saw: {offending:?}"
    );
}

/// Assert `expected` appear in the history in this relative order
pub fn assert_call_order(runner: &MockCommandRunner, expected: &[&str]) {
    let log = runner.call_log();
    let mut remaining = expected.iter().peekable();
    for call in &log {
        if remaining.peek().is_some_and(|next| *next == call) {
            remaining.next();
        }
    }
    assert!(
        remaining.peek().is_none(),
        "Expected calls {expected:?} in order, history: {log:?}"
    );
}

/// Assert `path` is an existing, empty directory
pub fn assert_empty_dir(path: &Path) {
    assert!(path.is_dir(), "{} is not a directory", path.display());
    let entries = fs::read_dir(path)
        .unwrap_or_else(|e| panic!("Cannot read {}: {e}", path.display()))
        .count();
    assert_eq!(entries, 0, "{} is not empty", path.display());
}
