//! Tests for `src/logging.rs`.

use hegemon_gate::logging::LoggingGuard;

#[test]
fn logging_guard_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<LoggingGuard>();
}

#[test]
fn init_production_creates_logs_dir() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let logs_dir = tmp.path().join("logs");
    assert!(!logs_dir.exists());

    // The global subscriber can only be installed once per process, so
    // another test may have claimed it already; either way the logs
    // directory must be created before installation is attempted.
    let _result = hegemon_gate::logging::init_production(&logs_dir);
    assert!(logs_dir.exists(), "logs directory should be created");
}
