use pmgr_logger::{LevelFilter, Logger};
use serial_test::serial;

#[test]
#[serial]
fn console_only_logger_has_no_file_writer() {
    let logger = Logger::builder()
        .name("pmgr-console-only")
        .level(LevelFilter::INFO)
        .env_filter("pmgr=debug")
        .init()
        .expect("logger should initialize");

    assert!(!logger.writes_files());
}
