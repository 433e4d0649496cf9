use pmgr_logger::{LevelFilter, Logger};
use std::time::Duration;

#[test]
fn json_file_logging_writes_records() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let dir = tmp.path().join("logs");

    let logger = Logger::builder()
        .name("pmgr-file")
        .console(false)
        .level(LevelFilter::INFO)
        .path(&dir)
        .rotation_str("never")?
        .max_files(2)
        .json(true)
        .init()?;
    assert!(logger.writes_files());

    tracing::info!(basename = "gungame", "plugin release stored");
    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let file = std::fs::read_dir(&dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().is_some_and(|ext| ext == "log"))
        .expect("log file should exist");
    let contents = std::fs::read_to_string(file)?;

    let record: serde_json::Value =
        serde_json::from_str(contents.lines().next().expect("one record"))?;
    assert_eq!(record["fields"]["basename"], "gungame");
    assert_eq!(record["level"], "INFO");
    Ok(())
}
