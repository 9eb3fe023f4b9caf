use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the log file inside the data directory
pub const LOG_FILE_NAME: &str = "orderly.log";
/// The log is trimmed once it grows past this many bytes
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
/// Bytes of recent history kept when trimming
const KEEP_SIZE: u64 = 1024 * 1024;

/// Rotate the log file if it exceeds `max_size`, keeping the most recent
/// `keep` bytes, starting at a line boundary.
fn rotate_log_if_needed(log_path: &Path, max_size: u64, keep: u64) -> std::io::Result<bool> {
    let metadata = match fs::metadata(log_path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if metadata.len() <= max_size {
        return Ok(false);
    }

    let mut file = File::open(log_path)?;
    file.seek(SeekFrom::Start(metadata.len().saturating_sub(keep)))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    drop(file);

    // Drop the partial first line
    let skip = buffer
        .iter()
        .position(|&b| b == b'\n')
        .map_or(0, |i| i + 1);

    let mut file = File::create(log_path)?;
    file.write_all(b"--- older entries trimmed ---\n")?;
    file.write_all(&buffer[skip..])?;
    Ok(true)
}

/// Initialize logging to write to a file in the data directory.
///
/// Logs go to `{data_dir}/orderly.log` through a non-blocking writer; the
/// returned guard flushes pending lines when dropped, so hold it until exit.
/// When the log exceeds 5MB, older entries are removed keeping only the last
/// 1MB. The level can be set with `level` or overridden with `RUST_LOG`.
pub fn init_logging(data_dir: &Path, level: &str) -> color_eyre::Result<WorkerGuard> {
    fs::create_dir_all(data_dir)?;

    let log_path = data_dir.join(LOG_FILE_NAME);

    if let Err(e) = rotate_log_if_needed(&log_path, MAX_LOG_SIZE, KEEP_SIZE) {
        eprintln!("orderly: could not trim {}: {e}", log_path.display());
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let default_filter = format!("orderly={level},orderly_core=warn");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init()?;

    tracing::info!(log_path = %log_path.display(), "Orderly logging initialized");
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_small_log_is_left_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        assert!(!rotate_log_if_needed(&path, 64, 16).unwrap());

        fs::write(&path, "one\ntwo\n").unwrap();
        assert!(!rotate_log_if_needed(&path, 64, 16).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_rotation_keeps_recent_whole_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        let content: String = (0..20).map(|i| format!("line {i:02}\n")).collect();
        fs::write(&path, &content).unwrap();

        // Each line is 8 bytes; the last 20 bytes start mid-line
        assert!(rotate_log_if_needed(&path, 100, 20).unwrap());
        let rotated = fs::read_to_string(&path).unwrap();
        assert_eq!(
            rotated,
            "--- older entries trimmed ---\nline 18\nline 19\n"
        );
    }
}
