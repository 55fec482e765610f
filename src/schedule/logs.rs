//! Daily log files and their rotation.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::NaiveDate;
use log::{debug, warn};

use crate::config::LOG_FILE_PREFIX;

/// `<logs_dir>/link-check-YYYY-MM-DD.log`
pub fn daily_log_path(logs_dir: &Path, date: NaiveDate) -> PathBuf {
    logs_dir.join(format!("{LOG_FILE_PREFIX}{}.log", date.format("%Y-%m-%d")))
}

/// Deletes files in `logs_dir` last modified more than `retention_days`
/// before `now`. Returns the number of files removed.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed.
pub async fn cleanup_old_logs(
    logs_dir: &Path,
    retention_days: u64,
    now: SystemTime,
) -> std::io::Result<usize> {
    let max_age = Duration::from_secs(retention_days.saturating_mul(24 * 60 * 60));
    let mut entries = tokio::fs::read_dir(logs_dir).await?;
    let mut removed = 0;

    while let Some(entry) = entries.next_entry().await? {
        let metadata = match entry.metadata().await {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => continue,
        };
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        // Modification times in the future count as fresh
        let age = now.duration_since(modified).unwrap_or_default();
        if age > max_age {
            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => {
                    debug!("Deleted old log {}", entry.path().display());
                    removed += 1;
                }
                Err(e) => warn!("Failed to delete old log {}: {e}", entry.path().display()),
            }
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_daily_log_path() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            daily_log_path(Path::new("logs"), date),
            PathBuf::from("logs/link-check-2024-03-09.log")
        );
    }

    #[tokio::test]
    async fn test_cleanup_old_logs_by_mtime() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("link-check-2024-01-01.log"), "x").unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();

        let removed = cleanup_old_logs(dir.path(), 30, SystemTime::now()).await.unwrap();
        assert_eq!(removed, 0);

        let later = SystemTime::now() + Duration::from_secs(31 * 24 * 60 * 60);
        let removed = cleanup_old_logs(dir.path(), 30, later).await.unwrap();
        assert_eq!(removed, 1);
        assert!(dir.path().join("subdir").exists());
    }
}
