//! Report files on disk: writing, discovery and retention.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, NaiveDateTime, Utc};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{REPORT_JSON_PREFIX, REPORT_MARKDOWN_PREFIX};
use crate::error_handling::ReportError;

/// Filename timestamp layout: ISO-8601 with `:` replaced by `-`.
const FILE_STAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3fZ";

/// Paths of a JSON artifact and its Markdown twin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub markdown: PathBuf,
}

/// Turns an ISO timestamp into its filename form.
pub fn file_stamp(timestamp: &str) -> String {
    timestamp.replace(':', "-")
}

/// Writes `value` as pretty JSON to `<json_prefix><stamp>.json` and
/// `markdown` to `<markdown_prefix><stamp>.md` inside `dir`.
///
/// Creates `dir` if needed.
///
/// # Errors
///
/// Returns [`ReportError`] naming the path that could not be written.
pub async fn write_artifacts<T: Serialize>(
    dir: &Path,
    json_prefix: &str,
    markdown_prefix: &str,
    stamp: &str,
    value: &T,
    markdown: &str,
) -> Result<ReportPaths, ReportError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| ReportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

    let json_path = dir.join(format!("{json_prefix}{stamp}.json"));
    let body = serde_json::to_string_pretty(value).map_err(|source| ReportError::Json {
        path: json_path.clone(),
        source,
    })?;
    write_file(&json_path, body.as_bytes()).await?;

    let markdown_path = dir.join(format!("{markdown_prefix}{stamp}.md"));
    write_file(&markdown_path, markdown.as_bytes()).await?;

    Ok(ReportPaths {
        json: json_path,
        markdown: markdown_path,
    })
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<(), ReportError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Reads and deserializes a JSON file.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the file cannot be read and
/// [`ReportError::Json`] if it does not match `T`.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ReportError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&text).map_err(|source| ReportError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Finds the report JSON with the lexicographically greatest filename.
///
/// Filenames embed a fixed-width UTC timestamp, so name order is creation
/// order regardless of filesystem clocks. Returns `None` if the directory
/// is missing or holds no report.
pub async fn find_latest_report(dir: &Path) -> Option<PathBuf> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Cannot read reports directory {}: {e}", dir.display());
            return None;
        }
    };

    let mut latest: Option<String> = None;
    while let Ok(Some(entry)) = entries.next_entry().await {
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if name.starts_with(REPORT_JSON_PREFIX)
            && name.ends_with(".json")
            && latest.as_ref().is_none_or(|current| name > *current)
        {
            latest = Some(name);
        }
    }
    latest.map(|name| dir.join(name))
}

/// Parses the timestamp embedded in a report filename.
///
/// Recognises `link-check-report-<stamp>.json` and
/// `link-check-readable-<stamp>.md`.
pub fn timestamp_of(file_name: &str) -> Option<DateTime<Utc>> {
    let stamp = file_name
        .strip_prefix(REPORT_JSON_PREFIX)
        .and_then(|rest| rest.strip_suffix(".json"))
        .or_else(|| {
            file_name
                .strip_prefix(REPORT_MARKDOWN_PREFIX)
                .and_then(|rest| rest.strip_suffix(".md"))
        })?;
    NaiveDateTime::parse_from_str(stamp, FILE_STAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

fn is_report_file(file_name: &str) -> bool {
    (file_name.starts_with(REPORT_JSON_PREFIX) && file_name.ends_with(".json"))
        || (file_name.starts_with(REPORT_MARKDOWN_PREFIX) && file_name.ends_with(".md"))
}

/// Deletes report files older than `retention_days` relative to `now`.
///
/// Only report JSON and Markdown files are considered. Age comes from the
/// filename timestamp, or the modification time when the name does not
/// parse. A file exactly `retention_days` old is kept. Returns the number
/// of files removed.
///
/// # Errors
///
/// Returns an error only if the directory cannot be listed; a missing
/// directory removes nothing.
pub async fn cleanup_old_reports(
    dir: &Path,
    retention_days: u64,
    now: DateTime<Utc>,
) -> Result<usize, ReportError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(source) => {
            return Err(ReportError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    let retention = i64::try_from(retention_days)
        .ok()
        .and_then(chrono::Duration::try_days)
        .unwrap_or(chrono::Duration::MAX);
    let mut removed = 0;

    while let Ok(Some(entry)) = entries.next_entry().await {
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !is_report_file(&name) {
            continue;
        }

        let created = match timestamp_of(&name) {
            Some(created) => Some(created),
            None => modified_at(&entry).await,
        };
        let Some(created) = created else {
            continue;
        };

        if now.signed_duration_since(created) > retention {
            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => {
                    debug!("Deleted old report {name}");
                    removed += 1;
                }
                Err(e) => warn!("Failed to delete old report {name}: {e}"),
            }
        }
    }

    Ok(removed)
}

async fn modified_at(entry: &tokio::fs::DirEntry) -> Option<DateTime<Utc>> {
    let modified: SystemTime = entry.metadata().await.ok()?.modified().ok()?;
    Some(DateTime::<Utc>::from(modified))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "{}").unwrap();
    }

    #[test]
    fn test_timestamp_of_report_names() {
        let parsed = timestamp_of("link-check-report-2024-03-09T12-30-45.123Z.json").unwrap();
        assert_eq!(
            parsed,
            Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 45).unwrap()
                + chrono::Duration::milliseconds(123)
        );
        assert!(timestamp_of("link-check-readable-2024-03-09T12-30-45.123Z.md").is_some());
        assert!(timestamp_of("link-check-report-garbage.json").is_none());
        assert!(timestamp_of("link-alternatives-2024-03-09T12-30-45.123Z.json").is_none());
    }

    #[test]
    fn test_file_stamp_replaces_colons() {
        assert_eq!(
            file_stamp("2024-03-09T12:30:45.123Z"),
            "2024-03-09T12-30-45.123Z"
        );
    }

    #[tokio::test]
    async fn test_find_latest_report_uses_name_order() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "link-check-report-2024-01-01T00-00-00.000Z.json");
        touch(dir.path(), "link-check-report-2024-02-01T00-00-00.000Z.json");
        touch(dir.path(), "link-check-readable-2025-01-01T00-00-00.000Z.md");
        touch(dir.path(), "link-alternatives-2025-01-01T00-00-00.000Z.json");

        let latest = find_latest_report(dir.path()).await.unwrap();
        assert!(latest.ends_with("link-check-report-2024-02-01T00-00-00.000Z.json"));
    }

    #[tokio::test]
    async fn test_find_latest_report_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(find_latest_report(&dir.path().join("nope")).await.is_none());
    }

    #[tokio::test]
    async fn test_cleanup_respects_boundary_and_file_kinds() {
        let dir = TempDir::new().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap();
        // exactly 30 days old: kept
        touch(dir.path(), "link-check-report-2024-03-01T00-00-00.000Z.json");
        // older than 30 days: removed
        touch(dir.path(), "link-check-report-2024-02-29T23-59-59.000Z.json");
        touch(dir.path(), "link-check-readable-2024-01-01T00-00-00.000Z.md");
        // not a report file: never touched
        touch(dir.path(), "link-alternatives-2020-01-01T00-00-00.000Z.json");
        touch(dir.path(), "notes.txt");

        let removed = cleanup_old_reports(dir.path(), 30, now).await.unwrap();
        assert_eq!(removed, 2);
        assert!(dir
            .path()
            .join("link-check-report-2024-03-01T00-00-00.000Z.json")
            .exists());
        assert!(dir
            .path()
            .join("link-alternatives-2020-01-01T00-00-00.000Z.json")
            .exists());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_cleanup_falls_back_to_mtime() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "link-check-report-unparseable.json");
        // freshly written, so well inside the window
        let removed = cleanup_old_reports(dir.path(), 1, Utc::now()).await.unwrap();
        assert_eq!(removed, 0);

        let far_future = Utc::now() + chrono::Duration::days(10);
        let removed = cleanup_old_reports(dir.path(), 1, far_future).await.unwrap();
        assert_eq!(removed, 1);
    }

    #[tokio::test]
    async fn test_write_and_read_artifacts() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("nested");
        let value = serde_json::json!({"totalLinks": 3});
        let paths = write_artifacts(&target, "a-", "b-", "stamp", &value, "# Title")
            .await
            .unwrap();
        assert_eq!(paths.json, target.join("a-stamp.json"));
        assert_eq!(std::fs::read_to_string(&paths.markdown).unwrap(), "# Title");
        let back: serde_json::Value = read_json(&paths.json).await.unwrap();
        assert_eq!(back, value);
    }

    #[tokio::test]
    async fn test_read_json_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_json::<serde_json::Value>(&path).await.unwrap_err();
        assert!(matches!(err, ReportError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
