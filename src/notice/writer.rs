use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::models::NoticeOutput;

use super::error::NoticeError;

pub struct NoticeWriter {
    path: PathBuf,
}

/// Pretty JSON with a four-space indent. Non-ASCII text is written as-is.
pub fn to_pretty_json(notice: &NoticeOutput) -> Result<Vec<u8>, NoticeError> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    notice.serialize(&mut serializer)?;
    Ok(buf)
}

impl NoticeWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Replace the notice file. The previous file stays in place until the
    /// new content is fully on disk.
    pub fn write(&self, notice: &NoticeOutput) -> Result<(), NoticeError> {
        let bytes = to_pretty_json(notice)?;
        let staging = self.staging_path();

        fs::write(&staging, &bytes).map_err(|source| NoticeError::Io {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &self.path).map_err(|source| {
            let _ = fs::remove_file(&staging);
            NoticeError::Io {
                path: self.path.clone(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NoticeInfo, TransformedArea};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn notice(name: &str) -> NoticeOutput {
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 10, 0, 0).unwrap();
        NoticeOutput {
            notice_info: NoticeInfo::released_at(now),
            areas: vec![TransformedArea {
                name: name.to_string(),
                minimum_fl: 0,
                maximum_fl: 100,
                start_datetime: now,
                end_datetime: now,
                remark: "FL".to_string(),
                active_date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            }],
        }
    }

    #[test]
    fn test_four_space_indent() {
        let text = String::from_utf8(to_pretty_json(&notice("UNR1")).unwrap()).unwrap();
        assert!(text.starts_with("{\n    \"notice_info\": {\n        \"valid_wef\""));
        assert!(text.contains("\n    \"areas\": [\n        {\n            \"name\": \"UNR1\""));
    }

    #[test]
    fn test_non_ascii_preserved() {
        let text = String::from_utf8(to_pretty_json(&notice("Зона 5")).unwrap()).unwrap();
        assert!(text.contains("\"name\": \"Зона 5\""));
    }

    #[test]
    fn test_write_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        fs::write(&path, "stale").unwrap();

        let writer = NoticeWriter::new(&path);
        writer.write(&notice("UNR1")).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["areas"][0]["name"], "UNR1");
        assert!(!dir.path().join("output.json.tmp").exists());
    }

    #[test]
    fn test_failed_rename_removes_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupied"), "x").unwrap();

        let writer = NoticeWriter::new(&path);
        assert!(matches!(
            writer.write(&notice("UNR1")),
            Err(NoticeError::Io { .. })
        ));
        assert!(!dir.path().join("output.json.tmp").exists());
        assert!(path.join("occupied").exists());
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let writer = NoticeWriter::new(dir.path().join("missing").join("output.json"));
        assert!(matches!(
            writer.write(&notice("UNR1")),
            Err(NoticeError::Io { .. })
        ));
    }
}
