pub mod area;
pub mod notice;

pub use area::TransformedArea;
pub use notice::{NoticeInfo, NoticeOutput};

pub const OUTPUT_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Serializes a UTC instant as `YYYY-MM-DDTHH:MM:SSZ`.
pub(crate) mod utc_seconds {
    use chrono::{DateTime, Utc};
    use serde::Serializer;

    use super::OUTPUT_DATETIME_FORMAT;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(OUTPUT_DATETIME_FORMAT))
    }
}
