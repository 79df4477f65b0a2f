use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::utc_seconds;

/// A monitored zone active on `active_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformedArea {
    pub name: String,
    pub minimum_fl: i64,
    pub maximum_fl: i64,
    #[serde(with = "utc_seconds")]
    pub start_datetime: DateTime<Utc>,
    #[serde(with = "utc_seconds")]
    pub end_datetime: DateTime<Utc>,
    pub remark: String,
    pub active_date: NaiveDate,
}
