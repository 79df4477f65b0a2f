use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::{utc_seconds, TransformedArea};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeInfo {
    #[serde(with = "utc_seconds")]
    pub valid_wef: DateTime<Utc>,
    #[serde(with = "utc_seconds")]
    pub valid_til: DateTime<Utc>,
    #[serde(with = "utc_seconds")]
    pub released_on: DateTime<Utc>,
}

impl NoticeInfo {
    /// A notice released at `now` stays valid for one hour.
    pub fn released_at(now: DateTime<Utc>) -> Self {
        Self {
            valid_wef: now,
            valid_til: now + Duration::hours(1),
            released_on: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeOutput {
    pub notice_info: NoticeInfo,
    pub areas: Vec<TransformedArea>,
}
