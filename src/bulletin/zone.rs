use chrono::{DateTime, NaiveDate, Utc};

use crate::config::DEFAULT_ZONE_CODES;
use crate::models::TransformedArea;

use super::error::LevelError;
use super::levels::{combine_remarks, determine_remark, extract_level};
use super::xml::RawZoneRecord;

/// Selects zone records by the airspace identifiers found in their zone code.
#[derive(Debug, Clone)]
pub struct ZoneFilter {
    zone_codes: Vec<String>,
}

impl Default for ZoneFilter {
    fn default() -> Self {
        Self::new(DEFAULT_ZONE_CODES.iter().map(|c| c.to_string()))
    }
}

impl ZoneFilter {
    pub fn new<I, S>(zone_codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            zone_codes: zone_codes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, record: &RawZoneRecord) -> bool {
        let zone_code = record.zone_code();
        self.zone_codes
            .iter()
            .any(|code| zone_code.contains(code.as_str()))
    }

    /// Project `record` onto `target_date`.
    ///
    /// Returns `Ok(None)` when the zone is not monitored, its dates are
    /// malformed, or its window does not cover `target_date`.
    pub fn process_zone(
        &self,
        record: &RawZoneRecord,
        target_date: NaiveDate,
    ) -> Result<Option<TransformedArea>, LevelError> {
        if !self.matches(record) {
            return Ok(None);
        }

        let Some(window) = record.time_window() else {
            return Ok(None);
        };

        project_zone(record, window, target_date)
    }
}

/// Build the area for a record whose window has already been parsed.
/// Returns `Ok(None)` when the window does not cover `target_date`.
pub fn project_zone(
    record: &RawZoneRecord,
    (start, end): (DateTime<Utc>, DateTime<Utc>),
    target_date: NaiveDate,
) -> Result<Option<TransformedArea>, LevelError> {
    if target_date < start.date_naive() || target_date > end.date_naive() {
        return Ok(None);
    }

    let remark = combine_remarks(
        determine_remark(record.level_from()),
        determine_remark(record.level_to()),
    );

    Ok(Some(TransformedArea {
        name: record.area_code().to_string(),
        minimum_fl: extract_level(record.level_from())?,
        maximum_fl: extract_level(record.level_to())?,
        start_datetime: start,
        end_datetime: end,
        remark,
        active_date: target_date,
    }))
}

pub fn process_zone(
    record: &RawZoneRecord,
    target_date: NaiveDate,
) -> Result<Option<TransformedArea>, LevelError> {
    ZoneFilter::default().process_zone(record, target_date)
}
