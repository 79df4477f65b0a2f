use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;
use tracing::warn;

use super::error::BulletinError;

pub const FEED_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%MZ";

const RECORD_TAG: &[u8] = b"tra";

/// Airspace availability bulletin. Only the root's direct `tra` children are
/// zone records; anything else in the document is ignored.
#[derive(Debug, Default)]
pub struct BulletinDocument {
    pub records: Vec<RawZoneRecord>,
    /// `tra` elements whose content could not be decoded.
    pub malformed_records: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawZoneRecord {
    pub zone_code: Option<String>,
    pub area_code: Option<String>,
    pub level_from: Option<String>,
    pub level_to: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

/// Wire shape of one `tra` element. Repeated children are collected and the
/// first one wins.
#[derive(Debug, Deserialize)]
struct TraElement {
    #[serde(rename = "zc", default)]
    zone_code: Vec<String>,
    #[serde(rename = "areacode", default)]
    area_code: Vec<String>,
    #[serde(rename = "levelfrom", default)]
    level_from: Vec<String>,
    #[serde(rename = "levelto", default)]
    level_to: Vec<String>,
    #[serde(rename = "datefrom", default)]
    date_from: Vec<String>,
    #[serde(rename = "dateto", default)]
    date_to: Vec<String>,
}

fn first(values: Vec<String>) -> Option<String> {
    values.into_iter().next()
}

impl From<TraElement> for RawZoneRecord {
    fn from(tra: TraElement) -> Self {
        Self {
            zone_code: first(tra.zone_code),
            area_code: first(tra.area_code),
            level_from: first(tra.level_from),
            level_to: first(tra.level_to),
            date_from: first(tra.date_from),
            date_to: first(tra.date_to),
        }
    }
}

fn parse_error(body: &str, err: impl std::fmt::Display) -> BulletinError {
    BulletinError::XmlParse(format!(
        "{}. Body starts with: {}",
        err,
        body.chars().take(200).collect::<String>()
    ))
}

impl BulletinDocument {
    /// Walk the document structure strictly and decode each `tra` on its own.
    ///
    /// A broken document is an error. A `tra` whose content does not decode
    /// is counted in `malformed_records` and left out.
    pub fn parse(body: &str) -> Result<Self, BulletinError> {
        let mut reader = Reader::from_str(body);
        let mut document = BulletinDocument::default();
        let mut depth = 0usize;
        let mut root_seen = false;

        loop {
            let record_start = reader.buffer_position() as usize;
            match reader.read_event().map_err(|e| parse_error(body, e))? {
                Event::Start(start) if depth == 1 && start.name().as_ref() == RECORD_TAG => {
                    reader
                        .read_to_end(start.name())
                        .map_err(|e| parse_error(body, e))?;
                    let record_end = reader.buffer_position() as usize;
                    document.push_element(&body[record_start..record_end]);
                }
                Event::Start(_) => {
                    root_seen = true;
                    depth += 1;
                }
                Event::Empty(empty) if depth == 1 && empty.name().as_ref() == RECORD_TAG => {
                    document.records.push(RawZoneRecord::default());
                }
                Event::Empty(_) if depth == 0 => root_seen = true,
                Event::End(_) => depth = depth.saturating_sub(1),
                Event::Eof => break,
                _ => {}
            }
        }

        if !root_seen {
            return Err(parse_error(body, "no root element"));
        }
        if depth != 0 {
            return Err(parse_error(body, "unexpected end of document"));
        }

        Ok(document)
    }

    fn push_element(&mut self, element: &str) {
        match quick_xml::de::from_str::<TraElement>(element) {
            Ok(tra) => self.records.push(tra.into()),
            Err(e) => {
                self.malformed_records += 1;
                warn!(
                    position = self.records.len() + self.malformed_records,
                    error = %e,
                    "Skipping undecodable zone record"
                );
            }
        }
    }
}

fn trimmed(field: &Option<String>) -> &str {
    field.as_deref().map(str::trim).unwrap_or("")
}

fn parse_feed_datetime(value: Option<&str>) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value?, FEED_DATETIME_FORMAT)
        .ok()
        .map(|dt| dt.and_utc())
}

impl RawZoneRecord {
    pub fn zone_code(&self) -> &str {
        trimmed(&self.zone_code)
    }

    pub fn area_code(&self) -> &str {
        trimmed(&self.area_code)
    }

    pub fn level_from(&self) -> Option<&str> {
        self.level_from.as_deref()
    }

    pub fn level_to(&self) -> Option<&str> {
        self.level_to.as_deref()
    }

    /// Validity window of the zone, or `None` when either bound is missing
    /// or not exactly in `YYYY-MM-DDTHH:MMZ` form.
    pub fn time_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = parse_feed_datetime(self.date_from.as_deref())?;
        let end = parse_feed_datetime(self.date_to.as_deref())?;
        Some((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const BULLETIN: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<bulletin>
  <header>AUP 2025-01-02</header>
  <tra>
    <zc>UNNT</zc>
    <areacode>UNR123</areacode>
    <levelfrom>1500AGL</levelfrom>
    <levelto>F100</levelto>
    <datefrom>2025-01-01T06:00Z</datefrom>
    <dateto>2025-01-03T18:30Z</dateto>
  </tra>
  <remark>interleaved</remark>
  <tra>
    <zc>UUWV</zc>
    <areacode>UUR9</areacode>
  </tra>
</bulletin>"#;

    #[test]
    fn test_parse_records_in_order() {
        let doc = BulletinDocument::parse(BULLETIN).unwrap();
        assert_eq!(doc.records.len(), 2);
        assert_eq!(doc.malformed_records, 0);

        let first = &doc.records[0];
        assert_eq!(first.zone_code(), "UNNT");
        assert_eq!(first.area_code(), "UNR123");
        assert_eq!(first.level_from(), Some("1500AGL"));
        assert_eq!(first.level_to(), Some("F100"));

        let second = &doc.records[1];
        assert_eq!(second.zone_code(), "UUWV");
        assert_eq!(second.level_from(), None);
        assert!(second.time_window().is_none());
    }

    #[test]
    fn test_parse_empty_bulletin() {
        let doc = BulletinDocument::parse("<bulletin></bulletin>").unwrap();
        assert!(doc.records.is_empty());

        let doc = BulletinDocument::parse("<bulletin/>").unwrap();
        assert!(doc.records.is_empty());
    }

    #[test]
    fn test_parse_empty_record_element() {
        let doc = BulletinDocument::parse("<bulletin><tra/></bulletin>").unwrap();
        assert_eq!(doc.records, vec![RawZoneRecord::default()]);
    }

    #[test]
    fn test_parse_malformed_document() {
        let result = BulletinDocument::parse("<bulletin><tra><zc>UNNT</zc>");
        assert!(matches!(result, Err(BulletinError::XmlParse(_))));

        let result = BulletinDocument::parse("<bulletin><header>x</header>");
        assert!(matches!(result, Err(BulletinError::XmlParse(_))));

        let result = BulletinDocument::parse("not xml at all");
        assert!(matches!(result, Err(BulletinError::XmlParse(_))));
    }

    #[test]
    fn test_nested_tra_is_not_a_record() {
        let doc = BulletinDocument::parse(
            "<bulletin><group><tra><zc>UNNT</zc></tra></group></bulletin>",
        )
        .unwrap();
        assert!(doc.records.is_empty());
    }

    #[test]
    fn test_repeated_child_keeps_first() {
        let doc = BulletinDocument::parse(
            "<bulletin><tra><zc>UNNT</zc><zc>UUWV</zc><areacode>A</areacode></tra></bulletin>",
        )
        .unwrap();
        assert_eq!(doc.records.len(), 1);
        assert_eq!(doc.records[0].zone_code(), "UNNT");
    }

    #[test]
    fn test_undecodable_record_between_good_ones() {
        let doc = BulletinDocument::parse(
            r#"<bulletin>
  <tra><zc>UNNT</zc><areacode>FIRST</areacode></tra>
  <tra><zc>UNKL</zc><areacode><i>A</i></areacode></tra>
  <tra><zc>UIII</zc><areacode>LAST</areacode></tra>
</bulletin>"#,
        )
        .unwrap();

        let names: Vec<&str> = doc.records.iter().map(|r| r.area_code()).collect();
        assert_eq!(names, vec!["FIRST", "LAST"]);
        assert_eq!(doc.malformed_records, 1);
    }

    #[test]
    fn test_time_window() {
        let doc = BulletinDocument::parse(BULLETIN).unwrap();
        let (start, end) = doc.records[0].time_window().unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 1, 1, 6, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 1, 3, 18, 30, 0).unwrap());
    }

    #[test]
    fn test_time_window_rejects_other_formats() {
        let record = RawZoneRecord {
            date_from: Some("2025-01-01T06:00:00Z".to_string()),
            date_to: Some("2025-01-03T18:30Z".to_string()),
            ..RawZoneRecord::default()
        };
        assert!(record.time_window().is_none());

        let record = RawZoneRecord {
            date_from: Some("01/01/2025".to_string()),
            date_to: Some("2025-01-03T18:30Z".to_string()),
            ..RawZoneRecord::default()
        };
        assert!(record.time_window().is_none());
    }

    #[test]
    fn test_time_window_rejects_padding() {
        let record = RawZoneRecord {
            date_from: Some(" 2025-01-01T06:00Z ".to_string()),
            date_to: Some("2025-01-03T18:30Z".to_string()),
            ..RawZoneRecord::default()
        };
        assert!(record.time_window().is_none());
    }
}
