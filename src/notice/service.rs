use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::bulletin::{project_zone, BulletinClient, BulletinDocument, ZoneFilter};
use crate::clock::Clock;
use crate::config::AppConfig;
use crate::models::{NoticeInfo, NoticeOutput};

use super::error::NoticeError;
use super::writer::NoticeWriter;

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub records_seen: usize,
    pub records_monitored: usize,
    pub records_skipped: usize,
    pub areas_emitted: usize,
    pub output_path: Option<PathBuf>,
}

/// Collect the areas active today and tomorrow (UTC, relative to `now`).
///
/// Areas keep document order, with today's entry before tomorrow's for the
/// same record. Undecodable records and records with malformed dates are
/// counted as skipped.
pub fn build_notice(
    document: &BulletinDocument,
    filter: &ZoneFilter,
    now: DateTime<Utc>,
) -> Result<(NoticeOutput, RunSummary), NoticeError> {
    let today = now.date_naive();
    let tomorrow = today.succ_opt().ok_or(NoticeError::DateOutOfRange(today))?;

    let mut summary = RunSummary {
        records_seen: document.records.len() + document.malformed_records,
        records_skipped: document.malformed_records,
        ..RunSummary::default()
    };
    let mut areas = Vec::new();

    for (index, record) in document.records.iter().enumerate() {
        if !filter.matches(record) {
            continue;
        }
        summary.records_monitored += 1;

        let Some(window) = record.time_window() else {
            summary.records_skipped += 1;
            debug!(
                index,
                area_code = record.area_code(),
                "Skipping zone record with malformed dates"
            );
            continue;
        };

        for day in [today, tomorrow] {
            let area = project_zone(record, window, day)
                .map_err(|source| NoticeError::Level { index, source })?;
            if let Some(area) = area {
                areas.push(area);
            }
        }
    }

    summary.areas_emitted = areas.len();

    let notice = NoticeOutput {
        notice_info: NoticeInfo::released_at(now),
        areas,
    };
    Ok((notice, summary))
}

pub struct NoticePipeline<C: Clock> {
    client: BulletinClient,
    filter: ZoneFilter,
    writer: NoticeWriter,
    clock: C,
}

impl<C: Clock> NoticePipeline<C> {
    pub fn new(client: BulletinClient, filter: ZoneFilter, writer: NoticeWriter, clock: C) -> Self {
        Self {
            client,
            filter,
            writer,
            clock,
        }
    }

    pub fn from_config(config: &AppConfig, clock: C) -> Result<Self, NoticeError> {
        let client = BulletinClient::new(&config.feed)?;
        let filter = ZoneFilter::new(config.feed.zone_codes.iter().cloned());
        let writer = NoticeWriter::new(config.output.path.clone());
        Ok(Self::new(client, filter, writer, clock))
    }

    /// Fetch, transform and write the notice. Nothing is written unless
    /// every step before the write succeeds.
    #[tracing::instrument(skip(self), fields(output = %self.writer.path().display()))]
    pub async fn run(&self) -> Result<RunSummary, NoticeError> {
        let start = Instant::now();

        let body = self.client.fetch().await?;
        let document = BulletinDocument::parse(&body)?;
        info!(records = document.records.len(), "Parsed airspace bulletin");

        let now = self.clock.now();
        let (notice, mut summary) = build_notice(&document, &self.filter, now)?;

        self.writer.write(&notice)?;
        summary.output_path = Some(self.writer.path().to_path_buf());

        info!(
            records_seen = summary.records_seen,
            records_monitored = summary.records_monitored,
            records_skipped = summary.records_skipped,
            areas = summary.areas_emitted,
            duration_ms = start.elapsed().as_millis(),
            "Notice written"
        );

        Ok(summary)
    }
}
