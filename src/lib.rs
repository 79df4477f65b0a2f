pub mod bulletin;
pub mod clock;
pub mod config;
pub mod models;
pub mod notice;

pub use bulletin::{BulletinClient, BulletinDocument, BulletinError, RawZoneRecord, ZoneFilter};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use models::{NoticeInfo, NoticeOutput, TransformedArea};
pub use notice::{build_notice, NoticeError, NoticePipeline, NoticeWriter, RunSummary};
