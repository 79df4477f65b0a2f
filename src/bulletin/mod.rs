mod client;
mod error;
mod levels;
mod xml;
mod zone;

pub use client::BulletinClient;
pub use error::{BulletinError, LevelError};
pub use levels::{combine_remarks, determine_remark, extract_level, FEET_PER_METRE};
pub use xml::{BulletinDocument, RawZoneRecord};
pub use zone::{process_zone, project_zone, ZoneFilter};
