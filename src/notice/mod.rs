mod error;
mod service;
mod writer;

pub use error::NoticeError;
pub use service::{build_notice, NoticePipeline, RunSummary};
pub use writer::{to_pretty_json, NoticeWriter};
