use std::num::ParseIntError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BulletinError {
    #[error("Feed URL is not configured")]
    MissingUrl,

    #[error("Proxy request failed: {0}")]
    Proxy(#[source] reqwest::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Invalid proxy address {address}: {source}")]
    InvalidProxy {
        address: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse XML bulletin: {0}")]
    XmlParse(String),
}

impl BulletinError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingUrl => "missing_url",
            Self::Proxy(_) => "proxy_error",
            Self::Http(_) => "http_error",
            Self::UnexpectedStatus { .. } => "unexpected_status",
            Self::InvalidProxy { .. } => "invalid_proxy",
            Self::XmlParse(_) => "parse_error",
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid level value {value:?}: {source}")]
pub struct LevelError {
    pub value: String,
    #[source]
    pub source: ParseIntError,
}
