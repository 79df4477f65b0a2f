use std::time::{Duration, Instant};

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CACHE_CONTROL,
    CONNECTION, REFERER, UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use reqwest::{Client, Proxy};
use tracing::{error, info};

use crate::config::{FeedConfig, ProxyMode};

use super::error::BulletinError;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36 Edg/143.0.0.0";
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";
const BULLETIN_REFERER: &str =
    "https://app.matfmc.ru/agreedroutesview/AirspaceAvailabilityBulletin.aspx?source=gc&tab=tra";

/// The feed only answers requests that look like they come from a browser.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("ru,en;q=0.9,en-GB;q=0.8,en-US;q=0.7"),
    );
    headers.insert(
        ACCEPT_ENCODING,
        HeaderValue::from_static("gzip, deflate, br, zstd"),
    );
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("document"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("navigate"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-user"),
        HeaderValue::from_static("?1"),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua"),
        HeaderValue::from_static(
            r#""Microsoft Edge";v="143", "Chromium";v="143", "Not A(Brand";v="24""#,
        ),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua-mobile"),
        HeaderValue::from_static("?0"),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua-platform"),
        HeaderValue::from_static(r#""Windows""#),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers.insert(REFERER, HeaderValue::from_static(BULLETIN_REFERER));
    headers
}

fn invalid_proxy(address: &str, source: reqwest::Error) -> BulletinError {
    BulletinError::InvalidProxy {
        address: address.to_string(),
        source,
    }
}

pub struct BulletinClient {
    client: Client,
    url: String,
    proxy: ProxyMode,
}

impl BulletinClient {
    pub fn new(config: &FeedConfig) -> Result<Self, BulletinError> {
        let url = config.url().ok_or(BulletinError::MissingUrl)?.to_string();
        let proxy = config.proxy_mode();

        // The feed's certificate chain does not validate.
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .danger_accept_invalid_certs(true)
            .default_headers(browser_headers());

        builder = match &proxy {
            ProxyMode::Direct => builder.no_proxy(),
            ProxyMode::Proxied { http, https } => {
                let http_proxy =
                    Proxy::http(http.as_str()).map_err(|e| invalid_proxy(http, e))?;
                let https_proxy =
                    Proxy::https(https.as_str()).map_err(|e| invalid_proxy(https, e))?;
                builder.proxy(http_proxy).proxy(https_proxy)
            }
        };

        Ok(Self {
            client: builder.build()?,
            url,
            proxy,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue the single GET for the bulletin and return its body.
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch(&self) -> Result<String, BulletinError> {
        let start = Instant::now();
        info!("Requesting airspace bulletin");
        if let ProxyMode::Proxied { http, https } = &self.proxy {
            info!(http_proxy = %http, https_proxy = %https, "Using proxy");
        }

        let response = self.client.get(&self.url).send().await.map_err(|e| {
            let err = match self.proxy {
                ProxyMode::Proxied { .. } if e.is_connect() => BulletinError::Proxy(e),
                _ => BulletinError::Http(e),
            };
            error!(error = %err, kind = err.kind(), "Bulletin request failed");
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = BulletinError::UnexpectedStatus {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            };
            error!(status = %status, "Bulletin request returned an error status");
            return Err(err);
        }

        let body = response.text().await?;
        info!(
            status = %status,
            bytes = body.len(),
            duration_ms = start.elapsed().as_millis(),
            "Bulletin fetched"
        );
        Ok(body)
    }
}
