//! NOAA/SOHO ACE daily archive over HTTP.

use chrono::NaiveDate;
use reqwest::blocking::Client;

use super::{Archive, FetchOutcome};
use crate::domain::DataProduct;

pub const DEFAULT_ARCHIVE_URL: &str = "https://sohoftp.nascom.nasa.gov/sdb/ace/daily/";

/// Environment variable that overrides the archive base URL.
pub const ARCHIVE_URL_ENV: &str = "SWX_ARCHIVE_URL";

pub struct AceClient {
    client: Client,
    base_url: String,
}

impl AceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Base URL from `SWX_ARCHIVE_URL`, else the public archive.
    ///
    /// `app::run` loads `.env` before this is read.
    pub fn archive_url_from_env() -> String {
        std::env::var(ARCHIVE_URL_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ARCHIVE_URL.to_string())
    }

    pub fn url_for(&self, date: NaiveDate, product: DataProduct) -> String {
        format!("{}{}", self.base_url, product.file_name(date))
    }
}

impl Archive for AceClient {
    fn fetch_daily(&self, date: NaiveDate, product: DataProduct) -> FetchOutcome {
        let url = self.url_for(date, product);
        log::debug!("GET {url}");

        let resp = match self.client.get(&url).send() {
            Ok(resp) => resp,
            Err(e) => return FetchOutcome::unavailable(format!("request failed: {e}")),
        };

        let status = resp.status();
        if !status.is_success() {
            return FetchOutcome::Unavailable {
                status: Some(status.as_u16()),
                reason: format!("{url} returned {status}"),
            };
        }

        match resp.text() {
            Ok(text) => FetchOutcome::Body(text),
            Err(e) => FetchOutcome::Unavailable {
                status: Some(status.as_u16()),
                reason: format!("failed to read body of {url}: {e}"),
            },
        }
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
