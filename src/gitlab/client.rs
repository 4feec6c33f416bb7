use std::time::Duration;

use log::{info, warn};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::error::{BackupError, Result};

use super::fetch::{FetchOutcome, FetchStatus, TruncationCause};

/// Response header carrying the next page number, absent on the last page.
const NEXT_PAGE_HEADER: &str = "x-next-page";

/// GitLab REST API client.
///
/// Wraps a `reqwest::Client` that sends the `PRIVATE-TOKEN` header on
/// every request and knows how to drain paginated collection endpoints.
pub struct GitLabClient {
    client: Client,
    api_url: Url,
    max_pages: u64,
}

impl GitLabClient {
    /// Creates a client for the given GitLab instance.
    ///
    /// `base_url` is the instance root (e.g. <https://gitlab.com>); the
    /// `api/v4/` prefix is appended here.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(base_url: &str, token: &Token, timeout: Duration, max_pages: u64) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let token_value = HeaderValue::from_str(token.as_str())
            .map_err(|e| BackupError::Config(format!("Invalid token value: {e}")))?;
        headers.insert("PRIVATE-TOKEN", token_value);

        let client = Client::builder()
            .user_agent(concat!("glbackup/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| BackupError::Config(format!("Failed to create HTTP client: {e}")))?;

        let api_url = Url::parse(base_url)
            .map_err(|e| BackupError::Config(format!("Invalid base URL: {e}")))?
            .join("api/v4/")
            .map_err(|e| BackupError::Config(format!("Invalid API base URL: {e}")))?;

        Ok(Self {
            client,
            api_url,
            max_pages,
        })
    }

    /// Joins a relative endpoint path (which may carry query parameters)
    /// onto the API base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_url
            .join(path)
            .map_err(|e| BackupError::Config(format!("Invalid endpoint URL: {e}")))
    }

    /// Drains every page of a collection endpoint into one ordered vector.
    ///
    /// Pagination follows the `x-next-page` response header: each request
    /// appends `page=<n>` to the original query, and the fetch ends when
    /// the header is absent or empty. A failed page request ends the fetch
    /// with whatever was accumulated so far, and the outcome's status
    /// records the truncation. The configured page limit caps runaway
    /// pagination against a misbehaving server.
    pub async fn fetch_paged<T>(&self, url: &Url, label: &str) -> FetchOutcome<T>
    where
        T: DeserializeOwned,
    {
        let mut records = Vec::new();
        let mut page: u64 = 1;
        let mut fetched: u64 = 0;

        loop {
            info!("Fetching {label}, page {page}...");

            let mut page_url = url.clone();
            page_url
                .query_pairs_mut()
                .append_pair("page", &page.to_string());

            let (items, next_page) = match self.fetch_page::<T>(&page_url).await {
                Ok(result) => result,
                Err(e) => {
                    warn!("Fetching {label} stopped on page {page}: {e}");
                    return FetchOutcome {
                        records,
                        pages: fetched,
                        status: FetchStatus::Truncated(TruncationCause::Request(e.to_string())),
                    };
                }
            };

            records.extend(items);
            fetched += 1;

            match next_page {
                None => {
                    return FetchOutcome {
                        records,
                        pages: fetched,
                        status: FetchStatus::Complete,
                    };
                }
                Some(next) if fetched >= self.max_pages => {
                    warn!(
                        "Fetching {label} hit the page limit ({}); page {next} and beyond are skipped",
                        self.max_pages
                    );
                    return FetchOutcome {
                        records,
                        pages: fetched,
                        status: FetchStatus::Truncated(TruncationCause::PageLimit),
                    };
                }
                Some(next) => page = next,
            }
        }
    }

    /// Fetches a single page and reads the continuation header.
    async fn fetch_page<T>(&self, url: &Url) -> Result<(Vec<T>, Option<u64>)>
    where
        T: DeserializeOwned,
    {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(BackupError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let next_page = next_page_number(response.headers());
        let items: Vec<T> = response.json().await?;

        Ok((items, next_page))
    }
}

/// Parses the `x-next-page` header; absent, empty and malformed values all
/// mean the current page is the last one.
fn next_page_number(headers: &HeaderMap) -> Option<u64> {
    let value = headers.get(NEXT_PAGE_HEADER)?.to_str().ok()?;
    if value.is_empty() {
        return None;
    }

    match value.parse() {
        Ok(next) => Some(next),
        Err(_) => {
            warn!("Ignoring malformed {NEXT_PAGE_HEADER} header: {value:?}");
            None
        }
    }
}
