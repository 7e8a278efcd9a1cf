use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { status: StatusCode, url: String },
}

/// Fetches the composite rankings page.
///
/// The site rejects default client identifications, so requests carry a
/// desktop browser user agent.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    url: String,
}

impl PageFetcher {
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_url(crate::RANKINGS_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Result<Self, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(crate::RANKINGS_ACCEPT));

        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(crate::BROWSER_USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub async fn fetch_rankings_page(&self) -> Result<String, ScraperError> {
        log::info!("Fetching rankings from: {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ScraperError::UnexpectedStatus {
                status,
                url: self.url.clone(),
            });
        }

        Ok(response
            .text()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?)
    }
}
