use super::DocumentFetcher;
use crate::error::ScrapeError;
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, ScrapeError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentFetcher for RequestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        debug!("Fetching {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let html = response.text().await?;
        Ok(html)
    }
}
