use super::DocumentRenderer;
use crate::error::ScrapeError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct ContentRequest {
    url: String,
}

#[derive(Deserialize)]
struct ContentResponse {
    content: String,
}

/// Renders pages through an external headless-browser service.
pub struct ChromeFetcher {
    endpoint: String,
    client: Client,
}

impl ChromeFetcher {
    /// `service_url` is the base URL of the rendering service.
    pub fn new(service_url: &str, timeout: Option<Duration>) -> Result<Self, ScrapeError> {
        let endpoint = format!("{}/api/fetch-content", service_url.trim_end_matches('/'));
        let client = Client::builder()
            .timeout(timeout.unwrap_or(Duration::from_secs(30)))
            .build()?;
        Ok(Self { endpoint, client })
    }
}

#[async_trait]
impl DocumentRenderer for ChromeFetcher {
    async fn render(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ContentRequest {
                url: url.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScrapeError::HttpStatus {
                url: self.endpoint.clone(),
                status: response.status().as_u16(),
            });
        }

        let content: ContentResponse = response.json().await?;
        Ok(content.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_render_posts_url_and_returns_content() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/api/fetch-content")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "url": "https://grocer.example/search?text=garlic"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content": "<html><body>rendered</body></html>"}"#)
            .create_async()
            .await;

        let renderer = ChromeFetcher::new(&format!("{}/", server.url()), None).unwrap();
        let html = renderer
            .render("https://grocer.example/search?text=garlic")
            .await
            .unwrap();

        assert_eq!(html, "<html><body>rendered</body></html>");
    }

    #[tokio::test]
    async fn test_render_failure_status() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/api/fetch-content")
            .with_status(502)
            .create_async()
            .await;

        let renderer = ChromeFetcher::new(&server.url(), None).unwrap();
        let result = renderer.render("https://grocer.example").await;

        assert!(matches!(result, Err(ScrapeError::HttpStatus { status: 502, .. })));
    }
}
