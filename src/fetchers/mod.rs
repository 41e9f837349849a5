use crate::error::ScrapeError;
use async_trait::async_trait;

mod chrome;
mod request;

pub use chrome::ChromeFetcher;
pub use request::RequestFetcher;

/// Fetches the raw HTML of a page.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fails with a fetch error on network failure or a non-success status.
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Returns a page's HTML after its scripts have run.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<String, ScrapeError>;
}
