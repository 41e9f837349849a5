use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::cache::ImageResolutionCache;
use crate::config::BasketConfig;
use crate::fetchers::{ChromeFetcher, DocumentFetcher, DocumentRenderer, RequestFetcher};
use crate::search::ProductMatcher;
use crate::service::BasketService;
use crate::ScrapeError;

/// Builder for configuring a [`BasketService`]
#[derive(Default)]
pub struct BasketServiceBuilder {
    config: Option<BasketConfig>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    fetcher: Option<Arc<dyn DocumentFetcher>>,
    renderer: Option<Arc<dyn DocumentRenderer>>,
    cache: Option<Arc<ImageResolutionCache>>,
}

impl BasketServiceBuilder {
    /// Use an explicit configuration instead of the defaults
    ///
    /// # Example
    /// ```
    /// use recipe_basket::{BasketConfig, BasketService};
    ///
    /// let builder = BasketService::builder().config(BasketConfig::default());
    /// ```
    pub fn config(mut self, config: BasketConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a timeout for HTTP requests, overriding the configured one
    ///
    /// # Example
    /// ```
    /// use recipe_basket::BasketService;
    /// use std::time::Duration;
    ///
    /// let builder = BasketService::builder().timeout(Duration::from_secs(10));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replace the HTTP fetcher used for every page load
    pub fn fetcher(mut self, fetcher: Arc<dyn DocumentFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Render retailer search pages through this renderer
    pub fn renderer(mut self, renderer: Arc<dyn DocumentRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Share an existing image cache
    pub fn cache(mut self, cache: Arc<ImageResolutionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the service
    ///
    /// # Errors
    /// Returns `ScrapeError::BuilderError` if a configured base URL is not
    /// absolute, and a header or client error if the HTTP client cannot be
    /// built.
    ///
    /// # Example
    /// ```
    /// use recipe_basket::BasketService;
    ///
    /// let service = BasketService::builder().build().unwrap();
    /// assert_eq!(service.image_cache().capacity(), 100);
    /// ```
    pub fn build(self) -> Result<BasketService, ScrapeError> {
        let config = self.config.unwrap_or_default();
        for base_url in [&config.retailer.base_url, &config.recipe_site.base_url] {
            Url::parse(base_url).map_err(|e| {
                ScrapeError::BuilderError(format!("Invalid base URL {base_url:?}: {e}"))
            })?;
        }

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(config.timeout));

        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => {
                let user_agent = self.user_agent.as_deref().unwrap_or(&config.user_agent);
                Arc::new(RequestFetcher::new(user_agent, Some(timeout))?)
            }
        };

        let renderer = match (self.renderer, &config.render_endpoint) {
            (Some(renderer), _) => Some(renderer),
            (None, Some(endpoint)) => {
                let renderer: Arc<dyn DocumentRenderer> =
                    Arc::new(ChromeFetcher::new(endpoint, Some(timeout))?);
                Some(renderer)
            }
            (None, None) => None,
        };

        let image_cache = self
            .cache
            .unwrap_or_else(|| Arc::new(ImageResolutionCache::new(config.cache_capacity)));

        Ok(BasketService {
            matcher: ProductMatcher::new(config.retailer.clone()),
            config,
            fetcher,
            renderer,
            image_cache,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_defaults() {
        let service = BasketServiceBuilder::default().build().unwrap();
        assert_eq!(service.image_cache().capacity(), 100);
        assert!(service.renderer.is_none());
    }

    #[test]
    fn test_render_endpoint_enables_renderer() {
        let config = BasketConfig {
            render_endpoint: Some("http://localhost:3001".to_string()),
            ..Default::default()
        };
        let service = BasketServiceBuilder::default().config(config).build().unwrap();
        assert!(service.renderer.is_some());
    }

    #[test]
    fn test_shared_cache_is_used() {
        let cache = Arc::new(ImageResolutionCache::new(3));
        cache.put("https://recipes.example/recipe/a", "a.jpg");

        let service = BasketServiceBuilder::default()
            .cache(Arc::clone(&cache))
            .build()
            .unwrap();

        assert_eq!(service.image_cache().size(), 1);
        assert_eq!(service.image_cache().capacity(), 3);
    }

    #[test]
    fn test_relative_base_url_is_rejected() {
        let mut config = BasketConfig::default();
        config.retailer.base_url = "grocer.example".to_string();

        let result = BasketServiceBuilder::default().config(config).build();

        assert!(matches!(result, Err(ScrapeError::BuilderError(_))));
    }
}
