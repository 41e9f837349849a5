use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct BasketConfig {
    /// User agent sent with every outgoing fetch
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Maximum number of resolved images kept in memory
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Base URL of a page-rendering service for script-heavy retailer pages
    #[serde(default)]
    pub render_endpoint: Option<String>,
    /// Grocery retailer used for product search
    #[serde(default)]
    pub retailer: RetailerConfig,
    /// Recipe site used for search and featured listings
    #[serde(default)]
    pub recipe_site: RecipeSiteConfig,
}

impl Default for BasketConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout: default_timeout(),
            cache_capacity: default_cache_capacity(),
            render_endpoint: None,
            retailer: RetailerConfig::default(),
            recipe_site: RecipeSiteConfig::default(),
        }
    }
}

/// Configuration for the grocery retailer
#[derive(Debug, Deserialize, Clone)]
pub struct RetailerConfig {
    #[serde(default = "default_retailer_base_url")]
    pub base_url: String,
    /// Path of the search results page
    #[serde(default = "default_retailer_search_path")]
    pub search_path: String,
    /// Query string parameter carrying the search terms
    #[serde(default = "default_retailer_query_param")]
    pub query_param: String,
    /// Marker identifying product detail pages in listing links
    #[serde(default = "default_product_path")]
    pub product_path: String,
    /// Number of result cards scanned per search
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
    #[serde(default = "default_product_placeholder")]
    pub placeholder_image: String,
}

impl Default for RetailerConfig {
    fn default() -> Self {
        Self {
            base_url: default_retailer_base_url(),
            search_path: default_retailer_search_path(),
            query_param: default_retailer_query_param(),
            product_path: default_product_path(),
            max_candidates: default_max_candidates(),
            placeholder_image: default_product_placeholder(),
        }
    }
}

/// Configuration for the recipe site
#[derive(Debug, Deserialize, Clone)]
pub struct RecipeSiteConfig {
    #[serde(default = "default_recipe_base_url")]
    pub base_url: String,
    #[serde(default = "default_recipe_search_path")]
    pub search_path: String,
    #[serde(default = "default_recipe_query_param")]
    pub query_param: String,
    /// Path of the page listing featured recipes
    #[serde(default = "default_featured_path")]
    pub featured_path: String,
    /// Number of recipe links collected per listing
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_recipe_placeholder")]
    pub placeholder_image: String,
}

impl Default for RecipeSiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_recipe_base_url(),
            search_path: default_recipe_search_path(),
            query_param: default_recipe_query_param(),
            featured_path: default_featured_path(),
            max_results: default_max_results(),
            placeholder_image: default_recipe_placeholder(),
        }
    }
}

// Default value functions
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_cache_capacity() -> usize {
    100
}

fn default_retailer_base_url() -> String {
    "https://www.wholefoodsmarket.com".to_string()
}

fn default_retailer_search_path() -> String {
    "/search".to_string()
}

fn default_retailer_query_param() -> String {
    "text".to_string()
}

fn default_product_path() -> String {
    "/product".to_string()
}

fn default_max_candidates() -> usize {
    5
}

fn default_product_placeholder() -> String {
    "https://images.unsplash.com/photo-1542838132-92c53300491e?w=400&h=400&fit=crop&q=80"
        .to_string()
}

fn default_recipe_base_url() -> String {
    "https://www.bonappetit.com".to_string()
}

fn default_recipe_search_path() -> String {
    "/search".to_string()
}

fn default_recipe_query_param() -> String {
    "q".to_string()
}

fn default_featured_path() -> String {
    "/recipes".to_string()
}

fn default_max_results() -> usize {
    9
}

fn default_recipe_placeholder() -> String {
    "https://images.unsplash.com/photo-1546069901-ba9599a7e63c?w=400&h=300&fit=crop".to_string()
}

impl BasketConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_BASKET__ prefix
    /// 2. basket.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_BASKET__RETAILER__BASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`BasketConfig::load`] for the source priority.
pub fn load_config() -> Result<BasketConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("basket").required(false))
        // Use double underscore for nested: RECIPE_BASKET__RETAILER__BASE_URL
        .add_source(
            Environment::with_prefix("RECIPE_BASKET")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_values() {
        let config = BasketConfig::default();
        assert_eq!(config.timeout, 30);
        assert_eq!(config.cache_capacity, 100);
        assert!(config.render_endpoint.is_none());
        assert_eq!(config.retailer.max_candidates, 5);
        assert_eq!(config.retailer.product_path, "/product");
        assert_eq!(config.recipe_site.max_results, 9);
    }

    #[test]
    fn test_partial_toml_uses_defaults_for_missing_fields() {
        let toml = r#"
            cache_capacity = 10

            [retailer]
            base_url = "http://localhost:9000"
        "#;

        let config: BasketConfig = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.cache_capacity, 10);
        assert_eq!(config.retailer.base_url, "http://localhost:9000");
        assert_eq!(config.retailer.query_param, "text");
        assert_eq!(config.recipe_site.base_url, "https://www.bonappetit.com");
        assert_eq!(config.timeout, 30);
    }

    #[test]
    fn test_load_config_without_file() {
        // No basket.toml in the test working directory, so defaults apply
        let result = load_config();
        assert!(result.is_ok());
    }
}
