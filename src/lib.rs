pub mod assembler;
pub mod builder;
pub mod cache;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod listing;
pub mod model;
pub mod search;
pub mod service;
pub mod text;

pub use assembler::assemble;
pub use builder::BasketServiceBuilder;
pub use cache::ImageResolutionCache;
pub use config::{load_config, BasketConfig, RecipeSiteConfig, RetailerConfig};
pub use error::ScrapeError;
pub use model::{IngredientMatch, ProductCandidate, RecipeRecord, RecipeSummary};
pub use search::{build_query, SearchTerm};
pub use service::BasketService;

use scraper::Html;

/// Extract a recipe from HTML that has already been fetched.
///
/// # Example
/// ```
/// let html = r#"<script type="application/ld+json">
///   {"@type": "Recipe", "name": "Toast", "recipeIngredient": ["2 slices bread"]}
/// </script>"#;
/// let recipe = recipe_basket::extract_recipe_from_html(html).unwrap();
/// assert_eq!(recipe.ingredients, vec!["slices bread"]);
/// ```
pub fn extract_recipe_from_html(html: &str) -> Result<RecipeRecord, ScrapeError> {
    assemble(&Html::parse_document(html))
}

/// Fetch a page with a default service and extract its recipe.
pub async fn extract_recipe_from_url(url: &str) -> Result<RecipeRecord, ScrapeError> {
    BasketService::builder().build()?.extract_recipe(url).await
}
